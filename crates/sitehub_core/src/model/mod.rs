mod day;
mod member;

pub use day::{Completion, Day, LogEntry, Task, TaskCategory};
pub use member::{Member, Role};
