use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Opening,
    Closing,
    AdHoc,
}

impl TaskCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Closing => "closing",
            Self::AdHoc => "ad hoc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub name: String,
    pub signed_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub category: TaskCategory,
    #[serde(default)]
    pub completions: Vec<Completion>,
    pub created_at: String,
}

impl Task {
    pub fn is_done(&self) -> bool {
        !self.completions.is_empty()
    }

    pub fn signed_by(&self, name: &str) -> bool {
        self.completions.iter().any(|entry| entry.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: String,
    pub site: String,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default)]
    pub log: Vec<LogEntry>,
}

impl Day {
    pub fn all_tasks_done(&self) -> bool {
        self.tasks.iter().all(Task::is_done)
    }
}
