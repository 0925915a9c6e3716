pub mod clock;
pub mod config;
pub mod day_api;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod roster;
pub mod session;
pub mod storage;
