pub mod config;
pub mod error;
pub mod shell;
pub mod store;
pub mod task;
pub mod task_board;
pub mod ui;

pub use error::{Result, TaskError};
pub use store::TaskStore;
pub use task::Task;
pub use task_board::{Outcome, Stats, TaskBoard, TaskUpdate};
