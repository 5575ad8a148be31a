use std::fmt;

use tracing::{debug, warn};

use crate::error::{Result, TaskError};
use crate::store::TaskStore;
use crate::task::{parse_due_date, Task};

/// The in-memory task list bound to the store it is saved to.
#[derive(Debug)]
pub struct TaskBoard {
    pub tasks: Vec<Task>,
    store: TaskStore,
}

/// Fields to change in [`TaskBoard::update_task`]. `None` or blank keeps the
/// current value.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskUpdate<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub due_date: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added { index: usize },
    Updated { rejected_date: Option<String> },
    Deleted { title: String },
    Completed { index: usize },
    Cleared { removed: usize },
    NothingToClear,
    ClearCancelled,
    Saved,
}

impl Outcome {
    /// True when only part of the requested change was applied.
    pub fn is_partial(&self) -> bool {
        matches!(self, Outcome::Updated { rejected_date: Some(_) })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Added { .. } => write!(f, "Task added successfully."),
            Outcome::Updated { rejected_date: None } => write!(f, "Task updated successfully."),
            Outcome::Updated {
                rejected_date: Some(input),
            } => write!(
                f,
                "Invalid date format '{input}'. Date not changed.\nTask updated successfully."
            ),
            Outcome::Deleted { title } => write!(f, "Task '{title}' deleted successfully."),
            Outcome::Completed { .. } => write!(f, "Task marked as completed."),
            Outcome::Cleared { removed } => {
                write!(f, "Completed tasks cleared successfully ({removed} removed).")
            }
            Outcome::NothingToClear => write!(f, "No completed tasks to clear."),
            Outcome::ClearCancelled => write!(f, "Operation canceled."),
            Outcome::Saved => write!(f, "Tasks saved successfully."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskBoard {
    pub fn new(store: TaskStore) -> Self {
        Self::with_tasks(store, Vec::new())
    }

    pub fn with_tasks(store: TaskStore, tasks: Vec<Task>) -> Self {
        Self { tasks, store }
    }

    /// Loads the list from `store`.
    pub fn open(store: TaskStore) -> Result<Self> {
        let tasks = store.load()?;
        Ok(Self::with_tasks(store, tasks))
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn save(&self) -> Result<()> {
        self.store.save(&self.tasks).inspect_err(|err| {
            warn!(error = %err, "saving tasks failed, changes kept in memory");
        })
    }

    pub fn add_task(&mut self, title: &str, description: &str, due_date: &str) -> Result<Outcome> {
        let due_date = parse_due_date(due_date)?;
        self.tasks.push(Task::new(title, description, due_date));
        let index = self.tasks.len();
        debug!(index, "task added");
        self.save()?;
        Ok(Outcome::Added { index })
    }

    pub fn view(&self) -> Option<impl Iterator<Item = String> + '_> {
        view(&self.tasks)
    }

    pub fn update_task(&mut self, index: usize, update: TaskUpdate<'_>) -> Result<Outcome> {
        let pos = self.position(index)?;
        let task = &mut self.tasks[pos];
        if let Some(title) = non_blank(update.title) {
            task.title = title.to_string();
        }
        if let Some(description) = non_blank(update.description) {
            task.description = description.to_string();
        }
        let mut rejected_date = None;
        if let Some(input) = non_blank(update.due_date) {
            match parse_due_date(input) {
                Ok(date) => task.due_date = date,
                Err(err) => {
                    debug!(index, error = %err, "keeping previous due date");
                    rejected_date = Some(input.trim().to_string());
                }
            }
        }
        self.save()?;
        Ok(Outcome::Updated { rejected_date })
    }

    pub fn delete_task(&mut self, index: usize) -> Result<Outcome> {
        let pos = self.position(index)?;
        let task = self.tasks.remove(pos);
        debug!(index, title = %task.title, "task deleted");
        self.save()?;
        Ok(Outcome::Deleted { title: task.title })
    }

    pub fn mark_completed(&mut self, index: usize) -> Result<Outcome> {
        let pos = self.position(index)?;
        self.tasks[pos].completed = true;
        self.save()?;
        Ok(Outcome::Completed { index })
    }

    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.completed).collect()
    }

    /// Removes completed tasks once `confirmation` is "yes".
    pub fn clear_completed(&mut self, confirmation: &str) -> Result<Outcome> {
        let removed = self.tasks.iter().filter(|t| t.completed).count();
        if removed == 0 {
            return Ok(Outcome::NothingToClear);
        }
        if !confirmation.trim().eq_ignore_ascii_case("yes") {
            return Ok(Outcome::ClearCancelled);
        }
        self.tasks.retain(|t| !t.completed);
        debug!(removed, "completed tasks cleared");
        self.save()?;
        Ok(Outcome::Cleared { removed })
    }

    pub fn search(&self, keyword: &str) -> Vec<&Task> {
        let needle = keyword.to_lowercase();
        self.tasks.iter().filter(|t| t.matches(&needle)).collect()
    }

    pub fn stats(&self) -> Stats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Stats {
            total,
            completed,
            pending: total - completed,
        }
    }

    fn position(&self, index: usize) -> Result<usize> {
        if index == 0 || index > self.tasks.len() {
            return Err(TaskError::IndexOutOfRange {
                index,
                len: self.tasks.len(),
            });
        }
        Ok(index - 1)
    }
}

/// Numbers `tasks` from 1. `None` when there is nothing to show.
pub fn view<'a, I>(tasks: I) -> Option<impl Iterator<Item = String> + 'a>
where
    I: IntoIterator<Item = &'a Task>,
    I::IntoIter: 'a,
{
    let mut iter = tasks.into_iter().peekable();
    iter.peek()?;
    Some(
        iter.enumerate()
            .map(|(i, task)| format!("{}. {}", i + 1, task)),
    )
}

/// Parses a task number typed by the user.
pub fn parse_index(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    trimmed
        .parse()
        .map_err(|_| TaskError::InvalidInput(trimmed.to_string()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
