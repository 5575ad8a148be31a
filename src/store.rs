//! JSON persistence for the task list.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TaskError};
use crate::task::Task;

pub const DEFAULT_FILE: &str = "tasks.json";

#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(DEFAULT_FILE)
    }
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole list. A missing or blank file is an empty list.
    pub fn load(&self) -> Result<Vec<Task>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no task file yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(TaskError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let tasks: Vec<Task> =
            serde_json::from_slice(&data).map_err(|source| TaskError::CorruptStore {
                path: self.path.clone(),
                source,
            })?;
        info!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Overwrites the file with the whole list via write-then-rename.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let content = serde_json::to_string_pretty(tasks)?;
        write_atomic(&self.path, content.as_bytes()).map_err(|source| TaskError::Save {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let written = (|| -> io::Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(title: &str, description: &str, completed: bool) -> Task {
        Task {
            title: title.to_string(),
            description: description.to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            completed,
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_blank_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "  \n").unwrap();
        assert!(TaskStore::new(path).load().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        for tasks in [
            vec![],
            vec![task("one", "", false)],
            vec![task("a", "first", true), task("b", "", false), task("c", "third", true)],
        ] {
            store.save(&tasks).unwrap();
            assert_eq!(store.load().unwrap(), tasks);
        }
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.json");
        let store = TaskStore::new(&path);
        store.save(&[task("a", "b", false)]).unwrap();
        assert!(path.exists());
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not json").unwrap();
        let err = TaskStore::new(&path).load().unwrap_err();
        assert!(matches!(err, TaskError::CorruptStore { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, b"[{\"title\":\"\xff\xfe\"}]").unwrap();
        let err = TaskStore::new(&path).load().unwrap_err();
        assert!(matches!(err, TaskError::CorruptStore { .. }));

        fs::write(&path, b"\xff\xfe").unwrap();
        let err = TaskStore::new(&path).load().unwrap_err();
        assert!(matches!(err, TaskError::CorruptStore { .. }));
    }

    #[test]
    fn test_save_failure_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = dir.path().join("tasks.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();
        let err = TaskStore::new(&path).save(&[]).unwrap_err();
        assert!(err.is_save_failure());
        assert!(!tmp_path(&path).exists());
    }
}
