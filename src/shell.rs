//! Numbered-menu front end over a [`TaskBoard`].

use std::io::{self, BufRead, Write};

use tracing::{debug, error};

use crate::error::TaskError;
use crate::task_board::{parse_index, view, Outcome, TaskBoard, TaskUpdate};

const MENU: &str = "\nTask Manager
1. Add Task
2. View Tasks
3. Update Task
4. Delete Task
5. Mark Task as Completed
6. Clear Completed Tasks
7. Search Tasks
8. Show Task Statistics
9. Save and Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell<R, W> {
    board: TaskBoard,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(board: TaskBoard, input: R, output: W) -> Self {
        Self {
            board,
            input,
            output,
        }
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn into_board(self) -> TaskBoard {
        self.board
    }

    /// Runs the menu until the user saves and exits, or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                debug!("input closed, saving and exiting");
                return match self.save_and_exit()? {
                    Flow::Exit => Ok(()),
                    Flow::Continue => Err(io::Error::other(
                        "input closed before the task list could be saved",
                    )),
                };
            };
            if self.dispatch(&choice)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    pub fn dispatch(&mut self, choice: &str) -> io::Result<Flow> {
        match choice.trim() {
            "1" => self.add_task()?,
            "2" => self.print_tasks()?,
            "3" => self.update_task()?,
            "4" => self.delete_task()?,
            "5" => self.mark_completed()?,
            "6" => self.clear_completed()?,
            "7" => self.search_tasks()?,
            "8" => self.show_stats()?,
            "9" => return self.save_and_exit(),
            _ => writeln!(self.output, "Invalid choice. Please choose a valid option.")?,
        }
        Ok(Flow::Continue)
    }

    fn add_task(&mut self) -> io::Result<()> {
        let title = self.prompt("Title: ")?.unwrap_or_default();
        let description = self.prompt("Description: ")?.unwrap_or_default();
        let due_date = self.prompt("Due Date (YYYY-MM-DD): ")?.unwrap_or_default();
        let result = self.board.add_task(&title, &description, &due_date);
        match result {
            Err(TaskError::InvalidDate { .. }) => {
                writeln!(self.output, "Invalid date format. Task not added.")
            }
            other => self.report(other),
        }
    }

    fn print_tasks(&mut self) -> io::Result<()> {
        match self.board.view() {
            Some(lines) => {
                for line in lines {
                    writeln!(self.output, "{line}")?;
                }
                Ok(())
            }
            None => writeln!(self.output, "No tasks available."),
        }
    }

    fn update_task(&mut self) -> io::Result<()> {
        let Some(index) = self.select_task("update")? else {
            return Ok(());
        };
        let current = &self.board.tasks[index - 1];
        let (title_prompt, date_prompt) = (
            format!("New title (leave blank to keep '{}'): ", current.title),
            format!(
                "New due date (YYYY-MM-DD, leave blank to keep '{}'): ",
                current.due_date
            ),
        );
        writeln!(self.output, "Updating task: {current}")?;
        let title = self.prompt(&title_prompt)?;
        let description = self.prompt("New description (leave blank to keep current): ")?;
        let due_date = self.prompt(&date_prompt)?;
        let update = TaskUpdate {
            title: title.as_deref(),
            description: description.as_deref(),
            due_date: due_date.as_deref(),
        };
        let result = self.board.update_task(index, update);
        self.report(result)
    }

    fn delete_task(&mut self) -> io::Result<()> {
        let Some(index) = self.select_task("delete")? else {
            return Ok(());
        };
        let result = self.board.delete_task(index);
        self.report(result)
    }

    fn mark_completed(&mut self) -> io::Result<()> {
        let Some(index) = self.select_task("mark as completed")? else {
            return Ok(());
        };
        let result = self.board.mark_completed(index);
        self.report(result)
    }

    fn clear_completed(&mut self) -> io::Result<()> {
        let preview: Vec<String> = match view(self.board.completed_tasks()) {
            Some(lines) => lines.collect(),
            None => return writeln!(self.output, "{}", Outcome::NothingToClear),
        };
        writeln!(self.output, "Completed Tasks:")?;
        for line in preview {
            writeln!(self.output, "{line}")?;
        }
        let confirmation = self
            .prompt("Are you sure you want to clear all completed tasks? (yes/no): ")?
            .unwrap_or_default();
        let result = self.board.clear_completed(&confirmation);
        self.report(result)
    }

    fn search_tasks(&mut self) -> io::Result<()> {
        let keyword = self
            .prompt("Enter keyword to search for in tasks: ")?
            .unwrap_or_default();
        let found = self.board.search(&keyword);
        let count = found.len();
        match view(found) {
            None => writeln!(self.output, "No tasks found matching the keyword."),
            Some(lines) => {
                writeln!(self.output, "Found {count} task(s) matching the keyword:")?;
                for line in lines {
                    writeln!(self.output, "{line}")?;
                }
                Ok(())
            }
        }
    }

    fn show_stats(&mut self) -> io::Result<()> {
        let stats = self.board.stats();
        writeln!(self.output, "Total Tasks: {}", stats.total)?;
        writeln!(self.output, "Completed Tasks: {}", stats.completed)?;
        writeln!(self.output, "Pending Tasks: {}", stats.pending)
    }

    fn save_and_exit(&mut self) -> io::Result<Flow> {
        match self.board.save() {
            Ok(()) => {
                writeln!(self.output, "{}", Outcome::Saved)?;
                Ok(Flow::Exit)
            }
            Err(err) => {
                writeln!(self.output, "{err}. Choose 9 again to retry.")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Lists the tasks and asks for a valid 1-based task number.
    fn select_task(&mut self, verb: &str) -> io::Result<Option<usize>> {
        if self.board.is_empty() {
            writeln!(self.output, "No tasks available to {verb}.")?;
            return Ok(None);
        }
        self.print_tasks()?;
        let input = self
            .prompt(&format!("Enter task number to {verb}: "))?
            .unwrap_or_default();
        let checked = parse_index(&input).and_then(|index| {
            if index == 0 || index > self.board.len() {
                Err(TaskError::IndexOutOfRange {
                    index,
                    len: self.board.len(),
                })
            } else {
                Ok(index)
            }
        });
        match checked {
            Ok(index) => Ok(Some(index)),
            Err(TaskError::InvalidInput(_)) => {
                writeln!(self.output, "Invalid input.")?;
                Ok(None)
            }
            Err(_) => {
                writeln!(self.output, "Invalid task number.")?;
                Ok(None)
            }
        }
    }

    fn report(&mut self, result: crate::error::Result<Outcome>) -> io::Result<()> {
        match result {
            Ok(outcome) => writeln!(self.output, "{outcome}"),
            Err(err) if err.is_save_failure() => {
                error!(error = %err, "save failed");
                writeln!(
                    self.output,
                    "{err}. The change is kept in memory; choose 9 to retry saving."
                )
            }
            Err(err) => writeln!(self.output, "{err}"),
        }
    }

    /// Reads one line without its line ending. `None` once input is exhausted.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run(board: TaskBoard, script: &str) -> (TaskBoard, String) {
        let mut out = Vec::new();
        let mut shell = Shell::new(board, Cursor::new(script.to_string()), &mut out);
        shell.run().unwrap();
        let board = shell.into_board();
        (board, String::from_utf8(out).unwrap())
    }

    fn empty_board() -> (TempDir, TaskBoard) {
        let dir = tempfile::tempdir().unwrap();
        let board = TaskBoard::new(TaskStore::new(dir.path().join("tasks.json")));
        (dir, board)
    }

    #[test]
    fn test_add_view_and_exit() {
        let (_dir, board) = empty_board();
        let (board, out) = run(board, "1\nWrite report\nQ1 numbers\n2024-01-15\n2\n9\n");
        assert_eq!(board.len(), 1);
        assert!(out.contains("Task added successfully."));
        assert!(out.contains("1. Write report (Due: 2024-01-15) - Pending\nQ1 numbers"));
        assert!(out.contains("Tasks saved successfully."));
        assert_eq!(board.store().load().unwrap(), board.tasks);
    }

    #[test]
    fn test_invalid_choice_and_bad_date() {
        let (_dir, board) = empty_board();
        let (board, out) = run(board, "x\n1\nt\nd\n15-01-2024\n9\n");
        assert!(out.contains("Invalid choice. Please choose a valid option."));
        assert!(out.contains("Invalid date format. Task not added."));
        assert!(board.is_empty());
    }

    #[test]
    fn test_index_errors() {
        let (_dir, mut board) = empty_board();
        board.add_task("a", "", "2024-01-01").unwrap();
        let (board, out) = run(board, "4\nabc\n5\n7\n5\n1\n9\n");
        assert!(out.contains("Invalid input."));
        assert!(out.contains("Invalid task number."));
        assert!(out.contains("Task marked as completed."));
        assert!(board.tasks[0].completed);
    }

    #[test]
    fn test_empty_list_messages() {
        let (_dir, board) = empty_board();
        let (_, out) = run(board, "2\n3\n6\n9\n");
        assert!(out.contains("No tasks available."));
        assert!(out.contains("No tasks available to update."));
        assert!(out.contains("No completed tasks to clear."));
    }

    #[test]
    fn test_update_partial() {
        let (_dir, mut board) = empty_board();
        board.add_task("old", "desc", "2024-01-01").unwrap();
        let (board, out) = run(board, "3\n1\nnew\n\nnot-a-date\n9\n");
        assert!(out.contains("Date not changed."));
        assert_eq!(board.tasks[0].title, "new");
        assert_eq!(board.tasks[0].description, "desc");
        assert_eq!(board.tasks[0].due_date.to_string(), "2024-01-01");
    }

    #[test]
    fn test_clear_search_stats() {
        let (_dir, mut board) = empty_board();
        board.add_task("Report Q1", "", "2024-01-01").unwrap();
        board.add_task("Budget", "", "2024-01-02").unwrap();
        board.mark_completed(2).unwrap();
        let (board, out) = run(board, "7\nREPORT\n8\n6\nno\n6\nyes\n9\n");
        assert!(out.contains("Found 1 task(s) matching the keyword:"));
        assert!(out.contains("Total Tasks: 2"));
        assert!(out.contains("Completed Tasks: 1"));
        assert!(out.contains("Operation canceled."));
        assert!(out.contains("Completed tasks cleared successfully"));
        assert_eq!(board.len(), 1);
        assert_eq!(board.tasks[0].title, "Report Q1");
    }

    #[test]
    fn test_eof_saves() {
        let (_dir, mut board) = empty_board();
        board.tasks.push(crate::task::Task::new(
            "kept",
            "",
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ));
        let (board, out) = run(board, "");
        assert!(out.contains("Tasks saved successfully."));
        assert_eq!(board.store().load().unwrap().len(), 1);
    }

    #[test]
    fn test_eof_with_failed_save_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();
        let mut board = TaskBoard::new(TaskStore::new(&path));
        assert!(board.add_task("unsaved", "", "2024-01-01").is_err());

        let mut out = Vec::new();
        let mut shell = Shell::new(board, Cursor::new(String::new()), &mut out);
        assert!(shell.run().is_err());
        assert_eq!(shell.board().len(), 1);
        drop(shell);
        assert!(String::from_utf8(out).unwrap().contains("Failed to save tasks"));
    }

    #[test]
    fn test_text_answers_kept_as_typed() {
        let (_dir, board) = empty_board();
        let (board, _) = run(board, "1\n  Spaced title \n desc \r\n 2024-01-15 \n9\n");
        assert_eq!(board.tasks[0].title, "  Spaced title ");
        assert_eq!(board.tasks[0].description, " desc ");
    }
}
