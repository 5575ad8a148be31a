use crate::task_board::TaskBoard;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

const COLUMNS: [&str; 2] = ["Pending", "Done"];

/// Cursor and status line of the board screen.
#[derive(Debug, Default)]
pub struct BoardState {
    pub selected_column: usize,
    pub selected_task: usize,
    pub status: String,
}

impl BoardState {
    /// 1-based board indices of the tasks shown in `column`.
    fn column_indices(board: &TaskBoard, column: usize) -> Vec<usize> {
        board
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.completed == (column == 1))
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Applies one key press. Returns `false` when the board should close.
    pub fn handle_key(&mut self, code: KeyCode, board: &mut TaskBoard) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                    self.selected_task = 0;
                }
            }
            KeyCode::Right => {
                if self.selected_column < COLUMNS.len() - 1 {
                    self.selected_column += 1;
                    self.selected_task = 0;
                }
            }
            KeyCode::Up => {
                self.selected_task = self.selected_task.saturating_sub(1);
            }
            KeyCode::Down => {
                let max_tasks = Self::column_indices(board, self.selected_column).len();
                if self.selected_task + 1 < max_tasks {
                    self.selected_task += 1;
                }
            }
            KeyCode::Enter => {
                // Only Pending tasks move forward; Done is terminal.
                if self.selected_column == 0 {
                    let pending = Self::column_indices(board, 0);
                    if let Some(&index) = pending.get(self.selected_task) {
                        self.status = match board.mark_completed(index) {
                            Ok(outcome) => outcome.to_string(),
                            Err(err) => err.to_string(),
                        };
                        if self.selected_task + 1 >= pending.len() {
                            self.selected_task = self.selected_task.saturating_sub(1);
                        }
                    }
                }
            }
            _ => {}
        }
        true
    }
}

pub fn draw(f: &mut Frame, board: &TaskBoard, state: &BoardState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    for (i, name) in COLUMNS.iter().enumerate() {
        let items: Vec<ListItem> = BoardState::column_indices(board, i)
            .into_iter()
            .map(|index| {
                let t = &board.tasks[index - 1];
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{index}. ")),
                    Span::styled(t.title.clone(), Style::default().fg(Color::White)),
                    Span::raw(format!(" (Due: {})", t.due_date)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(*name)
                    .borders(Borders::ALL)
                    .border_style(if state.selected_column == i {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    }),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD));

        let mut list_state = ListState::default();
        if state.selected_column == i {
            list_state.select(Some(state.selected_task));
        }
        f.render_stateful_widget(list, chunks[i], &mut list_state);
    }

    let help = if state.status.is_empty() {
        "←/→ column  ↑/↓ task  Enter complete  q quit".to_string()
    } else {
        state.status.clone()
    };
    f.render_widget(Paragraph::new(help), rows[1]);
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, board: &mut TaskBoard) -> io::Result<()> {
    let mut state = BoardState::default();
    loop {
        terminal.draw(|f| draw(f, board, &state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !state.handle_key(key.code, board) {
                return Ok(());
            }
        }
    }
}
