use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use tasktrack::config::{self, Config};
use tasktrack::shell::Shell;
use tasktrack::task_board::view;
use tasktrack::ui::run_app;
use tasktrack::{TaskBoard, TaskError, TaskStore};

#[derive(Parser)]
#[command(name = "tasktrack")]
#[command(version)]
#[command(about = "Personal task tracker")]
struct Cli {
    /// Task file to use instead of the configured one
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,
    /// Config file (defaults to <config dir>/tasktrack/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive numbered menu (default)
    Menu,
    /// Two-column Pending/Done board
    Board,
    /// Print all tasks
    List,
    /// Print task statistics
    Stats,
}

fn main() -> ExitCode {
    // Quiet by default; RUST_LOG=debug for details.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let data_file = cli.file.unwrap_or(config.data_file);

    let Some(mut board) = open_board(TaskStore::new(data_file)) else {
        return ExitCode::FAILURE;
    };

    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            let mut shell = Shell::new(board, stdin.lock(), io::stdout());
            shell.run()
        }
        Commands::Board => run_board(&mut board),
        Commands::List => print_list(&board),
        Commands::Stats => {
            let stats = board.stats();
            println!("Total Tasks: {}", stats.total);
            println!("Completed Tasks: {}", stats.completed);
            println!("Pending Tasks: {}", stats.pending);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(explicit: Option<&std::path::Path>) -> Config {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config::default_config_path() {
            Some(path) => path,
            None => return Config::default(),
        },
    };
    config::load_config(&path).unwrap_or_else(|err| {
        warn!(error = %err, "using default configuration");
        Config::default()
    })
}

/// Loads the task list, falling back to an empty one when the file can't be used.
fn open_board(store: TaskStore) -> Option<TaskBoard> {
    match store.load() {
        Ok(tasks) => Some(TaskBoard::with_tasks(store, tasks)),
        Err(err @ TaskError::CorruptStore { .. }) => {
            eprintln!("{err}");
            if confirm(
                "Start with an empty task list? \
                 The file will be overwritten on the next save. (yes/no): ",
            ) {
                warn!(
                    path = %store.path().display(),
                    "starting with an empty list over a corrupt file"
                );
                Some(TaskBoard::new(store))
            } else {
                None
            }
        }
        Err(err) => {
            warn!(error = %err, "starting with an empty list");
            eprintln!("Warning: {err}. Starting with an empty task list.");
            Some(TaskBoard::new(store))
        }
    }
}

fn confirm(message: &str) -> bool {
    print!("{message}");
    let _ = io::stdout().flush();
    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input) {
        Ok(_) => input.trim().eq_ignore_ascii_case("yes"),
        Err(_) => false,
    }
}

fn print_list(board: &TaskBoard) -> io::Result<()> {
    let mut out = io::stdout().lock();
    match view(&board.tasks) {
        Some(lines) => {
            for line in lines {
                writeln!(out, "{line}")?;
            }
            Ok(())
        }
        None => writeln!(out, "No tasks available."),
    }
}

fn run_board(board: &mut TaskBoard) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, board);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
