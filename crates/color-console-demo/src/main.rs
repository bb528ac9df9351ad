//! color-console-demo - walks through console output, progress and tables

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use color_console::{
    Cell, ColorSpec, Console, ConsoleConfig, ProgressOptions, StatusOptions, TableOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "color-console-demo", version, about)]
struct Cli {
    /// YAML file overriding the console defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log library events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pause between steps, in milliseconds
    #[arg(long, global = true, default_value_t = 100)]
    delay: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Colored lines, status text and progress bars
    Console,
    /// A progress bar with regular output scrolling above it
    Progress {
        /// Number of steps
        #[arg(long, default_value_t = 100)]
        steps: u64,
    },
    /// Two threads sharing one progress bar
    Threads,
    /// Rows and tables with wrapping, separators and indents
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "color_console=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ConsoleConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConsoleConfig::default(),
    };
    let console = Console::from_config(config);
    let delay = Duration::from_millis(cli.delay);

    match cli.command {
        Command::Console => basics(&console, delay),
        Command::Progress { steps } => progress(&console, steps, delay),
        Command::Threads => threads(console, delay),
        Command::Table => tables(&console),
    }
}

fn color(name: &str) -> ColorSpec {
    ColorSpec::from(name)
}

fn basics(console: &Console, delay: Duration) -> Result<()> {
    console.set_title("color-console demo")?;
    console.puts("This is some normal text", None, None)?;
    console.puts("", None, None)?;
    console.puts("This is some red text", Some(&color("red")), None)?;
    console.puts(
        "This is red text on a blue background",
        Some(&color("red")),
        Some(&color("blue")),
    )?;

    console.show_progress("In progress", 35, ProgressOptions::new().text_color("green"))?;
    thread::sleep(delay * 10);
    console.puts("Here is a new line", None, None)?;
    thread::sleep(delay * 10);
    console.show_progress("In progress", 75, ProgressOptions::new().text_color("red"))?;
    thread::sleep(delay * 10);
    console.status(Some("Switching to long progress bar"), &StatusOptions::default())?;
    thread::sleep(delay * 10);
    console.show_progress("Long progress", 80, ProgressOptions::new().bar_length(100))?;
    thread::sleep(delay * 10);
    console.clear_status()?;

    match (console.width(), console.height()) {
        (Some(w), Some(h)) => console.puts(&format!("Terminal is {}x{}", w, h), None, None)?,
        _ => console.puts("Output is not a terminal", None, None)?,
    }
    Ok(())
}

fn progress(console: &Console, steps: u64, delay: Duration) -> Result<()> {
    console.puts("Starting...", Some(&color("green")), None)?;
    for i in 0..=steps {
        console.show_progress("Test progress", i, steps.max(1))?;
        thread::sleep(delay);
        if steps >= 10 && i % (steps / 10) == 0 {
            console.puts(&format!("{}% complete", i * 100 / steps), None, None)?;
        }
    }
    console.clear_progress()?;
    console.puts("Done", None, None)?;
    Ok(())
}

fn threads(console: Console, delay: Duration) -> Result<()> {
    let console = Arc::new(console);
    let progress: Arc<Mutex<BTreeMap<&'static str, (u64, u64)>>> = Arc::default();

    console.puts("Starting multi-threaded...", Some(&color("green")), None)?;
    let workers: Vec<_> = [("A", 15u64, 3u32), ("B", 10, 5)]
        .into_iter()
        .map(|(tag, total, pace)| {
            let console = Arc::clone(&console);
            let progress = Arc::clone(&progress);
            thread::spawn(move || -> color_console::Result<()> {
                for i in 0..=total {
                    thread::sleep(delay * pace);
                    let mut state = progress.lock().unwrap_or_else(|e| e.into_inner());
                    state.insert(tag, (i, total));
                    let (iter, sum) = state
                        .values()
                        .fold((0, 0), |(a, b), (i, t)| (a + i, b + t));
                    console.puts(&format!("Iter: {}, Total: {}", iter, sum), None, None)?;
                    console.show_progress("Extracting data...", iter, sum)?;
                }
                Ok(())
            })
        })
        .collect();

    for worker in workers {
        worker
            .join()
            .map_err(|_| anyhow::anyhow!("worker thread panicked"))??;
    }
    console.clear_progress()?;
    console.puts("Done", None, None)?;
    Ok(())
}

fn tables(console: &Console) -> Result<()> {
    let header = ["Column 1", "Column 2", "Column 3", "Column 4"];
    let mixed = [
        "Short col",
        "A somewhat longer column",
        "A very very very long column that should wrap multiple lines",
        "Another medium length column",
    ];

    console.puts("---", None, None)?;
    console.display_row(header, &[10, 10, 20, 20], &TableOptions::default())?;
    console.puts("---", None, None)?;
    console.display_row(
        mixed,
        &[10, 10, 20, 20],
        &TableOptions::new().indent(8).col_sep("|"),
    )?;
    console.puts("---", None, None)?;
    console.display_table(
        [header, mixed],
        &TableOptions::new()
            .col_widths(vec![10, 15, 20, 40])
            .col_sep("|")
            .row_sep("-"),
    )?;

    console.display_table(
        vec![
            vec![Cell::from("item"), Cell::from("qty"), Cell::from("price")],
            vec![Cell::from("hex bolts"), Cell::from(120), Cell::from(0.35)],
            vec![Cell::from("washers"), Cell::from(2400), Cell::from(0.05)],
        ],
        &TableOptions::new().col_sep("|").row_sep("=").indent(2),
    )?;

    console.display_row(
        ["INFO", "This is a log line"],
        &[12, 60],
        &TableOptions::new().text_color("white"),
    )?;
    Ok(())
}
