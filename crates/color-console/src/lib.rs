//! Colored console output with wrapped tables and a self-restoring status
//! line.
//!
//! `color-console` writes colored text, tables and progress bars to a
//! character terminal while keeping one ephemeral status line (for example
//! a progress bar) pinned below everything else.
//!
//! # Quick Start
//!
//! ```no_run
//! use color_console::{ColorSpec, Console, TableOptions};
//!
//! let console = Console::detect();
//!
//! for i in 0..=100u64 {
//!     if i % 25 == 0 {
//!         console.puts(&format!("reached {}", i), Some(&ColorSpec::from("green")), None)?;
//!     }
//!     console.show_progress("Processing", i, 100u64)?;
//! }
//! console.clear_progress()?;
//!
//! console.display_table(
//!     vec![vec!["name", "size"], vec!["Cargo.toml", "1 KiB"]],
//!     &TableOptions::new().col_sep("|").row_sep("-"),
//! )?;
//! # Ok::<(), color_console::ConsoleError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! Console (one lock around every write)
//! ├── StatusLine        blank before output, redraw after
//! ├── table             rows, via wrap_text and compute_widths
//! └── TerminalBackend
//!     ├── AnsiBackend   escape sequences
//!     └── NativeBackend console attribute calls (Win32 on Windows)
//! ```
//!
//! When standard output is not a terminal the console has no width: status
//! and progress calls do nothing, tables are laid out against a fallback
//! width, and plain writes still go out with their colors.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (backend selection, size probes,
//! status blank/redraw at `trace`) and never installs a subscriber.

pub mod backend;
mod color;
mod config;
mod console;
mod error;
mod layout;
mod status;
mod table;
mod wrap;

#[cfg(test)]
mod testing;

pub use backend::{BackendKind, TerminalBackend, WindowSize};
pub use color::{ColorName, ColorSpec};
pub use config::{ConsoleConfig, ProgressConfig, StatusConfig, TableConfig};
pub use console::Console;
pub use error::{ConsoleError, Result};
pub use layout::compute_widths;
pub use status::{ProgressFrame, ProgressOptions, StatusLine, StatusOptions};
pub use table::{Align, Cell, TableOptions};
pub use wrap::wrap_text;
