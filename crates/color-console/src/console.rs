//! The console service.
//!
//! [`Console`] owns the backend and the status line behind one mutex. Every
//! public operation takes that lock, blanks a displayed status, does its own
//! drawing, puts the status back and flushes, so output from concurrent
//! callers never lands between another caller's blank and redraw.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::backend::{self, TerminalBackend};
use crate::color::ColorSpec;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use crate::status::{ProgressFrame, ProgressOptions, StatusLine, StatusOptions};
use crate::table::{self, Cell, TableOptions, TableStyle};
use crate::wrap;

struct Inner<B> {
    backend: B,
    status: StatusLine,
}

/// Colored, status-aware terminal output.
///
/// Create one per process (typically with [`Console::detect`]) and share it
/// by reference; all methods take `&self`.
///
/// # Example
///
/// ```rust
/// use color_console::backend::{AnsiBackend, WindowSize};
/// use color_console::{ColorSpec, Console};
///
/// let backend = AnsiBackend::with_size(Vec::new(), Some(WindowSize::new(80, 24)));
/// let console = Console::new(backend);
///
/// console.puts("plain line", None, None)?;
/// console.puts("warning", Some(&ColorSpec::from("yellow")), None)?;
/// console.show_progress("Copying", 35, 100u64)?;
/// assert!(console.is_status_displayed());
/// console.clear_progress()?;
/// # Ok::<(), color_console::ConsoleError>(())
/// ```
pub struct Console<B = Box<dyn TerminalBackend>> {
    inner: Mutex<Inner<B>>,
    config: ConsoleConfig,
}

impl Console {
    /// Console on standard output with the default configuration.
    pub fn detect() -> Self {
        Self::from_config(ConsoleConfig::default())
    }

    /// Console on standard output, using the backend `config` asks for.
    pub fn from_config(config: ConsoleConfig) -> Self {
        let backend = backend::detect(config.backend);
        Self::with_config(backend, config)
    }
}

impl<B: TerminalBackend> Console<B> {
    /// Console over `backend` with the default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, ConsoleConfig::default())
    }

    /// Console over `backend` with `config` supplying option defaults.
    pub fn with_config(backend: B, config: ConsoleConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                backend,
                status: StatusLine::new(),
            }),
            config,
        }
    }

    /// The configuration this console fills missing options from.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Inner<B>> {
        // A panic mid-write leaves at worst a half-drawn line; the state
        // itself is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `draw` with the status blanked, then redraws the status and
    /// flushes. `draw` gets the backend and the terminal width, if known.
    fn with_exclusive_output<T>(
        &self,
        draw: impl FnOnce(&mut B, Option<usize>) -> Result<T>,
    ) -> Result<T> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let width = terminal_width(&mut inner.backend);

        inner.status.blank(&mut inner.backend, width.unwrap_or(0))?;
        let drawn = draw(&mut inner.backend, width);
        let redrawn = inner.status.redraw(&mut inner.backend);
        let flushed = inner.backend.flush();

        let value = drawn?;
        redrawn?;
        flushed?;
        Ok(value)
    }

    /// Writes `text` without a line terminator.
    pub fn write(&self, text: &str, fg: Option<&ColorSpec>, bg: Option<&ColorSpec>) -> Result<()> {
        self.with_exclusive_output(|backend, _| backend.write_colored(text, fg, bg))
    }

    /// Writes `text` followed by the backend's line terminator.
    ///
    /// Where the backend reports the cursor column, the terminator is left
    /// out when the text runs exactly to the right edge, since the terminal
    /// has already moved to the next line.
    pub fn puts(&self, text: &str, fg: Option<&ColorSpec>, bg: Option<&ColorSpec>) -> Result<()> {
        self.with_exclusive_output(|backend, width| {
            let fills_line = match (backend.cursor_column(), width) {
                (Some(column), Some(width)) => {
                    usize::from(column) + text.chars().count() == width
                }
                _ => false,
            };
            backend.write_colored(text, fg, bg)?;
            if !fills_line {
                let terminator = backend.line_terminator();
                backend.write_raw(terminator)?;
            }
            Ok(())
        })
    }

    /// Sets the status line to `text`, or clears it with `None`.
    ///
    /// Does nothing when output is not a terminal.
    pub fn status(&self, text: Option<&str>, opts: &StatusOptions) -> Result<()> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let Some(width) = terminal_width(&mut inner.backend) else {
            return Ok(());
        };

        let fg = opts
            .text_color
            .clone()
            .or_else(|| self.config.status.text_color.clone());
        let bg = opts
            .background_color
            .clone()
            .or_else(|| self.config.status.background_color.clone());
        inner
            .status
            .set(&mut inner.backend, width, text.map(str::to_string), fg, bg)?;
        inner.backend.flush()
    }

    /// Shows a progress bar for `complete` steps as the status line.
    ///
    /// `opts` may be a [`ProgressOptions`] or a bare total. The status is
    /// only rewritten when the whole-percent value changes. Does nothing
    /// when output is not a terminal, whatever the options.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::ZeroProgressTotal`] when the total is zero, before
    /// anything is drawn.
    pub fn show_progress(
        &self,
        label: &str,
        complete: u64,
        opts: impl Into<ProgressOptions>,
    ) -> Result<()> {
        let opts = opts.into();
        let total = opts.total.unwrap_or(self.config.progress.total);

        let mut guard = self.lock();
        let inner = &mut *guard;
        let Some(width) = terminal_width(&mut inner.backend) else {
            return Ok(());
        };
        if total == 0 {
            return Err(ConsoleError::ZeroProgressTotal);
        }

        let bar_length = opts.bar_length.unwrap_or(self.config.progress.bar_length);
        let frame = ProgressFrame::new(label, complete, total, bar_length, self.config.progress.fill)?;
        let fg = opts.text_color.or_else(|| self.config.status.text_color.clone());
        let bg = opts
            .background_color
            .or_else(|| self.config.status.background_color.clone());
        if inner
            .status
            .show_progress(&mut inner.backend, width, &frame, fg, bg)?
        {
            inner.backend.flush()?;
        }
        Ok(())
    }

    /// Clears the progress bar (or any status).
    pub fn clear_progress(&self) -> Result<()> {
        self.status(None, &StatusOptions::default())
    }

    /// Clears the status line.
    pub fn clear_status(&self) -> Result<()> {
        self.clear_progress()
    }

    /// Draws one table row against explicit column widths, wrapping cells
    /// that do not fit. Fails if the row and `widths` differ in length.
    pub fn display_row<C: Into<Cell>>(
        &self,
        row: impl IntoIterator<Item = C>,
        widths: &[usize],
        opts: &TableOptions,
    ) -> Result<()> {
        let row: Vec<Cell> = row.into_iter().map(Into::into).collect();
        if row.is_empty() {
            return Ok(());
        }
        let style = TableStyle::resolve(opts, &self.config.table);
        self.with_exclusive_output(|backend, width| {
            table::draw_row(backend, &row, widths, &style, width)
        })
    }

    /// Draws `rows` as a table.
    ///
    /// Column widths come from `opts.col_widths`, or are balanced to fit
    /// `opts.width`, the terminal width, or the configured fallback width.
    /// The first row decides the number of columns; every row must match.
    pub fn display_table<R, C>(
        &self,
        rows: impl IntoIterator<Item = R>,
        opts: &TableOptions,
    ) -> Result<()>
    where
        R: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        if rows.first().map_or(true, Vec::is_empty) {
            return Ok(());
        }
        let style = TableStyle::resolve(opts, &self.config.table);
        let fallback = self.config.table.fallback_width;
        self.with_exclusive_output(|backend, width| {
            let widths = table::resolve_widths(&rows, opts, &style, width, fallback);
            table::draw_table(backend, &rows, &widths, &style, width)
        })
    }

    /// Wraps `text` to `width` characters. See [`wrap_text`](crate::wrap_text).
    pub fn wrap_text(&self, text: &str, width: usize) -> Vec<String> {
        wrap::wrap_text(text, width)
    }

    /// Sets the terminal window title.
    pub fn set_title(&self, title: &str) -> Result<()> {
        let mut guard = self.lock();
        guard.backend.set_title(title)?;
        guard.backend.flush()
    }

    /// Blanks the current line and the `lines - 1` lines above it.
    pub fn clear_line(&self, lines: usize) -> Result<()> {
        if lines < 1 {
            return Err(ConsoleError::InvalidLineCount(lines));
        }
        self.with_exclusive_output(|backend, _| backend.clear_lines(lines))
    }

    /// Terminal width in columns, or `None` when output is not a terminal.
    pub fn width(&self) -> Option<u16> {
        self.lock().backend.window_size().map(|size| size.columns)
    }

    /// Terminal height in rows, or `None` when output is not a terminal.
    pub fn height(&self) -> Option<u16> {
        self.lock().backend.window_size().map(|size| size.rows)
    }

    /// The status text currently set.
    pub fn current_status(&self) -> Option<String> {
        self.lock().status.text().map(str::to_string)
    }

    /// Whether the status is currently on screen.
    pub fn is_status_displayed(&self) -> bool {
        self.lock().status.is_displayed()
    }
}

fn terminal_width<B: TerminalBackend + ?Sized>(backend: &mut B) -> Option<usize> {
    backend
        .window_size()
        .map(|size| usize::from(size.columns))
        .filter(|&columns| columns > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::WindowSize;
    use crate::testing::{take, written, Log, Op, RecordingBackend};

    fn console() -> (Console<RecordingBackend>, Log) {
        let (backend, log) = RecordingBackend::new(Some(WindowSize::new(80, 24)));
        (Console::new(backend), log)
    }

    fn redirected() -> (Console<RecordingBackend>, Log) {
        let (backend, log) = RecordingBackend::new(None);
        (Console::new(backend), log)
    }

    #[test]
    fn write_and_puts_without_status() {
        let (console, log) = console();
        console.write("a", None, None).unwrap();
        console
            .puts("b", Some(&ColorSpec::from("red")), None)
            .unwrap();
        assert_eq!(
            take(&log),
            vec![
                Op::Write("a".into()),
                Op::Flush,
                Op::SetColor(Some(ColorSpec::from("red")), None),
                Op::Write("b".into()),
                Op::ResetColor,
                Op::Write("\n".into()),
                Op::Flush,
            ]
        );
    }

    #[test]
    fn output_is_bracketed_by_status_blank_and_redraw() {
        let (console, log) = console();
        console
            .status(Some("busy"), &StatusOptions::new().text_color("green"))
            .unwrap();
        take(&log);

        console.puts("line", None, None).unwrap();
        assert_eq!(
            take(&log),
            vec![
                Op::ClearLines(1),
                Op::Write("line".into()),
                Op::Write("\n".into()),
                Op::SetColor(Some(ColorSpec::from("green")), None),
                Op::Write("busy".into()),
                Op::ResetColor,
                Op::Flush,
            ]
        );
        assert!(console.is_status_displayed());
        assert_eq!(console.current_status().as_deref(), Some("busy"));
    }

    #[test]
    fn status_uses_configured_color_by_default() {
        let (console, log) = console();
        console.status(Some("s"), &StatusOptions::default()).unwrap();
        assert_eq!(
            take(&log)[0],
            Op::SetColor(Some(ColorSpec::CYAN), None)
        );
    }

    #[test]
    fn clear_status_leaves_no_status() {
        let (console, log) = console();
        console.status(Some("x"), &StatusOptions::default()).unwrap();
        console.status(Some("x"), &StatusOptions::default()).unwrap();
        console.write("mid", None, None).unwrap();
        console.clear_status().unwrap();
        assert_eq!(console.current_status(), None);
        assert!(!console.is_status_displayed());

        console.puts("after", None, None).unwrap();
        let ops = take(&log);
        assert!(written(&ops).ends_with("after\n"));
        assert_eq!(ops.last(), Some(&Op::Flush));
    }

    #[test]
    fn progress_at_same_percent_is_written_once() {
        let (console, log) = console();
        console.show_progress("X", 35, 100u64).unwrap();
        let first = written(&take(&log));
        assert!(first.contains("35%"));
        assert!(first.ends_with("]  X"));

        console.show_progress("X", 35, 100u64).unwrap();
        assert!(take(&log).is_empty());

        // 700 of 2000 is still 35%.
        console
            .show_progress("X", 700, ProgressOptions::new().total(2000))
            .unwrap();
        assert!(take(&log).is_empty());
    }

    #[test]
    fn progress_honours_bar_length_and_color() {
        let (console, log) = console();
        let opts = ProgressOptions::new()
            .bar_length(10)
            .text_color("red")
            .background_color("black");
        console.show_progress("half", 5, opts.total(10)).unwrap();
        let ops = take(&log);
        assert_eq!(
            ops[0],
            Op::SetColor(Some(ColorSpec::from("red")), Some(ColorSpec::from("black")))
        );
        assert_eq!(written(&ops), "[===50%    ]  half");
    }

    #[test]
    fn zero_total_is_rejected() {
        let (console, log) = console();
        assert!(matches!(
            console.show_progress("X", 1, 0u64),
            Err(ConsoleError::ZeroProgressTotal)
        ));
        assert!(take(&log).is_empty());
    }

    #[test]
    fn zero_total_is_ignored_when_redirected() {
        let (console, log) = redirected();
        console.show_progress("X", 1, 0u64).unwrap();
        assert!(take(&log).is_empty());
        assert_eq!(console.current_status(), None);
    }

    #[test]
    fn redirected_output_skips_status_but_still_writes() {
        let (console, log) = redirected();
        console.status(Some("hidden"), &StatusOptions::default()).unwrap();
        console.show_progress("X", 10, 100u64).unwrap();
        assert!(take(&log).is_empty());
        assert_eq!(console.current_status(), None);
        assert_eq!(console.width(), None);
        assert_eq!(console.height(), None);

        console
            .puts("still here", Some(&ColorSpec::from("blue")), None)
            .unwrap();
        assert_eq!(written(&take(&log)), "still here\n");
    }

    #[test]
    fn puts_skips_terminator_when_line_is_full() {
        let (backend, log) = RecordingBackend::new(Some(WindowSize::new(10, 24)));
        let console = Console::new(backend.with_cursor_column(4));

        console.puts("123456", None, None).unwrap();
        assert_eq!(written(&take(&log)), "123456");

        console.puts("12345", None, None).unwrap();
        assert_eq!(written(&take(&log)), "12345\r\n");
    }

    #[test]
    fn table_rows_are_drawn_under_one_blank_and_redraw() {
        let (console, log) = console();
        console.status(Some("st"), &StatusOptions::default()).unwrap();
        take(&log);

        console
            .display_table(
                vec![vec!["a", "b"], vec!["c", "d"]],
                &TableOptions::new().text_color("white"),
            )
            .unwrap();
        let ops = take(&log);
        assert_eq!(ops[0], Op::ClearLines(1));
        assert_eq!(ops.iter().filter(|op| **op == Op::ClearLines(1)).count(), 1);
        assert_eq!(written(&ops), "a  b\nc  d\nst");
    }

    #[test]
    fn display_row_rejects_mismatched_widths() {
        let (console, log) = console();
        let err = console
            .display_row(["a", "b"], &[5], &TableOptions::default())
            .unwrap_err();
        assert!(matches!(err, ConsoleError::ColumnMismatch { .. }));
        assert_eq!(take(&log), vec![Op::Flush]);
    }

    #[test]
    fn empty_table_and_row_draw_nothing() {
        let (console, log) = console();
        let empty: Vec<Vec<&str>> = Vec::new();
        console.display_table(empty, &TableOptions::default()).unwrap();
        console
            .display_table(vec![Vec::<&str>::new()], &TableOptions::default())
            .unwrap();
        console
            .display_row(Vec::<Cell>::new(), &[3], &TableOptions::default())
            .unwrap();
        assert!(take(&log).is_empty());
    }

    #[test]
    fn clear_line_validates_count() {
        let (console, log) = console();
        assert!(matches!(
            console.clear_line(0),
            Err(ConsoleError::InvalidLineCount(0))
        ));
        console.clear_line(2).unwrap();
        assert_eq!(take(&log), vec![Op::ClearLines(2), Op::Flush]);
    }

    #[test]
    fn title_and_geometry() {
        let (console, log) = console();
        console.set_title("Build").unwrap();
        assert_eq!(take(&log), vec![Op::Title("Build".into()), Op::Flush]);
        assert_eq!(console.width(), Some(80));
        assert_eq!(console.height(), Some(24));
        assert_eq!(
            console.wrap_text("The quick brown fox jumps", 10),
            vec!["The quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn configured_table_defaults_apply() {
        let (backend, log) = RecordingBackend::new(None);
        let mut config = ConsoleConfig::default();
        config.table.col_sep = Some("|".into());
        config.table.text_color = None;
        let console = Console::with_config(backend, config);

        console
            .display_table(vec![vec!["k", "v"]], &TableOptions::default())
            .unwrap();
        assert_eq!(written(&take(&log)), "| k | v |\n");
    }
}
