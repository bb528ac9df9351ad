//! Wrapped, aligned table rows.
//!
//! Each row is one logical line of cells. A cell that is wider than its
//! column is wrapped with [`wrap_text`], and the row then spans as many
//! physical lines as its tallest cell; shorter cells are padded with blanks.
//!
//! With a column separator `|` a physical line looks like
//!
//! ```text
//! | Short      | A long     |
//! |            | wrapped    |
//! ```
//!
//! and without one cells are joined by two spaces. A row separator `-`
//! draws a rule with the corner string at every column boundary:
//!
//! ```text
//! +------------+------------+
//! ```

use serde::Deserialize;

use crate::backend::TerminalBackend;
use crate::color::ColorSpec;
use crate::config::TableConfig;
use crate::error::{ConsoleError, Result};
use crate::layout::compute_widths;
use crate::wrap::wrap_text;

/// Horizontal alignment of a cell within its column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// A table cell: its text and alignment.
///
/// Text converts to a left-aligned cell and numbers to a right-aligned one,
/// so mixed rows line up the way spreadsheets do:
///
/// ```rust
/// use color_console::{Align, Cell};
///
/// let row: Vec<Cell> = vec!["widgets".into(), 42.into(), 3.5.into()];
/// assert_eq!(row[0].align(), Align::Left);
/// assert_eq!(row[1].align(), Align::Right);
/// assert_eq!(row[2].value(), "3.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    value: String,
    align: Align,
}

impl Cell {
    pub fn new(value: impl Into<String>, align: Align) -> Self {
        Self {
            value: value.into(),
            align,
        }
    }

    pub fn left(value: impl Into<String>) -> Self {
        Self::new(value, Align::Left)
    }

    pub fn right(value: impl Into<String>) -> Self {
        Self::new(value, Align::Right)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn align(&self) -> Align {
        self.align
    }

    fn pad(&self, text: &str, width: usize) -> String {
        match self.align {
            Align::Left => format!("{:<width$}", text, width = width),
            Align::Right => format!("{:>width$}", text, width = width),
        }
    }
}

impl AsRef<str> for Cell {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::left(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::left(value)
    }
}

impl From<&String> for Cell {
    fn from(value: &String) -> Self {
        Cell::left(value.as_str())
    }
}

macro_rules! numeric_cell {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Cell {
                fn from(value: $ty) -> Self {
                    Cell::right(value.to_string())
                }
            }
        )*
    };
}

numeric_cell!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Per-call table settings. Unset fields fall back to the console's
/// [`TableConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Explicit column widths; computed from the content when absent.
    pub col_widths: Option<Vec<usize>>,
    /// Total width to fit the table into, instead of the terminal width.
    pub width: Option<usize>,
    pub col_sep: Option<String>,
    pub row_sep: Option<String>,
    pub indent: Option<usize>,
    #[serde(alias = "color")]
    pub text_color: Option<ColorSpec>,
    pub background_color: Option<ColorSpec>,
    pub corner: Option<String>,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn col_widths(mut self, widths: Vec<usize>) -> Self {
        self.col_widths = Some(widths);
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn col_sep(mut self, sep: impl Into<String>) -> Self {
        self.col_sep = Some(sep.into());
        self
    }

    pub fn row_sep(mut self, sep: impl Into<String>) -> Self {
        self.row_sep = Some(sep.into());
        self
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn text_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    pub fn background_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn corner(mut self, corner: impl Into<String>) -> Self {
        self.corner = Some(corner.into());
        self
    }
}

/// Table options merged with the configured defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableStyle {
    indent: usize,
    fg: Option<ColorSpec>,
    bg: Option<ColorSpec>,
    col_sep: Option<String>,
    row_sep: Option<String>,
    corner: String,
}

impl TableStyle {
    pub(crate) fn resolve(opts: &TableOptions, config: &TableConfig) -> Self {
        let pick = |own: &Option<String>, default: &Option<String>| {
            own.clone()
                .or_else(|| default.clone())
                .filter(|s| !s.is_empty())
        };
        let col_sep = pick(&opts.col_sep, &config.col_sep);
        let row_sep = pick(&opts.row_sep, &config.row_sep);
        let corner = opts
            .corner
            .clone()
            .or_else(|| config.corner.clone())
            .unwrap_or_else(|| {
                col_sep
                    .as_ref()
                    .map(|sep| "+".repeat(sep.chars().count()))
                    .unwrap_or_default()
            });
        Self {
            indent: opts.indent.unwrap_or(config.indent),
            fg: opts.text_color.clone().or_else(|| config.text_color.clone()),
            bg: opts
                .background_color
                .clone()
                .or_else(|| config.background_color.clone()),
            col_sep,
            row_sep,
            corner,
        }
    }

    /// Characters left for cell content on a line `base` characters wide
    /// holding `columns` columns.
    pub(crate) fn available_width(&self, base: usize, columns: usize) -> usize {
        let sep_len = self.col_sep.as_ref().map_or(0, |sep| sep.chars().count());
        let overhead = (sep_len + 2) * columns + 1;
        // Without a separator there is no frame, only the joins.
        let bonus = if self.col_sep.is_none() { 3 } else { 0 };
        (base + bonus).saturating_sub(overhead)
    }
}

/// Column widths for `rows`: the explicit ones from `opts`, or computed to
/// fit the requested width, the terminal width or `fallback_width`.
pub(crate) fn resolve_widths(
    rows: &[Vec<Cell>],
    opts: &TableOptions,
    style: &TableStyle,
    term_width: Option<usize>,
    fallback_width: usize,
) -> Vec<usize> {
    if let Some(widths) = &opts.col_widths {
        return widths.clone();
    }
    let columns = rows.first().map_or(0, Vec::len);
    let base = opts.width.unwrap_or_else(|| {
        term_width
            .unwrap_or(fallback_width)
            .saturating_sub(style.indent)
    });
    compute_widths(rows, columns, style.available_width(base, columns))
}

fn check_columns(row: &[Cell], widths: &[usize]) -> Result<()> {
    if row.len() != widths.len() {
        return Err(ConsoleError::ColumnMismatch {
            expected: widths.len(),
            actual: row.len(),
        });
    }
    Ok(())
}

/// Ends a physical line, unless it exactly filled the terminal and the
/// cursor already wrapped.
fn end_line<B: TerminalBackend + ?Sized>(
    backend: &mut B,
    used: usize,
    term_width: Option<usize>,
) -> Result<()> {
    if term_width != Some(used) {
        let terminator = backend.line_terminator();
        backend.write_raw(terminator)?;
    }
    Ok(())
}

fn write_indent<B: TerminalBackend + ?Sized>(backend: &mut B, indent: usize) -> Result<()> {
    if indent > 0 {
        backend.write_raw(&" ".repeat(indent))?;
    }
    Ok(())
}

/// Draws `rows` against shared column widths, framed by row separators
/// when one is configured. Nothing is written if any row has the wrong
/// number of cells.
pub(crate) fn draw_table<B: TerminalBackend + ?Sized>(
    backend: &mut B,
    rows: &[Vec<Cell>],
    widths: &[usize],
    style: &TableStyle,
    term_width: Option<usize>,
) -> Result<()> {
    for row in rows {
        check_columns(row, widths)?;
    }
    draw_separator(backend, widths, style, term_width)?;
    for row in rows {
        draw_row(backend, row, widths, style, term_width)?;
    }
    Ok(())
}

/// Draws one row, followed by a row separator when one is configured.
/// An empty row draws nothing.
pub(crate) fn draw_row<B: TerminalBackend + ?Sized>(
    backend: &mut B,
    row: &[Cell],
    widths: &[usize],
    style: &TableStyle,
    term_width: Option<usize>,
) -> Result<()> {
    if row.is_empty() {
        return Ok(());
    }
    check_columns(row, widths)?;

    let wrapped: Vec<Vec<String>> = row
        .iter()
        .zip(widths)
        .map(|(cell, &width)| wrap_text(cell.value(), width))
        .collect();
    let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(0);

    let fg = style.fg.as_ref();
    let bg = style.bg.as_ref();
    let joiner = match &style.col_sep {
        Some(sep) => format!(" {} ", sep),
        None => "  ".to_string(),
    };

    for i in 0..line_count {
        write_indent(backend, style.indent)?;
        let mut used = style.indent;

        if let Some(sep) = &style.col_sep {
            let prefix = format!("{} ", sep);
            backend.write_colored(&prefix, fg, bg)?;
            used += prefix.chars().count();
        }

        let line = row
            .iter()
            .zip(widths)
            .zip(&wrapped)
            .map(|((cell, &width), lines)| {
                cell.pad(lines.get(i).map_or("", String::as_str), width)
            })
            .collect::<Vec<_>>()
            .join(&joiner);
        backend.write_colored(&line, fg, bg)?;
        used += line.chars().count();

        if let Some(sep) = &style.col_sep {
            let suffix = format!(" {}", sep);
            backend.write_colored(&suffix, fg, bg)?;
            used += suffix.chars().count();
        }

        end_line(backend, used, term_width)?;
    }

    draw_separator(backend, widths, style, term_width)
}

/// Draws the row separator rule, if one is configured.
fn draw_separator<B: TerminalBackend + ?Sized>(
    backend: &mut B,
    widths: &[usize],
    style: &TableStyle,
    term_width: Option<usize>,
) -> Result<()> {
    let Some(row_sep) = &style.row_sep else {
        return Ok(());
    };
    let fg = style.fg.as_ref();
    let bg = style.bg.as_ref();

    write_indent(backend, style.indent)?;
    let corner = style.corner.as_str();
    let rule = widths
        .iter()
        .map(|width| row_sep.repeat(width + 2))
        .collect::<Vec<_>>()
        .join(corner);
    let framed = format!("{corner}{rule}{corner}");
    backend.write_colored(&framed, fg, bg)?;

    end_line(backend, style.indent + framed.chars().count(), term_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::WindowSize;
    use crate::testing::{take, written, Op, RecordingBackend};

    fn plain(opts: &TableOptions) -> TableStyle {
        let config = TableConfig {
            text_color: None,
            ..TableConfig::default()
        };
        TableStyle::resolve(opts, &config)
    }

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from(*v)).collect()
    }

    fn render(row: &[Cell], widths: &[usize], opts: &TableOptions) -> String {
        let (mut backend, log) = RecordingBackend::new(Some(WindowSize::new(80, 24)));
        draw_row(&mut backend, row, widths, &plain(opts), Some(80)).unwrap();
        written(&take(&log))
    }

    #[test]
    fn wrapped_cell_spans_several_lines() {
        let row = cells(&["Short", "A long wrapped value exceeding width"]);
        let out = render(&row, &[10, 10], &TableOptions::new());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Short       A long    ",
                "            wrapped   ",
                "            value     ",
                "            exceeding ",
                "            width     ",
            ]
        );
        assert!(lines.iter().all(|line| line.chars().count() == 22));
    }

    #[test]
    fn numbers_align_right() {
        let row = vec![Cell::from("apples"), Cell::from(42), Cell::from(1.5)];
        assert_eq!(
            render(&row, &[8, 5, 4], &TableOptions::new()),
            "apples       42   1.5\n"
        );
    }

    #[test]
    fn column_separator_frames_each_line() {
        let row = cells(&["a", "bb"]);
        let opts = TableOptions::new().col_sep("|");
        assert_eq!(render(&row, &[3, 3], &opts), "| a   | bb  |\n");
    }

    #[test]
    fn row_separator_uses_corners() {
        let row = cells(&["a", "bb"]);
        let opts = TableOptions::new().col_sep("|").row_sep("-");
        assert_eq!(
            render(&row, &[3, 3], &opts),
            "| a   | bb  |\n+-----+-----+\n"
        );

        let opts = TableOptions::new().row_sep("=");
        assert_eq!(render(&row, &[1, 2], &opts), "a  bb\n=======\n");
    }

    #[test]
    fn explicit_corner_overrides_default() {
        let row = cells(&["a"]);
        let opts = TableOptions::new().col_sep("|").row_sep("-").corner("*");
        assert_eq!(render(&row, &[1], &opts), "| a |\n*---*\n");
    }

    #[test]
    fn indent_is_written_uncoloured() {
        let (mut backend, log) = RecordingBackend::new(None);
        let style = TableStyle::resolve(&TableOptions::new().indent(2), &TableConfig::default());
        draw_row(&mut backend, &cells(&["x"]), &[1], &style, None).unwrap();
        assert_eq!(
            take(&log),
            vec![
                Op::Write("  ".into()),
                Op::SetColor(Some(ColorSpec::CYAN), None),
                Op::Write("x".into()),
                Op::ResetColor,
                Op::Write("\n".into()),
            ]
        );
    }

    #[test]
    fn line_filling_terminal_skips_terminator() {
        let (mut backend, log) = RecordingBackend::new(Some(WindowSize::new(8, 24)));
        let style = plain(&TableOptions::new().col_sep("|"));
        draw_row(&mut backend, &cells(&["abcd"]), &[4], &style, Some(8)).unwrap();
        assert_eq!(written(&take(&log)), "| abcd |");
    }

    #[test]
    fn mismatched_row_is_rejected_before_output() {
        let (mut backend, log) = RecordingBackend::new(None);
        let style = plain(&TableOptions::new());
        let err = draw_row(&mut backend, &cells(&["a", "b"]), &[3], &style, None).unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::ColumnMismatch {
                expected: 1,
                actual: 2
            }
        ));

        let rows = vec![cells(&["a"]), cells(&["b", "c"])];
        assert!(draw_table(&mut backend, &rows, &[3], &style, None).is_err());
        assert!(take(&log).is_empty());
    }

    #[test]
    fn empty_row_draws_nothing() {
        assert_eq!(render(&[], &[3, 3], &TableOptions::new().row_sep("-")), "");
    }

    #[test]
    fn table_is_framed_by_separators() {
        let (mut backend, log) = RecordingBackend::new(None);
        let style = plain(&TableOptions::new().row_sep("-"));
        let rows = vec![cells(&["a"]), cells(&["b"])];
        draw_table(&mut backend, &rows, &[1], &style, None).unwrap();
        assert_eq!(written(&take(&log)), "---\na\n---\nb\n---\n");
    }

    #[test]
    fn available_width_accounts_for_frame() {
        let framed = plain(&TableOptions::new().col_sep("|"));
        // "| " + a + " | " + b + " | " + c + " |" = sum + 10
        assert_eq!(framed.available_width(40, 3), 30);

        let bare = plain(&TableOptions::new());
        // a + "  " + b + "  " + c = sum + 4
        assert_eq!(bare.available_width(40, 3), 36);
        assert_eq!(bare.available_width(0, 3), 0);
    }

    #[test]
    fn widths_fit_terminal_minus_indent() {
        let rows = vec![cells(&["x".repeat(50).as_str(), "y".repeat(50).as_str()])];
        let opts = TableOptions::new().indent(4);
        let style = plain(&opts);
        let widths = resolve_widths(&rows, &opts, &style, Some(60), 10_000);
        // 60 - 4 indent, then "  " join
        assert_eq!(widths.iter().sum::<usize>(), 54);

        let opts = TableOptions::new().col_widths(vec![5, 6]);
        assert_eq!(
            resolve_widths(&rows, &opts, &style, Some(60), 10_000),
            vec![5, 6]
        );
    }

    #[test]
    fn missing_terminal_uses_fallback_width() {
        let rows = vec![cells(&["x".repeat(50).as_str()])];
        let opts = TableOptions::new();
        let style = plain(&opts);
        assert_eq!(resolve_widths(&rows, &opts, &style, None, 10_000), vec![50]);
        assert_eq!(resolve_widths(&rows, &opts, &style, None, 20), vec![20]);
    }

    #[test]
    fn table_options_accept_color_alias() {
        let opts: TableOptions =
            serde_yaml::from_str("col_sep: '|'\ncolor: red\ncol_widths: [4, 8]").unwrap();
        assert_eq!(opts.col_sep.as_deref(), Some("|"));
        assert_eq!(opts.text_color, Some(ColorSpec::from("red")));
        assert_eq!(opts.col_widths, Some(vec![4, 8]));
    }
}
