//! Column width balancing for tables.
//!
//! [`compute_widths`] starts from each column's natural width (its longest
//! cell) and, when the total does not fit, repeatedly shrinks the widest
//! columns until it does. Cells that no longer fit are wrapped by the table
//! renderer.

/// Computes column widths for `rows` that fit within `available` characters.
///
/// Each step finds the widest columns. If pulling them all down to the next
/// widest width would remove more than needed (or every column is equally
/// wide), they shrink by the remaining excess split between them, rounded
/// down but at least one character. Otherwise they are clamped to the next
/// widest width. The loop stops once the total fits.
///
/// Widths never grow. The total fits whenever `available` is at least the
/// column count; below that, columns bottom out at zero.
///
/// Cells beyond `column_count` are ignored; missing cells count as empty.
///
/// # Example
///
/// ```rust
/// use color_console::compute_widths;
///
/// let rows = vec![
///     vec!["id", "name", "description"],
///     vec!["1", "widget", "a small part used in larger assemblies"],
/// ];
/// let widths = compute_widths(&rows, 3, 30);
/// assert_eq!(widths, vec![2, 6, 22]);
/// ```
pub fn compute_widths<R, S>(rows: &[R], column_count: usize, available: usize) -> Vec<usize>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut widths = vec![0usize; column_count];
    for row in rows {
        for (i, cell) in row.as_ref().iter().take(column_count).enumerate() {
            widths[i] = widths[i].max(cell.as_ref().chars().count());
        }
    }

    let mut total: usize = widths.iter().sum();
    while total > available {
        // total > available >= 0, so the widest column is at least 1 wide
        let longest = widths.iter().copied().max().unwrap_or(0);
        let num_longest = widths.iter().filter(|&&w| w == longest).count();
        let next_longest = widths.iter().copied().filter(|&w| w < longest).max();
        let excess = total - available;

        match next_longest {
            Some(next) if num_longest * (longest - next) <= excess => {
                for w in widths.iter_mut().filter(|w| **w > next) {
                    *w = next;
                }
            }
            _ => {
                let reduction = (excess / num_longest).max(1);
                for w in widths.iter_mut() {
                    if next_longest.map_or(true, |next| *w > next) {
                        *w = w.saturating_sub(reduction);
                    }
                }
            }
        }

        total = widths.iter().sum();
    }

    widths
}
