//! Greedy line wrapping.
//!
//! [`wrap_text`] splits a string into display lines no wider than a given
//! number of characters, preferring (in order) embedded newlines, runs of
//! spaces, and "word boundary" punctuation, and only hard-breaking a word
//! when nothing else fits.
//!
//! Widths are character counts; wide glyphs are not measured specially.
//!
//! # Example
//!
//! ```rust
//! use color_console::wrap_text;
//!
//! assert_eq!(
//!     wrap_text("The quick brown fox jumps", 10),
//!     vec!["The quick", "brown fox", "jumps"],
//! );
//! ```

/// Characters after which a line may be broken when no space is suitable.
const WORD_BREAKS: [char; 10] = ['-', ',', '.', ';', '#', ')', '}', ']', '/', '\\'];

/// How far past a space a punctuation break may sit and still lose to it.
const PUNCTUATION_REACH: usize = 5;

fn is_word_break(c: char) -> bool {
    WORD_BREAKS.contains(&c)
}

/// Rightmost index `<= limit` whose character satisfies `pred`.
fn rfind(chars: &[char], limit: usize, pred: impl Fn(char) -> bool) -> Option<usize> {
    if chars.is_empty() {
        return None;
    }
    let upto = limit.min(chars.len() - 1);
    (0..=upto).rev().find(|&i| pred(chars[i]))
}

/// First index of the run of spaces containing `i`.
fn run_start(chars: &[char], mut i: usize) -> usize {
    while i > 0 && chars[i - 1] == ' ' {
        i -= 1;
    }
    i
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

/// Wraps `text` into lines of at most `width` characters.
///
/// Returns `[text]` unchanged when `width` is zero, when the text already
/// fits and has no newline, or when it is empty or whitespace-only. The
/// result is never empty.
///
/// Lines broken at an embedded newline are trimmed; lines broken at a space
/// drop the run of whitespace that follows.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if width == 0 || (chars.len() <= width && !chars.contains(&'\n')) {
        return vec![text.to_string()];
    }
    let Some(end) = chars.iter().rposition(|c| !c.is_whitespace()) else {
        return vec![text.to_string()];
    };

    let mut lines = Vec::new();
    let mut start = 0;
    while start <= end {
        let last_start = start;
        let limit = start + width;
        let newline = chars[start..]
            .iter()
            .position(|&c| c == '\n')
            .map(|p| p + start);
        let space = rfind(&chars, limit, |c| c == ' ').map(|ws| run_start(&chars, ws));
        let punct = rfind(&chars, limit - 1, is_word_break);

        if let Some(nl) = newline.filter(|&nl| nl <= limit) {
            lines.push(collect(&chars[start..nl]).trim().to_string());
            start = nl + 1;
        } else if end < limit {
            lines.push(collect(&chars[start..=end]));
            start = end + 1;
        } else if let Some(ws) = space.filter(|&ws| ws > start && prefer_space(ws, punct)) {
            lines.push(collect(&chars[start..ws]));
            start = chars[ws + 1..]
                .iter()
                .position(|c| !c.is_whitespace())
                .map_or(chars.len(), |p| ws + 1 + p);
        } else if let Some(wb) = punct.filter(|&wb| wb > start) {
            lines.push(collect(&chars[start..=wb]));
            start = wb + 1;
        } else {
            lines.push(collect(&chars[start..limit]));
            start = limit;
        }

        if start <= last_start {
            tracing::warn!(
                width,
                start,
                ?newline,
                ?space,
                ?punct,
                "wrap made no progress, returning text unwrapped"
            );
            return vec![text.to_string()];
        }
    }
    if lines.is_empty() {
        return vec![text.to_string()];
    }
    lines
}

/// Whether a break at the space `ws` beats the punctuation break `punct`.
///
/// The space wins when it is further right, or when the punctuation sits
/// within a few characters beyond it.
fn prefer_space(ws: usize, punct: Option<usize>) -> bool {
    match punct {
        None => true,
        Some(wb) => ws > wb || (wb > PUNCTUATION_REACH && wb - PUNCTUATION_REACH < ws),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaks_at_spaces() {
        assert_eq!(
            wrap_text("The quick brown fox jumps", 10),
            vec!["The quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn short_text_is_returned_unchanged() {
        assert_eq!(wrap_text("hello", 10), vec!["hello"]);
        assert_eq!(wrap_text("exactly 10", 10), vec!["exactly 10"]);
    }

    #[test]
    fn zero_width_disables_wrapping() {
        assert_eq!(
            wrap_text("a long line that would wrap", 0),
            vec!["a long line that would wrap"]
        );
    }

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(wrap_text("", 5), vec![""]);
        assert_eq!(wrap_text("          ", 4), vec!["          "]);
        assert_eq!(wrap_text(" \n ", 4), vec![" \n "]);
    }

    #[test]
    fn embedded_newlines_break_and_trim() {
        assert_eq!(wrap_text("one \ntwo", 20), vec!["one", "two"]);
        assert_eq!(wrap_text("abc\n", 10), vec!["abc"]);
    }

    #[test]
    fn newline_beyond_width_wraps_first() {
        assert_eq!(
            wrap_text("aaaa bbbb cccc\ndd", 9),
            vec!["aaaa bbbb", "cccc", "dd"]
        );
    }

    #[test]
    fn hard_breaks_unbroken_runs() {
        assert_eq!(
            wrap_text("abcdefghijklmnopqrstuvwxy", 10),
            vec!["abcdefghij", "klmnopqrst", "uvwxy"]
        );
    }

    #[test]
    fn breaks_after_punctuation_without_spaces() {
        assert_eq!(
            wrap_text("path/to/some/file.rs", 8),
            vec!["path/to/", "some/", "file.rs"]
        );
    }

    #[test]
    fn nearby_punctuation_loses_to_space() {
        // The comma sits four characters past the space: break at the space.
        assert_eq!(
            wrap_text("abcde fgh,ijklmnop", 10),
            vec!["abcde", "fgh,", "ijklmnop"]
        );
    }

    #[test]
    fn distant_punctuation_beats_space() {
        // The hyphen is more than five characters past the space.
        assert_eq!(
            wrap_text("ab cdefghij-klmnop", 12),
            vec!["ab cdefghij-", "klmnop"]
        );
    }

    #[test]
    fn skips_whitespace_run_after_break() {
        assert_eq!(wrap_text("alpha     beta gamma", 7), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn single_character_remainder_is_kept() {
        assert_eq!(wrap_text("abcdefghijk", 10), vec!["abcdefghij", "k"]);
        assert_eq!(wrap_text("aaaaaa b", 6), vec!["aaaaaa", "b"]);
        assert_eq!(wrap_text("abc\nd", 10), vec!["abc", "d"]);
    }

    #[test]
    fn trailing_newline_after_one_character() {
        assert_eq!(wrap_text("a\n", 1), vec!["a"]);
    }

    #[test]
    fn last_short_word_survives_wrap() {
        assert_eq!(
            wrap_text("aaa aaaaa aaaaa a a", 17),
            vec!["aaa aaaaa aaaaa a", "a"]
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(wrap_text("héllo wörld", 6), vec!["héllo", "wörld"]);
    }
}
