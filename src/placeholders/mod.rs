//! Positional `?` marker handling.
//!
//! Builder fragments may carry positional markers; before a fragment lands in a statement each
//! marker is replaced with a unique named placeholder (`:p1`, `:p2`, ...) so the bind list can be
//! matched by name regardless of where the fragment ends up in the rendered SQL.

mod parsers;
mod scanner;

use std::borrow::Cow;

use scanner::{ends_in_line_comment, marker_positions};

/// Count positional `?` markers, skipping quoted strings, quoted identifiers and comments.
///
/// ```rust
/// use sql_record::count_markers;
///
/// assert_eq!(count_markers("a = ? and b = '?' -- ?"), 1);
/// ```
#[must_use]
pub fn count_markers(sql: &str) -> usize {
    marker_positions(sql).len()
}

/// Replace each positional marker, left to right, with the name produced by `next_name`.
///
/// Returns a borrowed `Cow` when the fragment has no markers.
pub fn rewrite_markers<F>(sql: &str, mut next_name: F) -> Cow<'_, str>
where
    F: FnMut() -> String,
{
    let positions = marker_positions(sql);
    if positions.is_empty() {
        return Cow::Borrowed(sql);
    }

    let mut out = String::with_capacity(sql.len() + positions.len() * 3);
    let mut last = 0;
    for pos in positions {
        out.push_str(&sql[last..pos]);
        out.push_str(&next_name());
        last = pos + 1;
    }
    out.push_str(&sql[last..]);
    Cow::Owned(out)
}

/// Terminate a trailing `--` comment with a newline so text placed after the fragment stays
/// live SQL.
pub fn close_line_comment(sql: &str) -> Cow<'_, str> {
    if ends_in_line_comment(sql) {
        Cow::Owned(format!("{sql}\n"))
    } else {
        Cow::Borrowed(sql)
    }
}
