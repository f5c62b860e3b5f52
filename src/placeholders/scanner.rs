use super::parsers::{
    is_block_comment_end, is_block_comment_start, is_escaped_quote, is_line_comment_start,
};

#[derive(Clone, Copy)]
pub(super) enum State {
    Normal,
    Quoted(u8),
    LineComment,
    BlockComment(u32),
}

/// Byte offsets of every positional `?` marker outside literals, quoted identifiers and
/// comments. Numbered markers (`?1`) are not positional and are left alone.
pub(super) fn marker_positions(sql: &str) -> Vec<usize> {
    scan(sql).0
}

/// Whether `sql` stops inside a `--` comment, which would swallow anything appended after it.
pub(super) fn ends_in_line_comment(sql: &str) -> bool {
    matches!(scan(sql).1, State::LineComment)
}

fn scan(sql: &str) -> (Vec<usize>, State) {
    let bytes = sql.as_bytes();
    let mut positions = Vec::new();
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' | b'"' | b'`' => state = State::Quoted(b),
                _ if is_line_comment_start(bytes, idx) => {
                    state = State::LineComment;
                    idx += 1;
                }
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'?' if !bytes.get(idx + 1).is_some_and(u8::is_ascii_digit) => {
                    positions.push(idx);
                }
                _ => {}
            },
            State::Quoted(quote) => {
                if is_escaped_quote(bytes, idx, quote) {
                    idx += 1;
                } else if b == quote {
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    (positions, state)
}
