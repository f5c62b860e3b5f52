pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

/// A doubled quote character inside a quoted run is an escaped quote, not the end.
pub(super) fn is_escaped_quote(bytes: &[u8], idx: usize, quote: u8) -> bool {
    bytes.get(idx) == Some(&quote) && bytes.get(idx + 1) == Some(&quote)
}
