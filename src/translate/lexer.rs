//! Byte-level scanning helpers that are aware of SQL quoting and comments.
//!
//! Every delimiter handled here is ASCII, so any index returned by these
//! functions is a valid `char` boundary in the originating `&str`.

/// If a string literal, quoted identifier or comment starts at `i`, return the
/// index just past it. Unterminated constructs run to the end of the input.
///
/// Line comments stop at (and do not consume) the terminating `\n`.
pub(crate) fn skip_quoted_or_comment(bytes: &[u8], i: usize) -> Option<usize> {
    match bytes.get(i)? {
        quote @ (b'\'' | b'"') => Some(skip_quoted(bytes, i, *quote, true)),
        b'`' => Some(skip_quoted(bytes, i, b'`', false)),
        b'-' if bytes.get(i + 1) == Some(&b'-') => Some(
            memchr_newline(&bytes[i..])
                .map(|off| i + off)
                .unwrap_or(bytes.len()),
        ),
        b'/' if bytes.get(i + 1) == Some(&b'*') => {
            let mut j = i + 2;
            while j + 1 < bytes.len() {
                if bytes[j] == b'*' && bytes[j + 1] == b'/' {
                    return Some(j + 2);
                }
                j += 1;
            }
            Some(bytes.len())
        }
        _ => None,
    }
}

fn skip_quoted(bytes: &[u8], start: usize, quote: u8, backslash_escapes: bool) -> usize {
    let mut j = start + 1;
    while j < bytes.len() {
        let b = bytes[j];
        if backslash_escapes && b == b'\\' {
            j += 2;
            continue;
        }
        if b == quote {
            // A doubled quote is an escaped quote, not the end.
            if bytes.get(j + 1) == Some(&quote) {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    bytes.len()
}

fn memchr_newline(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&b| b == b'\n')
}

/// Find the `)` that closes the `(` at `open`.
pub(crate) fn find_matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    debug_assert_eq!(bytes.get(open), Some(&b'('));
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        if let Some(end) = skip_quoted_or_comment(bytes, i) {
            i = end;
            continue;
        }
        match bytes[i] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Find the next statement-terminating `;` at or after `from`.
pub(crate) fn find_statement_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if let Some(end) = skip_quoted_or_comment(bytes, i) {
            i = end;
            continue;
        }
        if bytes[i] == b';' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Split `text` at every comma that sits outside parentheses, literals and
/// comments. Pieces are returned untrimmed and in order.
pub(crate) fn split_top_level_commas(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if let Some(end) = skip_quoted_or_comment(bytes, i) {
            i = end;
            continue;
        }
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                pieces.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    pieces.push(&text[start..]);
    pieces
}

/// Index of the first byte at or after `from` that is neither whitespace nor
/// part of a comment.
pub(crate) fn skip_blank_and_comments(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b if b.is_ascii_whitespace() => i += 1,
            b'-' | b'/' => match skip_quoted_or_comment(bytes, i) {
                Some(end) => i = end,
                None => break,
            },
            _ => break,
        }
    }
    i
}

/// `line` up to its first `--` comment that sits outside literals.
pub(crate) fn cut_line_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'-' && bytes.get(i + 1) == Some(&b'-') {
            return &line[..i];
        }
        match skip_quoted_or_comment(bytes, i) {
            Some(end) => i = end,
            None => i += 1,
        }
    }
    line
}

pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}
