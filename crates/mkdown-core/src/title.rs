// SPDX-License-Identifier: AGPL-3.0-or-later
//! Document title detection from raw Markdown bytes
//!
//! Only the very first non-blank line is considered. It is a title when it
//! is an ATX level-one heading (`# Title`) or when the following line
//! underlines it with `=` characters (Setext level one).

/// Returned when no heading is found.
pub const DEFAULT_TITLE: &str = "";

/// Guess the document title from the start of `input`.
///
/// Never fails: anything that is not a leading level-one heading yields
/// [`DEFAULT_TITLE`]. An `=` underline may end at a line break or at the
/// end of the buffer.
pub fn sniff_title(input: &[u8]) -> String {
    let mut i = 0;

    // Blank lines, in any of the three line ending styles
    while i < input.len() && is_line_end(input[i]) {
        i += 1;
    }
    if i >= input.len() {
        return DEFAULT_TITLE.to_string();
    }

    let start = i;
    while i < input.len() && !is_line_end(input[i]) {
        i += 1;
    }
    let first_line = &input[start..i];
    i = skip_line_ending(input, i);

    if let Some(rest) = atx_title(first_line) {
        return rest;
    }

    if is_setext_underline(&input[i..]) {
        return String::from_utf8_lossy(first_line).trim().to_string();
    }

    DEFAULT_TITLE.to_string()
}

fn is_line_end(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// Advance past exactly one line terminator (`\n`, `\r` or `\r\n`).
fn skip_line_ending(input: &[u8], mut i: usize) -> usize {
    match input.get(i) {
        Some(b'\r') => {
            i += 1;
            if input.get(i) == Some(&b'\n') {
                i += 1;
            }
            i
        }
        Some(b'\n') => i + 1,
        _ => i,
    }
}

fn atx_title(line: &[u8]) -> Option<String> {
    match line {
        [b'#', b' ' | b'\t', rest @ ..] => {
            Some(String::from_utf8_lossy(rest).trim().to_string())
        }
        _ => None,
    }
}

/// `===` run, optional trailing blanks, then a line break or end of input.
fn is_setext_underline(line: &[u8]) -> bool {
    let equals = line.iter().take_while(|&&b| b == b'=').count();
    if equals == 0 {
        return false;
    }

    let rest = &line[equals..];
    let blanks = rest
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .count();

    match rest.get(blanks) {
        None => true,
        Some(&b) => is_line_end(b),
    }
}
