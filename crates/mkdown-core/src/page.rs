// SPDX-License-Identifier: AGPL-3.0-or-later
//! Standalone page shell around rendered content

use std::fmt::Write;

/// Head metadata for a standalone page
#[derive(Debug, Clone, Copy)]
pub struct PageShell<'a> {
    pub title: &'a str,
    /// Stylesheet href; omitted when empty
    pub css: &'a str,
}

impl PageShell<'_> {
    /// Everything up to and including `<body>`.
    pub fn header(&self) -> String {
        let mut out = String::from(
            "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  \
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        );
        let _ = writeln!(out, "  <title>{}</title>", escape_html(self.title));
        if !self.css.is_empty() {
            let _ = writeln!(
                out,
                "  <link rel=\"stylesheet\" type=\"text/css\" href=\"{}\">",
                escape_html(self.css)
            );
        }
        out.push_str("</head>\n<body>\n\n");
        out
    }

    pub fn footer(&self) -> &'static str {
        "\n</body>\n</html>\n"
    }

    /// Wrap `body` in the shell.
    pub fn wrap(&self, body: &str) -> String {
        let mut out = self.header();
        out.push_str(body);
        out.push_str(self.footer());
        out
    }
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
