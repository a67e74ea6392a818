// SPDX-License-Identifier: AGPL-3.0-or-later
//! Table of contents entries and markup

use std::collections::HashMap;
use std::fmt::Write;

use crate::page::escape_html;

/// One heading in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6)
    pub level: u8,
    /// Heading plain text
    pub title: String,
    /// Anchor id the heading carries in the rendered output
    pub id: String,
}

/// Unique heading ids for one document
///
/// Lowercases, turns runs of anything but letters, digits, `-` and `_`
/// into a single hyphen, and suffixes repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_default();
        let id = match *count {
            0 => base,
            n => format!("{base}-{n}"),
        };
        *count += 1;
        id
    }
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.trim().chars() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}

/// Render entries as nested lists inside `<nav id="TOC">`.
///
/// Nesting follows level changes relative to the shallowest heading, so a
/// document starting at `##` still produces a single top-level list.
pub fn render_toc(entries: &[TocEntry]) -> String {
    let mut out = String::from("<nav id=\"TOC\">\n");
    let Some(base) = entries.iter().map(|e| e.level).min() else {
        out.push_str("</nav>\n");
        return out;
    };

    let mut depth = 0usize;
    for entry in entries {
        let target = usize::from(entry.level - base) + 1;
        if target > depth {
            while depth < target {
                out.push_str("<ul>\n<li>");
                depth += 1;
            }
        } else {
            out.push_str("</li>\n");
            while depth > target {
                out.push_str("</ul>\n</li>\n");
                depth -= 1;
            }
            out.push_str("<li>");
        }
        let _ = write!(
            out,
            "<a href=\"#{}\">{}</a>",
            escape_html(&entry.id),
            escape_html(&entry.title)
        );
    }

    while depth > 0 {
        out.push_str("</li>\n</ul>\n");
        depth -= 1;
    }
    out.push_str("</nav>\n");
    out
}
