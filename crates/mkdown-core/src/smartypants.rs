// SPDX-License-Identifier: AGPL-3.0-or-later
//! Text refinements layered on top of a backend's smart punctuation
//!
//! Both backends already turn quotes, `...` and dashes into typographic
//! characters using LaTeX dash rules. This module adjusts the dash style
//! and adds fraction glyphs, operating on plain text node contents only.

use std::borrow::Cow;

use crate::options::EffectiveConfig;

const EN_DASH: char = '\u{2013}';
const EM_DASH: char = '\u{2014}';

const FRACTIONS: [(&str, &str); 3] = [("1/2", "\u{bd}"), ("1/4", "\u{bc}"), ("3/4", "\u{be}")];

/// Which refinements to apply to text nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Refinements {
    /// Widen en dashes to em dashes (non-LaTeX dash rules)
    pub em_dashes_only: bool,
    /// Replace `1/2`, `1/4` and `3/4` with their glyphs
    pub fractions: bool,
}

impl Refinements {
    pub fn from_config(config: &EffectiveConfig) -> Self {
        if !config.smarty_pants {
            return Self::default();
        }
        Self {
            em_dashes_only: !config.latex_dashes,
            fractions: config.improved_fractions,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.em_dashes_only && !self.fractions
    }

    /// Refine one run of text, borrowing when nothing changes.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut text = Cow::Borrowed(text);
        if self.em_dashes_only && text.contains(EN_DASH) {
            text = Cow::Owned(text.replace(EN_DASH, &EM_DASH.to_string()));
        }
        if self.fractions && text.contains('/') {
            if let Some(replaced) = replace_fractions(&text) {
                text = Cow::Owned(replaced);
            }
        }
        text
    }
}

fn replace_fractions(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut changed = false;
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(c) = rest.chars().next() {
        let matched = FRACTIONS.iter().find(|(ascii, _)| {
            rest.starts_with(ascii)
                && !prev.is_some_and(is_fraction_neighbour)
                && !rest[ascii.len()..]
                    .chars()
                    .next()
                    .is_some_and(is_fraction_neighbour)
        });

        match matched {
            Some((ascii, glyph)) => {
                out.push_str(glyph);
                rest = &rest[ascii.len()..];
                prev = ascii.chars().last();
                changed = true;
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
                prev = Some(c);
            }
        }
    }

    changed.then_some(out)
}

fn is_fraction_neighbour(c: char) -> bool {
    c.is_alphanumeric() || c == '/'
}
