// SPDX-License-Identifier: AGPL-3.0-or-later
//! Markdown backend using pulldown-cmark
//!
//! The event stream is collected so headings can be given ids before
//! `pulldown_cmark::html` writes the output.

use std::borrow::Cow;

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

use super::{assemble, decode, ensure_html};
use crate::options::EffectiveConfig;
use crate::smartypants::Refinements;
use crate::toc::{Slugger, TocEntry};
use crate::traits::{Backend, BackendDescriptor, Result};

const DESCRIPTOR: BackendDescriptor = BackendDescriptor {
    id: "pd",
    name: "pulldown-cmark",
};

/// pulldown-cmark parser and HTML writer
pub struct PulldownBackend;

impl PulldownBackend {
    pub fn new() -> Self {
        Self
    }

    fn parser_options(config: &EffectiveConfig) -> Options {
        let mut options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_TASKLISTS;
        if config.smarty_pants {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        options
    }
}

impl Default for PulldownBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for PulldownBackend {
    fn descriptor(&self) -> BackendDescriptor {
        DESCRIPTOR
    }

    fn render(&self, input: &[u8], config: &EffectiveConfig) -> Result<Vec<u8>> {
        ensure_html(config, DESCRIPTOR)?;
        let text = decode(input, DESCRIPTOR)?;

        let options = Self::parser_options(config);
        tracing::debug!(options = ?options, "rendering with pulldown-cmark");

        let mut rewriter = EventRewriter {
            refinements: Refinements::from_config(config),
            simple: config.simple_html_output,
            in_code_block: false,
        };
        let mut events: Vec<Event<'_>> = Parser::new_ext(text, options)
            .map(|event| rewriter.rewrite(event))
            .collect();

        let headings = collect_headings(&events);
        if config.generate_toc || !config.simple_html_output {
            assign_heading_ids(&mut events, &headings);
        }
        let toc: Option<Vec<TocEntry>> = config
            .generate_toc
            .then(|| headings.into_iter().map(|h| h.entry).collect());

        let mut body = String::new();
        if !config.toc_only {
            html::push_html(&mut body, events.into_iter());
        }

        Ok(assemble(input, config, toc.as_deref(), &body))
    }
}

/// Per-event adjustments applied while parsing
struct EventRewriter {
    refinements: Refinements,
    simple: bool,
    in_code_block: bool,
}

impl EventRewriter {
    fn rewrite<'a>(&mut self, event: Event<'a>) -> Event<'a> {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                self.in_code_block = true;
                let kind = match kind {
                    CodeBlockKind::Fenced(_) if self.simple => {
                        CodeBlockKind::Fenced(CowStr::Borrowed(""))
                    }
                    other => other,
                };
                Event::Start(Tag::CodeBlock(kind))
            }
            Event::End(TagEnd::CodeBlock) => {
                self.in_code_block = false;
                Event::End(TagEnd::CodeBlock)
            }
            Event::Text(text) if !self.in_code_block && !self.refinements.is_empty() => {
                let refined = match self.refinements.apply(&text) {
                    Cow::Owned(s) => Some(s),
                    Cow::Borrowed(_) => None,
                };
                Event::Text(refined.map_or(text, CowStr::from))
            }
            // Escaped rather than passed through
            Event::Html(raw) | Event::InlineHtml(raw) if self.simple => Event::Text(raw),
            other => other,
        }
    }
}

struct Heading {
    /// Index of the heading's `Start` event
    start: usize,
    entry: TocEntry,
}

fn collect_headings(events: &[Event<'_>]) -> Vec<Heading> {
    let mut slugger = Slugger::new();
    let mut headings = Vec::new();
    let mut open: Option<(usize, u8, String)> = None;

    for (index, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                open = Some((index, *level as u8, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, buf)) = open.as_mut() {
                    buf.push_str(text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, _, buf)) = open.as_mut() {
                    buf.push(' ');
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, level, text)) = open.take() {
                    let title = text.trim().to_string();
                    let id = slugger.slug(&title);
                    headings.push(Heading {
                        start,
                        entry: TocEntry { level, title, id },
                    });
                }
            }
            _ => {}
        }
    }

    headings
}

fn assign_heading_ids(events: &mut [Event<'_>], headings: &[Heading]) {
    for heading in headings {
        if let Some(Event::Start(Tag::Heading { id, .. })) = events.get_mut(heading.start) {
            *id = Some(CowStr::from(heading.entry.id.clone()));
        }
    }
}
