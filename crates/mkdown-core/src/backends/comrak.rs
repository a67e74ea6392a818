// SPDX-License-Identifier: AGPL-3.0-or-later
//! Markdown backend using comrak (GFM-compatible)

use std::borrow::Cow;

use comrak::nodes::{AstNode, NodeValue};
use comrak::{format_html, parse_document, Anchorizer, Arena, Options};

use super::{assemble, decode, ensure_html};
use crate::options::EffectiveConfig;
use crate::smartypants::Refinements;
use crate::toc::TocEntry;
use crate::traits::{Backend, BackendDescriptor, ConversionError, Result};

const DESCRIPTOR: BackendDescriptor = BackendDescriptor {
    id: "cm",
    name: "comrak",
};

/// comrak parser and HTML formatter
pub struct ComrakBackend;

impl ComrakBackend {
    pub fn new() -> Self {
        Self
    }

    fn comrak_options(config: &EffectiveConfig) -> Options<'static> {
        let mut options = Options::default();
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;
        options.parse.smart = config.smarty_pants;

        // Simple output gets plain `id` attributes in `render` instead of
        // comrak's anchor links.
        if !config.simple_html_output {
            options.extension.header_ids = Some(String::new());
        }
        if config.simple_html_output {
            options.render.escape = true;
        } else {
            options.render.unsafe_ = true;
        }
        options
    }
}

impl Default for ComrakBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for ComrakBackend {
    fn descriptor(&self) -> BackendDescriptor {
        DESCRIPTOR
    }

    fn render(&self, input: &[u8], config: &EffectiveConfig) -> Result<Vec<u8>> {
        ensure_html(config, DESCRIPTOR)?;
        let text = decode(input, DESCRIPTOR)?;

        let options = Self::comrak_options(config);
        tracing::debug!(
            smart = options.parse.smart,
            header_ids = options.extension.header_ids.is_some(),
            escape = options.render.escape,
            "rendering with comrak"
        );

        let arena = Arena::new();
        let root = parse_document(&arena, text, &options);

        let refinements = Refinements::from_config(config);
        if !refinements.is_empty() {
            refine_text(root, refinements);
        }
        if config.simple_html_output {
            strip_code_languages(root);
        }

        let toc = config.generate_toc.then(|| collect_headings(root));

        let body = if config.toc_only {
            String::new()
        } else {
            let mut html = Vec::new();
            format_html(root, &options, &mut html).map_err(|e| ConversionError::Parse {
                backend: DESCRIPTOR.name,
                message: e.to_string(),
            })?;
            let html = String::from_utf8(html).map_err(|e| ConversionError::Parse {
                backend: DESCRIPTOR.name,
                message: e.to_string(),
            })?;
            match &toc {
                Some(headings) if config.simple_html_output => attach_heading_ids(&html, headings),
                _ => html,
            }
        };

        Ok(assemble(input, config, toc.as_deref(), &body))
    }
}

fn refine_text<'a>(root: &'a AstNode<'a>, refinements: Refinements) {
    for node in root.descendants() {
        let mut data = node.data.borrow_mut();
        if let NodeValue::Text(ref mut text) = data.value {
            let refined = match refinements.apply(text) {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            if let Some(refined) = refined {
                *text = refined;
            }
        }
    }
}

fn strip_code_languages<'a>(root: &'a AstNode<'a>) {
    for node in root.descendants() {
        if let NodeValue::CodeBlock(ref mut block) = node.data.borrow_mut().value {
            block.info.clear();
        }
    }
}

/// Heading entries with the same anchors comrak's formatter generates.
fn collect_headings<'a>(root: &'a AstNode<'a>) -> Vec<TocEntry> {
    let mut anchorizer = Anchorizer::new();
    root.descendants()
        .filter_map(|node| {
            let level = match node.data.borrow().value {
                NodeValue::Heading(ref heading) => heading.level,
                _ => return None,
            };
            let mut text = String::new();
            collect_text(node, &mut text);
            let id = anchorizer.anchorize(text.clone());
            Some(TocEntry {
                level,
                title: text.trim().to_string(),
                id,
            })
        })
        .collect()
}

/// Give the opening heading tags `id` attributes, in document order.
///
/// Only valid for escaped output, where every `<hN>` in the HTML comes from
/// a heading node.
fn attach_heading_ids(html: &str, headings: &[TocEntry]) -> String {
    let mut out = String::with_capacity(html.len() + headings.len() * 16);
    let mut rest = html;
    for heading in headings {
        let tag = format!("<h{}>", heading.level);
        let Some(pos) = rest.find(&tag) else {
            break;
        };
        out.push_str(&rest[..pos]);
        out.push_str(&format!("<h{} id=\"{}\">", heading.level, heading.id));
        rest = &rest[pos + tag.len()..];
    }
    out.push_str(rest);
    out
}

fn collect_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    match node.data.borrow().value {
        NodeValue::Text(ref literal) => out.push_str(literal),
        NodeValue::Code(ref code) => out.push_str(&code.literal),
        NodeValue::LineBreak | NodeValue::SoftBreak => out.push(' '),
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}
