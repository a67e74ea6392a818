// SPDX-License-Identifier: AGPL-3.0-or-later
//! Conversion options and their normalization
//!
//! [`RawOptions`] is what a caller collects from flags or a config file.
//! [`normalize`] resolves the implied options into an [`EffectiveConfig`],
//! the only form the backends accept.

use std::path::PathBuf;

use serde::Deserialize;

use crate::backends::DEFAULT_BACKEND_ID;

/// Options as supplied by the caller, before implications are applied
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawOptions {
    /// Generate a table of contents (implies `latex = false`)
    pub toc: bool,
    /// Emit only the table of contents (implies `toc`)
    pub toc_only: bool,
    /// Wrap the output in a standalone HTML page (implies `latex = false`)
    pub page: bool,
    /// Render LaTeX instead of HTML
    pub latex: bool,
    /// Smart quotes, dashes and ellipses
    pub smartypants: bool,
    /// LaTeX dash rules for smartypants (`--` en dash, `---` em dash)
    pub latexdashes: bool,
    /// Vulgar fraction glyphs for smartypants
    pub fractions: bool,
    /// Bare minimum tags and attributes
    pub html_simple: bool,
    /// Stylesheet to link from the page head (implies `page`)
    pub css: String,
    /// Output file; empty means standard output
    pub output: String,
    /// Backend identifier
    pub driver: String,
    /// Explicit page title; sniffed from the input when absent
    pub title: Option<String>,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            toc: false,
            toc_only: false,
            page: false,
            latex: false,
            smartypants: true,
            latexdashes: true,
            fractions: true,
            html_simple: true,
            css: String::new(),
            output: String::new(),
            driver: DEFAULT_BACKEND_ID.to_string(),
            title: None,
        }
    }
}

/// Fully resolved configuration for one conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub generate_toc: bool,
    pub toc_only: bool,
    pub standalone_page: bool,
    pub render_latex: bool,
    pub smarty_pants: bool,
    pub latex_dashes: bool,
    pub improved_fractions: bool,
    pub simple_html_output: bool,
    pub css_link: String,
    pub output_destination: Option<PathBuf>,
    pub backend: String,
    pub title: Option<String>,
}

impl EffectiveConfig {
    /// Apply the option implications in a single ordered pass.
    ///
    /// Idempotent: normalizing a normalized configuration is a no-op.
    pub fn normalized(mut self) -> Self {
        if self.toc_only {
            self.generate_toc = true;
        }
        if !self.css_link.is_empty() {
            self.standalone_page = true;
        }
        if self.standalone_page {
            self.render_latex = false;
        }
        if self.generate_toc {
            self.render_latex = false;
        }
        if self
            .output_destination
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            self.output_destination = None;
        }
        self
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        normalize(&RawOptions::default())
    }
}

/// Resolve implied and conflicting options.
pub fn normalize(raw: &RawOptions) -> EffectiveConfig {
    EffectiveConfig {
        generate_toc: raw.toc,
        toc_only: raw.toc_only,
        standalone_page: raw.page,
        render_latex: raw.latex,
        smarty_pants: raw.smartypants,
        latex_dashes: raw.latexdashes,
        improved_fractions: raw.fractions,
        simple_html_output: raw.html_simple,
        css_link: raw.css.clone(),
        output_destination: (!raw.output.is_empty()).then(|| PathBuf::from(&raw.output)),
        backend: raw.driver.clone(),
        title: raw.title.clone(),
    }
    .normalized()
}
