// SPDX-License-Identifier: AGPL-3.0-or-later
//! mkdown core - Markdown to HTML conversion
//!
//! This crate provides:
//! - Option normalization resolving implied and conflicting flags
//! - Two interchangeable backends (comrak and pulldown-cmark) behind one trait
//! - Title detection for standalone pages, table of contents generation
//! - An output sink and a converter tying the pieces together
//!
//! Argument parsing, config files and logging setup belong to the caller.

pub mod backends;
pub mod convert;
pub mod options;
pub mod page;
pub mod sink;
pub mod smartypants;
pub mod title;
pub mod toc;
pub mod traits;

pub use backends::{ComrakBackend, PulldownBackend, DEFAULT_BACKEND_ID};
pub use convert::{BatchPolicy, ConversionRequest, Converter, RenderedOutput};
pub use options::{normalize, EffectiveConfig, RawOptions};
pub use sink::write_output;
pub use title::sniff_title;
pub use traits::{Backend, BackendDescriptor, BackendRegistry, ConversionError, Result};
