// SPDX-License-Identifier: AGPL-3.0-or-later
//! Backend trait, registry and the shared error type

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::backends::{ComrakBackend, PulldownBackend, DEFAULT_BACKEND_ID};
use crate::options::EffectiveConfig;

/// Error type for rendering and output
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Unsupported feature: {feature} is not implemented by backend {backend}")]
    Unsupported {
        backend: &'static str,
        feature: &'static str,
    },

    #[error("Parse error in backend {backend}: {message}")]
    Parse {
        backend: &'static str,
        message: String,
    },

    #[error("Error creating {}: {source}", .path.display())]
    OutputCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `path` is the file path, or `standard output`.
    #[error("Error writing output to {path}: {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Static description of a registered backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendDescriptor {
    /// Short identifier used to select the backend
    pub id: &'static str,
    /// Human readable name, for informational output only
    pub name: &'static str,
}

/// A Markdown parser + HTML renderer pair
///
/// Implementations hold no mutable state, so one instance may serve
/// concurrent conversions.
pub trait Backend: Send + Sync {
    fn descriptor(&self) -> BackendDescriptor;

    /// Render raw Markdown bytes according to `config`.
    ///
    /// Returns [`ConversionError::Unsupported`] when LaTeX output is
    /// requested and [`ConversionError::Parse`] when the input cannot be
    /// read as a document.
    fn render(&self, input: &[u8], config: &EffectiveConfig) -> Result<Vec<u8>>;
}

/// Registry of backends keyed by identifier
pub struct BackendRegistry {
    backends: BTreeMap<&'static str, Box<dyn Backend>>,
    default_id: &'static str,
}

impl BackendRegistry {
    /// Empty registry whose fallback is `default_id`.
    pub fn new(default_id: &'static str) -> Self {
        Self {
            backends: BTreeMap::new(),
            default_id,
        }
    }

    /// Registry with the comrak (`cm`, default) and pulldown-cmark (`pd`) backends.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new(DEFAULT_BACKEND_ID);
        registry.register(Box::new(ComrakBackend::new()));
        registry.register(Box::new(PulldownBackend::new()));
        registry
    }

    /// Add a backend, replacing any previous one with the same id.
    pub fn register(&mut self, backend: Box<dyn Backend>) {
        let id = backend.descriptor().id;
        self.backends.insert(id, backend);
    }

    pub fn get(&self, id: &str) -> Option<&dyn Backend> {
        self.backends.get(id).map(|b| b.as_ref())
    }

    /// Look up `id`, falling back to the default backend for unknown ids.
    ///
    /// Returns `None` only when the default backend is not registered.
    pub fn resolve(&self, id: &str) -> Option<&dyn Backend> {
        match self.get(id) {
            Some(backend) => Some(backend),
            None => {
                tracing::warn!(
                    requested = id,
                    fallback = self.default_id,
                    "unknown backend, using default"
                );
                self.get(self.default_id)
            }
        }
    }

    pub fn default_id(&self) -> &'static str {
        self.default_id
    }

    /// Descriptors of all registered backends, ordered by id
    pub fn descriptors(&self) -> Vec<BackendDescriptor> {
        self.backends.values().map(|b| b.descriptor()).collect()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
