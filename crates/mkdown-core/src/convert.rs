// SPDX-License-Identifier: AGPL-3.0-or-later
//! Conversion orchestration: backend selection, rendering and output

use crate::options::EffectiveConfig;
use crate::sink::write_output;
use crate::traits::{BackendDescriptor, BackendRegistry, ConversionError, Result};

/// One document to convert
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    input: Vec<u8>,
    config: EffectiveConfig,
}

impl ConversionRequest {
    /// The configuration is normalized again, so a hand-built one cannot
    /// violate the option invariants.
    pub fn new(input: impl Into<Vec<u8>>, config: EffectiveConfig) -> Self {
        Self {
            input: input.into(),
            config: config.normalized(),
        }
    }

    pub fn input(&self) -> &[u8] {
        &self.input
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }
}

/// Rendered bytes and the backend that produced them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub bytes: Vec<u8>,
    pub backend: &'static str,
}

/// What a batch does after a failed document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Stop at the first failure
    #[default]
    FailFast,
    /// Convert every document and report each result
    Continue,
}

/// Drives conversions through a [`BackendRegistry`]
pub struct Converter {
    registry: BackendRegistry,
}

impl Converter {
    pub fn new(registry: BackendRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// The backend a request for `id` ends up using.
    pub fn describe(&self, id: &str) -> Option<BackendDescriptor> {
        self.registry.resolve(id).map(|backend| backend.descriptor())
    }

    /// Render a request without writing it anywhere.
    pub fn render(&self, request: &ConversionRequest) -> Result<RenderedOutput> {
        let config = request.config();
        let backend = self.registry.resolve(&config.backend).ok_or(
            ConversionError::Unsupported {
                backend: "none",
                feature: "rendering without a registered backend",
            },
        )?;
        let descriptor = backend.descriptor();
        tracing::debug!(
            requested = %config.backend,
            backend = descriptor.name,
            input_bytes = request.input().len(),
            "converting document"
        );

        let bytes = backend.render(request.input(), config)?;
        Ok(RenderedOutput {
            bytes,
            backend: descriptor.name,
        })
    }

    /// Render a request and write it to its configured destination.
    pub fn convert(&self, request: &ConversionRequest) -> Result<RenderedOutput> {
        let output = self.render(request)?;
        write_output(&output.bytes, request.config().output_destination.as_deref())?;
        Ok(output)
    }

    /// Convert independent documents sharing one configuration.
    ///
    /// Under [`BatchPolicy::FailFast`] the returned list ends with the first
    /// error; under [`BatchPolicy::Continue`] it has one result per input.
    pub fn convert_all<I>(
        &self,
        inputs: I,
        config: &EffectiveConfig,
        policy: BatchPolicy,
    ) -> Vec<Result<RenderedOutput>>
    where
        I: IntoIterator,
        I::Item: Into<Vec<u8>>,
    {
        let mut results = Vec::new();
        for input in inputs {
            let request = ConversionRequest::new(input, config.clone());
            let result = self.convert(&request);
            let failed = result.is_err();
            results.push(result);
            if failed && policy == BatchPolicy::FailFast {
                break;
            }
        }
        results
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(BackendRegistry::with_defaults())
    }
}
