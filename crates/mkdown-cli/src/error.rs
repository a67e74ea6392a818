// SPDX-License-Identifier: AGPL-3.0-or-later
//! CLI error types.

use std::path::PathBuf;

use mkdown_core::ConversionError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Conversion(#[from] ConversionError),

    #[error("Error reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading standard input: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{failed} of {total} documents failed to convert, {skipped} skipped")]
    Batch {
        failed: usize,
        skipped: usize,
        total: usize,
    },
}
