// SPDX-License-Identifier: AGPL-3.0-or-later
//! Writing rendered output to standard output or a file

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::traits::{ConversionError, Result};

/// Where rendered bytes go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination<'a> {
    Stdout,
    File(&'a Path),
}

impl<'a> Destination<'a> {
    /// `None` or an empty path means standard output.
    pub fn from_path(path: Option<&'a Path>) -> Self {
        match path {
            Some(path) if !path.as_os_str().is_empty() => Self::File(path),
            _ => Self::Stdout,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Stdout => "standard output".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Write `bytes` to `destination`, creating or truncating the file.
///
/// The file handle is closed before returning on every path. Concurrent
/// writers to one path are not coordinated; the last one to finish wins.
pub fn write_output(bytes: &[u8], destination: Option<&Path>) -> Result<()> {
    let destination = Destination::from_path(destination);
    match destination {
        Destination::Stdout => {
            let stdout = io::stdout();
            write_all(&mut stdout.lock(), bytes, &destination)
        }
        Destination::File(path) => {
            let mut file = File::create(path).map_err(|source| ConversionError::OutputCreation {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "writing output file");
            write_all(&mut file, bytes, &destination)
        }
    }
}

fn write_all<W: Write>(writer: &mut W, bytes: &[u8], destination: &Destination<'_>) -> Result<()> {
    writer
        .write_all(bytes)
        .and_then(|()| writer.flush())
        .map_err(|source| ConversionError::OutputWrite {
            path: destination.describe(),
            source,
        })
}
