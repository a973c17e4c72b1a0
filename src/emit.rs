// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Serialise the namespace tree and write it to its destination.
// Author: Lukas Bower

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::{Builder, NamedTempFile};

use crate::error::ConvertError;
use crate::tree::Tree;

/// JSON layout of the emitted document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// No insignificant whitespace.
    #[default]
    Compact,
    /// Two-space indentation.
    Pretty,
}

/// Where the document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Standard output, followed by a newline.
    Stdout,
    /// A file, replaced atomically.
    File(PathBuf),
}

impl Destination {
    /// File destination when `path` is present, stdout otherwise.
    pub fn from_optional(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Render the whole tree as one JSON document.
pub fn render(tree: &Tree, style: OutputStyle) -> Result<Vec<u8>, ConvertError> {
    let bytes = match style {
        OutputStyle::Compact => serde_json::to_vec(tree)?,
        OutputStyle::Pretty => serde_json::to_vec_pretty(tree)?,
    };
    Ok(bytes)
}

/// Render `tree` and write it to `destination`. Returns the bytes written.
pub fn write_document(
    tree: &Tree,
    destination: &Destination,
    style: OutputStyle,
) -> Result<usize, ConvertError> {
    let document = render(tree, style)?;
    match destination {
        Destination::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_stream(&mut handle, &document)
                .map_err(|source| ConvertError::output(destination, source))?;
        }
        Destination::File(path) => {
            write_atomic(path, &document)
                .map_err(|source| ConvertError::output(destination, source))?;
        }
    }
    debug!("wrote {} bytes to {destination}", document.len());
    Ok(document.len())
}

/// Write a rendered document to a stream, terminated by a newline.
pub fn write_stream<W: Write>(writer: &mut W, document: &[u8]) -> io::Result<()> {
    writer.write_all(document)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Replace `path` with `contents` via a temporary file in the same directory.
///
/// On failure the previous file at `path`, if any, is left untouched. The
/// replacement keeps the previous file's permissions; a new file gets the
/// mode a plain create would give it.
fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = staging_file(dir)?;
    if let Ok(existing) = fs::metadata(path) {
        staged.as_file().set_permissions(existing.permissions())?;
    }
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}

// 0o666 is narrowed by the process umask at creation, as `File::create` is.
#[cfg(unix)]
fn staging_file(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    Builder::new()
        .prefix(".csv2json")
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn staging_file(dir: &Path) -> io::Result<NamedTempFile> {
    Builder::new().prefix(".csv2json").tempfile_in(dir)
}
