// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Error types surfaced while converting records into a JSON tree.
// Author: Lukas Bower

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tree::TreeError;

/// Coarse classification of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input unreadable or output unwritable.
    FileAccess,
    /// A row was malformed or carried fewer than two fields.
    Parse,
    /// A row's key field was empty.
    EmptyKey,
    /// A key descended through a segment that already holds a value.
    StructureConflict,
    /// The JSON encoder rejected the tree.
    Serialize,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FileAccess => "file access error",
            Self::Parse => "parse error",
            Self::EmptyKey => "empty key error",
            Self::StructureConflict => "structure conflict error",
            Self::Serialize => "serialize error",
        };
        f.write_str(label)
    }
}

/// Errors produced by a conversion run. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input file could not be opened.
    #[error("failed to open input {}: {source}", path.display())]
    InputAccess {
        /// Path supplied for the input.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The output destination could not be created or written.
    #[error("failed to write output {target}: {source}")]
    OutputAccess {
        /// Description of the destination (a path or `<stdout>`).
        target: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A row carried fewer than two fields.
    #[error("line {line}: expected at least 2 fields (key, value), found {found}")]
    MissingField {
        /// Input line the row started on.
        line: u64,
        /// Number of fields present in the row.
        found: usize,
    },
    /// The reader could not decode a row.
    #[error("line {line}: malformed record: {source}")]
    Malformed {
        /// Input line the failure was reported at.
        line: u64,
        /// Reader failure.
        #[source]
        source: csv::Error,
    },
    /// The key could not be inserted into the tree.
    #[error("line {line}: key '{key}': {source}")]
    Tree {
        /// Input line the row started on.
        line: u64,
        /// Raw key field of the row.
        key: String,
        /// Insertion failure.
        #[source]
        source: TreeError,
    },
    /// JSON serialisation failed.
    #[error("failed to serialise document: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConvertError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputAccess { .. } | Self::OutputAccess { .. } => ErrorKind::FileAccess,
            Self::MissingField { .. } | Self::Malformed { .. } => ErrorKind::Parse,
            Self::Tree { source, .. } => match source {
                TreeError::EmptyKey => ErrorKind::EmptyKey,
                TreeError::StructureConflict { .. } => ErrorKind::StructureConflict,
            },
            Self::Serialize(_) => ErrorKind::Serialize,
        }
    }

    /// Input line associated with the error, when one applies.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::MissingField { line, .. }
            | Self::Malformed { line, .. }
            | Self::Tree { line, .. } => Some(*line),
            _ => None,
        }
    }

    pub(crate) fn output(target: impl fmt::Display, source: io::Error) -> Self {
        Self::OutputAccess {
            target: target.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_errors_classify_by_cause() {
        let empty = ConvertError::Tree {
            line: 3,
            key: String::new(),
            source: TreeError::EmptyKey,
        };
        assert_eq!(empty.kind(), ErrorKind::EmptyKey);
        assert_eq!(empty.line(), Some(3));

        let conflict = ConvertError::Tree {
            line: 2,
            key: "a.b".to_owned(),
            source: TreeError::StructureConflict {
                prefix: "a".to_owned(),
            },
        };
        assert_eq!(conflict.kind(), ErrorKind::StructureConflict);
        assert!(conflict.to_string().contains("line 2"));
        assert!(conflict.to_string().contains("'a.b'"));
    }

    #[test]
    fn missing_field_message_names_line_and_count() {
        let err = ConvertError::MissingField { line: 7, found: 1 };
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(
            err.to_string(),
            "line 7: expected at least 2 fields (key, value), found 1"
        );
    }

    #[test]
    fn output_errors_have_no_line() {
        let err = ConvertError::output(
            "<stdout>",
            io::Error::new(io::ErrorKind::BrokenPipe, "closed"),
        );
        assert_eq!(err.kind(), ErrorKind::FileAccess);
        assert_eq!(err.line(), None);
        assert!(err.to_string().starts_with("failed to write output <stdout>"));
    }
}
