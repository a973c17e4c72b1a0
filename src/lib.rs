// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Expose csv2json conversion helpers for tests and the CLI.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Convert two-column CSV records (`dotted.key,value`) into a nested JSON
//! object. Each key is split into namespace segments and the trimmed value is
//! written at the resulting path; the finished tree is emitted once.

pub mod emit;
pub mod error;
pub mod path;
pub mod record;
pub mod tree;

use std::io::Read;
use std::path::PathBuf;

use log::info;

pub use emit::{Destination, OutputStyle};
pub use error::{ConvertError, ErrorKind};
pub use path::{KeyPath, DEFAULT_SEPARATOR};
pub use record::{Record, RecordReader, DEFAULT_DELIMITER};
pub use tree::{ConflictPolicy, Node, Tree, TreeError};

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Delimited input file.
    pub input: PathBuf,
    /// Output file; standard output when `None`.
    pub output: Option<PathBuf>,
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Separator between key segments.
    pub separator: char,
    /// Handling of leaves met in namespace position.
    pub conflict: ConflictPolicy,
    /// JSON layout.
    pub style: OutputStyle,
}

impl ConvertOptions {
    /// Options for `input` with every other setting at its default.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            delimiter: DEFAULT_DELIMITER,
            separator: DEFAULT_SEPARATOR,
            conflict: ConflictPolicy::default(),
            style: OutputStyle::default(),
        }
    }
}

/// Counts reported after a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Records read from the input.
    pub records: u64,
    /// Leaf values in the final tree.
    pub leaves: usize,
    /// Bytes of JSON emitted, excluding a trailing newline.
    pub bytes: usize,
    /// Where the document was written.
    pub destination: Destination,
}

impl ConversionSummary {
    /// One-line description for logs.
    pub fn summary(&self) -> String {
        format!(
            "records={}, leaves={}, bytes={}, output={}",
            self.records, self.leaves, self.bytes, self.destination
        )
    }
}

/// Insert every record into a fresh tree, stopping at the first failure.
pub fn build_tree<I>(
    records: I,
    separator: char,
    conflict: ConflictPolicy,
) -> Result<(Tree, u64), ConvertError>
where
    I: IntoIterator<Item = Result<Record, ConvertError>>,
{
    let mut tree = Tree::new();
    let mut count = 0u64;
    for record in records {
        let Record { line, key, value } = record?;
        let inserted = KeyPath::parse(&key, separator)
            .and_then(|path| tree.insert(&path, value, conflict).map(|_| ()));
        if let Err(source) = inserted {
            return Err(ConvertError::Tree { line, key, source });
        }
        count += 1;
    }
    Ok((tree, count))
}

/// Build a tree from any reader of delimited text.
pub fn convert_reader<R: Read>(reader: R, options: &ConvertOptions) -> Result<Tree, ConvertError> {
    let records = RecordReader::from_reader(reader, options.delimiter).map_err(|source| {
        ConvertError::InputAccess {
            path: options.input.clone(),
            source,
        }
    })?;
    build_tree(records, options.separator, options.conflict).map(|(tree, _)| tree)
}

/// Run a full conversion: read `options.input`, build the tree, write it.
///
/// Nothing is written unless every record was read and inserted.
pub fn convert(options: &ConvertOptions) -> Result<ConversionSummary, ConvertError> {
    let (tree, records) = {
        let reader = RecordReader::open(&options.input, options.delimiter)?;
        build_tree(reader, options.separator, options.conflict)?
    };
    let destination = Destination::from_optional(options.output.clone());
    let bytes = emit::write_document(&tree, &destination, options.style)?;
    let summary = ConversionSummary {
        records,
        leaves: tree.leaf_count(),
        bytes,
        destination,
    };
    info!("csv2json: wrote {}", summary.summary());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(input: &str, conflict: ConflictPolicy) -> Result<Tree, ConvertError> {
        let mut options = ConvertOptions::new("unused.csv");
        options.conflict = conflict;
        convert_reader(input.as_bytes(), &options)
    }

    #[test]
    fn empty_input_gives_empty_object() {
        let tree = tree_of("", ConflictPolicy::Fail).expect("tree");
        assert!(tree.is_empty());
    }

    #[test]
    fn empty_key_aborts_with_line() {
        let err = tree_of("a,1\n,2\n", ConflictPolicy::Fail).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyKey);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn blank_line_aborts_with_line() {
        let err = tree_of("a,1\n\nb,2\n", ConflictPolicy::Fail).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.line(), Some(2));
        assert_eq!(
            err.to_string(),
            "line 2: expected at least 2 fields (key, value), found 0"
        );
    }

    #[test]
    fn conflict_reports_offending_key() {
        let err = tree_of("a,1\na.b,2\n", ConflictPolicy::Fail).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructureConflict);
        assert_eq!(
            err.to_string(),
            "line 2: key 'a.b': namespace 'a' already holds a value"
        );
    }

    #[test]
    fn records_are_counted() {
        let records = RecordReader::from_bytes(b"a,1\na,2\nb.c,3\n".to_vec(), b',');
        let (tree, count) = build_tree(records, '.', ConflictPolicy::Fail).expect("tree");
        assert_eq!(count, 3);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn summary_line_lists_counts() {
        let summary = ConversionSummary {
            records: 4,
            leaves: 4,
            bytes: 52,
            destination: Destination::Stdout,
        };
        assert_eq!(
            summary.summary(),
            "records=4, leaves=4, bytes=52, output=<stdout>"
        );
    }
}
