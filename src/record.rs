// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Read (key, value) records from delimited text input.
// Author: Lukas Bower

use std::fs;
use std::io::{self, Cursor, Read};
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};
use log::trace;

use crate::error::ConvertError;

/// Default field delimiter.
pub const DEFAULT_DELIMITER: u8 = b',';

/// One input row: the raw key and the trimmed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Line the row started on (1-based).
    pub line: u64,
    /// Field 0, verbatim.
    pub key: String,
    /// Field 1 with surrounding whitespace removed.
    pub value: String,
}

impl Record {
    fn from_row(row: &StringRecord, fallback_line: u64) -> Result<Self, ConvertError> {
        let line = row.position().map_or(fallback_line, |pos| pos.line());
        match (row.get(0), row.get(1)) {
            (Some(key), Some(value)) => Ok(Self {
                line,
                key: key.to_owned(),
                value: value.trim().to_owned(),
            }),
            _ => Err(ConvertError::MissingField {
                line,
                found: row.len(),
            }),
        }
    }
}

/// Lazy iterator of [`Record`]s over a CSV source without a header row.
///
/// Rows may carry extra fields, which are ignored. A row with fewer than two
/// fields yields [`ConvertError::MissingField`]; it is never skipped. An empty
/// physical line is a row with zero fields. A single line terminator at the
/// end of the input closes the last row and is not a row itself.
pub struct RecordReader {
    reader: Reader<Cursor<Vec<u8>>>,
    row: StringRecord,
    resume: usize,
    read: u64,
    done: bool,
}

impl RecordReader {
    /// Read `path` into memory.
    pub fn open(path: &Path, delimiter: u8) -> Result<Self, ConvertError> {
        let bytes = fs::read(path).map_err(|source| ConvertError::InputAccess {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(bytes, delimiter))
    }

    /// Drain an arbitrary reader.
    pub fn from_reader<R: Read>(mut reader: R, delimiter: u8) -> io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::from_bytes(bytes, delimiter))
    }

    /// Wrap input already held in memory.
    pub fn from_bytes(bytes: Vec<u8>, delimiter: u8) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(Cursor::new(bytes));
        Self {
            reader,
            row: StringRecord::new(),
            resume: 0,
            read: 0,
            done: false,
        }
    }

    fn input(&self) -> &[u8] {
        self.reader.get_ref().get_ref()
    }

    /// Line of the empty row starting at `resume`, if there is one.
    ///
    /// The csv reader drops empty lines, so they are found by looking at the
    /// bytes where the next row would begin.
    fn blank_line(&self) -> Option<u64> {
        let input = self.input();
        let mut at = self.resume;
        // `\n` left over from the previous row's `\r\n` terminator.
        if at > 0 && input.get(at - 1) == Some(&b'\r') && input.get(at) == Some(&b'\n') {
            at += 1;
        }
        match input.get(at) {
            Some(b'\n') | Some(b'\r') => Some(line_of(input, at)),
            _ => None,
        }
    }
}

/// 1-based line containing byte offset `at`.
fn line_of(input: &[u8], at: usize) -> u64 {
    let head = &input[..at];
    let terminators = head
        .iter()
        .enumerate()
        .filter(|&(idx, &byte)| {
            byte == b'\n' || (byte == b'\r' && head.get(idx + 1) != Some(&b'\n'))
        })
        .count();
    terminators as u64 + 1
}

impl Iterator for RecordReader {
    type Item = Result<Record, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(line) = self.blank_line() {
            self.done = true;
            return Some(Err(ConvertError::MissingField { line, found: 0 }));
        }
        match self.reader.read_record(&mut self.row) {
            Ok(true) => {
                self.read += 1;
                self.resume =
                    usize::try_from(self.reader.position().byte()).unwrap_or(usize::MAX);
                Some(Record::from_row(&self.row, self.read).inspect(|record| {
                    trace!("line {}: {} = {:?}", record.line, record.key, record.value);
                }))
            }
            Ok(false) => {
                self.done = true;
                None
            }
            Err(source) => {
                self.done = true;
                Some(Err(ConvertError::Malformed {
                    line: source.position().map_or(self.read + 1, |pos| pos.line()),
                    source,
                }))
            }
        }
    }
}
