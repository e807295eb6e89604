//! Trace input.
//!
//! A trace is a text file with one request per line:
//!
//! ```text
//! r ffe04540
//! w 0x7ff0a8
//! ```
//!
//! The first token is the request type (`r` or `w`, either case) and the second
//! a hexadecimal address with an optional `0x` prefix. Blank lines are skipped.
//! Anything else is a fatal [`TraceError`] tied to its line; nothing is skipped
//! or retried.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::{AccessType, TraceError};

/// One request from a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Read or write.
    pub op: AccessType,
    /// Byte address.
    pub addr: u32,
}

impl TraceRecord {
    /// Creates a read record.
    pub fn read(addr: u32) -> Self {
        Self {
            op: AccessType::Read,
            addr,
        }
    }

    /// Creates a write record.
    pub fn write(addr: u32) -> Self {
        Self {
            op: AccessType::Write,
            addr,
        }
    }
}

/// Parses one trace line. Returns `Ok(None)` for a blank line.
///
/// # Errors
///
/// Returns [`TraceError::UnknownOp`] if the request type is not `r`/`w`,
/// [`TraceError::BadAddress`] if the address is not 32-bit hex, and
/// [`TraceError::Malformed`] if the line does not have exactly two tokens.
pub fn parse_line(line_no: usize, text: &str) -> Result<Option<TraceRecord>, TraceError> {
    let mut tokens = text.split_whitespace();
    let Some(op_token) = tokens.next() else {
        return Ok(None);
    };
    let (Some(addr_token), None) = (tokens.next(), tokens.next()) else {
        return Err(TraceError::Malformed {
            line: line_no,
            text: text.to_owned(),
        });
    };

    let mut op_chars = op_token.chars();
    let op = match (op_chars.next(), op_chars.next()) {
        (Some(c), None) => AccessType::from_mnemonic(c),
        _ => None,
    }
    .ok_or_else(|| TraceError::UnknownOp {
        line: line_no,
        op: op_token.to_owned(),
    })?;

    let digits = addr_token
        .strip_prefix("0x")
        .or_else(|| addr_token.strip_prefix("0X"))
        .unwrap_or(addr_token);
    let bad_address = || TraceError::BadAddress {
        line: line_no,
        text: addr_token.to_owned(),
    };
    // `from_str_radix` tolerates a leading `+`.
    if !digits.starts_with(|c: char| c.is_ascii_hexdigit()) {
        return Err(bad_address());
    }
    let addr = u32::from_str_radix(digits, 16).map_err(|_| bad_address())?;

    Ok(Some(TraceRecord { op, addr }))
}

/// Streaming reader over a trace.
///
/// Yields records in file order; the first error ends the trace.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
    failed: bool,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps any buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            failed: false,
        }
    }
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            };
            self.line_no += 1;
            match parse_line(self.line_no, &line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
