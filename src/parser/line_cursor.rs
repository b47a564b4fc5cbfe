//! One-line lookahead over a text stream.
//!
//! Comment lines (`#...`) are skipped while advancing and never show up
//! as lookahead. Lines are trimmed; invalid UTF-8 is decoded lossily.

use log::warn;
use std::io::BufRead;

pub struct LineCursor<R> {
    reader: R,
    line: String,
    at_end: bool,
    line_number: usize,
    error: Option<std::io::Error>,
}

impl<R: BufRead> LineCursor<R> {
    /// Wrap `reader` and load the first non-comment line
    pub fn new(reader: R) -> Self {
        let mut cursor = Self {
            reader,
            line: String::new(),
            at_end: false,
            line_number: 0,
            error: None,
        };
        cursor.advance();
        cursor
    }

    /// Trimmed lookahead line; empty once input is exhausted
    pub fn current_line(&self) -> &str {
        &self.line
    }

    /// Load the next non-comment line
    pub fn advance(&mut self) {
        loop {
            self.read();
            if self.at_end || !self.line.starts_with('#') {
                break;
            }
        }
    }

    /// Return the current line and move past it
    pub fn consume(&mut self) -> String {
        let line = std::mem::take(&mut self.line);
        self.advance();
        line
    }

    pub fn at_end(&self) -> bool {
        self.at_end
    }

    /// 1-based physical line of the lookahead
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read error that ended the input early, if any
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    fn read(&mut self) {
        if self.at_end {
            self.line.clear();
            return;
        }

        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                self.line.clear();
                self.at_end = true;
            }
            Ok(_) => {
                self.line_number += 1;
                self.line = String::from_utf8_lossy(&buf).trim().to_string();
            }
            Err(e) => {
                warn!("Stopped reading after line {}: {}", self.line_number, e);
                self.line.clear();
                self.at_end = true;
                self.error = Some(e);
            }
        }
    }
}
