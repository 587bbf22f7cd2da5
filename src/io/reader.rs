// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Puzzle text reader.
//!
//! The format is line oriented: a header `rows cols`, then `rows` lines of
//! `cols` whitespace-separated tokens. A token of `0`..`3` is a clue; any
//! other single non-space character (conventionally `.`, `-`, `x` or `X`)
//! means "no clue". Blank lines before the expected row count are skipped.

use std::fmt;

use crate::geometry::Grid;

/// Rejections of malformed puzzle text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input had no header line.
    MissingHeader,

    /// The header line was not two positive integers.
    BadHeader { line: String },

    /// Fewer clue rows than the header promised.
    RowCount { expected: usize, found: usize },

    /// A clue row with the wrong number of tokens.
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A token that is neither a clue digit nor a single placeholder
    /// character.
    BadToken { row: usize, token: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingHeader => write!(f, "missing 'rows cols' header line"),
            ParseError::BadHeader { line } => {
                write!(f, "header must be two positive integers, got {:?}", line)
            }
            ParseError::RowCount { expected, found } => {
                write!(f, "expected {} clue rows, found {}", expected, found)
            }
            ParseError::ColumnCount {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} entries, expected {}",
                row, found, expected
            ),
            ParseError::BadToken { row, token } => {
                write!(f, "unrecognised token {:?} in row {}", token, row)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse puzzle text into a [`Grid`].
pub fn parse_grid(input: &str) -> Result<Grid, ParseError> {
    let mut lines = input.lines();

    let header = loop {
        match lines.next() {
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => break line,
            None => return Err(ParseError::MissingHeader),
        }
    };
    let mut dims = header.split_whitespace().map(str::parse::<usize>);
    let (rows, cols) = match (dims.next(), dims.next(), dims.next()) {
        (Some(Ok(rows)), Some(Ok(cols)), None) if rows > 0 && cols > 0 => (rows, cols),
        _ => {
            return Err(ParseError::BadHeader {
                line: header.to_string(),
            })
        }
    };

    let mut clues = Vec::with_capacity(rows * cols);
    let mut parsed_rows = 0;
    for line in lines {
        if parsed_rows == rows {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != cols {
            return Err(ParseError::ColumnCount {
                row: parsed_rows,
                expected: cols,
                found: tokens.len(),
            });
        }
        for token in tokens {
            clues.push(parse_token(token, parsed_rows)?);
        }
        parsed_rows += 1;
    }
    if parsed_rows != rows {
        return Err(ParseError::RowCount {
            expected: rows,
            found: parsed_rows,
        });
    }

    Ok(Grid::new(rows, cols, clues))
}

fn parse_token(token: &str, row: usize) -> Result<Option<u8>, ParseError> {
    match token {
        "0" | "1" | "2" | "3" => Ok(Some(token.as_bytes()[0] - b'0')),
        _ if token.chars().count() == 1 => Ok(None),
        _ => Err(ParseError::BadToken {
            row,
            token: token.to_string(),
        }),
    }
}
