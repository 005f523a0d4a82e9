//! Pattern parsing with the engine as validation oracle.
//!
//! [`parse_pattern`] compiles the pattern with [`crate::engine::Regex`]
//! first and only builds the tree once that succeeds, so a tree never exists
//! for a pattern the engine rejects and is never withheld for one it accepts.

pub mod syntax;

use crate::core::ast::{Pattern, Span};
use crate::core::flags::Flags;
use crate::engine::{EngineError, Regex};
use log::debug;
use serde::Serialize;
use syntax::Parser;
use thiserror::Error;

/// Structured parse failure. Returned as data, never raised as a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct PatternError {
    pub message: String,
    /// Char offset into the pattern, when known.
    pub offset: Option<usize>,
    /// 1-based column, when known.
    pub column: Option<usize>,
}

impl PatternError {
    fn new(message: impl Into<String>, offset: Option<usize>) -> Self {
        PatternError {
            message: message.into(),
            offset,
            column: offset.map(|o| o + 1),
        }
    }

    fn from_engine(source: &str, flags: &Flags, err: EngineError) -> Self {
        let offset = match &err {
            EngineError::Syntax { offset, .. } => *offset,
            _ => None,
        };
        PatternError::new(
            format!("Invalid regular expression: /{}/{}: {}", source, flags, err),
            offset,
        )
    }
}

/// A successfully parsed pattern.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedPattern {
    pub source: String,
    pub flags: Flags,
    pub pattern: Pattern,
    pub group_count: u32,
    pub group_names: Vec<Option<String>>,
}

impl ParsedPattern {
    /// Original source text covered by `span`.
    pub fn raw(&self, span: Span) -> &str {
        self.source.get(span.start..span.end).unwrap_or("")
    }

    /// Canonical flag string (`gimsuy` order).
    pub fn flags_string(&self) -> String {
        self.flags.to_string()
    }
}

/// Parse `source` under the flag string `flags`.
pub fn parse_pattern(source: &str, flags: &str) -> Result<ParsedPattern, PatternError> {
    let flags = Flags::parse(flags).map_err(|e| PatternError::new(e.to_string(), None))?;

    Regex::new(source, flags).map_err(|e| PatternError::from_engine(source, &flags, e))?;

    let tree = Parser::new(source, flags.unicode).parse().map_err(|e| {
        PatternError::from_engine(source, &flags, EngineError::from(e))
    })?;
    debug!(
        "parsed /{}/{} with {} capture group(s)",
        source, flags, tree.group_count
    );

    Ok(ParsedPattern {
        source: source.to_string(),
        flags,
        pattern: tree.pattern,
        group_count: tree.group_count,
        group_names: tree.group_names,
    })
}
