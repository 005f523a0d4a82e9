//! ECMAScript-flavoured backtracking regex engine.
//!
//! This is the runtime the rest of the crate trusts: the parser uses it as a
//! validation oracle, the sample preview executes with it, and the estimator
//! re-tests perturbed strings against it. Every execution is bounded by a
//! step limit so pathological patterns report an error instead of hanging.

pub mod compiler;
pub mod exec;
pub mod unicode;
pub mod vm;

use crate::core::flags::Flags;
use crate::parser::syntax::{Parser, SyntaxError};
use compiler::Program;
use thiserror::Error;
use vm::{MatchMode, Vm};

/// Default per-call step budget.
pub const DEFAULT_STEP_LIMIT: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The pattern is not valid; `offset` is a char offset into the source.
    #[error("{message}")]
    Syntax {
        message: String,
        offset: Option<usize>,
    },

    #[error("Regular expression too large")]
    TooLarge,

    #[error("Match step limit exceeded")]
    StepLimitExceeded,
}

impl From<SyntaxError> for EngineError {
    fn from(err: SyntaxError) -> Self {
        EngineError::Syntax {
            message: err.message,
            offset: Some(err.offset),
        }
    }
}

/// Capture spans of one match, as byte offsets. Index 0 is the whole match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures {
    spans: Vec<Option<(usize, usize)>>,
}

impl Captures {
    pub fn get(&self, index: usize) -> Option<(usize, usize)> {
        self.spans.get(index).copied().flatten()
    }

    pub fn whole(&self) -> (usize, usize) {
        self.get(0).unwrap_or((0, 0))
    }

    /// Number of groups including the implicit group 0.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// A compiled pattern.
#[derive(Debug, Clone)]
pub struct Regex {
    source: String,
    flags: Flags,
    program: Program,
    group_names: Vec<Option<String>>,
    step_limit: u64,
}

impl Regex {
    /// Compiles `pattern` under `flags`.
    pub fn new(pattern: &str, flags: Flags) -> Result<Self, EngineError> {
        let tree = Parser::new(pattern, flags.unicode).parse()?;
        let program = compiler::compile(pattern, &tree.pattern, &tree.group_names, flags.multiline)?;
        Ok(Regex {
            source: pattern.to_string(),
            flags,
            program,
            group_names: tree.group_names,
            step_limit: DEFAULT_STEP_LIMIT,
        })
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn group_count(&self) -> usize {
        self.program.group_count
    }

    /// Name of each capturing group, indexed by `group - 1`.
    pub fn group_names(&self) -> &[Option<String>] {
        &self.group_names
    }

    fn mode(&self) -> MatchMode {
        MatchMode {
            ignore_case: self.flags.ignore_case,
            multiline: self.flags.multiline,
            dot_all: self.flags.dot_all,
        }
    }

    /// Search semantics: true when the pattern matches anywhere in `text`
    /// (only at offset 0 under the sticky flag).
    pub fn is_match(&self, text: &str) -> Result<bool, EngineError> {
        Ok(self.find_at(text, 0)?.is_some())
    }

    /// Byte span of the first match starting at or after byte `start`.
    pub fn find_at(&self, text: &str, start: usize) -> Result<Option<(usize, usize)>, EngineError> {
        Ok(self.captures_at(text, start)?.map(|caps| caps.whole()))
    }

    /// Captures of the first match starting at or after byte `start`.
    pub fn captures_at(&self, text: &str, start: usize) -> Result<Option<Captures>, EngineError> {
        let Some(prefix) = text.get(..start) else {
            return Ok(None);
        };
        let start_char = prefix.chars().count();

        let mut vm = Vm::new(&self.program, self.mode(), text, self.step_limit);
        let Some(slots) = vm.search(start_char, self.flags.sticky)? else {
            return Ok(None);
        };

        // char index -> byte offset, with one entry past the end
        let mut byte_at: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        byte_at.push(text.len());

        let spans = slots
            .chunks(2)
            .map(|pair| match (pair[0], pair.get(1).copied().flatten()) {
                (Some(s), Some(e)) if s <= e => Some((byte_at[s], byte_at[e])),
                _ => None,
            })
            .collect();
        Ok(Some(Captures { spans }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regex(pattern: &str, flags: &str) -> Regex {
        Regex::new(pattern, Flags::parse(flags).unwrap()).unwrap()
    }

    #[test]
    fn test_find_reports_byte_spans() {
        let re = regex("é+", "");
        assert_eq!(re.find_at("caféé!", 0).unwrap(), Some((3, 7)));
    }

    #[test]
    fn test_find_at_resumes_after_offset() {
        let re = regex("\\d", "");
        assert_eq!(re.find_at("a1b2", 2).unwrap(), Some((3, 4)));
        assert_eq!(re.find_at("a1b2", 4).unwrap(), None);
    }

    #[test]
    fn test_sticky_only_tries_start() {
        let re = regex("b", "y");
        assert!(!re.is_match("ab").unwrap());
        assert!(re.is_match("ba").unwrap());
    }

    #[test]
    fn test_captures_unset_group() {
        let re = regex("(a)|(b)", "");
        let caps = re.captures_at("b", 0).unwrap().unwrap();
        assert_eq!(caps.len(), 3);
        assert_eq!(caps.get(1), None);
        assert_eq!(caps.get(2), Some((0, 1)));
    }

    #[test]
    fn test_compile_errors() {
        let err = Regex::new("([a-z]", Flags::default()).unwrap_err();
        assert!(matches!(err, EngineError::Syntax { .. }));
        assert!(Regex::new("\\p{L}", Flags::parse("u").unwrap()).is_ok());
        assert!(Regex::new("\\p{Nope}", Flags::parse("u").unwrap()).is_err());
    }

    #[test]
    fn test_step_limit_is_reported() {
        let re = regex("(a+)+$", "").with_step_limit(10_000);
        let input = format!("{}!", "a".repeat(28));
        assert_eq!(re.is_match(&input), Err(EngineError::StepLimitExceeded));
    }
}
