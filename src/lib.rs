//! Regular expression explanation: parsing, structural explanation, intent
//! inference, risk detection and bounded false positive / negative
//! estimation for ECMAScript-style patterns.

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod estimate;
pub mod explain;
pub mod intent;
pub mod io;
pub mod parser;
pub mod risk;

pub use crate::analysis::{analyze, AnalysisReport, AnalysisRequest, MatchPreview};
pub use crate::config::RegexplainConfig;
pub use crate::core::{
    Explanation, Flags, FpFnReport, IntentLabel, IntentResult, MatchRecord, Severity, Warning,
    WarningId,
};
pub use crate::engine::Regex;
pub use crate::errors::Error;
pub use crate::estimate::{estimate, EstimateInput};
pub use crate::explain::explain;
pub use crate::intent::infer_intent;
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::parser::{parse_pattern, ParsedPattern, PatternError};
pub use crate::risk::{detect_risks, RiskContext};
