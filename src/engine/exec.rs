//! Sample execution: turns engine matches into [`MatchRecord`]s.

use super::{EngineError, Regex};
use crate::core::types::{CaptureRecord, MatchRecord};
use log::debug;

/// Result of running a pattern over sample text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Execution {
    pub matches: Vec<MatchRecord>,
    /// True when `limit` stopped collection early.
    pub truncated: bool,
}

/// Runs `regex` over `sample`. With the global flag every match is
/// collected (empty matches advance by one char), otherwise only the first.
pub fn collect_matches(regex: &Regex, sample: &str, limit: usize) -> Result<Execution, EngineError> {
    let mut execution = Execution::default();
    let global = regex.flags().global;
    let mut pos = 0;

    while pos <= sample.len() {
        if execution.matches.len() >= limit {
            execution.truncated = true;
            debug!("match collection stopped at {} matches", limit);
            break;
        }
        let Some(caps) = regex.captures_at(sample, pos)? else {
            break;
        };
        let (start, end) = caps.whole();
        execution.matches.push(to_record(regex, sample, &caps));

        if !global {
            break;
        }
        pos = if end > start {
            end
        } else {
            match sample[end..].chars().next() {
                Some(c) => end + c.len_utf8(),
                None => break,
            }
        };
    }

    Ok(execution)
}

fn to_record(regex: &Regex, sample: &str, caps: &super::Captures) -> MatchRecord {
    let (start, end) = caps.whole();
    let groups = (1..=regex.group_count())
        .map(|index| {
            let span = caps.get(index);
            CaptureRecord {
                index: index as u32,
                name: regex.group_names().get(index - 1).cloned().flatten(),
                value: span
                    .map(|(s, e)| sample[s..e].to_string())
                    .unwrap_or_default(),
                span,
            }
        })
        .collect();

    MatchRecord {
        span: (start, end),
        text: sample[start..end].to_string(),
        line: line_of(sample, start),
        groups,
    }
}

/// 1-based line number of a byte offset.
fn line_of(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flags::Flags;

    fn run(pattern: &str, flags: &str, sample: &str) -> Execution {
        let re = Regex::new(pattern, Flags::parse(flags).unwrap()).unwrap();
        collect_matches(&re, sample, 1000).unwrap()
    }

    #[test]
    fn test_single_match_without_global() {
        let exec = run("cat", "", "the cat sat on the cat");
        assert_eq!(exec.matches.len(), 1);
        assert_eq!(exec.matches[0].span, (4, 7));
        assert_eq!(exec.matches[0].text, "cat");
        assert_eq!(exec.matches[0].line, 1);
    }

    #[test]
    fn test_global_collects_all_with_lines() {
        let exec = run("\\d+", "g", "a1\nb22\nc333");
        let texts: Vec<_> = exec.matches.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["1", "22", "333"]);
        let lines: Vec<_> = exec.matches.iter().map(|m| m.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_matches_advance() {
        let exec = run("x*", "g", "ab");
        assert_eq!(exec.matches.len(), 3);
        assert!(exec.matches.iter().all(|m| m.text.is_empty()));
    }

    #[test]
    fn test_named_groups_are_recorded() {
        let exec = run("(?<year>\\d{4})-(\\d{2})?", "", "on 2024-");
        let groups = &exec.matches[0].groups;
        assert_eq!(groups[0].name.as_deref(), Some("year"));
        assert_eq!(groups[0].value, "2024");
        assert_eq!(groups[1].span, None);
        assert_eq!(groups[1].value, "");
    }

    #[test]
    fn test_limit_truncates() {
        let re = Regex::new("a", Flags::parse("g").unwrap()).unwrap();
        let exec = collect_matches(&re, "aaaa", 2).unwrap();
        assert_eq!(exec.matches.len(), 2);
        assert!(exec.truncated);
    }
}
