//! Deterministic seed perturbations.
//!
//! "Should still match" variants are small edits a tolerant pattern would be
//! expected to accept; "should not match" variants are edits that make the
//! seed obviously wrong. Both sets are de-duplicated and capped per seed.

use crate::core::ast::Assertion;
use crate::core::walk::elements;
use crate::core::ElementKind;
use crate::parser::ParsedPattern;

pub const MAX_SHOULD_MATCH: usize = 8;
pub const MAX_SHOULD_NOT_MATCH: usize = 10;

/// Conservative pattern properties that gate which variants are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternTraits {
    pub allows_whitespace: bool,
    pub digit_class: bool,
    pub word_class: bool,
    pub hyphen: bool,
    pub dot: bool,
    pub colon: bool,
    pub fully_anchored: bool,
}

impl PatternTraits {
    pub fn probe(parsed: &ParsedPattern) -> Self {
        let raw = parsed.source.as_str();
        let mut start = false;
        let mut end = false;
        for element in elements(&parsed.pattern) {
            match element.kind {
                ElementKind::Assertion(Assertion::Start) => start = true,
                ElementKind::Assertion(Assertion::End) => end = true,
                _ => {}
            }
        }
        PatternTraits {
            allows_whitespace: raw.contains("\\s") || raw.contains(' '),
            digit_class: raw.contains("\\d") || raw.contains("0-9"),
            word_class: raw.contains("\\w") || raw.contains("a-z") || raw.contains("A-Z"),
            hyphen: raw.contains('-'),
            dot: raw.contains("\\."),
            colon: raw.contains(':'),
            fully_anchored: start && end,
        }
    }
}

/// A perturbed seed and a short description of the edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub text: String,
    pub edit: &'static str,
}

struct VariantSet<'s> {
    seed: &'s str,
    cap: usize,
    out: Vec<Variant>,
}

impl<'s> VariantSet<'s> {
    fn new(seed: &'s str, cap: usize) -> Self {
        VariantSet {
            seed,
            cap,
            out: Vec::new(),
        }
    }

    fn push(&mut self, text: String, edit: &'static str) {
        if self.out.len() >= self.cap || text == self.seed || self.out.iter().any(|v| v.text == text)
        {
            return;
        }
        self.out.push(Variant { text, edit });
    }
}

/// Edits a correct pattern would likely tolerate; a non-match suggests a false negative.
pub fn should_match(seed: &str, traits: &PatternTraits) -> Vec<Variant> {
    let mut set = VariantSet::new(seed, MAX_SHOULD_MATCH);

    if traits.allows_whitespace {
        set.push(format!(" {}", seed), "a leading space");
        set.push(format!("{} ", seed), "a trailing space");
        if seed.contains(' ') {
            set.push(seed.replace(' ', "  "), "doubled internal spaces");
        }
    }

    if seed.chars().any(char::is_alphabetic) {
        set.push(seed.to_uppercase(), "upper case");
        set.push(seed.to_lowercase(), "lower case");
        set.push(alternating_case(seed), "alternating case");
    }

    if traits.hyphen && seed.contains('-') {
        set.push(seed.replace('-', "_"), "underscores instead of hyphens");
    }
    if traits.dot && seed.contains('.') {
        set.push(seed.replace('.', "-"), "hyphens instead of dots");
    }
    if traits.colon && seed.contains(':') {
        set.push(seed.replace(':', "-"), "hyphens instead of colons");
    }

    let mut chars = seed.chars();
    if let Some(last) = chars.next_back() {
        let rest = chars.as_str();
        if !rest.is_empty() {
            set.push(rest.to_string(), "the last character removed");
        }
        if seed.chars().count() >= 3 {
            set.push(format!("{}{}", seed, last), "the last character repeated");
        }
    }

    set.out
}

/// Edits that make the seed look wrong; a match suggests a false positive.
pub fn should_not_match(seed: &str, traits: &PatternTraits) -> Vec<Variant> {
    let mut set = VariantSet::new(seed, MAX_SHOULD_NOT_MATCH);

    set.push(format!("{} ", seed), "a trailing space appended");
    set.push(format!("{}\t", seed), "a trailing tab appended");
    set.push(format!("{}§", seed), "a stray symbol appended");

    if traits.digit_class {
        if let Some(replaced) = replace_first(seed, |c| c.is_ascii_digit(), "x") {
            set.push(replaced, "its first digit replaced by a letter");
        }
        set.push(format!("{}x", seed), "a letter appended");
    }

    if traits.word_class {
        set.push(format!("{}!", seed), "an exclamation mark appended");
        if let Some(replaced) = replace_first(seed, char::is_alphabetic, "!") {
            set.push(replaced, "its first letter replaced by '!'");
        }
    }

    let separators = [
        (traits.dot, '.', "..", "a doubled dot"),
        (traits.hyphen, '-', "--", "a doubled hyphen"),
        (traits.colon, ':', "::", "a doubled colon"),
    ];
    for (enabled, sep, doubled, edit) in separators {
        if enabled {
            if let Some(replaced) = replace_first(seed, |c| c == sep, doubled) {
                set.push(replaced, edit);
            }
        }
    }

    if !traits.fully_anchored {
        set.push(format!("xx_{}_xx", seed), "unrelated text around it");
        set.push(format!("{{{}}}", seed), "brace delimiters around it");
    }

    set.out
}

fn alternating_case(text: &str) -> String {
    text.chars()
        .enumerate()
        .flat_map(|(i, c)| {
            let mapped: Vec<char> = if i % 2 == 0 {
                c.to_uppercase().collect()
            } else {
                c.to_lowercase().collect()
            };
            mapped
        })
        .collect()
}

fn replace_first(text: &str, pred: impl Fn(char) -> bool, with: &str) -> Option<String> {
    let (idx, c) = text.char_indices().find(|&(_, c)| pred(c))?;
    let mut out = String::with_capacity(text.len() + with.len());
    out.push_str(&text[..idx]);
    out.push_str(with);
    out.push_str(&text[idx + c.len_utf8()..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_pattern;
    use pretty_assertions::assert_eq;

    fn texts(variants: &[Variant]) -> Vec<&str> {
        variants.iter().map(|v| v.text.as_str()).collect()
    }

    #[test]
    fn test_traits_probe() {
        let traits = PatternTraits::probe(&parse_pattern("^\\d{3}-\\w+\\.x$", "").unwrap());
        assert!(traits.digit_class && traits.word_class && traits.hyphen && traits.dot);
        assert!(traits.fully_anchored);
        assert!(!traits.allows_whitespace && !traits.colon);

        let loose = PatternTraits::probe(&parse_pattern("[^a]b", "").unwrap());
        assert!(!loose.fully_anchored);
    }

    #[test]
    fn test_should_match_for_digits() {
        let traits = PatternTraits {
            hyphen: true,
            ..PatternTraits::default()
        };
        assert_eq!(
            texts(&should_match("12-34", &traits)),
            vec!["12_34", "12-3", "12-344"]
        );
    }

    #[test]
    fn test_should_match_case_and_whitespace() {
        let traits = PatternTraits {
            allows_whitespace: true,
            ..PatternTraits::default()
        };
        let variants = should_match("ab c", &traits);
        assert_eq!(
            texts(&variants),
            vec![" ab c", "ab c ", "ab  c", "AB C", "Ab c", "ab ", "ab cc"]
        );
        assert!(variants.len() <= MAX_SHOULD_MATCH);
    }

    #[test]
    fn test_should_not_match_respects_anchoring() {
        let traits = PatternTraits {
            digit_class: true,
            fully_anchored: true,
            ..PatternTraits::default()
        };
        assert_eq!(
            texts(&should_not_match("a1", &traits)),
            vec!["a1 ", "a1\t", "a1§", "ax", "a1x"]
        );

        let loose = PatternTraits::default();
        let variants = should_not_match("cat", &loose);
        assert!(texts(&variants).contains(&"xx_cat_xx"));
        assert!(texts(&variants).contains(&"{cat}"));
    }

    #[test]
    fn test_caps_hold_for_rich_seeds() {
        let all = PatternTraits {
            allows_whitespace: true,
            digit_class: true,
            word_class: true,
            hyphen: true,
            dot: true,
            colon: true,
            fully_anchored: false,
        };
        let seed = "Ab 1-2.3:4";
        assert_eq!(should_match(seed, &all).len(), MAX_SHOULD_MATCH);
        assert_eq!(should_not_match(seed, &all).len(), MAX_SHOULD_NOT_MATCH);
    }
}
