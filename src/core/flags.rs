use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The six independent pattern flags.
///
/// Serialized in canonical order: `g`, `i`, `m`, `s`, `u`, `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Flags {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub sticky: bool,
}

/// Rejected flag string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid flags supplied to RegExp constructor '{0}'")]
pub struct InvalidFlags(pub String);

impl Flags {
    pub fn parse(text: &str) -> Result<Self, InvalidFlags> {
        let mut flags = Flags::default();
        for ch in text.chars() {
            let slot = match ch {
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multiline,
                's' => &mut flags.dot_all,
                'u' => &mut flags.unicode,
                'y' => &mut flags.sticky,
                _ => return Err(InvalidFlags(text.to_string())),
            };
            if *slot {
                return Err(InvalidFlags(text.to_string()));
            }
            *slot = true;
        }
        Ok(flags)
    }

    /// Same flags with `global` cleared, used for single-string testing.
    pub fn without_global(self) -> Self {
        Self {
            global: false,
            ..self
        }
    }

    /// Pairs of (flag letter, enabled) in canonical order.
    pub fn entries(&self) -> [(char, bool); 6] {
        [
            ('g', self.global),
            ('i', self.ignore_case),
            ('m', self.multiline),
            ('s', self.dot_all),
            ('u', self.unicode),
            ('y', self.sticky),
        ]
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (letter, enabled) in self.entries() {
            if enabled {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Flags {
    type Err = InvalidFlags;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flags::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_to_canonical_order() {
        let flags = Flags::parse("yumigs").unwrap();
        assert_eq!(flags.to_string(), "gimsuy");
    }

    #[test]
    fn test_rejects_unknown_and_duplicate_flags() {
        assert!(Flags::parse("x").is_err());
        assert!(Flags::parse("gg").is_err());
        assert_eq!(Flags::parse("").unwrap(), Flags::default());
    }

    #[test]
    fn test_without_global_keeps_other_flags() {
        let flags = Flags::parse("gim").unwrap().without_global();
        assert_eq!(flags.to_string(), "im");
    }
}
