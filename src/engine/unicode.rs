//! Character predicates used by the matcher: shorthand classes, line
//! terminators, case folding and a compact Unicode property table.
//!
//! Property matching is approximate. It is built on the `char` predicates of
//! the standard library plus hand-maintained block ranges for scripts, which
//! is enough to execute sample text but is not a full UCD implementation.

pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// ECMAScript `\s`: WhiteSpace plus LineTerminator.
pub fn is_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

/// Simple case fold used for case-insensitive comparison.
pub fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Upper-case counterpart when it maps to a single char.
pub fn upper(c: char) -> char {
    let mut up = c.to_uppercase();
    match (up.next(), up.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Letter,
    UppercaseLetter,
    LowercaseLetter,
    Number,
    DecimalNumber,
    Punctuation,
    Symbol,
    Separator,
    SpaceSeparator,
    Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Latin,
    Greek,
    Cyrillic,
    Han,
    Hiragana,
    Katakana,
    Arabic,
    Hebrew,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Any,
    Ascii,
    AsciiHexDigit,
    Alphabetic,
    WhiteSpace,
    Uppercase,
    Lowercase,
    Category(Category),
    Script(Script),
}

impl Property {
    /// Resolves `\p{name}` or `\p{name=value}`.
    pub fn lookup(name: &str, value: Option<&str>) -> Option<Property> {
        match value {
            None => binary_property(name).or_else(|| category(name).map(Property::Category)),
            Some(value) => match name {
                "General_Category" | "gc" => category(value).map(Property::Category),
                "Script" | "sc" | "Script_Extensions" | "scx" => {
                    script(value).map(Property::Script)
                }
                _ => None,
            },
        }
    }

    pub fn matches(&self, c: char) -> bool {
        match self {
            Property::Any => true,
            Property::Ascii => c.is_ascii(),
            Property::AsciiHexDigit => c.is_ascii_hexdigit(),
            Property::Alphabetic => c.is_alphabetic(),
            Property::WhiteSpace => c.is_whitespace(),
            Property::Uppercase => c.is_uppercase(),
            Property::Lowercase => c.is_lowercase(),
            Property::Category(cat) => category_matches(*cat, c),
            Property::Script(script) => in_ranges(script_ranges(*script), c),
        }
    }
}

fn binary_property(name: &str) -> Option<Property> {
    let property = match name {
        "Any" => Property::Any,
        "ASCII" => Property::Ascii,
        "ASCII_Hex_Digit" | "AHex" => Property::AsciiHexDigit,
        "Alphabetic" | "Alpha" => Property::Alphabetic,
        "White_Space" | "space" => Property::WhiteSpace,
        "Uppercase" | "Upper" => Property::Uppercase,
        "Lowercase" | "Lower" => Property::Lowercase,
        _ => return None,
    };
    Some(property)
}

fn category(name: &str) -> Option<Category> {
    let category = match name {
        "L" | "Letter" => Category::Letter,
        "Lu" | "Uppercase_Letter" => Category::UppercaseLetter,
        "Ll" | "Lowercase_Letter" => Category::LowercaseLetter,
        "N" | "Number" => Category::Number,
        "Nd" | "Decimal_Number" | "digit" => Category::DecimalNumber,
        "P" | "Punctuation" | "punct" => Category::Punctuation,
        "S" | "Symbol" => Category::Symbol,
        "Z" | "Separator" => Category::Separator,
        "Zs" | "Space_Separator" => Category::SpaceSeparator,
        "Cc" | "Control" | "cntrl" => Category::Control,
        _ => return None,
    };
    Some(category)
}

fn script(name: &str) -> Option<Script> {
    let script = match name {
        "Latin" | "Latn" => Script::Latin,
        "Greek" | "Grek" => Script::Greek,
        "Cyrillic" | "Cyrl" => Script::Cyrillic,
        "Han" | "Hani" => Script::Han,
        "Hiragana" | "Hira" => Script::Hiragana,
        "Katakana" | "Kana" => Script::Katakana,
        "Arabic" | "Arab" => Script::Arabic,
        "Hebrew" | "Hebr" => Script::Hebrew,
        _ => return None,
    };
    Some(script)
}

fn category_matches(category: Category, c: char) -> bool {
    match category {
        Category::Letter => c.is_alphabetic() && !c.is_numeric(),
        Category::UppercaseLetter => c.is_uppercase() && c.is_alphabetic(),
        Category::LowercaseLetter => c.is_lowercase() && c.is_alphabetic(),
        Category::Number => c.is_numeric(),
        Category::DecimalNumber => is_decimal_digit(c),
        Category::Punctuation => is_punctuation(c),
        Category::Symbol => is_symbol(c),
        Category::Separator => is_space_separator(c) || matches!(c, '\u{2028}' | '\u{2029}'),
        Category::SpaceSeparator => is_space_separator(c),
        Category::Control => c.is_control(),
    }
}

fn in_ranges(ranges: &[(char, char)], c: char) -> bool {
    ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
}

fn is_decimal_digit(c: char) -> bool {
    const DIGIT_BLOCKS: &[(char, char)] = &[
        ('0', '9'),
        ('\u{0660}', '\u{0669}'),
        ('\u{06F0}', '\u{06F9}'),
        ('\u{0966}', '\u{096F}'),
        ('\u{09E6}', '\u{09EF}'),
        ('\u{0E50}', '\u{0E59}'),
        ('\u{FF10}', '\u{FF19}'),
    ];
    in_ranges(DIGIT_BLOCKS, c)
}

fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation() && !is_symbol(c);
    }
    matches!(c,
        '\u{00A1}' | '\u{00A7}' | '\u{00AB}' | '\u{00B6}' | '\u{00B7}' | '\u{00BB}' | '\u{00BF}'
        | '\u{2010}'..='\u{2027}'
        | '\u{2030}'..='\u{205E}'
        | '\u{3001}'..='\u{3003}'
        | '\u{3008}'..='\u{3011}'
        | '\u{FF01}'..='\u{FF0F}')
}

fn is_symbol(c: char) -> bool {
    matches!(c,
        '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~'
        | '\u{00A2}'..='\u{00A6}'
        | '\u{00A9}' | '\u{00AC}' | '\u{00AE}'..='\u{00B1}' | '\u{00D7}' | '\u{00F7}'
        | '\u{20A0}'..='\u{20CF}'
        | '\u{2100}'..='\u{214F}'
        | '\u{2190}'..='\u{23FF}'
        | '\u{2500}'..='\u{27BF}'
        | '\u{1F300}'..='\u{1FAFF}')
}

fn is_space_separator(c: char) -> bool {
    matches!(c,
        ' ' | '\u{00A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}')
}

fn script_ranges(script: Script) -> &'static [(char, char)] {
    match script {
        Script::Latin => &[
            ('A', 'Z'),
            ('a', 'z'),
            ('\u{00AA}', '\u{00AA}'),
            ('\u{00BA}', '\u{00BA}'),
            ('\u{00C0}', '\u{00D6}'),
            ('\u{00D8}', '\u{00F6}'),
            ('\u{00F8}', '\u{024F}'),
            ('\u{1E00}', '\u{1EFF}'),
            ('\u{2C60}', '\u{2C7F}'),
            ('\u{A720}', '\u{A7FF}'),
            ('\u{FF21}', '\u{FF3A}'),
            ('\u{FF41}', '\u{FF5A}'),
        ],
        Script::Greek => &[('\u{0370}', '\u{03FF}'), ('\u{1F00}', '\u{1FFF}')],
        Script::Cyrillic => &[
            ('\u{0400}', '\u{052F}'),
            ('\u{2DE0}', '\u{2DFF}'),
            ('\u{A640}', '\u{A69F}'),
        ],
        Script::Han => &[
            ('\u{2E80}', '\u{2FDF}'),
            ('\u{3005}', '\u{3005}'),
            ('\u{3007}', '\u{3007}'),
            ('\u{3021}', '\u{3029}'),
            ('\u{3400}', '\u{4DBF}'),
            ('\u{4E00}', '\u{9FFF}'),
            ('\u{F900}', '\u{FAFF}'),
            ('\u{20000}', '\u{2FA1F}'),
        ],
        Script::Hiragana => &[('\u{3041}', '\u{309F}')],
        Script::Katakana => &[
            ('\u{30A0}', '\u{30FF}'),
            ('\u{31F0}', '\u{31FF}'),
            ('\u{FF66}', '\u{FF9D}'),
        ],
        Script::Arabic => &[
            ('\u{0600}', '\u{06FF}'),
            ('\u{0750}', '\u{077F}'),
            ('\u{08A0}', '\u{08FF}'),
            ('\u{FB50}', '\u{FDFF}'),
            ('\u{FE70}', '\u{FEFF}'),
        ],
        Script::Hebrew => &[('\u{0591}', '\u{05F4}'), ('\u{FB1D}', '\u{FB4F}')],
    }
}
