//! Recursive-descent parser from pattern text to the pattern tree.
//!
//! Follows the ECMAScript grammar: strict in `u` mode, lenient legacy rules
//! otherwise (lone `{`, `}` and `]` are literals, unknown escapes are identity
//! escapes, out-of-range `\N` falls back to octal).

use crate::core::ast::*;

/// Structural error with the char offset where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

/// Parser output before it is paired with flags and source.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub pattern: Pattern,
    pub group_count: u32,
    /// Name of each capturing group, indexed by `index - 1`.
    pub group_names: Vec<Option<String>>,
}

type ParseResult<T> = Result<T, SyntaxError>;

pub struct Parser<'s> {
    source: &'s str,
    /// (byte offset, char) pairs.
    chars: Vec<(usize, char)>,
    pos: usize,
    unicode: bool,
    total_groups: u32,
    has_named_groups: bool,
    group_names: Vec<Option<String>>,
    named_refs: Vec<(String, usize)>,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str, unicode: bool) -> Self {
        let chars: Vec<(usize, char)> = source.char_indices().collect();
        let (total_groups, has_named_groups) = prescan_groups(&chars);
        Parser {
            source,
            chars,
            pos: 0,
            unicode,
            total_groups,
            has_named_groups,
            group_names: Vec::new(),
            named_refs: Vec::new(),
        }
    }

    /// Parse the full pattern.
    pub fn parse(mut self) -> ParseResult<SyntaxTree> {
        let alternatives = self.parse_disjunction()?;
        if let Some(ch) = self.peek() {
            return Err(self.error_at(
                self.pos,
                if ch == ')' {
                    "Unmatched ')'".to_string()
                } else {
                    format!("Unexpected character '{}'", ch)
                },
            ));
        }
        for (name, offset) in &self.named_refs {
            if !self.group_names.iter().flatten().any(|n| n == name) {
                return Err(self.error_at(*offset, "Invalid named capture referenced"));
            }
        }
        let pattern = Pattern {
            span: Span::new(0, self.source.len()),
            alternatives,
        };
        Ok(SyntaxTree {
            pattern,
            group_count: self.group_names.len() as u32,
            group_names: self.group_names,
        })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).map(|&(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Byte offset of the char at `pos` (source length past the end).
    fn byte_offset(&self, pos: usize) -> usize {
        self.chars
            .get(pos)
            .map(|&(b, _)| b)
            .unwrap_or(self.source.len())
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.byte_offset(start), self.byte_offset(self.pos))
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            offset: pos,
        }
    }

    fn parse_disjunction(&mut self) -> ParseResult<Vec<Alternative>> {
        let mut alternatives = vec![self.parse_alternative()?];
        while self.eat('|') {
            alternatives.push(self.parse_alternative()?);
        }
        Ok(alternatives)
    }

    fn parse_alternative(&mut self) -> ParseResult<Alternative> {
        let start = self.pos;
        let mut elements = Vec::new();
        while let Some(ch) = self.peek() {
            if ch == '|' || ch == ')' {
                break;
            }
            elements.push(self.parse_term()?);
        }
        Ok(Alternative {
            span: self.span_from(start),
            elements,
        })
    }

    /// An atom followed by an optional quantifier.
    fn parse_term(&mut self) -> ParseResult<Element> {
        let start = self.pos;
        let atom = self.parse_atom()?;

        let quantifiable = match &atom.kind {
            ElementKind::Assertion(Assertion::Lookaround(l)) => {
                !self.unicode && l.direction == LookDirection::Ahead
            }
            ElementKind::Assertion(_) => false,
            _ => true,
        };

        let quantifier_pos = self.pos;
        let Some((min, max)) = self.parse_quantifier_bounds()? else {
            return Ok(atom);
        };
        if !quantifiable {
            return Err(self.error_at(quantifier_pos, "Nothing to repeat"));
        }
        let greedy = !self.eat('?');

        if self.at_quantifier() {
            return Err(self.error_at(self.pos, "Nothing to repeat"));
        }

        Ok(Element {
            span: self.span_from(start),
            kind: ElementKind::Quantifier(Quantifier {
                min,
                max,
                greedy,
                element: Box::new(atom),
            }),
        })
    }

    /// True when the next chars form a quantifier (used for error checks).
    fn at_quantifier(&self) -> bool {
        match self.peek() {
            Some('*') | Some('+') | Some('?') => true,
            Some('{') => self.scan_braced_quantifier(self.pos).is_some(),
            _ => false,
        }
    }

    /// Reads `{n}`, `{n,}` or `{n,m}` starting at `from`; returns bounds and
    /// the position after `}`.
    fn scan_braced_quantifier(&self, from: usize) -> Option<((u32, Option<u32>), usize)> {
        let mut pos = from;
        if self.chars.get(pos).map(|&(_, c)| c) != Some('{') {
            return None;
        }
        pos += 1;
        let (min, after_min) = self.scan_number(pos)?;
        pos = after_min;
        let max = if self.chars.get(pos).map(|&(_, c)| c) == Some(',') {
            pos += 1;
            match self.scan_number(pos) {
                Some((m, after)) => {
                    pos = after;
                    Some(m)
                }
                None => None,
            }
        } else {
            Some(min)
        };
        if self.chars.get(pos).map(|&(_, c)| c) != Some('}') {
            return None;
        }
        Some(((min, max), pos + 1))
    }

    fn scan_number(&self, from: usize) -> Option<(u32, usize)> {
        let mut pos = from;
        let mut value: u64 = 0;
        while let Some(d) = self.chars.get(pos).and_then(|&(_, c)| c.to_digit(10)) {
            value = (value * 10 + u64::from(d)).min(u64::from(u32::MAX));
            pos += 1;
        }
        if pos == from {
            None
        } else {
            Some((value as u32, pos))
        }
    }

    fn parse_quantifier_bounds(&mut self) -> ParseResult<Option<(u32, Option<u32>)>> {
        let bounds = match self.peek() {
            Some('*') => {
                self.advance();
                (0, None)
            }
            Some('+') => {
                self.advance();
                (1, None)
            }
            Some('?') => {
                self.advance();
                (0, Some(1))
            }
            Some('{') => match self.scan_braced_quantifier(self.pos) {
                Some((bounds, next)) => {
                    if let (min, Some(max)) = bounds {
                        if min > max {
                            return Err(self.error_at(
                                self.pos,
                                "numbers out of order in {} quantifier",
                            ));
                        }
                    }
                    self.pos = next;
                    bounds
                }
                None if self.unicode => {
                    return Err(self.error_at(self.pos, "Incomplete quantifier"));
                }
                None => return Ok(None),
            },
            _ => return Ok(None),
        };
        Ok(Some(bounds))
    }

    fn parse_atom(&mut self) -> ParseResult<Element> {
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Err(self.error_at(self.pos, "Unexpected end of pattern"));
        };
        let kind = match ch {
            '(' => return self.parse_group(),
            '[' => return self.parse_class(),
            '\\' => return self.parse_atom_escape(),
            '.' => {
                self.advance();
                ElementKind::CharacterSet(CharacterSet::dot())
            }
            '^' => {
                self.advance();
                ElementKind::Assertion(Assertion::Start)
            }
            '$' => {
                self.advance();
                ElementKind::Assertion(Assertion::End)
            }
            '*' | '+' | '?' => return Err(self.error_at(self.pos, "Nothing to repeat")),
            '{' => {
                if self.scan_braced_quantifier(self.pos).is_some() {
                    return Err(self.error_at(self.pos, "Nothing to repeat"));
                }
                if self.unicode {
                    return Err(self.error_at(self.pos, "Lone quantifier brackets"));
                }
                self.advance();
                ElementKind::Character { value: '{' }
            }
            '}' | ']' if self.unicode => {
                return Err(self.error_at(self.pos, "Lone quantifier brackets"));
            }
            other => {
                self.advance();
                ElementKind::Character { value: other }
            }
        };
        Ok(Element {
            span: self.span_from(start),
            kind,
        })
    }

    fn parse_group(&mut self) -> ParseResult<Element> {
        let start = self.pos;
        self.advance(); // '('

        enum Opening {
            Capture(Option<String>),
            NonCapture,
            Look(LookDirection, bool),
        }

        let opening = if self.eat('?') {
            match self.advance() {
                Some(':') => Opening::NonCapture,
                Some('=') => Opening::Look(LookDirection::Ahead, false),
                Some('!') => Opening::Look(LookDirection::Ahead, true),
                Some('<') if self.eat('=') => Opening::Look(LookDirection::Behind, false),
                Some('<') if self.eat('!') => Opening::Look(LookDirection::Behind, true),
                Some('<') => Opening::Capture(Some(self.parse_group_name()?)),
                _ => return Err(self.error_at(start, "Invalid group")),
            }
        } else {
            Opening::Capture(None)
        };

        let capture = match &opening {
            Opening::Capture(name) => {
                if let Some(name) = name {
                    if self.group_names.iter().flatten().any(|n| n == name) {
                        return Err(self.error_at(start, "Duplicate capture group name"));
                    }
                }
                self.group_names.push(name.clone());
                Some(Capture {
                    index: self.group_names.len() as u32,
                    name: name.clone(),
                })
            }
            _ => None,
        };

        let alternatives = self.parse_disjunction()?;
        if !self.eat(')') {
            return Err(self.error_at(self.pos, "Unterminated group"));
        }

        let kind = match opening {
            Opening::Look(direction, negate) => ElementKind::Assertion(Assertion::Lookaround(
                Lookaround {
                    direction,
                    negate,
                    alternatives,
                },
            )),
            Opening::Capture(_) | Opening::NonCapture => ElementKind::Group(Group {
                capture,
                alternatives,
            }),
        };
        Ok(Element {
            span: self.span_from(start),
            kind,
        })
    }

    /// Reads `name>` after `(?<` or `\k<`.
    fn parse_group_name(&mut self) -> ParseResult<String> {
        let start = self.pos;
        let mut name = String::new();
        loop {
            match self.advance() {
                Some('>') => break,
                Some(c) if is_identifier_char(c, name.is_empty()) => name.push(c),
                _ => return Err(self.error_at(start, "Invalid capture group name")),
            }
        }
        if name.is_empty() {
            return Err(self.error_at(start, "Invalid capture group name"));
        }
        Ok(name)
    }

    fn parse_atom_escape(&mut self) -> ParseResult<Element> {
        let start = self.pos;
        self.advance(); // '\'
        let Some(ch) = self.peek() else {
            return Err(self.error_at(start, "\\ at end of pattern"));
        };

        let kind = match ch {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' => {
                self.advance();
                ElementKind::CharacterSet(shorthand_set(ch))
            }
            'b' => {
                self.advance();
                ElementKind::Assertion(Assertion::WordBoundary)
            }
            'B' => {
                self.advance();
                ElementKind::Assertion(Assertion::NonWordBoundary)
            }
            '1'..='9' => {
                let digits_start = self.pos;
                let (n, after) = self.scan_number(self.pos).unwrap_or((0, self.pos + 1));
                if n >= 1 && n <= self.total_groups {
                    self.pos = after;
                    ElementKind::Backreference(Backreference::Index(n))
                } else if self.unicode {
                    return Err(self.error_at(start, "Invalid escape"));
                } else {
                    self.pos = digits_start;
                    ElementKind::Character {
                        value: self.parse_legacy_octal(),
                    }
                }
            }
            'k' if self.unicode || self.has_named_groups => {
                self.advance();
                if !self.eat('<') {
                    return Err(self.error_at(start, "Invalid named reference"));
                }
                let name = self.parse_group_name()?;
                self.named_refs.push((name.clone(), start));
                ElementKind::Backreference(Backreference::Name(name))
            }
            'p' | 'P' if self.unicode => {
                self.advance();
                ElementKind::CharacterSet(self.parse_property(ch == 'P', start)?)
            }
            _ => ElementKind::Character {
                value: self.parse_character_escape(start, false)?,
            },
        };
        Ok(Element {
            span: self.span_from(start),
            kind,
        })
    }

    /// Reads `{Name}` or `{Name=Value}` after `\p` / `\P`.
    fn parse_property(&mut self, negate: bool, start: usize) -> ParseResult<CharacterSet> {
        if !self.eat('{') {
            return Err(self.error_at(start, "Invalid property name"));
        }
        let mut body = String::new();
        loop {
            match self.advance() {
                Some('}') => break,
                Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '=' => body.push(c),
                _ => return Err(self.error_at(start, "Invalid property name")),
            }
        }
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name.to_string(), Some(value.to_string())),
            None => (body, None),
        };
        if name.is_empty() || value.as_deref() == Some("") {
            return Err(self.error_at(start, "Invalid property name"));
        }
        Ok(CharacterSet {
            kind: SetKind::Property { name, value },
            negate,
        })
    }

    /// Legacy octal escape: up to three octal digits with value <= 0o377.
    /// `\8` and `\9` are identity escapes.
    fn parse_legacy_octal(&mut self) -> char {
        let first = self.advance().unwrap_or('0');
        let Some(mut value) = first.to_digit(8) else {
            return first;
        };
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(d) if value * 8 + d <= 0o377 => {
                    value = value * 8 + d;
                    self.advance();
                }
                _ => break,
            }
        }
        char::from_u32(value).unwrap_or('\0')
    }

    /// Escapes that denote a single character; the `\` is already consumed.
    fn parse_character_escape(&mut self, start: usize, in_class: bool) -> ParseResult<char> {
        let Some(ch) = self.advance() else {
            return Err(self.error_at(start, "\\ at end of pattern"));
        };
        let value = match ch {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            '0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => '\0',
            '0'..='7' if !self.unicode => {
                self.pos -= 1;
                self.parse_legacy_octal()
            }
            'c' => match self.peek() {
                Some(letter) if letter.is_ascii_alphabetic() => {
                    self.advance();
                    char::from_u32(letter as u32 % 32).unwrap_or('\0')
                }
                _ if self.unicode => return Err(self.error_at(start, "Invalid unicode escape")),
                _ => {
                    // The backslash stands alone; `c` is read again as a literal.
                    self.pos -= 1;
                    '\\'
                }
            },
            'x' => match self.scan_hex(2) {
                Some(v) => char::from_u32(v).unwrap_or('\u{FFFD}'),
                None if self.unicode => return Err(self.error_at(start, "Invalid escape")),
                None => 'x',
            },
            'u' => match self.parse_unicode_escape_body()? {
                Some(c) => c,
                None if self.unicode => {
                    return Err(self.error_at(start, "Invalid Unicode escape"));
                }
                None => 'u',
            },
            '-' if in_class => '-',
            c if is_syntax_char(c) || c == '/' => c,
            _ if self.unicode => return Err(self.error_at(start, "Invalid escape")),
            c => c,
        };
        Ok(value)
    }

    fn scan_hex(&mut self, digits: usize) -> Option<u32> {
        let mut value = 0u32;
        for i in 0..digits {
            let d = self.peek_at(i)?.to_digit(16)?;
            value = value * 16 + d;
        }
        self.pos += digits;
        Some(value)
    }

    /// After `\u`: `XXXX` (with surrogate pairing) or `{X..}` in unicode mode.
    fn parse_unicode_escape_body(&mut self) -> ParseResult<Option<char>> {
        if self.unicode && self.peek() == Some('{') {
            let start = self.pos;
            self.advance();
            let mut value: u32 = 0;
            let mut digits = 0;
            while let Some(d) = self.peek().and_then(|c| c.to_digit(16)) {
                value = value.saturating_mul(16).saturating_add(d);
                digits += 1;
                self.advance();
            }
            if digits == 0 || !self.eat('}') || value > 0x10FFFF {
                return Err(self.error_at(start, "Invalid Unicode escape"));
            }
            return Ok(Some(char::from_u32(value).unwrap_or('\u{FFFD}')));
        }

        let Some(high) = self.scan_hex(4) else {
            return Ok(None);
        };
        if (0xD800..0xDC00).contains(&high)
            && self.peek() == Some('\\')
            && self.peek_at(1) == Some('u')
        {
            let save = self.pos;
            self.pos += 2;
            match self.scan_hex(4) {
                Some(low) if (0xDC00..0xE000).contains(&low) => {
                    let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return Ok(char::from_u32(combined));
                }
                _ => self.pos = save,
            }
        }
        Ok(Some(char::from_u32(high).unwrap_or('\u{FFFD}')))
    }

    fn parse_class(&mut self) -> ParseResult<Element> {
        let start = self.pos;
        self.advance(); // '['
        let negate = self.eat('^');
        let mut members = Vec::new();

        loop {
            match self.peek() {
                None => return Err(self.error_at(self.pos, "Unterminated character class")),
                Some(']') => {
                    self.advance();
                    break;
                }
                Some(_) => {}
            }

            let first = self.parse_class_atom()?;
            let is_range = self.peek() == Some('-')
                && self.peek_at(1).is_some_and(|c| c != ']');
            if !is_range {
                members.push(first);
                continue;
            }

            let dash_pos = self.pos;
            self.advance(); // '-'
            let second = self.parse_class_atom()?;
            match (&first.kind, &second.kind) {
                (
                    ClassMemberKind::Character { value: min },
                    ClassMemberKind::Character { value: max },
                ) => {
                    if min > max {
                        return Err(
                            self.error_at(dash_pos, "Range out of order in character class")
                        );
                    }
                    members.push(ClassMember {
                        span: Span::new(first.span.start, second.span.end),
                        kind: ClassMemberKind::Range {
                            min: *min,
                            max: *max,
                        },
                    });
                }
                _ if self.unicode => {
                    return Err(self.error_at(dash_pos, "Invalid character class"));
                }
                _ => {
                    let dash_span =
                        Span::new(self.byte_offset(dash_pos), self.byte_offset(dash_pos + 1));
                    members.push(first);
                    members.push(ClassMember {
                        span: dash_span,
                        kind: ClassMemberKind::Character { value: '-' },
                    });
                    members.push(second);
                }
            }
        }

        Ok(Element {
            span: self.span_from(start),
            kind: ElementKind::CharacterClass(CharacterClass { negate, members }),
        })
    }

    fn parse_class_atom(&mut self) -> ParseResult<ClassMember> {
        let start = self.pos;
        let Some(ch) = self.advance() else {
            return Err(self.error_at(self.pos, "Unterminated character class"));
        };
        let kind = if ch != '\\' {
            ClassMemberKind::Character { value: ch }
        } else {
            match self.peek() {
                None => return Err(self.error_at(start, "\\ at end of pattern")),
                Some(c @ ('d' | 'D' | 'w' | 'W' | 's' | 'S')) => {
                    self.advance();
                    ClassMemberKind::Set(shorthand_set(c))
                }
                Some(c @ ('p' | 'P')) if self.unicode => {
                    self.advance();
                    ClassMemberKind::Set(self.parse_property(c == 'P', start)?)
                }
                Some('b') => {
                    self.advance();
                    ClassMemberKind::Character { value: '\u{08}' }
                }
                Some('1'..='9') if !self.unicode => ClassMemberKind::Character {
                    value: self.parse_legacy_octal(),
                },
                Some(_) => ClassMemberKind::Character {
                    value: self.parse_character_escape(start, true)?,
                },
            }
        };
        Ok(ClassMember {
            span: self.span_from(start),
            kind,
        })
    }
}

fn shorthand_set(ch: char) -> CharacterSet {
    let kind = match ch.to_ascii_lowercase() {
        'd' => SetKind::Digit,
        'w' => SetKind::Word,
        _ => SetKind::Space,
    };
    CharacterSet {
        kind,
        negate: ch.is_ascii_uppercase(),
    }
}

fn is_syntax_char(c: char) -> bool {
    matches!(
        c,
        '^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
    )
}

fn is_identifier_char(c: char, first: bool) -> bool {
    if first {
        c.is_alphabetic() || c == '_' || c == '$'
    } else {
        c.is_alphanumeric() || c == '_' || c == '$'
    }
}

/// Counts capturing groups ahead of parsing so forward references resolve.
fn prescan_groups(chars: &[(usize, char)]) -> (u32, bool) {
    let at = |i: usize| chars.get(i).map(|&(_, c)| c);
    let mut count = 0u32;
    let mut named = false;
    let mut in_class = false;
    let mut i = 0;
    while i < chars.len() {
        match chars[i].1 {
            '\\' => i += 1,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => {
                if at(i + 1) != Some('?') {
                    count += 1;
                } else if at(i + 2) == Some('<') && !matches!(at(i + 3), Some('=') | Some('!')) {
                    count += 1;
                    named = true;
                }
            }
            _ => {}
        }
        i += 1;
    }
    (count, named)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParseResult<SyntaxTree> {
        Parser::new(source, false).parse()
    }

    fn parse_u(source: &str) -> ParseResult<SyntaxTree> {
        Parser::new(source, true).parse()
    }

    fn first_element(tree: &SyntaxTree) -> &Element {
        &tree.pattern.alternatives[0].elements[0]
    }

    #[test]
    fn test_literals_and_alternation() {
        let tree = parse("ab|c").unwrap();
        assert_eq!(tree.pattern.alternatives.len(), 2);
        assert_eq!(tree.pattern.alternatives[0].elements.len(), 2);
        assert_eq!(tree.pattern.alternatives[1].span, Span::new(3, 4));
    }

    #[test]
    fn test_quantifier_bounds_and_laziness() {
        let tree = parse("a{2,5}?").unwrap();
        let q = first_element(&tree).as_quantifier().unwrap();
        assert_eq!((q.min, q.max, q.greedy), (2, Some(5), false));
        assert_eq!(first_element(&tree).span, Span::new(0, 7));

        let tree = parse("x{3,}").unwrap();
        let q = first_element(&tree).as_quantifier().unwrap();
        assert_eq!((q.min, q.max), (3, None));
    }

    #[test]
    fn test_named_groups_and_backreferences() {
        let tree = parse("(?<year>\\d{4})-\\k<year>-\\1").unwrap();
        assert_eq!(tree.group_count, 1);
        assert_eq!(tree.group_names, vec![Some("year".to_string())]);
        let elements = &tree.pattern.alternatives[0].elements;
        assert!(matches!(
            &elements[2].kind,
            ElementKind::Backreference(Backreference::Name(n)) if n == "year"
        ));
        assert!(matches!(
            elements[4].kind,
            ElementKind::Backreference(Backreference::Index(1))
        ));
    }

    #[test]
    fn test_forward_reference_counts_later_groups() {
        let tree = parse("\\2(a)(b)").unwrap();
        assert!(matches!(
            first_element(&tree).kind,
            ElementKind::Backreference(Backreference::Index(2))
        ));
    }

    #[test]
    fn test_legacy_octal_without_groups() {
        let tree = parse("\\1").unwrap();
        assert_eq!(
            first_element(&tree).kind,
            ElementKind::Character { value: '\u{1}' }
        );
        assert!(parse_u("\\1").is_err());
    }

    #[test]
    fn test_character_class_members() {
        let tree = parse("[^a-z\\d_-]").unwrap();
        let ElementKind::CharacterClass(class) = &first_element(&tree).kind else {
            panic!("expected class");
        };
        assert!(class.negate);
        assert_eq!(class.members.len(), 4);
        assert_eq!(
            class.members[0].kind,
            ClassMemberKind::Range { min: 'a', max: 'z' }
        );
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(parse("([a-z]").unwrap_err().message, "Unterminated group");
        assert_eq!(parse("[a-z").unwrap_err().message, "Unterminated character class");
        assert_eq!(parse("(abc").unwrap_err().message, "Unterminated group");
        assert_eq!(parse("abc)").unwrap_err().message, "Unmatched ')'");
        assert_eq!(parse("*a").unwrap_err().message, "Nothing to repeat");
        assert_eq!(parse("a**").unwrap_err().message, "Nothing to repeat");
        assert_eq!(parse("^*").unwrap_err().message, "Nothing to repeat");
        assert_eq!(
            parse("[z-a]").unwrap_err().message,
            "Range out of order in character class"
        );
        assert_eq!(
            parse("a{3,1}").unwrap_err().message,
            "numbers out of order in {} quantifier"
        );
        assert_eq!(parse("\\").unwrap_err().message, "\\ at end of pattern");
        assert_eq!(
            parse("(?<a>x)(?<a>y)").unwrap_err().message,
            "Duplicate capture group name"
        );
        assert_eq!(
            parse("(?<a>x)\\k<b>").unwrap_err().message,
            "Invalid named capture referenced"
        );
    }

    #[test]
    fn test_lenient_braces_outside_unicode_mode() {
        assert!(parse("a{").is_ok());
        assert!(parse("}").is_ok());
        assert!(parse("]").is_ok());
        assert!(parse_u("a{").is_err());
        assert!(parse_u("]").is_err());
    }

    #[test]
    fn test_unicode_escapes() {
        let tree = parse_u("\\u{1F600}\\p{Lu}").unwrap();
        let elements = &tree.pattern.alternatives[0].elements;
        assert_eq!(elements[0].kind, ElementKind::Character { value: '😀' });
        assert!(matches!(
            &elements[1].kind,
            ElementKind::CharacterSet(CharacterSet { kind: SetKind::Property { name, .. }, negate: false })
                if name == "Lu"
        ));

        let tree = parse("\\uD83D\\uDE00").unwrap();
        assert_eq!(first_element(&tree).kind, ElementKind::Character { value: '😀' });
    }

    #[test]
    fn test_lookarounds() {
        let tree = parse("(?<=\\$)\\d+(?!px)").unwrap();
        let elements = &tree.pattern.alternatives[0].elements;
        assert!(matches!(
            &elements[0].kind,
            ElementKind::Assertion(Assertion::Lookaround(Lookaround { direction: LookDirection::Behind, negate: false, .. }))
        ));
        assert!(matches!(
            &elements[2].kind,
            ElementKind::Assertion(Assertion::Lookaround(Lookaround { direction: LookDirection::Ahead, negate: true, .. }))
        ));
        assert!(parse("(?<=a)*").is_err());
        assert!(parse("(?=a)*").is_ok());
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let tree = parse("é+x").unwrap();
        let elements = &tree.pattern.alternatives[0].elements;
        assert_eq!(elements[0].span, Span::new(0, 3));
        assert_eq!(elements[1].span, Span::new(3, 4));
    }
}
