//! VM executor: runs compiled bytecode against an input string.
//!
//! Backtracking uses an explicit thread stack plus an undo log for slot
//! writes, so deep patterns cannot overflow the native stack. Only
//! lookarounds recurse, bounded by the nesting depth of the pattern. Every
//! instruction costs one step and the count restarts at each start
//! position; the step limit turns catastrophic backtracking into an error
//! instead of a hang.

use super::compiler::{ClassItem, Inst, Predicate, Program};
use super::unicode::{fold, is_line_terminator, is_space, is_word_char, upper};
use super::EngineError;

/// Options that change how instructions match.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchMode {
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
}

/// Slot values of a successful match, in char indices.
pub type Slots = Vec<Option<usize>>;

/// A pending alternative: where to resume and how much of the undo log to
/// keep.
struct Thread {
    pc: usize,
    pos: usize,
    undo_len: usize,
}

pub struct Vm<'p> {
    program: &'p Program,
    mode: MatchMode,
    chars: Vec<char>,
    steps: u64,
    step_limit: u64,
}

impl<'p> Vm<'p> {
    pub fn new(program: &'p Program, mode: MatchMode, input: &str, step_limit: u64) -> Self {
        Vm {
            program,
            mode,
            chars: input.chars().collect(),
            steps: 0,
            step_limit,
        }
    }

    pub fn char_len(&self) -> usize {
        self.chars.len()
    }

    /// Attempt a match starting exactly at `start` (char index).
    pub fn match_at(&mut self, start: usize) -> Result<Option<Slots>, EngineError> {
        self.steps = 0;
        let mut slots: Slots = vec![None; self.program.slot_count];
        slots[0] = Some(start);
        match self.run(0, start, &mut slots, None)? {
            Some(end) => {
                slots[1] = Some(end);
                slots.truncate((self.program.group_count + 1) * 2);
                Ok(Some(slots))
            }
            None => Ok(None),
        }
    }

    /// Try every start position from `from` onward (like `re.search`).
    pub fn search(&mut self, from: usize, sticky: bool) -> Result<Option<Slots>, EngineError> {
        if sticky || self.program.anchored_start {
            if self.program.anchored_start && from > 0 {
                return Ok(None);
            }
            return self.match_at(from);
        }
        for start in from..=self.chars.len() {
            if let Some(slots) = self.match_at(start)? {
                return Ok(Some(slots));
            }
        }
        Ok(None)
    }

    fn tick(&mut self) -> Result<(), EngineError> {
        self.steps += 1;
        if self.steps > self.step_limit {
            Err(EngineError::StepLimitExceeded)
        } else {
            Ok(())
        }
    }

    /// Runs from `pc` at `pos`. Returns the end position on success. When
    /// `target` is set (lookbehind), `Match` only succeeds at that position.
    /// On failure every slot write is rolled back.
    fn run(
        &mut self,
        pc: usize,
        pos: usize,
        slots: &mut [Option<usize>],
        target: Option<usize>,
    ) -> Result<Option<usize>, EngineError> {
        let mut stack: Vec<Thread> = Vec::new();
        let mut undo: Vec<(usize, Option<usize>)> = Vec::new();
        let program = self.program;
        let mut pc = pc;
        let mut pos = pos;

        loop {
            self.tick()?;
            let advanced = match &program.insts[pc] {
                Inst::Match => {
                    if target.is_none_or(|t| t == pos) {
                        return Ok(Some(pos));
                    }
                    false
                }
                Inst::Char(expected) => {
                    let ok = self.chars.get(pos).is_some_and(|&c| self.char_eq(c, *expected));
                    if ok {
                        pos += 1;
                        pc += 1;
                    }
                    ok
                }
                Inst::Set { predicate, negate } => {
                    let ok = self
                        .chars
                        .get(pos)
                        .is_some_and(|&c| self.predicate_matches(*predicate, c) != *negate);
                    if ok {
                        pos += 1;
                        pc += 1;
                    }
                    ok
                }
                Inst::Class { items, negate } => {
                    let ok = self
                        .chars
                        .get(pos)
                        .is_some_and(|&c| self.class_matches(items, c) != *negate);
                    if ok {
                        pos += 1;
                        pc += 1;
                    }
                    ok
                }
                Inst::Jump(next) => {
                    pc = *next;
                    true
                }
                Inst::Split(first, second) => {
                    stack.push(Thread {
                        pc: *second,
                        pos,
                        undo_len: undo.len(),
                    });
                    pc = *first;
                    true
                }
                Inst::Save(slot) => {
                    undo.push((*slot, slots[*slot]));
                    slots[*slot] = Some(pos);
                    pc += 1;
                    true
                }
                Inst::Clear(slot) => {
                    if slots[*slot].is_some() {
                        undo.push((*slot, slots[*slot]));
                        slots[*slot] = None;
                    }
                    pc += 1;
                    true
                }
                Inst::CheckProgress(slot) => {
                    let ok = slots[*slot] != Some(pos);
                    if ok {
                        pc += 1;
                    }
                    ok
                }
                Inst::AssertStart => {
                    let ok = pos == 0
                        || (self.mode.multiline && is_line_terminator(self.chars[pos - 1]));
                    if ok {
                        pc += 1;
                    }
                    ok
                }
                Inst::AssertEnd => {
                    let ok = pos == self.chars.len()
                        || (self.mode.multiline && is_line_terminator(self.chars[pos]));
                    if ok {
                        pc += 1;
                    }
                    ok
                }
                Inst::WordBoundary { negate } => {
                    let ok = self.is_word_boundary(pos) != *negate;
                    if ok {
                        pc += 1;
                    }
                    ok
                }
                Inst::Backref(group) => match self.backref_len(slots, *group, pos) {
                    Some(len) => {
                        pos += len;
                        pc += 1;
                        true
                    }
                    None => false,
                },
                Inst::Look {
                    behind,
                    negate,
                    resume,
                } => {
                    let (behind, negate, resume) = (*behind, *negate, *resume);
                    let mut sub_slots = slots.to_vec();
                    let matched = if behind {
                        let mut found = false;
                        for start in (0..=pos).rev() {
                            if self.run(pc + 1, start, &mut sub_slots, Some(pos))?.is_some() {
                                found = true;
                                break;
                            }
                        }
                        found
                    } else {
                        self.run(pc + 1, pos, &mut sub_slots, None)?.is_some()
                    };
                    let ok = matched != negate;
                    if ok {
                        if !negate {
                            // Captures set inside a positive lookaround stay visible.
                            for (slot, value) in sub_slots.iter().enumerate().skip(2) {
                                if slots[slot] != *value {
                                    undo.push((slot, slots[slot]));
                                    slots[slot] = *value;
                                }
                            }
                        }
                        pc = resume;
                    }
                    ok
                }
            };

            if advanced {
                continue;
            }

            // Backtrack to the most recent pending alternative.
            match stack.pop() {
                Some(thread) => {
                    while undo.len() > thread.undo_len {
                        if let Some((slot, old)) = undo.pop() {
                            slots[slot] = old;
                        }
                    }
                    pc = thread.pc;
                    pos = thread.pos;
                }
                None => {
                    while let Some((slot, old)) = undo.pop() {
                        slots[slot] = old;
                    }
                    return Ok(None);
                }
            }
        }
    }

    fn char_eq(&self, a: char, b: char) -> bool {
        a == b || (self.mode.ignore_case && fold(a) == fold(b))
    }

    fn predicate_matches(&self, predicate: Predicate, c: char) -> bool {
        match predicate {
            Predicate::Dot => self.mode.dot_all || !is_line_terminator(c),
            Predicate::Digit => c.is_ascii_digit(),
            Predicate::Word => is_word_char(c),
            Predicate::Space => is_space(c),
            Predicate::Property(property) => property.matches(c),
        }
    }

    fn class_matches(&self, items: &[ClassItem], c: char) -> bool {
        let candidates = if self.mode.ignore_case {
            [c, fold(c), upper(c)]
        } else {
            [c, c, c]
        };
        items.iter().any(|item| {
            candidates.iter().any(|&ch| match item {
                ClassItem::Char(expected) => ch == *expected,
                ClassItem::Range(lo, hi) => *lo <= ch && ch <= *hi,
                ClassItem::Set { predicate, negate } => {
                    self.predicate_matches(*predicate, ch) != *negate
                }
            })
        })
    }

    fn is_word_boundary(&self, pos: usize) -> bool {
        let before = pos > 0 && is_word_char(self.chars[pos - 1]);
        let after = self.chars.get(pos).is_some_and(|&c| is_word_char(c));
        before != after
    }

    /// Length consumed by a backreference at `pos`, or `None` on mismatch.
    /// A group that has not participated matches the empty string.
    fn backref_len(&self, slots: &[Option<usize>], group: usize, pos: usize) -> Option<usize> {
        let (Some(start), Some(end)) = (slots[group * 2], slots[group * 2 + 1]) else {
            return Some(0);
        };
        if end < start {
            return Some(0);
        }
        let len = end - start;
        if pos + len > self.chars.len() {
            return None;
        }
        let same = (0..len).all(|i| self.char_eq(self.chars[start + i], self.chars[pos + i]));
        same.then_some(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compiler::compile;
    use crate::parser::syntax::Parser;

    fn search(source: &str, mode: MatchMode, input: &str) -> Result<Option<Slots>, EngineError> {
        let tree = Parser::new(source, false).parse().unwrap();
        let program = compile(source, &tree.pattern, &tree.group_names, mode.multiline).unwrap();
        Vm::new(&program, mode, input, 1_000_000).search(0, false)
    }

    fn span(source: &str, input: &str) -> Option<(usize, usize)> {
        search(source, MatchMode::default(), input)
            .unwrap()
            .map(|s| (s[0].unwrap(), s[1].unwrap()))
    }

    #[test]
    fn test_literal_search() {
        assert_eq!(span("cat", "the cat sat"), Some((4, 7)));
        assert_eq!(span("dog", "the cat sat"), None);
    }

    #[test]
    fn test_greedy_and_lazy() {
        assert_eq!(span("a+", "caaat"), Some((1, 4)));
        assert_eq!(span("a+?", "caaat"), Some((1, 2)));
        assert_eq!(span("a{2,3}", "aaaa"), Some((0, 3)));
    }

    #[test]
    fn test_empty_loop_terminates() {
        assert_eq!(span("(a*)*b", "aab"), Some((0, 3)));
        assert_eq!(span("(a|)*", "aa"), Some((0, 2)));
    }

    #[test]
    fn test_captures_and_backreferences() {
        let slots = search("(\\w)\\1", MatchMode::default(), "abccd").unwrap().unwrap();
        assert_eq!((slots[0], slots[1]), (Some(2), Some(4)));
        assert_eq!((slots[2], slots[3]), (Some(2), Some(3)));
        assert_eq!(span("\\1(a)", "a"), Some((0, 1)));
    }

    #[test]
    fn test_repetition_resets_inner_captures() {
        let slots = search("(?:(a)|b)+", MatchMode::default(), "ab").unwrap().unwrap();
        assert_eq!((slots[0], slots[1]), (Some(0), Some(2)));
        assert_eq!((slots[2], slots[3]), (None, None));

        let slots = search("(?:(a)|(b))+", MatchMode::default(), "ba").unwrap().unwrap();
        assert_eq!((slots[2], slots[3]), (Some(1), Some(2)));
        assert_eq!((slots[4], slots[5]), (None, None));

        // a backreference inside the loop sees only the current iteration
        assert_eq!(span("(?:(a)|b\\1)+", "abx"), Some((0, 2)));
    }

    #[test]
    fn test_lookarounds() {
        assert_eq!(span("\\d+(?=px)", "12em 34px"), Some((5, 7)));
        assert_eq!(span("(?<=\\$)\\d+", "cost: $42"), Some((7, 9)));
        assert_eq!(span("(?<!\\$)\\b\\d+", "$42 17"), Some((4, 6)));
        assert_eq!(span("foo(?!bar)", "foobar foobaz"), Some((7, 10)));
    }

    #[test]
    fn test_modes() {
        let ci = MatchMode {
            ignore_case: true,
            ..MatchMode::default()
        };
        assert!(search("HELLO", ci, "say hello").unwrap().is_some());
        assert!(search("[A-Z]+", ci, "abc").unwrap().is_some());

        let ml = MatchMode {
            multiline: true,
            ..MatchMode::default()
        };
        assert!(search("^b$", ml, "a\nb\nc").unwrap().is_some());
        assert!(search("^b$", MatchMode::default(), "a\nb\nc").unwrap().is_none());

        assert!(search("a.b", MatchMode::default(), "a\nb").unwrap().is_none());
        let dot_all = MatchMode {
            dot_all: true,
            ..MatchMode::default()
        };
        assert!(search("a.b", dot_all, "a\nb").unwrap().is_some());
    }

    #[test]
    fn test_step_limit_stops_catastrophic_backtracking() {
        let tree = Parser::new("(a+)+$", false).parse().unwrap();
        let program = compile("(a+)+$", &tree.pattern, &tree.group_names, false).unwrap();
        let input = format!("{}!", "a".repeat(28));
        let result = Vm::new(&program, MatchMode::default(), &input, 50_000).search(0, false);
        assert_eq!(result, Err(EngineError::StepLimitExceeded));
    }

    fn search_limited(source: &str, input: &str, limit: u64) -> Result<Option<Slots>, EngineError> {
        let tree = Parser::new(source, false).parse().unwrap();
        let program = compile(source, &tree.pattern, &tree.group_names, false).unwrap();
        Vm::new(&program, MatchMode::default(), input, limit).search(0, false)
    }

    #[test]
    fn test_step_budget_is_per_start_position() {
        let input = "a".repeat(2_000);
        assert_eq!(search_limited("[a-z]+@", &input, 100_000), Ok(None));

        let input = format!("{}cat", "x".repeat(100_000));
        let slots = search_limited("cat", &input, 100).unwrap().unwrap();
        assert_eq!((slots[0], slots[1]), (Some(100_000), Some(100_003)));
    }
}
