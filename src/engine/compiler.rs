//! Compiler: converts the pattern tree into bytecode for the VM.
//!
//! Besides code generation this is where semantic checks live (unknown
//! Unicode properties, program size), so a pattern that compiles here is a
//! pattern the engine can run.

use super::unicode::Property;
use super::EngineError;
use crate::core::ast::*;
use crate::core::walk::NodeRef;

/// Upper bound on emitted instructions; counted repetition is unrolled.
pub const MAX_PROGRAM_LEN: usize = 200_000;

/// Character predicate behind `.`, `\d`, `\w`, `\s` and `\p{..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Dot,
    Digit,
    Word,
    Space,
    Property(Property),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassItem {
    Char(char),
    Range(char, char),
    Set { predicate: Predicate, negate: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    Char(char),
    Set { predicate: Predicate, negate: bool },
    Class { items: Vec<ClassItem>, negate: bool },
    Match,
    Jump(usize),
    /// Try `.0` first, fall back to `.1`.
    Split(usize, usize),
    /// Record the current position into a slot.
    Save(usize),
    AssertStart,
    AssertEnd,
    WordBoundary { negate: bool },
    Backref(usize),
    /// Lookaround whose sub-program starts at the next instruction and ends
    /// with a `Match`; execution resumes at `resume`.
    Look {
        behind: bool,
        negate: bool,
        resume: usize,
    },
    /// Fails when a loop iteration consumed nothing since the paired `Save`.
    CheckProgress(usize),
    /// Unset a capture slot; emitted at the start of each repetition.
    Clear(usize),
}

/// Compiled program.
#[derive(Debug, Clone)]
pub struct Program {
    pub insts: Vec<Inst>,
    pub group_count: usize,
    /// Capture slots (two per group, group 0 included) plus loop registers.
    pub slot_count: usize,
    /// Whether every match has to start at offset 0.
    pub anchored_start: bool,
}

struct Compiler<'a> {
    source: &'a str,
    insts: Vec<Inst>,
    group_names: &'a [Option<String>],
    next_register: usize,
}

/// Compile a parsed pattern into a bytecode program.
pub fn compile(
    source: &str,
    pattern: &Pattern,
    group_names: &[Option<String>],
    multiline: bool,
) -> Result<Program, EngineError> {
    let group_count = group_names.len();
    let mut compiler = Compiler {
        source,
        insts: Vec::new(),
        group_names,
        next_register: (group_count + 1) * 2,
    };
    compiler.emit_alternatives(&pattern.alternatives)?;
    compiler.push(Inst::Match)?;

    let anchored_start = !multiline
        && pattern
            .alternatives
            .iter()
            .all(|alt| alt.elements.first().is_some_and(Element::is_start_anchor));

    Ok(Program {
        insts: compiler.insts,
        group_count,
        slot_count: compiler.next_register,
        anchored_start,
    })
}

impl<'a> Compiler<'a> {
    fn push(&mut self, inst: Inst) -> Result<usize, EngineError> {
        if self.insts.len() >= MAX_PROGRAM_LEN {
            return Err(EngineError::TooLarge);
        }
        self.insts.push(inst);
        Ok(self.insts.len() - 1)
    }

    fn char_offset(&self, span: Span) -> usize {
        self.source
            .get(..span.start)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0)
    }

    fn emit_alternatives(&mut self, alternatives: &[Alternative]) -> Result<(), EngineError> {
        // a|b|c compiles to:
        //   split L1, L2
        //   L1: <a> jump END
        //   L2: split L3, L4
        //   L3: <b> jump END
        //   L4: <c>
        //   END:
        let Some((last, rest)) = alternatives.split_last() else {
            return Ok(());
        };
        let mut fixups = Vec::with_capacity(rest.len());
        for alternative in rest {
            let split_pc = self.push(Inst::Split(0, 0))?;
            self.emit_sequence(&alternative.elements)?;
            fixups.push(self.push(Inst::Jump(0))?);
            let next = self.insts.len();
            self.insts[split_pc] = Inst::Split(split_pc + 1, next);
        }
        self.emit_sequence(&last.elements)?;
        let end = self.insts.len();
        for pc in fixups {
            self.insts[pc] = Inst::Jump(end);
        }
        Ok(())
    }

    fn emit_sequence(&mut self, elements: &[Element]) -> Result<(), EngineError> {
        elements.iter().try_for_each(|e| self.emit(e))
    }

    fn emit(&mut self, element: &Element) -> Result<(), EngineError> {
        match &element.kind {
            ElementKind::Character { value } => {
                self.push(Inst::Char(*value))?;
            }
            ElementKind::CharacterSet(set) => {
                let predicate = self.predicate(set, element.span)?;
                self.push(Inst::Set {
                    predicate,
                    negate: set.negate,
                })?;
            }
            ElementKind::CharacterClass(class) => {
                let items = class
                    .members
                    .iter()
                    .map(|member| self.class_item(member))
                    .collect::<Result<Vec<_>, _>>()?;
                self.push(Inst::Class {
                    items,
                    negate: class.negate,
                })?;
            }
            ElementKind::Group(group) => match &group.capture {
                Some(capture) => {
                    let slot = capture.index as usize * 2;
                    self.push(Inst::Save(slot))?;
                    self.emit_alternatives(&group.alternatives)?;
                    self.push(Inst::Save(slot + 1))?;
                }
                None => self.emit_alternatives(&group.alternatives)?,
            },
            ElementKind::Quantifier(q) => self.emit_quantifier(q)?,
            ElementKind::Assertion(assertion) => self.emit_assertion(assertion)?,
            ElementKind::Backreference(reference) => {
                let index = match reference {
                    Backreference::Index(i) => *i as usize,
                    Backreference::Name(name) => self
                        .group_names
                        .iter()
                        .position(|n| n.as_deref() == Some(name.as_str()))
                        .map(|p| p + 1)
                        .ok_or_else(|| EngineError::Syntax {
                            message: "Invalid named capture referenced".to_string(),
                            offset: Some(self.char_offset(element.span)),
                        })?,
                };
                self.push(Inst::Backref(index))?;
            }
        }
        Ok(())
    }

    fn emit_assertion(&mut self, assertion: &Assertion) -> Result<(), EngineError> {
        match assertion {
            Assertion::Start => {
                self.push(Inst::AssertStart)?;
            }
            Assertion::End => {
                self.push(Inst::AssertEnd)?;
            }
            Assertion::WordBoundary => {
                self.push(Inst::WordBoundary { negate: false })?;
            }
            Assertion::NonWordBoundary => {
                self.push(Inst::WordBoundary { negate: true })?;
            }
            Assertion::Lookaround(look) => {
                let look_pc = self.push(Inst::Jump(0))?;
                self.emit_alternatives(&look.alternatives)?;
                self.push(Inst::Match)?;
                self.insts[look_pc] = Inst::Look {
                    behind: look.direction == LookDirection::Behind,
                    negate: look.negate,
                    resume: self.insts.len(),
                };
            }
        }
        Ok(())
    }

    fn emit_quantifier(&mut self, q: &Quantifier) -> Result<(), EngineError> {
        if q.max == Some(0) {
            return Ok(());
        }
        let captures = capture_slots(&q.element);
        for _ in 0..q.min {
            self.emit_iteration(&q.element, &captures)?;
        }
        match q.max {
            None => self.emit_star(&q.element, &captures, q.greedy),
            Some(max) => {
                for _ in q.min..max {
                    self.emit_optional(&q.element, &captures, q.greedy)?;
                }
                Ok(())
            }
        }
    }

    /// One repetition: captures inside the element start out unset.
    fn emit_iteration(&mut self, element: &Element, captures: &[usize]) -> Result<(), EngineError> {
        for &slot in captures {
            self.push(Inst::Clear(slot))?;
        }
        self.emit(element)
    }

    fn emit_star(
        &mut self,
        element: &Element,
        captures: &[usize],
        greedy: bool,
    ) -> Result<(), EngineError> {
        // L1: split L2, L3  (greedy: prefer L2)
        // L2: save r; <element>; check r; jump L1
        // L3:
        let register = self.next_register;
        self.next_register += 1;
        let l1 = self.push(Inst::Split(0, 0))?;
        let l2 = self.push(Inst::Save(register))?;
        self.emit_iteration(element, captures)?;
        self.push(Inst::CheckProgress(register))?;
        self.push(Inst::Jump(l1))?;
        let l3 = self.insts.len();
        self.insts[l1] = if greedy {
            Inst::Split(l2, l3)
        } else {
            Inst::Split(l3, l2)
        };
        Ok(())
    }

    fn emit_optional(
        &mut self,
        element: &Element,
        captures: &[usize],
        greedy: bool,
    ) -> Result<(), EngineError> {
        let split_pc = self.push(Inst::Split(0, 0))?;
        self.emit_iteration(element, captures)?;
        let after = self.insts.len();
        self.insts[split_pc] = if greedy {
            Inst::Split(split_pc + 1, after)
        } else {
            Inst::Split(after, split_pc + 1)
        };
        Ok(())
    }

    fn predicate(&self, set: &CharacterSet, span: Span) -> Result<Predicate, EngineError> {
        let predicate = match &set.kind {
            SetKind::Dot => Predicate::Dot,
            SetKind::Digit => Predicate::Digit,
            SetKind::Word => Predicate::Word,
            SetKind::Space => Predicate::Space,
            SetKind::Property { name, value } => Property::lookup(name, value.as_deref())
                .map(Predicate::Property)
                .ok_or_else(|| EngineError::Syntax {
                    message: "Invalid property name".to_string(),
                    offset: Some(self.char_offset(span)),
                })?,
        };
        Ok(predicate)
    }

    fn class_item(&self, member: &ClassMember) -> Result<ClassItem, EngineError> {
        let item = match &member.kind {
            ClassMemberKind::Character { value } => ClassItem::Char(*value),
            ClassMemberKind::Range { min, max } => ClassItem::Range(*min, *max),
            ClassMemberKind::Set(set) => ClassItem::Set {
                predicate: self.predicate(set, member.span)?,
                negate: set.negate,
            },
        };
        Ok(item)
    }
}

/// Slots of every capture group inside `element`.
fn capture_slots(element: &Element) -> Vec<usize> {
    NodeRef::Element(element)
        .walk()
        .filter_map(|node| match &node.as_element()?.kind {
            ElementKind::Group(Group {
                capture: Some(capture),
                ..
            }) => Some(capture.index as usize),
            _ => None,
        })
        .flat_map(|index| [index * 2, index * 2 + 1])
        .collect()
}
