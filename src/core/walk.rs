//! Depth-first, pre-order traversal over the pattern tree.
//!
//! Every analysis pass goes through [`Walk`] instead of hand-rolling its own
//! recursion. The tree owns its children, so there are no parent links to
//! skip and no shared nodes to revisit; each call starts a fresh traversal.

use super::ast::{
    Alternative, Assertion, ClassMember, Element, ElementKind, Pattern, Span,
};

/// Borrowed view of any node in the tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Pattern(&'a Pattern),
    Alternative(&'a Alternative),
    Element(&'a Element),
    ClassMember(&'a ClassMember),
}

impl<'a> NodeRef<'a> {
    pub fn span(&self) -> Span {
        match self {
            NodeRef::Pattern(p) => p.span,
            NodeRef::Alternative(a) => a.span,
            NodeRef::Element(e) => e.span,
            NodeRef::ClassMember(m) => m.span,
        }
    }

    pub fn as_element(&self) -> Option<&'a Element> {
        match self {
            NodeRef::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Alternatives held by a container node (pattern, group, lookaround).
    pub fn alternatives(&self) -> Option<&'a [Alternative]> {
        match self {
            NodeRef::Pattern(p) => Some(&p.alternatives),
            NodeRef::Element(e) => match &e.kind {
                ElementKind::Group(g) => Some(&g.alternatives),
                ElementKind::Assertion(Assertion::Lookaround(l)) => Some(&l.alternatives),
                _ => None,
            },
            _ => None,
        }
    }

    /// True for containers with more than one branch.
    pub fn is_alternation(&self) -> bool {
        self.alternatives().is_some_and(|alts| alts.len() > 1)
    }

    /// Pushes children in reverse so they pop in source order.
    fn push_children(&self, stack: &mut Vec<NodeRef<'a>>) {
        match self {
            NodeRef::Pattern(p) => {
                stack.extend(p.alternatives.iter().rev().map(NodeRef::Alternative));
            }
            NodeRef::Alternative(a) => {
                stack.extend(a.elements.iter().rev().map(NodeRef::Element));
            }
            NodeRef::Element(e) => match &e.kind {
                ElementKind::Group(g) => {
                    stack.extend(g.alternatives.iter().rev().map(NodeRef::Alternative));
                }
                ElementKind::Assertion(Assertion::Lookaround(l)) => {
                    stack.extend(l.alternatives.iter().rev().map(NodeRef::Alternative));
                }
                ElementKind::Quantifier(q) => stack.push(NodeRef::Element(&q.element)),
                ElementKind::CharacterClass(c) => {
                    stack.extend(c.members.iter().rev().map(NodeRef::ClassMember));
                }
                ElementKind::Character { .. }
                | ElementKind::CharacterSet(_)
                | ElementKind::Assertion(_)
                | ElementKind::Backreference(_) => {}
            },
            NodeRef::ClassMember(_) => {}
        }
    }

    /// Pre-order iterator over this node and everything below it.
    pub fn walk(self) -> Walk<'a> {
        Walk { stack: vec![self] }
    }

    /// Pre-order iterator over everything strictly below this node.
    pub fn descendants(self) -> Walk<'a> {
        let mut stack = Vec::new();
        self.push_children(&mut stack);
        Walk { stack }
    }
}

/// Explicit-stack pre-order iterator.
pub struct Walk<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        node.push_children(&mut self.stack);
        Some(node)
    }
}

/// Applies `visit` to every node of the pattern, root included.
pub fn walk<'a>(pattern: &'a Pattern, mut visit: impl FnMut(NodeRef<'a>)) {
    for node in NodeRef::Pattern(pattern).walk() {
        visit(node);
    }
}

/// All elements of the pattern in pre-order.
pub fn elements(pattern: &Pattern) -> impl Iterator<Item = &Element> {
    NodeRef::Pattern(pattern).walk().filter_map(|n| n.as_element())
}
