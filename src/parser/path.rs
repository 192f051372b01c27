use super::grammar::Rule;

/// Stack of the rules currently under derivation, outermost first.
///
/// A rule is pushed when its routine starts and popped only when it completes. A failing
/// routine leaves itself and all its ancestors in place, so at error time the stack is the
/// exact chain of open rules.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsePath {
    rules: Vec<Rule>,
}

impl ParsePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Remove `rule`, which must be the innermost active rule
    pub(super) fn pop(&mut self, rule: Rule) {
        let top = self.rules.pop();
        debug_assert_eq!(top, Some(rule), "parse path popped out of order");
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Deepest active rule
    pub fn innermost(&self) -> Option<Rule> {
        self.rules.last().copied()
    }

    /// Active rules, deepest first
    pub fn deepest_first(&self) -> impl Iterator<Item = Rule> + '_ {
        self.rules.iter().rev().copied()
    }

    pub fn outermost_first(&self) -> &[Rule] {
        &self.rules
    }
}
