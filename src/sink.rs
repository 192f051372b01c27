// Parse event sinks
//
// The parser reports every rule entry/exit and every accepted terminal, in derivation
// order. Sinks decide what to do with them; the parser never depends on their output.

use crate::lexer::Token;
use crate::parser::{Diagnostic, Rule};

/// Receiver of parse events. All methods default to doing nothing.
pub trait Sink {
    fn enter_rule(&mut self, _rule: Rule) {}

    fn exit_rule(&mut self, _rule: Rule) {}

    fn terminal(&mut self, _token: &Token) {}

    /// Called exactly once when the parse fails with a syntax error
    fn error(&mut self, _diagnostic: &Diagnostic) {}
}

/// Discards every event
impl Sink for () {}

impl<K: Sink + ?Sized> Sink for &mut K {
    fn enter_rule(&mut self, rule: Rule) {
        (**self).enter_rule(rule)
    }

    fn exit_rule(&mut self, rule: Rule) {
        (**self).exit_rule(rule)
    }

    fn terminal(&mut self, token: &Token) {
        (**self).terminal(token)
    }

    fn error(&mut self, diagnostic: &Diagnostic) {
        (**self).error(diagnostic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Enter(Rule),
    Exit(Rule),
    Terminal(Token),
    Error(Diagnostic),
}

/// Keeps every event in arrival order
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts of the accepted terminals, in order
    pub fn terminals(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Terminal(token) => Some(token.text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn entered(&self, rule: Rule) -> usize {
        self.events
            .iter()
            .filter(|event| **event == Event::Enter(rule))
            .count()
    }
}

impl Sink for Recorder {
    fn enter_rule(&mut self, rule: Rule) {
        self.events.push(Event::Enter(rule));
    }

    fn exit_rule(&mut self, rule: Rule) {
        self.events.push(Event::Exit(rule));
    }

    fn terminal(&mut self, token: &Token) {
        self.events.push(Event::Terminal(token.clone()));
    }

    fn error(&mut self, diagnostic: &Diagnostic) {
        self.events.push(Event::Error(diagnostic.clone()));
    }
}

/// Indented text trace of a parse, one line per event
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    output: String,
    depth: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.output.push_str("  ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }
}

impl Sink for Transcript {
    fn enter_rule(&mut self, rule: Rule) {
        self.line(&format!("BEGIN {}", rule));
        self.depth += 1;
    }

    fn exit_rule(&mut self, rule: Rule) {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("END {}", rule));
    }

    fn terminal(&mut self, token: &Token) {
        self.line(&format!("{} '{}'", token.kind, token.text));
    }

    fn error(&mut self, diagnostic: &Diagnostic) {
        self.depth = 0;
        self.line("Compilation Exception");
        self.output.push_str(&diagnostic.report());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::SymbolKind;

    #[test]
    fn test_transcript_indents_nested_rules() {
        let mut transcript = Transcript::new();
        transcript.enter_rule(Rule::Factor);
        transcript.terminal(&Token::new(SymbolKind::NumberConstant, "7", 1));
        transcript.exit_rule(Rule::Factor);

        let expected = "\
BEGIN <Factor>
  number constant '7'
END <Factor>
";
        assert_eq!(transcript.as_str(), expected);
    }

    #[test]
    fn test_transcript_error_resets_indent() {
        let mut transcript = Transcript::new();
        transcript.enter_rule(Rule::StatementPart);
        transcript.enter_rule(Rule::StatementList);
        transcript.error(&Diagnostic {
            line: 1,
            text: "end".to_string(),
            kind: SymbolKind::End,
            message: "Invalid statement input".to_string(),
            parse_path: vec![Rule::StatementList, Rule::StatementPart],
        });

        let expected = "\
BEGIN <StatementPart>
  BEGIN <StatementList>
Compilation Exception
Line 1: Unexpected token 'end' (end)
    Parse path:
        at <StatementList>
        at <StatementPart>
";
        assert_eq!(transcript.into_string(), expected);
    }

    #[test]
    fn test_recorder_through_mutable_reference() {
        let mut recorder = Recorder::new();
        {
            let mut sink: &mut Recorder = &mut recorder;
            Sink::enter_rule(&mut sink, Rule::Term);
            Sink::terminal(&mut sink, &Token::new(SymbolKind::Identifier, "x", 1));
            Sink::exit_rule(&mut sink, Rule::Term);
        }

        assert_eq!(recorder.terminals(), vec!["x"]);
        assert_eq!(recorder.entered(Rule::Term), 1);
        assert_eq!(recorder.events.last(), Some(&Event::Exit(Rule::Term)));
    }
}
