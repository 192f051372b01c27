use std::fmt;

use bitflags::bitflags;

use crate::lexer::SymbolKind;

/// Nonterminals of the grammar, one parser routine each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    StatementPart,
    StatementList,
    Statement,
    AssignmentStatement,
    IfStatement,
    WhileStatement,
    ProcedureStatement,
    /// `do <StatementList> until <Condition>`, selected by `do`
    UntilStatement,
    ForStatement,
    ArgumentList,
    Condition,
    ConditionalOperator,
    Expression,
    Term,
    Factor,
}

impl Rule {
    pub const ALL: [Rule; 15] = [
        Rule::StatementPart,
        Rule::StatementList,
        Rule::Statement,
        Rule::AssignmentStatement,
        Rule::IfStatement,
        Rule::WhileStatement,
        Rule::ProcedureStatement,
        Rule::UntilStatement,
        Rule::ForStatement,
        Rule::ArgumentList,
        Rule::Condition,
        Rule::ConditionalOperator,
        Rule::Expression,
        Rule::Term,
        Rule::Factor,
    ];

    /// Name as it appears in parse paths and traces
    pub fn name(self) -> &'static str {
        match self {
            Rule::StatementPart => "<StatementPart>",
            Rule::StatementList => "<StatementList>",
            Rule::Statement => "<Statement>",
            Rule::AssignmentStatement => "<AssignmentStatement>",
            Rule::IfStatement => "<IfStatement>",
            Rule::WhileStatement => "<WhileStatement>",
            Rule::ProcedureStatement => "<Procedure Statement>",
            Rule::UntilStatement => "<UntilStatement>",
            Rule::ForStatement => "<ForStatement>",
            Rule::ArgumentList => "<ArgumentList>",
            Rule::Condition => "<Conditional Statement>",
            Rule::ConditionalOperator => "<Conditional Operator>",
            Rule::Expression => "<Expression>",
            Rule::Term => "<Term>",
            Rule::Factor => "<Factor>",
        }
    }

    /// Symbol kinds that can start a derivation of this rule
    pub fn first_set(self) -> SymbolSet {
        match self {
            Rule::StatementPart => SymbolSet::BEGIN,
            Rule::StatementList | Rule::Statement => Rule::Statement
                .alternatives()
                .into_iter()
                .fold(SymbolSet::empty(), |acc, set| acc | set),
            Rule::AssignmentStatement | Rule::ArgumentList | Rule::Condition => {
                SymbolSet::IDENTIFIER
            }
            Rule::IfStatement => SymbolSet::IF,
            Rule::WhileStatement => SymbolSet::WHILE,
            Rule::ProcedureStatement => SymbolSet::CALL,
            Rule::UntilStatement => SymbolSet::DO,
            Rule::ForStatement => SymbolSet::FOR,
            Rule::ConditionalOperator => SymbolSet::CONDITIONAL_OPERATORS,
            Rule::Expression | Rule::Term | Rule::Factor => {
                SymbolSet::IDENTIFIER | SymbolSet::NUMBER_CONSTANT | SymbolSet::LPAREN
            }
        }
    }

    /// Lookahead sets of the alternatives the rule chooses between.
    ///
    /// Rules with a single production (or whose choice is a loop continuation) have
    /// none. Inside one rule the sets must be pairwise disjoint.
    pub fn alternatives(self) -> Vec<SymbolSet> {
        match self {
            Rule::Statement => vec![
                Rule::AssignmentStatement.first_set(),
                Rule::IfStatement.first_set(),
                Rule::WhileStatement.first_set(),
                Rule::ProcedureStatement.first_set(),
                Rule::UntilStatement.first_set(),
                Rule::ForStatement.first_set(),
            ],
            // Right-hand side after ':='
            Rule::AssignmentStatement => vec![
                SymbolSet::STRING_CONSTANT,
                Rule::Expression.first_set(),
            ],
            // Optional else branch versus the closing 'end if'
            Rule::IfStatement => vec![SymbolSet::ELSE, SymbolSet::END],
            // Right-hand operand of the comparison
            Rule::Condition => vec![
                SymbolSet::IDENTIFIER,
                SymbolSet::NUMBER_CONSTANT,
                SymbolSet::STRING_CONSTANT,
            ],
            Rule::ConditionalOperator => SymbolSet::CONDITIONAL_OPERATORS
                .kinds()
                .map(SymbolSet::from)
                .collect(),
            Rule::Factor => vec![
                SymbolSet::IDENTIFIER,
                SymbolSet::NUMBER_CONSTANT,
                SymbolSet::LPAREN,
            ],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

const fn bit(kind: SymbolKind) -> u64 {
    1 << kind as u8
}

bitflags! {
    /// Set of terminal kinds, one bit per [`SymbolKind`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SymbolSet: u64 {
        const BEGIN = bit(SymbolKind::Begin);
        const END = bit(SymbolKind::End);
        const IF = bit(SymbolKind::If);
        const THEN = bit(SymbolKind::Then);
        const ELSE = bit(SymbolKind::Else);
        const WHILE = bit(SymbolKind::While);
        const LOOP = bit(SymbolKind::Loop);
        const CALL = bit(SymbolKind::Call);
        const DO = bit(SymbolKind::Do);
        const UNTIL = bit(SymbolKind::Until);
        const FOR = bit(SymbolKind::For);
        const IDENTIFIER = bit(SymbolKind::Identifier);
        const NUMBER_CONSTANT = bit(SymbolKind::NumberConstant);
        const STRING_CONSTANT = bit(SymbolKind::StringConstant);
        const SEMICOLON = bit(SymbolKind::Semicolon);
        const COMMA = bit(SymbolKind::Comma);
        const LPAREN = bit(SymbolKind::LParen);
        const RPAREN = bit(SymbolKind::RParen);
        const BECOMES = bit(SymbolKind::Becomes);
        const PLUS = bit(SymbolKind::Plus);
        const MINUS = bit(SymbolKind::Minus);
        const TIMES = bit(SymbolKind::Times);
        const DIVIDE = bit(SymbolKind::Divide);
        const MODULUS = bit(SymbolKind::Modulus);
        const GREATER_THAN = bit(SymbolKind::GreaterThan);
        const GREATER_EQUAL = bit(SymbolKind::GreaterEqual);
        const EQUAL = bit(SymbolKind::Equal);
        const NOT_EQUAL = bit(SymbolKind::NotEqual);
        const LESS_THAN = bit(SymbolKind::LessThan);
        const LESS_EQUAL = bit(SymbolKind::LessEqual);
        const EOF = bit(SymbolKind::Eof);

        const ADDING_OPERATORS = Self::PLUS.bits() | Self::MINUS.bits();
        const MULTIPLYING_OPERATORS = Self::TIMES.bits() | Self::DIVIDE.bits() | Self::MODULUS.bits();
        const CONDITIONAL_OPERATORS = Self::GREATER_THAN.bits()
            | Self::GREATER_EQUAL.bits()
            | Self::EQUAL.bits()
            | Self::NOT_EQUAL.bits()
            | Self::LESS_THAN.bits()
            | Self::LESS_EQUAL.bits();
    }
}

impl SymbolSet {
    pub fn has(self, kind: SymbolKind) -> bool {
        self.contains(SymbolSet::from(kind))
    }

    /// Member kinds in alphabet order
    pub fn kinds(self) -> impl Iterator<Item = SymbolKind> {
        SymbolKind::ALL.into_iter().filter(move |kind| self.has(*kind))
    }
}

impl From<SymbolKind> for SymbolSet {
    fn from(kind: SymbolKind) -> Self {
        SymbolSet::from_bits_retain(bit(kind))
    }
}
