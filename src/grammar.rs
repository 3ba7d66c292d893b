//! The CTL symbol table.
//!
//! | symbols         | arity | binding power | associativity |
//! |-----------------|-------|---------------|---------------|
//! | `&`, `\|`       | 2     | 30            | left          |
//! | `->`            | 2     | 20            | right         |
//! | `U`, `R`, `W`   | 2     | 10            | right         |
//! | `!`, `F`, `G`, `X`, `E`, `A` | 1 | prefix, next primary only | |
//! | `(` ... `)`     | group | 0             |               |
//!
//! Hooks:
//!
//! - a quantifier (`E`, `A`) must be applied directly to an LTL path operator
//!   (`F G X U R W`); the pair is fused into one node (`E` + `X` becomes `EX`) that adopts the
//!   path operator's operands;
//! - no other operator may have a bare LTL path operator as an operand, and neither may the
//!   root of the tree;
//! - `!!x` is collapsed to `x`;
//! - parentheses are dropped.

use std::fmt;

use crate::error::{Error, Result};
use crate::pratt::{Grammar, ParseTree, Symbol};
use crate::token::{Token, TokenKind};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Quantifier {
    Exists,
    Forall,
}

impl Quantifier {
    pub fn letter(self) -> char {
        match self {
            Quantifier::Exists => 'E',
            Quantifier::Forall => 'A',
        }
    }
}

/// LTL path operators. Only meaningful under a [`Quantifier`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PathOperator {
    Finally,
    Globally,
    Next,
    Until,
    Release,
    WeakUntil,
}

impl PathOperator {
    pub fn letter(self) -> char {
        match self {
            PathOperator::Finally => 'F',
            PathOperator::Globally => 'G',
            PathOperator::Next => 'X',
            PathOperator::Until => 'U',
            PathOperator::Release => 'R',
            PathOperator::WeakUntil => 'W',
        }
    }

    pub fn arity(self) -> usize {
        match self {
            PathOperator::Finally | PathOperator::Globally | PathOperator::Next => 1,
            PathOperator::Until | PathOperator::Release | PathOperator::WeakUntil => 2,
        }
    }
}

/// Symbol kinds of the CTL grammar.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CtlSymbol {
    Atom,
    Not,
    And,
    Or,
    Implies,
    Path(PathOperator),
    Quantifier(Quantifier),
    /// Quantifier fused with its path operator, e.g. `EX`.
    Quantified(Quantifier, PathOperator),
    OpenParen,
    CloseParen,
}

impl CtlSymbol {
    pub fn is_path_operator(self) -> bool {
        matches!(self, CtlSymbol::Path(_))
    }
}

impl fmt::Display for CtlSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CtlSymbol::Atom => write!(f, "atom"),
            CtlSymbol::Not => write!(f, "!"),
            CtlSymbol::And => write!(f, "&"),
            CtlSymbol::Or => write!(f, "|"),
            CtlSymbol::Implies => write!(f, "->"),
            CtlSymbol::Path(op) => write!(f, "{}", op.letter()),
            CtlSymbol::Quantifier(q) => write!(f, "{}", q.letter()),
            CtlSymbol::Quantified(q, op) => write!(f, "{}{}", q.letter(), op.letter()),
            CtlSymbol::OpenParen => write!(f, "("),
            CtlSymbol::CloseParen => write!(f, ")"),
        }
    }
}

pub const BP_PATH_BINARY: u32 = 10;
pub const BP_IMPLIES: u32 = 20;
pub const BP_AND_OR: u32 = 30;

/// The CTL grammar. Immutable; the table is a `match`, so the value is free to construct.
#[derive(Debug, Default, Copy, Clone)]
pub struct CtlGrammar;

impl CtlGrammar {
    pub fn new() -> Self {
        CtlGrammar
    }

    fn no_bare_path_operator(node: &ParseTree<CtlSymbol>) -> Result<(), String> {
        match node.subtrees.iter().find(|t| t.kind.is_path_operator()) {
            Some(t) => Err(format!("No matching CTL operator for LTL operator '{}'.", t.value)),
            None => Ok(()),
        }
    }

    fn fuse(quantifier: Quantifier, mut node: ParseTree<CtlSymbol>) -> ParseTree<CtlSymbol> {
        // `verify` guarantees exactly one child, and that it is a path operator.
        let Some(path) = node.subtrees.pop() else {
            return node;
        };
        let CtlSymbol::Path(op) = path.kind else {
            node.subtrees.push(path);
            return node;
        };
        let span = match (node.span, path.span) {
            (Some(a), Some(b)) => Some(a.join(b)),
            (a, b) => a.or(b),
        };
        ParseTree {
            kind: CtlSymbol::Quantified(quantifier, op),
            value: format!("{}{}", node.value, path.value),
            span,
            subtrees: path.subtrees,
        }
    }
}

impl Grammar for CtlGrammar {
    type Kind = CtlSymbol;

    fn symbol(&self, token: &Token) -> Result<Symbol<CtlSymbol>> {
        if token.kind == TokenKind::Atom {
            return Ok(Symbol::atom(CtlSymbol::Atom));
        }
        let symbol = match token.text.as_str() {
            "&" => Symbol::infix(CtlSymbol::And, BP_AND_OR),
            "|" => Symbol::infix(CtlSymbol::Or, BP_AND_OR),
            "->" => Symbol::infix_right(CtlSymbol::Implies, BP_IMPLIES),
            "U" => Symbol::infix_right(CtlSymbol::Path(PathOperator::Until), BP_PATH_BINARY),
            "R" => Symbol::infix_right(CtlSymbol::Path(PathOperator::Release), BP_PATH_BINARY),
            "W" => Symbol::infix_right(CtlSymbol::Path(PathOperator::WeakUntil), BP_PATH_BINARY),
            "!" => Symbol::prefix(CtlSymbol::Not),
            "F" => Symbol::prefix(CtlSymbol::Path(PathOperator::Finally)),
            "G" => Symbol::prefix(CtlSymbol::Path(PathOperator::Globally)),
            "X" => Symbol::prefix(CtlSymbol::Path(PathOperator::Next)),
            "E" => Symbol::prefix(CtlSymbol::Quantifier(Quantifier::Exists)),
            "A" => Symbol::prefix(CtlSymbol::Quantifier(Quantifier::Forall)),
            "(" => Symbol::group(CtlSymbol::OpenParen, ")"),
            ")" => Symbol::closing(CtlSymbol::CloseParen),
            other => return Err(Error::syntax(format!("Unknown operator '{}'.", other))),
        };
        Ok(symbol)
    }

    fn verify(&self, node: &ParseTree<CtlSymbol>) -> Result<(), String> {
        match node.kind {
            CtlSymbol::Quantifier(_) => match node.subtrees.first() {
                Some(child) if child.kind.is_path_operator() => Ok(()),
                Some(child) => Err(format!("Expected an LTL operator but found '{}'.", child.value)),
                None => Err("Expected an LTL operator but found end of input.".to_string()),
            },
            CtlSymbol::Not | CtlSymbol::And | CtlSymbol::Or | CtlSymbol::Implies | CtlSymbol::Path(_) => {
                Self::no_bare_path_operator(node)
            }
            _ => Ok(()),
        }
    }

    fn transform(&self, mut node: ParseTree<CtlSymbol>) -> ParseTree<CtlSymbol> {
        match node.kind {
            CtlSymbol::Quantifier(q) => Self::fuse(q, node),
            CtlSymbol::Not if node.subtrees.first().is_some_and(|t| t.kind == CtlSymbol::Not) => {
                let mut inner = node.subtrees.remove(0);
                if inner.subtrees.is_empty() {
                    return inner;
                }
                inner.subtrees.remove(0)
            }
            CtlSymbol::OpenParen if !node.subtrees.is_empty() => node.subtrees.remove(0),
            _ => node,
        }
    }

    fn verify_root(&self, root: &ParseTree<CtlSymbol>) -> Result<(), String> {
        if root.kind.is_path_operator() {
            return Err(format!("No matching CTL operator for LTL operator '{}'.", root.value));
        }
        Ok(())
    }
}
