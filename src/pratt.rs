//! Table-driven operator-precedence (Pratt) parser.
//!
//! The engine knows nothing about CTL. A [`Grammar`] maps every token to a [`Symbol`]
//! (binding power, arity, role flags) and supplies `verify`/`transform` hooks which are run on
//! every completed node. The CTL instantiation lives in [`crate::grammar`].
//!
//! # Algorithm
//!
//! `parse_expression(rbp)` reads a primary expression (atom, group, or prefix operator applied
//! to its operand) and then keeps absorbing infix operators whose left binding power exceeds
//! `rbp`. A right-associative operator is also absorbed when its binding power *equals* a
//! nonzero `rbp`. The right operand of an infix operator is parsed with the operator's own
//! binding power.
//!
//! Grouping symbols (`matches` set) parse their content at their own binding power and then
//! require the closing symbol. Simple prefix operators bind to the next primary only.

use std::fmt;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::token::{Span, Token};

/// Grammar metadata for one operator or atom class.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Symbol<K> {
    pub kind: K,
    pub left_binding_power: u32,
    /// Number of operands: 0 for atoms, 1 for prefix/postfix/grouping, 2 for infix.
    pub arity: usize,
    /// Closing token text for grouping symbols.
    pub matches: Option<&'static str>,
    /// Closing half of a grouping pair; never valid in operand position.
    pub closing: bool,
    /// `arity` operands, each parsed at infinite binding power.
    pub prefix: bool,
    pub postfix: bool,
    /// Multi-arity symbol that still takes a single primary operand.
    pub unary: bool,
    pub right_associative: bool,
}

impl<K> Symbol<K> {
    pub const fn new(kind: K) -> Self {
        Symbol {
            kind,
            left_binding_power: 0,
            arity: 0,
            matches: None,
            closing: false,
            prefix: false,
            postfix: false,
            unary: false,
            right_associative: false,
        }
    }

    pub const fn atom(kind: K) -> Self {
        Symbol::new(kind)
    }

    /// Single-operand prefix operator binding to the next primary.
    pub const fn prefix(kind: K) -> Self {
        let mut s = Symbol::new(kind);
        s.arity = 1;
        s
    }

    pub const fn postfix(kind: K, left_binding_power: u32) -> Self {
        let mut s = Symbol::new(kind);
        s.arity = 1;
        s.postfix = true;
        s.left_binding_power = left_binding_power;
        s
    }

    pub const fn infix(kind: K, left_binding_power: u32) -> Self {
        let mut s = Symbol::new(kind);
        s.arity = 2;
        s.left_binding_power = left_binding_power;
        s
    }

    pub const fn infix_right(kind: K, left_binding_power: u32) -> Self {
        let mut s = Symbol::infix(kind, left_binding_power);
        s.right_associative = true;
        s
    }

    pub const fn group(kind: K, closer: &'static str) -> Self {
        let mut s = Symbol::new(kind);
        s.arity = 1;
        s.matches = Some(closer);
        s
    }

    pub const fn closing(kind: K) -> Self {
        let mut s = Symbol::new(kind);
        s.closing = true;
        s
    }
}

/// Generic parse tree. Each node exclusively owns its subtrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree<K> {
    pub kind: K,
    /// Token text, or a combined name produced by a `transform` hook.
    pub value: String,
    pub span: Option<Span>,
    pub subtrees: Vec<ParseTree<K>>,
}

impl<K> ParseTree<K> {
    pub fn leaf(kind: K, value: impl Into<String>) -> Self {
        ParseTree {
            kind,
            value: value.into(),
            span: None,
            subtrees: Vec::new(),
        }
    }

    pub fn node(kind: K, value: impl Into<String>, subtrees: Vec<ParseTree<K>>) -> Self {
        ParseTree {
            kind,
            value: value.into(),
            span: None,
            subtrees,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.subtrees.is_empty()
    }

    /// Same tree with every span removed, for structural comparison.
    pub fn without_spans(mut self) -> Self {
        self.span = None;
        self.subtrees = self.subtrees.into_iter().map(ParseTree::without_spans).collect();
        self
    }
}

impl<K> fmt::Display for ParseTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subtrees.is_empty() {
            return write!(f, "{}", self.value);
        }
        write!(f, "({}", self.value)?;
        for subtree in &self.subtrees {
            write!(f, " {}", subtree)?;
        }
        write!(f, ")")
    }
}

/// Symbol table plus node hooks.
pub trait Grammar {
    type Kind: Copy + Eq + fmt::Debug;

    /// Looks up the symbol for a token.
    fn symbol(&self, token: &Token) -> Result<Symbol<Self::Kind>>;

    /// Called on every completed node; an `Err` aborts the parse with a syntax error.
    fn verify(&self, _node: &ParseTree<Self::Kind>) -> Result<(), String> {
        Ok(())
    }

    /// Called on every verified node; the result replaces the node.
    fn transform(&self, node: ParseTree<Self::Kind>) -> ParseTree<Self::Kind> {
        node
    }

    /// Called once on the finished tree.
    fn verify_root(&self, _root: &ParseTree<Self::Kind>) -> Result<(), String> {
        Ok(())
    }
}

struct Pending<K> {
    symbol: Symbol<K>,
    token: Token,
}

/// One parse over one token sequence.
///
/// The lookahead token is kept unresolved; its symbol is looked up only when the parser needs
/// its binding power or consumes it, so errors are reported in input order.
pub struct Parser<'g, G: Grammar, I: Iterator<Item = Token>> {
    grammar: &'g G,
    tokens: I,
    peek: Option<Token>,
}

impl<'g, G: Grammar, I: Iterator<Item = Token>> Parser<'g, G, I> {
    pub fn new(grammar: &'g G, tokens: impl IntoIterator<IntoIter = I>) -> Self {
        let mut tokens = tokens.into_iter();
        let peek = tokens.next();
        Parser { grammar, tokens, peek }
    }

    /// Parses one complete expression; trailing tokens are an error.
    pub fn parse(mut self) -> Result<ParseTree<G::Kind>> {
        let tree = self.parse_expression(0)?;
        if let Some(token) = &self.peek {
            return Err(Error::syntax(format!("Expected end of input but found '{}'.", token.text)));
        }
        self.grammar.verify_root(&tree).map_err(Error::Syntax)?;
        debug!("parsed {}", tree);
        Ok(tree)
    }

    fn next(&mut self) -> Result<Pending<G::Kind>> {
        let following = self.tokens.next();
        let token = std::mem::replace(&mut self.peek, following).ok_or_else(Error::unexpected_end)?;
        let symbol = self.grammar.symbol(&token)?;
        Ok(Pending { symbol, token })
    }

    fn peek_symbol(&self) -> Result<Option<Symbol<G::Kind>>> {
        self.peek.as_ref().map(|token| self.grammar.symbol(token)).transpose()
    }

    fn peek_binds(&self, right_binding_power: u32) -> Result<bool> {
        let binds = match self.peek_symbol()? {
            Some(symbol) => {
                let lbp = symbol.left_binding_power;
                right_binding_power < lbp
                    || (right_binding_power != 0 && symbol.right_associative && right_binding_power == lbp)
            }
            None => false,
        };
        Ok(binds)
    }

    fn expect(&self, expected: &str) -> Result<()> {
        match &self.peek {
            Some(token) if token.text == expected => Ok(()),
            Some(token) => Err(Error::syntax(format!("Expected '{}' but found '{}'.", expected, token.text))),
            None => Err(Error::syntax(format!("Expected '{}' but found end of input.", expected))),
        }
    }

    fn finish(&self, pending: Pending<G::Kind>, subtrees: Vec<ParseTree<G::Kind>>) -> Result<ParseTree<G::Kind>> {
        let Pending { symbol, token } = pending;
        let node = ParseTree {
            kind: symbol.kind,
            value: token.text,
            span: token.span,
            subtrees,
        };
        trace!("finish {}", node);
        self.grammar.verify(&node).map_err(Error::Syntax)?;
        Ok(self.grammar.transform(node))
    }

    fn parse_expression(&mut self, right_binding_power: u32) -> Result<ParseTree<G::Kind>> {
        let left = self.parse_prefix_or_atom()?;
        self.parse_infix(right_binding_power, left)
    }

    fn parse_postfix(&mut self, mut left: ParseTree<G::Kind>) -> Result<ParseTree<G::Kind>> {
        while matches!(self.peek_symbol()?, Some(symbol) if symbol.arity == 1 && symbol.postfix) {
            let pending = self.next()?;
            left = self.finish(pending, vec![left])?;
        }
        Ok(left)
    }

    fn parse_prefix_or_atom(&mut self) -> Result<ParseTree<G::Kind>> {
        let pending = self.next()?;
        let symbol = pending.symbol;

        if symbol.closing || symbol.postfix {
            return Err(Self::not_a_value(&pending));
        }

        match symbol.arity {
            0 => {
                let leaf = self.finish(pending, Vec::new())?;
                self.parse_postfix(leaf)
            }
            1 => {
                if let Some(closer) = symbol.matches {
                    let inner = self.parse_expression(symbol.left_binding_power)?;
                    let group = self.finish(pending, vec![inner])?;
                    self.expect(closer)?;
                    self.next()?;
                    self.parse_postfix(group)
                } else {
                    let operand = self.parse_prefix_or_atom()?;
                    self.finish(pending, vec![operand])
                }
            }
            arity => {
                if symbol.unary {
                    let operand = self.parse_prefix_or_atom()?;
                    self.finish(pending, vec![operand])
                } else if symbol.prefix {
                    let operands = (0..arity)
                        .map(|_| self.parse_expression(u32::MAX))
                        .collect::<Result<Vec<_>>>()?;
                    self.finish(pending, operands)
                } else {
                    Err(Self::not_a_value(&pending))
                }
            }
        }
    }

    fn parse_infix(&mut self, right_binding_power: u32, mut left: ParseTree<G::Kind>) -> Result<ParseTree<G::Kind>> {
        while self.peek_binds(right_binding_power)? {
            let pending = self.next()?;
            if pending.symbol.arity != 2 {
                return Err(Error::syntax(format!(
                    "Expected an infix operator but found '{}'.",
                    pending.token.text
                )));
            }
            let right = self.parse_expression(pending.symbol.left_binding_power)?;
            left = self.finish(pending, vec![left, right])?;
        }
        Ok(left)
    }

    fn not_a_value(pending: &Pending<G::Kind>) -> Error {
        Error::syntax(format!(
            "Expected a value or prefix operator but found '{}'.",
            pending.token.text
        ))
    }
}

/// Parses a token sequence with the given grammar.
pub fn parse_with<G: Grammar>(grammar: &G, tokens: impl IntoIterator<Item = Token>) -> Result<ParseTree<G::Kind>> {
    Parser::new(grammar, tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::token::TokenKind;

    // Small arithmetic grammar exercising the parts of the engine CTL does not use:
    // postfix operators, multi-operand prefix operators and left associativity.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    enum Arith {
        Num,
        Add,
        Mul,
        Pow,
        Fact,
        Neg,
        Max,
        Open,
        Close,
    }

    struct ArithGrammar;

    impl Grammar for ArithGrammar {
        type Kind = Arith;

        fn symbol(&self, token: &Token) -> Result<Symbol<Arith>> {
            if token.kind == TokenKind::Atom {
                return Ok(Symbol::atom(Arith::Num));
            }
            Ok(match token.text.as_str() {
                "+" => Symbol::infix(Arith::Add, 10),
                "*" => Symbol::infix(Arith::Mul, 20),
                "^" => Symbol::infix_right(Arith::Pow, 30),
                "!" => Symbol::postfix(Arith::Fact, 40),
                "-" => Symbol::prefix(Arith::Neg),
                "max" => {
                    let mut s = Symbol::new(Arith::Max);
                    s.arity = 2;
                    s.prefix = true;
                    s
                }
                "(" => Symbol::group(Arith::Open, ")"),
                ")" => Symbol::closing(Arith::Close),
                other => return Err(Error::syntax(format!("Unknown operator '{}'.", other))),
            })
        }

        fn verify(&self, node: &ParseTree<Arith>) -> Result<(), String> {
            if node.kind == Arith::Num && node.value == "13" {
                return Err("Unlucky number.".to_string());
            }
            Ok(())
        }

        fn transform(&self, mut node: ParseTree<Arith>) -> ParseTree<Arith> {
            if node.kind == Arith::Open {
                return node.subtrees.remove(0);
            }
            node
        }
    }

    fn lex(input: &str) -> Vec<Token> {
        input
            .split_whitespace()
            .map(|s| {
                if s.chars().all(|c| c.is_ascii_digit()) {
                    Token::atom(s)
                } else {
                    Token::operator(s)
                }
            })
            .collect()
    }

    fn parse(input: &str) -> Result<String> {
        parse_with(&ArithGrammar, lex(input)).map(|t| t.to_string())
    }

    #[test]
    fn test_precedence() {
        assert_eq!(parse("1 + 2 * 3").unwrap(), "(+ 1 (* 2 3))");
        assert_eq!(parse("1 * 2 + 3").unwrap(), "(+ (* 1 2) 3)");
    }

    #[test]
    fn test_associativity() {
        assert_eq!(parse("1 + 2 + 3").unwrap(), "(+ (+ 1 2) 3)");
        assert_eq!(parse("1 ^ 2 ^ 3").unwrap(), "(^ 1 (^ 2 3))");
    }

    #[test]
    fn test_grouping_is_discarded() {
        assert_eq!(parse("( 1 + 2 ) * 3").unwrap(), "(* (+ 1 2) 3)");
        assert_eq!(parse("( ( 4 ) )").unwrap(), "4");
    }

    #[test]
    fn test_prefix_and_postfix() {
        assert_eq!(parse("- 1 + 2").unwrap(), "(+ (- 1) 2)");
        assert_eq!(parse("3 ! ! * 2").unwrap(), "(* (! (! 3)) 2)");
        assert_eq!(parse("max 1 2 + 3").unwrap(), "(+ (max 1 2) 3)");
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("").unwrap_err().to_string(), "Unexpected end of input.");
        assert_eq!(parse("1 +").unwrap_err().to_string(), "Unexpected end of input.");
        assert_eq!(
            parse("* 1").unwrap_err().to_string(),
            "Expected a value or prefix operator but found '*'."
        );
        assert_eq!(
            parse(")").unwrap_err().to_string(),
            "Expected a value or prefix operator but found ')'."
        );
        assert_eq!(parse("( 1").unwrap_err().to_string(), "Expected ')' but found end of input.");
        assert_eq!(parse("( 1 2").unwrap_err().to_string(), "Expected ')' but found '2'.");
        assert_eq!(parse("1 2").unwrap_err().to_string(), "Expected end of input but found '2'.");
        assert_eq!(parse("1 + 13").unwrap_err().to_string(), "Unlucky number.");
        assert_eq!(parse("1 % 2").unwrap_err().to_string(), "Unknown operator '%'.");
    }

    #[test]
    fn test_errors_follow_input_order() {
        // `*` is rejected before the unknown operator after it is looked at.
        assert_eq!(
            parse("* %").unwrap_err().to_string(),
            "Expected a value or prefix operator but found '*'."
        );
        assert_eq!(parse("1 %").unwrap_err().to_string(), "Unknown operator '%'.");
    }

    #[test]
    fn test_spans_survive() {
        let tokens = vec![Token::atom("7").with_span(Span::default())];
        let tree = parse_with(&ArithGrammar, tokens).unwrap();
        assert_eq!(tree.span, Some(Span::default()));
        assert_eq!(tree.without_spans().span, None);
    }
}
