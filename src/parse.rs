//! Parsing entry points: text or tokens in, normalized [`Formula`] out.

use log::debug;

use crate::error::Result;
use crate::formula::Formula;
use crate::grammar::{CtlGrammar, CtlSymbol};
use crate::pratt::{parse_with, ParseTree};
use crate::rewrite::translate;
use crate::token::Token;
use crate::tokenizer::tokenize;

/// Parses formula text into a normalized formula.
///
/// ```
/// use ctl_rs::{parse, Formula};
///
/// let f = parse("EF p").unwrap();
/// assert_eq!(f, Formula::True.eu(Formula::atom("p")));
/// ```
pub fn parse(input: &str) -> Result<Formula> {
    debug!("parse(input = {:?})", input);
    parse_tokens(tokenize(input)?)
}

/// Parses an already tokenized formula into a normalized formula.
pub fn parse_tokens(tokens: impl IntoIterator<Item = Token>) -> Result<Formula> {
    translate(parse_tree(tokens)?)
}

/// Parses tokens into the fused (not yet normalized) CTL parse tree.
pub fn parse_tree(tokens: impl IntoIterator<Item = Token>) -> Result<ParseTree<CtlSymbol>> {
    parse_with(&CtlGrammar::new(), tokens)
}

impl std::str::FromStr for Formula {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}
