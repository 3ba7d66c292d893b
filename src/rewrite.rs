//! Translation of fused parse trees into normalized formulas.
//!
//! Two passes:
//!
//! 1. [`lower`] turns a [`ParseTree`] produced by the CTL grammar into a typed [`Formula`].
//!    Any node kind that cannot appear after fusion (bare path operator, bare quantifier,
//!    parenthesis) is an internal fault and reported as [`Error::System`].
//! 2. [`Formula::normalize`] rewrites the derived operators into the minimal set
//!    `!, &, |, ->, EX, EU, EG`, children first:
//!
//! ```text
//! EF a     = E(\T U a)
//! E(a R b) = E(b U (a & b)) & !EG b
//! E(a W b) = E((a | b) U b) & !EG (a | b)
//! AX a     = !EX !a
//! AG a     = !E(\T U !a)
//! AF a     = !EG !a
//! A(a U b) = !E(!b U (!a & !b)) | EG !b
//! A(a R b) = !E(!a U !b)
//! A(a W b) = !E(!b U (!a & !b))
//! ```
//!
//! Negations are built through [`negate`], which cancels `!!x` to `x`, so a normalized formula
//! never contains a double negation.

use log::debug;

use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::grammar::{CtlSymbol, PathOperator, Quantifier};
use crate::pratt::ParseTree;

/// Lowers and normalizes a parse tree.
pub fn translate(tree: ParseTree<CtlSymbol>) -> Result<Formula> {
    let formula = lower(tree)?;
    Ok(formula.normalize())
}

fn take_operands<const N: usize>(tree: ParseTree<CtlSymbol>) -> Result<[Formula; N]> {
    let count = tree.subtrees.len();
    if count != N {
        return Err(Error::system(format!(
            "Operator '{}' expects {} operand(s) but has {}.",
            tree.value, N, count
        )));
    }
    let operands = tree.subtrees.into_iter().map(lower).collect::<Result<Vec<_>>>()?;
    operands.try_into().map_err(|_| Error::system("Operand count changed while lowering."))
}

/// Structural conversion, without normalization.
pub fn lower(tree: ParseTree<CtlSymbol>) -> Result<Formula> {
    use PathOperator::*;
    use Quantifier::*;

    let formula = match tree.kind {
        CtlSymbol::Atom => {
            if !tree.subtrees.is_empty() {
                return Err(Error::system(format!("Atom '{}' has operands.", tree.value)));
            }
            match tree.value.as_str() {
                "\\T" => Formula::True,
                "\\F" => Formula::False,
                _ => Formula::Atom(tree.value),
            }
        }
        CtlSymbol::Not => {
            let [a] = take_operands(tree)?;
            a.not()
        }
        CtlSymbol::And => {
            let [a, b] = take_operands(tree)?;
            a.and(b)
        }
        CtlSymbol::Or => {
            let [a, b] = take_operands(tree)?;
            a.or(b)
        }
        CtlSymbol::Implies => {
            let [a, b] = take_operands(tree)?;
            a.implies(b)
        }
        CtlSymbol::Quantified(q, op) => match (q, op) {
            (Exists, Next) => {
                let [a] = take_operands(tree)?;
                a.ex()
            }
            (Exists, Globally) => {
                let [a] = take_operands(tree)?;
                a.eg()
            }
            (Exists, Finally) => {
                let [a] = take_operands(tree)?;
                a.ef()
            }
            (Forall, Next) => {
                let [a] = take_operands(tree)?;
                a.ax()
            }
            (Forall, Globally) => {
                let [a] = take_operands(tree)?;
                a.ag()
            }
            (Forall, Finally) => {
                let [a] = take_operands(tree)?;
                a.af()
            }
            (Exists, Until) => {
                let [a, b] = take_operands(tree)?;
                a.eu(b)
            }
            (Exists, Release) => {
                let [a, b] = take_operands(tree)?;
                a.er(b)
            }
            (Exists, WeakUntil) => {
                let [a, b] = take_operands(tree)?;
                a.ew(b)
            }
            (Forall, Until) => {
                let [a, b] = take_operands(tree)?;
                a.au(b)
            }
            (Forall, Release) => {
                let [a, b] = take_operands(tree)?;
                a.ar(b)
            }
            (Forall, WeakUntil) => {
                let [a, b] = take_operands(tree)?;
                a.aw(b)
            }
        },
        CtlSymbol::Path(_) | CtlSymbol::Quantifier(_) | CtlSymbol::OpenParen | CtlSymbol::CloseParen => {
            return Err(Error::unexpected_operator(&tree.value));
        }
    };
    Ok(formula)
}

/// `!f`, cancelling a double negation.
pub fn negate(f: Formula) -> Formula {
    match f {
        Formula::Not(inner) => *inner,
        f => f.not(),
    }
}

impl Formula {
    /// Rewrites every derived operator into the minimal set `!, &, |, ->, EX, EU, EG`.
    pub fn normalize(self) -> Formula {
        debug!("normalize({})", self);
        self.lower_derived()
    }

    fn lower_derived(self) -> Formula {
        match self {
            Formula::Atom(_) | Formula::True | Formula::False => self,
            Formula::Not(a) => match *a {
                Formula::Not(inner) => inner.lower_derived(),
                a => negate(a.lower_derived()),
            },
            Formula::And(a, b) => a.lower_derived().and(b.lower_derived()),
            Formula::Or(a, b) => a.lower_derived().or(b.lower_derived()),
            Formula::Implies(a, b) => a.lower_derived().implies(b.lower_derived()),
            Formula::EX(a) => a.lower_derived().ex(),
            Formula::EG(a) => a.lower_derived().eg(),
            Formula::EU(a, b) => a.lower_derived().eu(b.lower_derived()),
            Formula::EF(a) => Formula::True.eu(a.lower_derived()),
            Formula::ER(a, b) => {
                let (a, b) = (a.lower_derived(), b.lower_derived());
                let until = b.clone().eu(a.and(b.clone()));
                until.and(negate(b.eg()))
            }
            Formula::EW(a, b) => {
                let (a, b) = (a.lower_derived(), b.lower_derived());
                let either = a.or(b.clone());
                let until = either.clone().eu(b);
                until.and(negate(either.eg()))
            }
            Formula::AX(a) => negate(negate(a.lower_derived()).ex()),
            Formula::AG(a) => negate(Formula::True.eu(negate(a.lower_derived()))),
            Formula::AF(a) => negate(negate(a.lower_derived()).eg()),
            Formula::AU(a, b) => {
                let (not_a, not_b) = (negate(a.lower_derived()), negate(b.lower_derived()));
                let until = not_b.clone().eu(not_a.and(not_b.clone()));
                negate(until).or(not_b.eg())
            }
            Formula::AR(a, b) => {
                let (not_a, not_b) = (negate(a.lower_derived()), negate(b.lower_derived()));
                negate(not_a.eu(not_b))
            }
            Formula::AW(a, b) => {
                let (not_a, not_b) = (negate(a.lower_derived()), negate(b.lower_derived()));
                negate(not_b.clone().eu(not_a.and(not_b)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn a() -> Formula {
        Formula::atom("a")
    }

    fn b() -> Formula {
        Formula::atom("b")
    }

    fn not(f: Formula) -> Formula {
        f.not()
    }

    #[test]
    fn test_ef() {
        assert_eq!(a().ef().normalize(), Formula::True.eu(a()));
    }

    #[test]
    fn test_er() {
        let expected = b().eu(a().and(b())).and(not(b().eg()));
        assert_eq!(a().er(b()).normalize(), expected);
    }

    #[test]
    fn test_ew() {
        let expected = a().or(b()).eu(b()).and(not(a().or(b()).eg()));
        assert_eq!(a().ew(b()).normalize(), expected);
    }

    #[test]
    fn test_universal() {
        assert_eq!(a().ax().normalize(), not(not(a()).ex()));
        assert_eq!(a().ag().normalize(), not(Formula::True.eu(not(a()))));
        assert_eq!(a().af().normalize(), not(not(a()).eg()));
        assert_eq!(
            a().au(b()).normalize(),
            not(not(b()).eu(not(a()).and(not(b())))).or(not(b()).eg())
        );
        assert_eq!(a().ar(b()).normalize(), not(not(a()).eu(not(b()))));
        assert_eq!(a().aw(b()).normalize(), not(not(b()).eu(not(a()).and(not(b())))));
    }

    #[test]
    fn test_no_double_negation_survives() {
        // AX !a = !EX !!a = !EX a
        assert_eq!(not(a()).ax().normalize(), not(a().ex()));
        assert_eq!(not(not(not(not(not(a()))))).normalize(), not(a()));
        // AG AG a = !E(T U !!E(T U !a)) = !E(T U E(T U !a))
        let inner = Formula::True.eu(not(a()));
        assert_eq!(a().ag().ag().normalize(), not(Formula::True.eu(inner)));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let f = a().au(b().ef()).implies(a().aw(b()).ax());
        let once = f.normalize();
        assert!(once.is_normalized());
        assert_eq!(once.clone().normalize(), once);
    }

    #[test]
    fn test_lower_rejects_bare_path_operator() {
        let tree = ParseTree::node(
            CtlSymbol::Path(PathOperator::Next),
            "X",
            vec![ParseTree::leaf(CtlSymbol::Atom, "a")],
        );
        let e = lower(tree).unwrap_err();
        assert!(e.is_system());
        assert_eq!(e.to_string(), "Expected an operator but found 'X'.");
    }

    #[test]
    fn test_lower_rejects_wrong_arity() {
        let tree = ParseTree::node(CtlSymbol::And, "&", vec![ParseTree::leaf(CtlSymbol::Atom, "a")]);
        assert!(lower(tree).unwrap_err().is_system());
    }

    #[test]
    fn test_lower_literals() {
        assert_eq!(lower(ParseTree::leaf(CtlSymbol::Atom, "\\T")).unwrap(), Formula::True);
        assert_eq!(lower(ParseTree::leaf(CtlSymbol::Atom, "\\F")).unwrap(), Formula::False);
    }
}
