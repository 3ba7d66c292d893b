//! CTL formula abstract syntax tree.
//!
//! [`Formula`] covers the full surface language after quantifier fusion: the boolean
//! connectives, the minimal temporal core `EX`, `EU`, `EG` and the derived operators
//! `EF, ER, EW, AX, AG, AF, AU, AR, AW`. Each variant has a fixed arity, so the shape
//! invariants of the tree are carried by the type.
//!
//! [`Formula::normalize`] (see [`crate::rewrite`]) lowers the derived operators to the minimal
//! set `!, &, |, ->, EX, EU, EG`, which is what the model checker evaluates.
//!
//! The [`Display`](fmt::Display) impl renders formulas in the concrete syntax accepted by
//! [`parse`](crate::parse()); a normalized formula re-parses to itself.

use std::collections::BTreeSet;
use std::fmt;

use crate::tokenizer::{is_reserved_letter, is_word_char};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    /// Atomic proposition
    Atom(String),
    /// `\T`
    True,
    /// `\F`
    False,
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),

    // Minimal temporal core
    /// Exists Next: EX φ
    EX(Box<Formula>),
    /// Exists Globally: EG φ
    EG(Box<Formula>),
    /// Exists Until: E(φ U ψ)
    EU(Box<Formula>, Box<Formula>),

    // Derived operators, removed by normalization
    /// Exists Future: EF φ
    EF(Box<Formula>),
    /// Exists Release: E(φ R ψ)
    ER(Box<Formula>, Box<Formula>),
    /// Exists Weak until: E(φ W ψ)
    EW(Box<Formula>, Box<Formula>),
    /// All Next: AX φ
    AX(Box<Formula>),
    /// All Globally: AG φ
    AG(Box<Formula>),
    /// All Future: AF φ
    AF(Box<Formula>),
    /// All Until: A(φ U ψ)
    AU(Box<Formula>, Box<Formula>),
    /// All Release: A(φ R ψ)
    AR(Box<Formula>, Box<Formula>),
    /// All Weak until: A(φ W ψ)
    AW(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn atom(s: impl Into<String>) -> Self {
        Formula::Atom(s.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Formula::Not(Box::new(self))
    }

    pub fn and(self, other: Self) -> Self {
        Formula::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Self) -> Self {
        Formula::Or(Box::new(self), Box::new(other))
    }

    pub fn implies(self, other: Self) -> Self {
        Formula::Implies(Box::new(self), Box::new(other))
    }

    pub fn ex(self) -> Self {
        Formula::EX(Box::new(self))
    }

    pub fn eg(self) -> Self {
        Formula::EG(Box::new(self))
    }

    pub fn eu(self, other: Self) -> Self {
        Formula::EU(Box::new(self), Box::new(other))
    }

    pub fn ef(self) -> Self {
        Formula::EF(Box::new(self))
    }

    pub fn er(self, other: Self) -> Self {
        Formula::ER(Box::new(self), Box::new(other))
    }

    pub fn ew(self, other: Self) -> Self {
        Formula::EW(Box::new(self), Box::new(other))
    }

    pub fn ax(self) -> Self {
        Formula::AX(Box::new(self))
    }

    pub fn ag(self) -> Self {
        Formula::AG(Box::new(self))
    }

    pub fn af(self) -> Self {
        Formula::AF(Box::new(self))
    }

    pub fn au(self, other: Self) -> Self {
        Formula::AU(Box::new(self), Box::new(other))
    }

    pub fn ar(self, other: Self) -> Self {
        Formula::AR(Box::new(self), Box::new(other))
    }

    pub fn aw(self, other: Self) -> Self {
        Formula::AW(Box::new(self), Box::new(other))
    }
}

impl Formula {
    /// Operator name, or the atom name for leaves (`\T`/`\F` for the literals).
    pub fn value(&self) -> &str {
        match self {
            Formula::Atom(name) => name,
            Formula::True => "\\T",
            Formula::False => "\\F",
            Formula::Not(_) => "!",
            Formula::And(..) => "&",
            Formula::Or(..) => "|",
            Formula::Implies(..) => "->",
            Formula::EX(_) => "EX",
            Formula::EG(_) => "EG",
            Formula::EU(..) => "EU",
            Formula::EF(_) => "EF",
            Formula::ER(..) => "ER",
            Formula::EW(..) => "EW",
            Formula::AX(_) => "AX",
            Formula::AG(_) => "AG",
            Formula::AF(_) => "AF",
            Formula::AU(..) => "AU",
            Formula::AR(..) => "AR",
            Formula::AW(..) => "AW",
        }
    }

    /// Operands, left to right.
    pub fn subtrees(&self) -> Vec<&Formula> {
        match self {
            Formula::Atom(_) | Formula::True | Formula::False => vec![],
            Formula::Not(a)
            | Formula::EX(a)
            | Formula::EG(a)
            | Formula::EF(a)
            | Formula::AX(a)
            | Formula::AG(a)
            | Formula::AF(a) => vec![&**a],
            Formula::And(a, b)
            | Formula::Or(a, b)
            | Formula::Implies(a, b)
            | Formula::EU(a, b)
            | Formula::ER(a, b)
            | Formula::EW(a, b)
            | Formula::AU(a, b)
            | Formula::AR(a, b)
            | Formula::AW(a, b) => vec![&**a, &**b],
        }
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, Formula::Atom(_) | Formula::True | Formula::False)
    }

    /// Whether this node's operator belongs to the minimal set `!, &, |, ->, EX, EU, EG`.
    pub fn is_core(&self) -> bool {
        !matches!(
            self,
            Formula::EF(_)
                | Formula::ER(..)
                | Formula::EW(..)
                | Formula::AX(_)
                | Formula::AG(_)
                | Formula::AF(_)
                | Formula::AU(..)
                | Formula::AR(..)
                | Formula::AW(..)
        )
    }

    /// Whether the whole tree uses only the minimal operator set.
    pub fn is_normalized(&self) -> bool {
        self.is_core() && self.subtrees().into_iter().all(Formula::is_normalized)
    }

    /// Nesting depth; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.subtrees().into_iter().map(Formula::depth).max().unwrap_or(0)
    }

    /// Names of all atomic propositions occurring in the formula.
    pub fn atoms(&self) -> BTreeSet<&str> {
        let mut atoms = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(f) = stack.pop() {
            if let Formula::Atom(name) = f {
                atoms.insert(name.as_str());
            }
            stack.extend(f.subtrees());
        }
        atoms
    }
}

fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_word_char) && !name.chars().all(is_reserved_letter)
}

/// Operand position: parenthesized unless atomic or a negated atom.
struct Operand<'a>(&'a Formula);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bare = match self.0 {
            Formula::Not(inner) => inner.is_atomic(),
            other => other.is_atomic(),
        };
        if bare {
            write!(f, "{}", self.0)
        } else {
            write!(f, "({})", self.0)
        }
    }
}

/// Renders the formula in concrete syntax.
///
/// Atoms are quoted when needed. Some atom names have no spelling the tokenizer accepts: the
/// empty name, names containing a backslash, and names containing both `'` and `"`. Such atoms
/// are still rendered, but the text does not parse back.
impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Atom(name) if is_plain_identifier(name) => write!(f, "{}", name),
            Formula::Atom(name) if name.contains('"') => write!(f, "'{}'", name),
            Formula::Atom(name) => write!(f, "\"{}\"", name),
            Formula::True => write!(f, "\\T"),
            Formula::False => write!(f, "\\F"),
            Formula::Not(a) if a.is_atomic() => write!(f, "!{}", a),
            Formula::Not(a) => write!(f, "!({})", a),
            Formula::And(a, b) => write!(f, "{} & {}", Operand(a), Operand(b)),
            Formula::Or(a, b) => write!(f, "{} | {}", Operand(a), Operand(b)),
            Formula::Implies(a, b) => write!(f, "{} -> {}", Operand(a), Operand(b)),
            Formula::EX(a) | Formula::EG(a) | Formula::EF(a) | Formula::AX(a) | Formula::AG(a) | Formula::AF(a) => {
                write!(f, "{} {}", self.value(), Operand(a))
            }
            Formula::EU(a, b) => write!(f, "E({} U {})", Operand(a), Operand(b)),
            Formula::ER(a, b) => write!(f, "E({} R {})", Operand(a), Operand(b)),
            Formula::EW(a, b) => write!(f, "E({} W {})", Operand(a), Operand(b)),
            Formula::AU(a, b) => write!(f, "A({} U {})", Operand(a), Operand(b)),
            Formula::AR(a, b) => write!(f, "A({} R {})", Operand(a), Operand(b)),
            Formula::AW(a, b) => write!(f, "A({} W {})", Operand(a), Operand(b)),
        }
    }
}
