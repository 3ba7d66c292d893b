//! # ctl-rs: CTL parsing and explicit-state model checking in Rust
//!
//! **`ctl-rs`** parses formulas of **Computation Tree Logic (CTL)** and checks them against
//! finite Kripke structures.
//!
//! ## What is CTL?
//!
//! CTL is a branching-time temporal logic. Every temporal operator is a pair of a *path
//! quantifier* (`E`: on some path, `A`: on all paths) and a *path operator* (`X` next, `F`
//! finally, `G` globally, `U` until, `R` release, `W` weak until). A formula is evaluated in a
//! state of a model, and the model satisfies it when its initial states do.
//!
//! ## Key Features
//!
//! - **Generic Pratt engine**: [`pratt`] is an operator-precedence parser driven by a
//!   [`Grammar`][crate::pratt::Grammar] of symbols with binding powers and verify/transform hooks.
//!   The CTL grammar in [`grammar`] is one instance of it.
//! - **Quantifier fusion**: `E`/`A` followed by a path operator becomes one CTL operator (`EX`,
//!   `A(a U b)`, ...). A path operator without a quantifier is rejected.
//! - **Minimal core**: every formula is rewritten into `!`, `&`, `|`, `->`, `EX`, `EU`, `EG`
//!   ([`rewrite`]), so the checker only implements those.
//! - **Fixpoint checking**: [`checker`] computes satisfaction sets as bit sets over states, with
//!   `EG` and `EU` as greatest and least fixpoints.
//!
//! ## Syntax
//!
//! | syntax                    | meaning                                  |
//! |---------------------------|------------------------------------------|
//! | `p`, `'x y'`, `"x y"`     | atomic proposition                       |
//! | `\T`, `\F`                | true, false                              |
//! | `!`, `&`, `\|`, `->`      | not, and, or, implies                    |
//! | `EX`, `EF`, `EG`          | exists next / finally / globally         |
//! | `AX`, `AF`, `AG`          | forall next / finally / globally         |
//! | `E(a U b)`, `A(a R b)`... | until, release, weak until (`U`,`R`,`W`) |
//!
//! ## Basic Usage
//!
//! ```rust
//! use ctl_rs::{check, parse, Model, State};
//!
//! // 1. Build a model: 0 -> 1 -> 0, state 0 is initial and labelled `p`
//! let model: Model<u32> = vec![
//!     State::new(0).initial().with_property("p").with_transition(1),
//!     State::new(1).with_transition(0),
//! ]
//! .into();
//!
//! // 2. Parse a formula (derived operators are rewritten into the core)
//! let f = parse("AG AF p").unwrap();
//! assert!(f.is_normalized());
//!
//! // 3. Check it
//! assert!(check(&model, &f).unwrap());
//! assert!(!check(&model, "AG p").unwrap());
//!
//! // 4. Errors carry the exact message
//! let e = check(&model, "& a").unwrap_err();
//! assert_eq!(e.to_string(), "Expected a value or prefix operator but found '&'.");
//! ```
//!
//! ## Core Components
//!
//! - **[`tokenizer`]**: Splits text into atom and operator [`Token`]s with source spans.
//! - **[`parse`][mod@crate::parse]**: Text or tokens to a normalized [`Formula`].
//! - **[`checker`]**: The [`ModelChecker`] and the [`check`][fn@crate::check] convenience function.
//! - **[`dot`]**: Visualizing models (and SAT sets) with Graphviz.

pub mod checker;
pub mod dot;
pub mod error;
pub mod formula;
pub mod grammar;
pub mod model;
pub mod parse;
pub mod pratt;
pub mod rewrite;
pub mod state_set;
pub mod token;
pub mod tokenizer;

pub use checker::{check, check_with_options, CheckOptions, InitialPolicy, ModelChecker};
pub use error::{Error, Result};
pub use formula::Formula;
pub use model::{Model, State};
pub use parse::{parse, parse_tokens};
pub use state_set::StateSet;
pub use token::Token;
pub use tokenizer::tokenize;
