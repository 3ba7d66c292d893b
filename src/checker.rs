//! Explicit-state CTL model checking.
//!
//! The checker computes the satisfaction set `SAT(φ)` of a normalized formula bottom-up over
//! the formula tree. Boolean connectives map to set operations; the temporal core is:
//!
//! - `EX φ`: `preE(SAT(φ))`, the states with at least one successor in `SAT(φ)`;
//! - `EG φ`: greatest fixpoint `νY. SAT(φ) ∩ preE(Y)`, iterated from `SAT(φ)` downwards;
//! - `E(φ U ψ)`: least fixpoint `µY. SAT(ψ) ∪ (SAT(φ) ∩ preE(Y))`, iterated from `SAT(ψ)` upwards.
//!
//! Each fixpoint step strictly shrinks (EG) or grows (EU) a subset of a finite state set, so
//! a fixpoint over `n` states is reached after at most `n` changing steps.
//!
//! Derived operators (`AG`, `EF`, ...) must be normalized away first; reaching one here is an
//! [`Error::System`].

use std::borrow::Cow;
use std::cell::Cell;
use std::hash::Hash;

use log::debug;

use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::model::Model;
use crate::parse::parse;
use crate::state_set::StateSet;

/// Which initial states must satisfy a formula for the model to satisfy it.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum InitialPolicy {
    /// At least one initial state.
    #[default]
    Any,
    /// Every initial state (vacuously true without initial states).
    All,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub initial: InitialPolicy,
}

/// Anything [`check`] accepts as a formula: text (parsed first) or a [`Formula`].
pub trait FormulaSource<'a> {
    fn into_formula(self) -> Result<Cow<'a, Formula>>;
}

impl<'a> FormulaSource<'a> for &'a str {
    fn into_formula(self) -> Result<Cow<'a, Formula>> {
        parse(self).map(Cow::Owned)
    }
}

impl<'a> FormulaSource<'a> for &'a String {
    fn into_formula(self) -> Result<Cow<'a, Formula>> {
        parse(self).map(Cow::Owned)
    }
}

impl<'a> FormulaSource<'a> for String {
    fn into_formula(self) -> Result<Cow<'a, Formula>> {
        parse(&self).map(Cow::Owned)
    }
}

impl<'a> FormulaSource<'a> for &'a Formula {
    fn into_formula(self) -> Result<Cow<'a, Formula>> {
        Ok(Cow::Borrowed(self))
    }
}

impl<'a> FormulaSource<'a> for Formula {
    fn into_formula(self) -> Result<Cow<'a, Formula>> {
        Ok(Cow::Owned(self))
    }
}

/// Checks whether some initial state of `model` satisfies `formula`.
///
/// ```
/// use ctl_rs::{check, Model, State};
///
/// let model: Model<u32> = vec![
///     State::new(0).initial().with_property("p").with_transition(1),
///     State::new(1).with_transition(0),
/// ]
/// .into();
///
/// assert!(check(&model, "EX EX p").unwrap());
/// assert!(!check(&model, "AG p").unwrap());
/// ```
pub fn check<'f, Id: Eq + Hash>(model: &Model<Id>, formula: impl FormulaSource<'f>) -> Result<bool> {
    check_with_options(model, formula, CheckOptions::default())
}

pub fn check_with_options<'f, Id: Eq + Hash>(
    model: &Model<Id>,
    formula: impl FormulaSource<'f>,
    options: CheckOptions,
) -> Result<bool> {
    let formula = formula.into_formula()?;
    ModelChecker::with_options(model, options).holds(&formula)
}

/// CTL model checker over one model.
///
/// Construction indexes the transition relation; the checker can then evaluate any number of
/// formulas. The model is borrowed immutably for the checker's lifetime.
pub struct ModelChecker<'m, Id> {
    model: &'m Model<Id>,
    successors: Vec<Vec<usize>>,
    options: CheckOptions,
    iterations: Cell<usize>,
}

impl<'m, Id: Eq + Hash> ModelChecker<'m, Id> {
    pub fn new(model: &'m Model<Id>) -> Self {
        Self::with_options(model, CheckOptions::default())
    }

    pub fn with_options(model: &'m Model<Id>, options: CheckOptions) -> Self {
        ModelChecker {
            model,
            successors: model.successor_indices(),
            options,
            iterations: Cell::new(0),
        }
    }
}

impl<'m, Id> ModelChecker<'m, Id> {
    pub fn model(&self) -> &'m Model<Id> {
        self.model
    }

    pub fn options(&self) -> CheckOptions {
        self.options
    }

    /// Total number of fixpoint steps that changed the approximation, over all evaluations so far.
    pub fn iterations(&self) -> usize {
        self.iterations.get()
    }

    pub fn all_states(&self) -> StateSet {
        StateSet::full(self.model.len())
    }

    /// Existential predecessor: states with at least one successor in `y`.
    pub fn pre_e(&self, y: &StateSet) -> StateSet {
        let mut result = StateSet::empty(self.model.len());
        for (i, successors) in self.successors.iter().enumerate() {
            if successors.iter().any(|&j| y.contains(j)) {
                result.insert(i);
            }
        }
        result
    }

    /// Computes the set of states satisfying a normalized formula.
    pub fn sat(&self, formula: &Formula) -> Result<StateSet> {
        let set = match formula {
            Formula::True => self.all_states(),
            Formula::False => StateSet::empty(self.model.len()),
            Formula::Atom(p) => StateSet::from_indices(self.model.len(), self.model.labelled(p)),
            Formula::Not(phi) => self.sat(phi)?.complement(),
            Formula::Or(phi, psi) => self.sat(phi)?.union(&self.sat(psi)?),
            Formula::And(phi, psi) => self.sat(phi)?.intersection(&self.sat(psi)?),
            Formula::Implies(phi, psi) => {
                // (SAT(φ) ∩ SAT(ψ)) ∪ (S − SAT(φ))
                let sat_phi = self.sat(phi)?;
                let sat_psi = self.sat(psi)?;
                sat_phi.intersection(&sat_psi).union(&sat_phi.complement())
            }
            Formula::EX(phi) => self.sat_ex(phi)?,
            Formula::EG(phi) => self.sat_eg(phi)?,
            Formula::EU(phi, psi) => self.sat_eu(phi, psi)?,
            derived => return Err(Error::unexpected_operator(derived.value())),
        };
        Ok(set)
    }

    /// EX φ: States that have at least one successor satisfying φ
    fn sat_ex(&self, phi: &Formula) -> Result<StateSet> {
        Ok(self.pre_e(&self.sat(phi)?))
    }

    /// EG φ: States from which there exists a path where φ holds globally
    ///
    /// Greatest fixpoint: νY. φ ∧ EX Y
    fn sat_eg(&self, phi: &Formula) -> Result<StateSet> {
        let mut y = self.sat(phi)?;
        let mut step = 0;

        loop {
            let new_y = y.intersection(&self.pre_e(&y));

            if new_y == y {
                debug!("EG: fixpoint after {} steps, |Y| = {}", step, y.len());
                return Ok(y);
            }
            step += 1;
            self.iterations.set(self.iterations.get() + 1);
            debug!("EG: iteration {}, |Y| = {}", step, new_y.len());
            y = new_y;
        }
    }

    /// E(φ U ψ): States from which there exists a path where φ holds until ψ
    ///
    /// Least fixpoint: µY. ψ ∨ (φ ∧ EX Y)
    fn sat_eu(&self, phi: &Formula, psi: &Formula) -> Result<StateSet> {
        let w = self.sat(phi)?;
        let mut y = self.sat(psi)?;
        let mut step = 0;

        loop {
            let new_y = y.union(&w.intersection(&self.pre_e(&y)));

            if new_y == y {
                debug!("EU: fixpoint after {} steps, |Y| = {}", step, y.len());
                return Ok(y);
            }
            step += 1;
            self.iterations.set(self.iterations.get() + 1);
            debug!("EU: iteration {}, |Y| = {}", step, new_y.len());
            y = new_y;
        }
    }

    /// Whether the model satisfies the formula under the configured [`InitialPolicy`].
    pub fn holds(&self, formula: &Formula) -> Result<bool> {
        debug!("check({}) over {} states", formula, self.model.len());
        Ok(self.holds_in(&self.sat(formula)?))
    }

    /// Applies the [`InitialPolicy`] to an already computed SAT set.
    pub fn holds_in(&self, sat: &StateSet) -> bool {
        let mut initial = self.model.initial_indices();
        match self.options.initial {
            InitialPolicy::Any => initial.any(|i| sat.contains(i)),
            InitialPolicy::All => initial.all(|i| sat.contains(i)),
        }
    }

    /// Ids of the states satisfying the formula, in model order.
    pub fn satisfying_states(&self, formula: &Formula) -> Result<Vec<&'m Id>> {
        Ok(self.ids(&self.sat(formula)?))
    }

    /// Ids of the states in `set`, in model order.
    pub fn ids(&self, set: &StateSet) -> Vec<&'m Id> {
        let states = self.model.states();
        set.iter().map(|i| &states[i].id).collect()
    }

    /// Ids of the initial states violating the formula.
    pub fn violations(&self, formula: &Formula) -> Result<Vec<&'m Id>> {
        let sat = self.sat(formula)?;
        Ok(self
            .model
            .initial_indices()
            .filter(|&i| !sat.contains(i))
            .map(|i| &self.model.states()[i].id)
            .collect())
    }
}
