//! Explicit Kripke structures.
//!
//! A [`Model`] is a list of [`State`]s. Each state carries a caller-chosen id, an initial flag,
//! a set of property labels and the ids of its successors. Transitions to ids that no state
//! carries are allowed and simply never match.
//!
//! The model is read-only input to the checker.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State<Id> {
    pub id: Id,
    pub is_initial: bool,
    pub properties: BTreeSet<String>,
    pub out_transitions: Vec<Id>,
}

impl<Id> State<Id> {
    pub fn new(id: Id) -> Self {
        State {
            id,
            is_initial: false,
            properties: BTreeSet::new(),
            out_transitions: Vec::new(),
        }
    }

    /// Marks the state as initial.
    pub fn initial(self) -> Self {
        self.with_initial(true)
    }

    pub fn with_initial(mut self, is_initial: bool) -> Self {
        self.is_initial = is_initial;
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.properties.insert(property.into());
        self
    }

    pub fn with_properties<S: Into<String>>(mut self, properties: impl IntoIterator<Item = S>) -> Self {
        self.properties.extend(properties.into_iter().map(Into::into));
        self
    }

    pub fn has_property(&self, property: &str) -> bool {
        self.properties.contains(property)
    }
}

impl<Id: PartialEq> State<Id> {
    /// Adds a transition; duplicates are ignored.
    pub fn with_transition(mut self, target: Id) -> Self {
        if !self.out_transitions.contains(&target) {
            self.out_transitions.push(target);
        }
        self
    }

    pub fn with_transitions(self, targets: impl IntoIterator<Item = Id>) -> Self {
        targets.into_iter().fold(self, State::with_transition)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model<Id> {
    states: Vec<State<Id>>,
}

impl<Id> Default for Model<Id> {
    fn default() -> Self {
        Model { states: Vec::new() }
    }
}

impl<Id> Model<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, state: State<Id>) -> &mut Self {
        self.states.push(state);
        self
    }

    pub fn with_state(mut self, state: State<Id>) -> Self {
        self.states.push(state);
        self
    }

    pub fn states(&self) -> &[State<Id>] {
        &self.states
    }

    pub fn state(&self, index: usize) -> Option<&State<Id>> {
        self.states.get(index)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Indices of the initial states.
    pub fn initial_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.states.iter().enumerate().filter(|(_, s)| s.is_initial).map(|(i, _)| i)
    }

    /// Indices of the states labelled with `property`.
    pub fn labelled(&self, property: &str) -> impl Iterator<Item = usize> + '_ {
        let property = property.to_string();
        self.states
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.has_property(&property))
            .map(|(i, _)| i)
    }
}

impl<Id: Eq + Hash> Model<Id> {
    /// Index of the first state with the given id.
    pub fn index_of(&self, id: &Id) -> Option<usize> {
        self.states.iter().position(|s| &s.id == id)
    }

    /// Successor lists by state index. Dangling transitions are dropped; a transition to an id
    /// shared by several states leads to all of them.
    pub fn successor_indices(&self) -> Vec<Vec<usize>> {
        let mut by_id: HashMap<&Id, Vec<usize>> = HashMap::with_capacity(self.states.len());
        for (i, state) in self.states.iter().enumerate() {
            by_id.entry(&state.id).or_default().push(i);
        }

        self.states
            .iter()
            .map(|state| {
                let mut successors: Vec<usize> = state
                    .out_transitions
                    .iter()
                    .filter_map(|target| by_id.get(target))
                    .flatten()
                    .copied()
                    .collect();
                successors.sort_unstable();
                successors.dedup();
                successors
            })
            .collect()
    }
}

impl<Id> FromIterator<State<Id>> for Model<Id> {
    fn from_iter<T: IntoIterator<Item = State<Id>>>(iter: T) -> Self {
        Model {
            states: iter.into_iter().collect(),
        }
    }
}

impl<Id> From<Vec<State<Id>>> for Model<Id> {
    fn from(states: Vec<State<Id>>) -> Self {
        Model { states }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn sample() -> Model<&'static str> {
        Model::new()
            .with_state(State::new("a").initial().with_property("p").with_transitions(["b", "c", "b"]))
            .with_state(State::new("b").with_properties(["p", "q"]).with_transition("nowhere"))
            .with_state(State::new("c").with_transition("a"))
    }

    #[test]
    fn test_builder() {
        let model = sample();
        assert_eq!(model.len(), 3);
        assert_eq!(model.states()[0].out_transitions, vec!["b", "c"]);
        assert!(model.states()[1].has_property("q"));
        assert_eq!(model.initial_indices().collect::<Vec<_>>(), vec![0]);
        assert_eq!(model.labelled("p").collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(model.index_of(&"c"), Some(2));
        assert_eq!(model.index_of(&"zzz"), None);
    }

    #[test]
    fn test_successors_drop_dangling() {
        let model = sample();
        assert_eq!(model.successor_indices(), vec![vec![1, 2], vec![], vec![0]]);
    }

    #[test]
    fn test_successors_with_shared_ids() {
        let model: Model<u32> = vec![
            State::new(0).with_transition(1),
            State::new(1),
            State::new(1).with_transition(0),
        ]
        .into();
        assert_eq!(model.successor_indices(), vec![vec![1, 2], vec![], vec![0]]);
    }
}
