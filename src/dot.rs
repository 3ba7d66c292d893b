//! Model to DOT (Graphviz) conversion.
//!
//! This module renders a [`Model`] as a directed graph in DOT format, optionally highlighting a
//! set of states (typically a SAT set computed by the checker). The output can be rendered with
//! Graphviz tools like `dot` or online viewers.
//!
//! # DOT Format
//!
//! The generated DOT output follows these conventions:
//! - **States** are rendered as circles named `s<index>`, labelled with the state id and,
//!   optionally, its properties
//! - **Initial states** receive an incoming arrow from an invisible point at the top (source rank)
//! - **Highlighted states** are filled with the configured colour
//! - **Edges** follow the transition relation; dangling transitions are not drawn
//!
//! # Examples
//!
//! ```
//! use ctl_rs::{Model, ModelChecker, State};
//!
//! let model: Model<u32> = vec![
//!     State::new(0).initial().with_property("p").with_transition(1),
//!     State::new(1).with_transition(0),
//! ]
//! .into();
//!
//! let sat = ModelChecker::new(&model).sat(&"EX p".parse().unwrap()).unwrap();
//! let dot = model.to_dot(Some(&sat)).unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.starts_with("digraph {"));
//! ```

use std::fmt::Display;
use std::hash::Hash;

use crate::model::Model;
use crate::state_set::StateSet;

/// Configuration options for DOT output generation.
///
/// Use `DotConfig::default()` for standard settings.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for state nodes (default: "circle")
    pub state_shape: &'static str,
    /// Shape for initial states (default: "doublecircle")
    pub initial_shape: &'static str,
    /// Fill colour for highlighted states (default: "lightblue")
    pub highlight_color: &'static str,
    /// Whether to list the properties of each state in its label (default: true)
    pub show_properties: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            state_shape: "circle",
            initial_shape: "doublecircle",
            highlight_color: "lightblue",
            show_properties: true,
        }
    }
}

/// Escapes a string for use inside a double-quoted DOT label.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl<Id: Eq + Hash + Display> Model<Id> {
    /// Converts the model to DOT format, filling the states in `highlight`.
    pub fn to_dot(&self, highlight: Option<&StateSet>) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(highlight, &DotConfig::default())
    }

    /// Converts the model to DOT format with custom configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctl_rs::dot::DotConfig;
    /// use ctl_rs::{Model, State};
    ///
    /// let model: Model<&str> = vec![State::new("idle").initial().with_transition("idle")].into();
    ///
    /// let config = DotConfig {
    ///     show_properties: false,
    ///     ..DotConfig::default()
    /// };
    ///
    /// let dot = model.to_dot_with_config(None, &config).unwrap();
    /// assert!(dot.contains("s0 -> s0;"));
    /// ```
    pub fn to_dot_with_config(
        &self,
        highlight: Option<&StateSet>,
        config: &DotConfig,
    ) -> Result<String, std::fmt::Error> {
        use std::fmt::Write as _;

        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "node [shape={}];", config.state_shape)?;

        // States
        for (i, state) in self.states().iter().enumerate() {
            let mut label = escape(&state.id.to_string());
            if config.show_properties && !state.properties.is_empty() {
                let properties: Vec<String> = state.properties.iter().map(|p| escape(p)).collect();
                label = format!("{}\\n{{{}}}", label, properties.join(", "));
            }
            write!(dot, "s{} [label=\"{}\"", i, label)?;
            if state.is_initial {
                write!(dot, ", shape={}", config.initial_shape)?;
            }
            if highlight.is_some_and(|set| set.contains(i)) {
                write!(dot, ", style=filled, fillcolor={}", config.highlight_color)?;
            }
            writeln!(dot, "];")?;
        }

        // Entry arrows for initial states
        let initial: Vec<usize> = self.initial_indices().collect();
        if !initial.is_empty() {
            writeln!(dot, "{{ rank=source")?;
            for &i in initial.iter() {
                writeln!(dot, "init{} [shape=point, style=invis];", i)?;
            }
            writeln!(dot, "}}")?;
            for &i in initial.iter() {
                writeln!(dot, "init{} -> s{};", i, i)?;
            }
        }

        // Transitions
        for (i, successors) in self.successor_indices().iter().enumerate() {
            for &j in successors.iter() {
                writeln!(dot, "s{} -> s{};", i, j)?;
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
