//! Derivation graph: pure functions from smoothed signals to renderable values.
//!
//! Properties are declared by name against signal names or other property names,
//! forward references included. `GraphBuilder::build` resolves the names, rejects
//! cycles and fixes a topological evaluation order; `DerivationGraph::evaluate_all`
//! then recomputes every property once per tick from one `SignalSnapshot`.

pub mod curves;
mod error;
mod graph;

pub use error::{EvalError, GraphError};
pub use graph::{DerivationGraph, GraphBuilder, Inputs, PropertyId};
