use std::collections::{HashMap, HashSet, VecDeque};
use std::panic::{self, AssertUnwindSafe};

use super::{EvalError, GraphError};
use crate::coords::{Vec2, Vec3};
use crate::paint::Color;
use crate::signal::{SignalIndex, SignalSnapshot, Smoother, Value, ValueKind};

type DeriveFn = Box<dyn Fn(&Inputs<'_>) -> Result<Value, EvalError>>;

/// Handle to a derived property. Valid for the graph built from the issuing builder.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PropertyId(usize);

/// Input values handed to a mapping function, in declaration order.
#[derive(Debug, Copy, Clone)]
pub struct Inputs<'a> {
    values: &'a [Value],
}

impl<'a> Inputs<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self { values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, index: usize) -> Result<Value, EvalError> {
        self.values
            .get(index)
            .copied()
            .ok_or(EvalError::MissingInput { index })
    }

    pub fn scalar(&self, index: usize) -> Result<f32, EvalError> {
        let v = self.value(index)?;
        v.as_scalar().ok_or(mismatch(index, ValueKind::Scalar, &v))
    }

    pub fn vec2(&self, index: usize) -> Result<Vec2, EvalError> {
        let v = self.value(index)?;
        v.as_vec2().ok_or(mismatch(index, ValueKind::Vec2, &v))
    }

    pub fn vec3(&self, index: usize) -> Result<Vec3, EvalError> {
        let v = self.value(index)?;
        v.as_vec3().ok_or(mismatch(index, ValueKind::Vec3, &v))
    }

    pub fn color(&self, index: usize) -> Result<Color, EvalError> {
        let v = self.value(index)?;
        v.as_color().ok_or(mismatch(index, ValueKind::Color, &v))
    }
}

fn mismatch(index: usize, expected: ValueKind, found: &Value) -> EvalError {
    EvalError::TypeMismatch {
        index,
        expected,
        found: found.kind(),
    }
}

struct NodeDecl {
    name: String,
    inputs: Vec<String>,
    eval: DeriveFn,
}

/// Collects property declarations. Nothing is resolved until [`GraphBuilder::build`].
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<NodeDecl>,
    names: HashMap<String, usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a property computed from a single input.
    pub fn map<F>(&mut self, name: impl Into<String>, input: &str, f: F) -> Result<PropertyId, GraphError>
    where
        F: Fn(Value) -> Result<Value, EvalError> + 'static,
    {
        self.combine(name, &[input], move |inputs| f(inputs.value(0)?))
    }

    /// Declares a property computed from several inputs, read in the given order.
    ///
    /// Inputs may name signals or properties, including properties declared later.
    /// A property listing itself is rejected here; longer cycles are caught by `build`.
    pub fn combine<F>(
        &mut self,
        name: impl Into<String>,
        inputs: &[&str],
        f: F,
    ) -> Result<PropertyId, GraphError>
    where
        F: Fn(&Inputs<'_>) -> Result<Value, EvalError> + 'static,
    {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(GraphError::DuplicateProperty(name));
        }
        if inputs.iter().any(|i| *i == name) {
            return Err(GraphError::CyclicDerivation {
                path: vec![name.clone(), name],
            });
        }

        let id = self.nodes.len();
        self.names.insert(name.clone(), id);
        self.nodes.push(NodeDecl {
            name,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            eval: Box::new(f),
        });
        Ok(PropertyId(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolves every input against `signals` and the declared properties, and fixes
    /// the evaluation order.
    pub fn build(self, signals: &Smoother) -> Result<DerivationGraph, GraphError> {
        let GraphBuilder { nodes: decls, names } = self;

        for decl in &decls {
            if signals.index_of(&decl.name).is_some() {
                return Err(GraphError::DuplicateProperty(decl.name.clone()));
            }
        }

        let mut nodes = Vec::with_capacity(decls.len());
        for decl in decls {
            let inputs = decl
                .inputs
                .iter()
                .map(|input| {
                    if let Some(&p) = names.get(input) {
                        Ok(Source::Property(p))
                    } else if let Some(s) = signals.index_of(input) {
                        Ok(Source::Signal(s))
                    } else {
                        Err(GraphError::UnknownSignal(input.clone()))
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;

            nodes.push(Node {
                name: decl.name,
                inputs,
                eval: decl.eval,
                faulted: false,
            });
        }

        let order = topological_order(&nodes)?;

        log::debug!(
            "derivation graph built: {} properties over {} signals",
            nodes.len(),
            signals.len()
        );

        let len = nodes.len();
        Ok(DerivationGraph {
            nodes,
            order,
            names: names.into_iter().map(|(k, v)| (k, PropertyId(v))).collect(),
            values: vec![None; len],
            scratch: Vec::new(),
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Source {
    Signal(SignalIndex),
    Property(usize),
}

struct Node {
    name: String,
    inputs: Vec<Source>,
    eval: DeriveFn,
    faulted: bool,
}

impl Node {
    fn property_inputs(&self) -> impl Iterator<Item = usize> + '_ {
        self.inputs.iter().filter_map(|s| match s {
            Source::Property(p) => Some(*p),
            Source::Signal(_) => None,
        })
    }
}

/// Kahn's algorithm over property → property edges.
fn topological_order(nodes: &[Node]) -> Result<Vec<usize>, GraphError> {
    let mut in_degree = vec![0usize; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];

    for (i, node) in nodes.iter().enumerate() {
        for p in node.property_inputs() {
            in_degree[i] += 1;
            dependents[p].push(i);
        }
    }

    let mut ready: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(i) = ready.pop_front() {
        order.push(i);
        for &d in &dependents[i] {
            in_degree[d] -= 1;
            if in_degree[d] == 0 {
                ready.push_back(d);
            }
        }
    }

    if order.len() == nodes.len() {
        return Ok(order);
    }

    let stuck: HashSet<usize> = (0..nodes.len()).filter(|&i| in_degree[i] > 0).collect();
    Err(GraphError::CyclicDerivation {
        path: trace_cycle(nodes, &stuck),
    })
}

/// Walks inputs inside the unresolved set until a node repeats, giving `a → b → a`.
///
/// Every stuck node has at least one stuck input, so the walk cannot dead-end.
fn trace_cycle(nodes: &[Node], stuck: &HashSet<usize>) -> Vec<String> {
    let Some(&start) = stuck.iter().min() else {
        return Vec::new();
    };

    let mut seen: HashMap<usize, usize> = HashMap::new();
    let mut walk = vec![start];
    let mut current = start;

    loop {
        seen.insert(current, walk.len() - 1);
        let Some(next) = nodes[current].property_inputs().find(|p| stuck.contains(p)) else {
            break;
        };
        walk.push(next);
        if let Some(&at) = seen.get(&next) {
            // Report only the loop, not the lead-in.
            return walk[at..].iter().map(|&i| nodes[i].name.clone()).collect();
        }
        current = next;
    }

    walk.iter().map(|&i| nodes[i].name.clone()).collect()
}

/// Resolved, acyclic set of derived properties with their last good values.
pub struct DerivationGraph {
    nodes: Vec<Node>,
    order: Vec<usize>,
    names: HashMap<String, PropertyId>,
    values: Vec<Option<Value>>,
    scratch: Vec<Value>,
}

impl DerivationGraph {
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn id_of(&self, name: &str) -> Option<PropertyId> {
        self.names.get(name).copied()
    }

    pub fn name(&self, id: PropertyId) -> Option<&str> {
        self.nodes.get(id.0).map(|n| n.name.as_str())
    }

    /// Last successfully computed value; `None` until the first good evaluation.
    #[inline]
    pub fn value(&self, id: PropertyId) -> Option<Value> {
        self.values.get(id.0).copied().flatten()
    }

    pub fn value_by_name(&self, name: &str) -> Option<Value> {
        self.id_of(name).and_then(|id| self.value(id))
    }

    /// Whether the most recent evaluation of `id` failed.
    pub fn is_faulted(&self, id: PropertyId) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.faulted)
    }

    /// Property names in evaluation order.
    pub fn evaluation_order(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|&i| self.nodes[i].name.as_str())
    }

    /// Recomputes every property from `snapshot`, dependencies first.
    ///
    /// A failing property keeps its previous value; evaluation continues with the
    /// rest. Returns the number of properties that failed this tick.
    pub fn evaluate_all(&mut self, snapshot: &SignalSnapshot) -> usize {
        let Self {
            nodes,
            order,
            values,
            scratch,
            ..
        } = self;

        let mut faults = 0;
        for &i in order.iter() {
            let node = &mut nodes[i];

            let result = gather(&node.inputs, snapshot, values, scratch)
                .and_then(|()| run_guarded(&node.eval, Inputs::new(scratch)));

            match result {
                Ok(v) => {
                    if node.faulted {
                        log::info!("property {} recovered", node.name);
                        node.faulted = false;
                    }
                    values[i] = Some(v);
                }
                Err(err) => {
                    if !node.faulted {
                        log::warn!("property {} failed, keeping previous value: {err}", node.name);
                        node.faulted = true;
                    }
                    faults += 1;
                }
            }
        }
        faults
    }
}

fn gather(
    inputs: &[Source],
    snapshot: &SignalSnapshot,
    values: &[Option<Value>],
    out: &mut Vec<Value>,
) -> Result<(), EvalError> {
    out.clear();
    for (index, src) in inputs.iter().enumerate() {
        let v = match *src {
            Source::Signal(s) => snapshot.get(s),
            Source::Property(p) => values[p],
        };
        out.push(v.ok_or(EvalError::MissingInput { index })?);
    }
    Ok(())
}

fn run_guarded(eval: &DeriveFn, inputs: Inputs<'_>) -> Result<Value, EvalError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| eval(&inputs)));
    let value = match outcome {
        Ok(result) => result?,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            return Err(EvalError::Panicked(msg));
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{Smoothing, POINTER, SCROLL_TOP};

    fn signals() -> Smoother {
        let mut s = Smoother::new();
        s.register(SCROLL_TOP, Value::Scalar(0.0), Smoothing::Immediate).unwrap();
        s.register(POINTER, Value::Vec2(Vec2::zero()), Smoothing::Immediate).unwrap();
        s
    }

    fn double(v: Value) -> Result<Value, EvalError> {
        let x = v.as_scalar().ok_or(EvalError::Failed("not a scalar".into()))?;
        Ok(Value::Scalar(x * 2.0))
    }

    // ── registration ──────────────────────────────────────────────────────

    #[test]
    fn unknown_input_is_rejected_at_build() {
        let mut b = GraphBuilder::new();
        b.map("a", "nope", double).unwrap();
        let err = b.build(&signals()).err().unwrap();
        assert_eq!(err, GraphError::UnknownSignal("nope".into()));
    }

    #[test]
    fn duplicate_property_is_rejected() {
        let mut b = GraphBuilder::new();
        b.map("a", "scrollTop", double).unwrap();
        assert_eq!(
            b.map("a", "scrollTop", double).unwrap_err(),
            GraphError::DuplicateProperty("a".into())
        );
    }

    #[test]
    fn property_shadowing_a_signal_is_rejected() {
        let mut b = GraphBuilder::new();
        b.map("pointer", "scrollTop", double).unwrap();
        let err = b.build(&signals()).err().unwrap();
        assert_eq!(err, GraphError::DuplicateProperty("pointer".into()));
    }

    #[test]
    fn self_reference_is_rejected_immediately() {
        let mut b = GraphBuilder::new();
        let err = b.combine("a", &["scrollTop", "a"], |_| Ok(Value::Scalar(0.0))).unwrap_err();
        assert!(matches!(err, GraphError::CyclicDerivation { .. }));
    }

    #[test]
    fn indirect_cycle_is_reported_with_path() {
        let mut b = GraphBuilder::new();
        b.map("lead", "a", double).unwrap();
        b.map("a", "b", double).unwrap();
        b.map("b", "c", double).unwrap();
        b.combine("c", &["scrollTop", "a"], |i| i.value(1)).unwrap();
        let err = b.build(&signals()).err().unwrap();
        let GraphError::CyclicDerivation { path } = err else {
            panic!("expected a cycle");
        };
        assert_eq!(path.first(), path.last());
        assert_eq!(path.len(), 4);
        assert!(!path.contains(&"lead".to_string()));
    }

    // ── evaluation ────────────────────────────────────────────────────────

    #[test]
    fn forward_references_evaluate_in_dependency_order() {
        let mut s = signals();
        let mut b = GraphBuilder::new();
        let quad = b.map("quad", "twice", double).unwrap();
        b.map("twice", "scrollTop", double).unwrap();
        let mut g = b.build(&s).unwrap();

        s.update("scrollTop", Value::Scalar(3.0)).unwrap();
        assert_eq!(g.evaluate_all(&s.snapshot()), 0);
        assert_eq!(g.value(quad), Some(Value::Scalar(12.0)));
        let order: Vec<_> = g.evaluation_order().collect();
        assert_eq!(order, vec!["twice", "quad"]);
    }

    #[test]
    fn combine_reads_inputs_in_order() {
        let s = signals();
        let mut b = GraphBuilder::new();
        let id = b
            .combine("sum", &["pointer", "scrollTop"], |i| {
                let p = i.vec2(0)?;
                Ok(Value::Scalar(p.x + p.y + i.scalar(1)?))
            })
            .unwrap();
        let mut g = b.build(&s).unwrap();
        let mut s = s;
        s.update("pointer", Value::Vec2(Vec2::new(1.0, 2.0))).unwrap();
        s.update("scrollTop", Value::Scalar(10.0)).unwrap();
        g.evaluate_all(&s.snapshot());
        assert_eq!(g.value(id), Some(Value::Scalar(13.0)));
    }

    #[test]
    fn type_mismatch_is_a_fault_not_a_crash() {
        let s = signals();
        let mut b = GraphBuilder::new();
        let id = b.combine("bad", &["pointer"], |i| Ok(Value::Scalar(i.scalar(0)?))).unwrap();
        let mut g = b.build(&s).unwrap();
        assert_eq!(g.evaluate_all(&s.snapshot()), 1);
        assert_eq!(g.value(id), None);
        assert!(g.is_faulted(id));
    }

    #[test]
    fn failing_property_keeps_previous_value() {
        let mut s = signals();
        let mut b = GraphBuilder::new();
        let id = b
            .map("guarded", "scrollTop", |v| {
                let x = v.as_scalar().unwrap_or_default();
                if x > 100.0 {
                    Err(EvalError::Failed("too far".into()))
                } else {
                    Ok(Value::Scalar(x))
                }
            })
            .unwrap();
        let other = b.map("other", "scrollTop", double).unwrap();
        let mut g = b.build(&s).unwrap();

        s.update("scrollTop", Value::Scalar(50.0)).unwrap();
        g.evaluate_all(&s.snapshot());
        s.update("scrollTop", Value::Scalar(500.0)).unwrap();
        assert_eq!(g.evaluate_all(&s.snapshot()), 1);

        assert_eq!(g.value(id), Some(Value::Scalar(50.0)));
        assert_eq!(g.value(other), Some(Value::Scalar(1000.0)));

        s.update("scrollTop", Value::Scalar(60.0)).unwrap();
        assert_eq!(g.evaluate_all(&s.snapshot()), 0);
        assert!(!g.is_faulted(id));
    }

    #[test]
    fn panicking_mapping_is_contained() {
        let mut s = signals();
        let mut b = GraphBuilder::new();
        let id = b
            .map("fragile", "scrollTop", |v| {
                let x = v.as_scalar().unwrap_or_default();
                if x > 1.0 {
                    panic!("boom");
                }
                Ok(Value::Scalar(x))
            })
            .unwrap();
        let downstream = b.map("downstream", "fragile", double).unwrap();
        let mut g = b.build(&s).unwrap();

        g.evaluate_all(&s.snapshot());
        s.update("scrollTop", Value::Scalar(5.0)).unwrap();
        g.evaluate_all(&s.snapshot());

        assert_eq!(g.value(id), Some(Value::Scalar(0.0)));
        assert_eq!(g.value(downstream), Some(Value::Scalar(0.0)));
    }

    #[test]
    fn non_finite_result_is_rejected() {
        let s = signals();
        let mut b = GraphBuilder::new();
        let id = b.map("nan", "scrollTop", |_| Ok(Value::Scalar(f32::NAN))).unwrap();
        let mut g = b.build(&s).unwrap();
        assert_eq!(g.evaluate_all(&s.snapshot()), 1);
        assert_eq!(g.value(id), None);
    }

    #[test]
    fn all_properties_see_the_same_snapshot() {
        let mut s = signals();
        let mut b = GraphBuilder::new();
        let a = b.map("a", "scrollTop", Ok).unwrap();
        let c = b.map("c", "scrollTop", Ok).unwrap();
        let mut g = b.build(&s).unwrap();

        s.update("scrollTop", Value::Scalar(7.0)).unwrap();
        let snap = s.snapshot();
        s.update("scrollTop", Value::Scalar(99.0)).unwrap();
        g.evaluate_all(&snap);
        assert_eq!(g.value(a), g.value(c));
        assert_eq!(g.value(a), Some(Value::Scalar(7.0)));
    }

    #[test]
    fn lookups_by_name() {
        let s = signals();
        let mut b = GraphBuilder::new();
        let id = b.map("x", "scrollTop", Ok).unwrap();
        let g = b.build(&s).unwrap();
        assert_eq!(g.id_of("x"), Some(id));
        assert_eq!(g.name(id), Some("x"));
        assert_eq!(g.value_by_name("x"), None);
    }
}
