// src/decode/graph.rs
//
// Hydration of "devalue"-style documents: a flat table of slots where
// composite slots hold integer references to other slots. References may
// form cycles, so every slot is resolved at most once into an arena node
// and composites are registered before their children are visited.
//
// Negative references are sentinels and never touch the slot table:
//   -1 undefined, -2 array hole, -3 NaN, -4 +inf, -5 -inf, -6 -0.0

use serde_json::{Map, Number, Value};

use crate::error::DecodeError;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Undefined,
    Hole,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<NodeId>),
    Object(Vec<(String, NodeId)>),
    /// Slot shapes we don't hydrate (typed tuples like `["Date", …]`).
    Raw(Value),
}

// Fixed arena positions for sentinel values.
const UNDEFINED: NodeId = 0;
const HOLE: NodeId = 1;
const NAN: NodeId = 2;
const POS_INF: NodeId = 3;
const NEG_INF: NodeId = 4;
const NEG_ZERO: NodeId = 5;
const FIRST_SLOT_NODE: NodeId = 6;

// Output values allowed per arena node in `to_json`, with a floor for tiny graphs.
const JSON_BUDGET_FACTOR: usize = 8;
const JSON_BUDGET_FLOOR: usize = 1024;

/// A fully resolved document. Node ids are stable; a slot reached through
/// several paths (or through itself) always yields the same id.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    root: NodeId,
}

/// Locate the slot table inside a `{ "nodes": [...] }` document and hydrate it.
///
/// Returns `Ok(None)` when there is no data node (a normal "no data" outcome),
/// and `Err` only when the slot table itself is malformed.
pub fn decode(doc: &Value) -> Result<Option<Graph>, DecodeError> {
    match data_slots(doc) {
        Some(slots) => decode_slots(slots),
        None => Ok(None),
    }
}

/// First `nodes[i]` with `type == "data"` and a `data` array.
pub fn data_slots(doc: &Value) -> Option<&[Value]> {
    doc.get("nodes")?
        .as_array()?
        .iter()
        .find(|n| n.get("type").and_then(Value::as_str) == Some("data") && n.get("data").is_some_and(Value::is_array))
        .and_then(|n| n.get("data"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

/// Hydrate a raw slot table. Slot 0 is the root.
pub fn decode_slots(slots: &[Value]) -> Result<Option<Graph>, DecodeError> {
    if slots.is_empty() {
        return Ok(None);
    }
    let mut h = Hydrator::new(slots);
    let root = h.resolve(0, 0)?;
    h.drain()?;
    Ok(Some(Graph { nodes: h.nodes, root }))
}

struct Hydrator<'a> {
    slots: &'a [Value],
    memo: Vec<Option<NodeId>>,
    nodes: Vec<Node>,
    // Composites registered but not yet filled: (node, slot).
    pending: Vec<(NodeId, usize)>,
}

impl<'a> Hydrator<'a> {
    fn new(slots: &'a [Value]) -> Self {
        let mut nodes = Vec::with_capacity(FIRST_SLOT_NODE + slots.len());
        nodes.extend([
            Node::Undefined,
            Node::Hole,
            Node::Number(f64::NAN),
            Node::Number(f64::INFINITY),
            Node::Number(f64::NEG_INFINITY),
            Node::Number(-0.0),
        ]);
        Self { slots, memo: vec![None; slots.len()], nodes, pending: Vec::new() }
    }

    /// Resolve reference `r` found in slot `from`.
    fn resolve(&mut self, r: i64, from: usize) -> Result<NodeId, DecodeError> {
        if r < 0 {
            return match r {
                -1 => Ok(UNDEFINED),
                -2 => Ok(HOLE),
                -3 => Ok(NAN),
                -4 => Ok(POS_INF),
                -5 => Ok(NEG_INF),
                -6 => Ok(NEG_ZERO),
                other => Err(DecodeError::UnknownSentinel(other)),
            };
        }
        let ix = usize::try_from(r)
            .ok()
            .filter(|&i| i < self.slots.len())
            .ok_or(DecodeError::DanglingReference { slot: from, target: r })?;

        if let Some(id) = self.memo[ix] {
            return Ok(id);
        }

        let node = match &self.slots[ix] {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Number(n) => Node::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Node::String(s.clone()),
            Value::Array(a) if a.first().is_some_and(Value::is_string) => Node::Raw(Value::Array(a.clone())),
            Value::Array(a) => Node::Array(Vec::with_capacity(a.len())),
            Value::Object(m) => Node::Object(Vec::with_capacity(m.len())),
        };
        let composite = matches!(node, Node::Array(_) | Node::Object(_));

        let id = self.nodes.len();
        self.nodes.push(node);
        // Register before children are visited; a cycle back here finds `id`.
        self.memo[ix] = Some(id);
        if composite {
            self.pending.push((id, ix));
        }
        Ok(id)
    }

    fn drain(&mut self) -> Result<(), DecodeError> {
        let slots = self.slots;
        while let Some((id, ix)) = self.pending.pop() {
            match &slots[ix] {
                Value::Array(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for v in items {
                        out.push(self.resolve(as_ref(v, ix)?, ix)?);
                    }
                    self.nodes[id] = Node::Array(out);
                }
                Value::Object(map) => {
                    let mut out = Vec::with_capacity(map.len());
                    for (k, v) in map {
                        out.push((k.clone(), self.resolve(as_ref(v, ix)?, ix)?));
                    }
                    self.nodes[id] = Node::Object(out);
                }
                _ => unreachable!("only composites are queued"),
            }
        }
        Ok(())
    }
}

fn as_ref(v: &Value, slot: usize) -> Result<i64, DecodeError> {
    v.as_i64().ok_or_else(|| DecodeError::BadReference { slot, value: v.to_string() })
}

impl Graph {
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef { graph: self, id: self.root }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { graph: self, id }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= FIRST_SLOT_NODE
    }

    /// Convert to a plain JSON tree.
    ///
    /// - a reference back to a node still being converted (a cycle) becomes `null`
    /// - non-finite numbers become `null`
    /// - `undefined` members are dropped from objects; in arrays they and holes become `null`
    ///
    /// Shared nodes are copied at every use, so output size is capped at
    /// `JSON_BUDGET_FACTOR` values per arena node. Past that the document
    /// is treated as no data (`None`).
    pub fn to_json(&self) -> Option<Value> {
        let mut on_path = vec![false; self.nodes.len()];
        let mut budget = self.nodes.len().saturating_mul(JSON_BUDGET_FACTOR).max(JSON_BUDGET_FLOOR);
        let out = self.json_at(self.root, &mut on_path, &mut budget);
        if out.is_none() {
            logw!("Graph: JSON expansion of {} nodes exceeded its budget", self.nodes.len());
        }
        out
    }

    fn json_at(&self, id: NodeId, on_path: &mut [bool], budget: &mut usize) -> Option<Value> {
        *budget = budget.checked_sub(1)?;
        if on_path[id] {
            logd!("Graph: cycle at node {id} cut during JSON conversion");
            return Some(Value::Null);
        }
        Some(match &self.nodes[id] {
            Node::Undefined | Node::Hole | Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => number(*n),
            Node::String(s) => Value::String(s.clone()),
            Node::Raw(v) => v.clone(),
            Node::Array(items) => {
                on_path[id] = true;
                let out = items
                    .iter()
                    .map(|&c| self.json_at(c, on_path, budget))
                    .collect::<Option<Vec<_>>>();
                on_path[id] = false;
                Value::Array(out?)
            }
            Node::Object(members) => {
                on_path[id] = true;
                let mut out = Map::with_capacity(members.len());
                for (k, c) in members {
                    if matches!(self.nodes[*c], Node::Undefined) {
                        continue;
                    }
                    let Some(v) = self.json_at(*c, on_path, budget) else {
                        on_path[id] = false;
                        return None;
                    };
                    out.insert(k.clone(), v);
                }
                on_path[id] = false;
                Value::Object(out)
            }
        })
    }
}

fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 && !(n == 0.0 && n.is_sign_negative()) {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// Borrowed cursor into a [`Graph`].
#[derive(Clone, Copy)]
pub struct NodeRef<'g> {
    graph: &'g Graph,
    id: NodeId,
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeRef({}: {:?})", self.id, self.node())
    }
}

impl<'g> NodeRef<'g> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'g Node {
        &self.graph.nodes[self.id]
    }

    /// Reference equality: both cursors point at the same hydrated node.
    pub fn same(&self, other: &NodeRef<'_>) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }

    pub fn get(&self, key: &str) -> Option<NodeRef<'g>> {
        match self.node() {
            Node::Object(members) => members
                .iter()
                .find(|(k, _)| k == key)
                .map(|&(_, id)| NodeRef { graph: self.graph, id }),
            _ => None,
        }
    }

    pub fn at(&self, i: usize) -> Option<NodeRef<'g>> {
        match self.node() {
            Node::Array(items) => items.get(i).map(|&id| NodeRef { graph: self.graph, id }),
            _ => None,
        }
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'g>> + 'g {
        let graph = self.graph;
        let ids: &'g [NodeId] = match self.node() {
            Node::Array(items) => items,
            _ => &[],
        };
        ids.iter().map(move |&id| NodeRef { graph, id })
    }

    pub fn as_str(&self) -> Option<&'g str> {
        match self.node() {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.node() {
            Node::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self.node(), Node::Undefined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slots(v: Value) -> Vec<Value> {
        v.as_array().unwrap().clone()
    }

    #[test]
    fn scalars_resolve_as_is() {
        let g = decode_slots(&slots(json!([{"a": 1, "b": 2, "c": 3}, "x", true, null]))).unwrap().unwrap();
        let root = g.root();
        assert_eq!(root.get("a").unwrap().as_str(), Some("x"));
        assert_eq!(root.get("b").unwrap().node(), &Node::Bool(true));
        assert_eq!(root.get("c").unwrap().node(), &Node::Null);
    }

    #[test]
    fn numbers_are_terminal() {
        // 1 in slot 1 is the literal number one, not a reference to slot 1.
        let g = decode_slots(&slots(json!([[1], 1]))).unwrap().unwrap();
        assert_eq!(g.root().at(0).unwrap().as_f64(), Some(1.0));
    }

    #[test]
    fn object_keeps_key_order() {
        let g = decode_slots(&slots(json!([{"z": 1, "a": 2, "m": 3}, 10, 20, 30]))).unwrap().unwrap();
        let Node::Object(members) = g.root().node() else { panic!("root not an object") };
        let keys: Vec<&str> = members.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn shared_slot_resolves_once() {
        let g = decode_slots(&slots(json!([{"a": 1, "b": 1}, {"v": 2}, "leaf"]))).unwrap().unwrap();
        let a = g.root().get("a").unwrap();
        let b = g.root().get("b").unwrap();
        assert!(a.same(&b));
    }

    #[test]
    fn self_cycle_terminates() {
        let g = decode_slots(&slots(json!([{"me": 0, "name": 1}, "root"]))).unwrap().unwrap();
        let root = g.root();
        assert!(root.get("me").unwrap().same(&root));
        assert_eq!(root.get("me").unwrap().get("name").unwrap().as_str(), Some("root"));
    }

    #[test]
    fn typed_tuple_passes_through() {
        let g = decode_slots(&slots(json!([{"when": 1}, ["Date", "2024-01-01T00:00:00.000Z"]]))).unwrap().unwrap();
        assert_eq!(
            g.root().get("when").unwrap().node(),
            &Node::Raw(json!(["Date", "2024-01-01T00:00:00.000Z"]))
        );
    }

    #[test]
    fn unknown_sentinel_is_an_error() {
        let err = decode_slots(&slots(json!([[-7]]))).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownSentinel(-7)));
    }

    #[test]
    fn dangling_reference_is_an_error() {
        let err = decode_slots(&slots(json!([[5]]))).unwrap_err();
        assert!(matches!(err, DecodeError::DanglingReference { slot: 0, target: 5 }));
    }

    #[test]
    fn non_integer_reference_is_an_error() {
        let err = decode_slots(&slots(json!([{"a": "1"}, 2]))).unwrap_err();
        assert!(matches!(err, DecodeError::BadReference { slot: 0, .. }));
    }

    #[test]
    fn json_conversion_cuts_cycles_and_drops_undefined() {
        let g = decode_slots(&slots(json!([{"me": 0, "gone": -1, "n": 1, "inf": -4}, 7]))).unwrap().unwrap();
        assert_eq!(g.to_json(), Some(json!({"me": null, "n": 7, "inf": null})));
    }

    /// Slot i is `{"a": i+1, "b": i+1}`; the last slot is a leaf string.
    fn diamond_chain(levels: usize) -> Vec<Value> {
        let mut v: Vec<Value> = (0..levels).map(|i| json!({"a": i + 1, "b": i + 1})).collect();
        v.push(json!("leaf"));
        v
    }

    #[test]
    fn shared_chain_stays_small_in_the_arena() {
        let g = decode_slots(&diamond_chain(64)).unwrap().unwrap();
        assert_eq!(g.len(), FIRST_SLOT_NODE + 65);
        let mut n = g.root();
        for _ in 0..64 {
            let a = n.get("a").unwrap();
            assert!(a.same(&n.get("b").unwrap()));
            n = a;
        }
        assert_eq!(n.as_str(), Some("leaf"));
    }

    #[test]
    fn exponential_json_expansion_is_refused() {
        let g = decode_slots(&diamond_chain(40)).unwrap().unwrap();
        assert_eq!(g.to_json(), None);

        // A short chain still flattens.
        let g = decode_slots(&diamond_chain(3)).unwrap().unwrap();
        let leafy = json!({"a": "leaf", "b": "leaf"});
        let two = json!({"a": leafy, "b": leafy});
        assert_eq!(g.to_json(), Some(json!({"a": two, "b": two})));
    }
}
