// src/decode/mod.rs
//! Response decoding: the slot-graph hydrator and the envelope sniffing
//! that picks between graph-encoded and plain JSON bodies.
pub mod envelope;
pub mod graph;

pub use envelope::{Envelope, body_to_value};
pub use graph::{Graph, Node, NodeId, NodeRef, decode, decode_slots};
