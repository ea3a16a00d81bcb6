// src/decode/envelope.rs
//
// Upstream endpoints answer in one of two envelopes for the same data:
// a graph document (`{"nodes": [...]}`) or plain JSON. Both are permanent;
// we try them in a fixed order and say so when neither fits.

use serde_json::Value;

use super::graph::{self, Graph};
use crate::error::DecodeError;

#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Graph(Graph),
    Plain(Value),
    Unrecognized,
}

impl Envelope {
    pub fn parse(body: &str) -> Result<Self, DecodeError> {
        let v: Value = serde_json::from_str(body)?;
        Self::from_value(v)
    }

    pub fn from_value(v: Value) -> Result<Self, DecodeError> {
        if v.get("nodes").is_some_and(Value::is_array) {
            return Ok(match graph::decode(&v)? {
                Some(g) => Envelope::Graph(g),
                None => {
                    logd!("Envelope: graph document without a data node");
                    Envelope::Unrecognized
                }
            });
        }
        Ok(match v {
            Value::Object(_) | Value::Array(_) => Envelope::Plain(v),
            _ => Envelope::Unrecognized,
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Graph(_) => "graph",
            Envelope::Plain(_) => "plain",
            Envelope::Unrecognized => "unrecognized",
        }
    }

    /// Flatten to a JSON tree; `None` for an unrecognized envelope or a graph
    /// too large to flatten.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Envelope::Graph(g) => g.to_json(),
            Envelope::Plain(v) => Some(v),
            Envelope::Unrecognized => None,
        }
    }
}

/// Parse a response body straight to a JSON tree, treating every decode
/// failure as "no data". The caller names the endpoint for the log line.
pub fn body_to_value(body: &str, what: &str) -> Option<Value> {
    match Envelope::parse(body) {
        Ok(env) => {
            let kind = env.kind();
            let v = env.into_value();
            if v.is_none() {
                logw!("Decode: {what}: {kind} envelope carried no data");
            }
            v
        }
        Err(e) => {
            logw!("Decode: {what}: {e}");
            None
        }
    }
}
