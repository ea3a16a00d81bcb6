// src/core/mod.rs
pub mod net;

pub use net::{Fetch, ProxyClient};
