//! Commands Layer
//!
//! Entry points an HTTP layer maps onto its routes. Each takes the caller's
//! `RequestContext` explicitly.

mod menu_cmd;
mod node_cmd;

pub use menu_cmd::*;
pub use node_cmd::*;
