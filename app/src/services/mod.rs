//! Request-level services built on the compositor.

pub mod generate;
pub mod store;
