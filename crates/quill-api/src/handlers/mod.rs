//! HTTP handlers, one module per resource.

pub mod notes;
pub mod session;
pub mod tags;
pub mod users;
