//! Built-in page settings and the override layers applied on top of them.

pub mod job;
pub mod layout;
