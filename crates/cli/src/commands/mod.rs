//! CLI command implementations

pub mod issue;
pub mod note;
pub mod scenario;
