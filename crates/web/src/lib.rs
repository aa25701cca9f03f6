//! Testdeck Harness Web Server
//!
//! Serves the test-scenario harness as a JSON API: role-filtered scenario
//! lists parsed from a markdown document, per-session step-completion
//! tracking and viewport state, issue deep-link building, and testing-note
//! submission. The embedded application under test is an opaque remote
//! frame; this server never introspects it.

pub mod config;
pub mod server;
pub mod session;

pub use config::WebConfig;
pub use server::{build_router, AppState};
pub use session::{DeviceKind, HarnessSession};
