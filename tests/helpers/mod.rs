// Shared test infrastructure for the workflow tests.
//
// Include from a test target with:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
#![allow(dead_code)]

pub mod fake_backend;

pub use fake_backend::*;
pub use fixtures::*;
