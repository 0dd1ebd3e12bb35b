//! # Task Console Testing Utils
//!
//! Shared testing utilities for the task console workspace.
//!
//! - **Mock collaborators**: in-memory node directory and task submitter
//! - **Test data builders**: drafts and stored task records with sensible defaults
//!
//! ```toml
//! [dev-dependencies]
//! task-console-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod mocks;

pub use builders::*;
pub use mocks::*;
