//! Fixtures for unit tests, doc-tests and benchmarks
//!
//! This module is public so that doc-tests can use it.
pub mod gtf;
