//! Shared test helpers for `clicktick-core` integration tests.
//!
//! In-memory stand-ins for every port, recording the calls they receive so
//! tests can assert on call counts and ordering.

#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;
