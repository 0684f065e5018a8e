//! Shared test utilities for companyintel integration tests.
//!
//! This module provides:
//! - JSON/struct builders for jobs and records as the backend sends them
//! - `FakeApi`, an in-memory implementation of the API trait
//! - `StubServer`, an axum server for wire-level checks

#![allow(dead_code)]

pub mod builders;
pub mod fake_api;
pub mod stub_server;

pub use builders::*;
pub use fake_api::FakeApi;
pub use stub_server::{CapturedRequest, StubServer};
