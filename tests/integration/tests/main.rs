//! End-to-End Integration Tests
//!
//! These tests run full migrations from an on-disk realm export against a
//! mock Descope management API.

mod common;
mod migration;
