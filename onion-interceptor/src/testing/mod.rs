//! Testing utilities for interceptor pipelines.
//!
//! This module provides:
//! - Mock clients with canned, failing or echoed responses
//! - A recording middleware and shared event log for ordering assertions

mod mocks;

pub use mocks::{EchoClient, EventLog, FailingClient, RecordingMiddleware, StaticClient};
