//! Testing utilities for code built on the crawl and scrape tools.
//!
//! This module provides recording doubles for the service client and the
//! bootstrap seams, so tools can be exercised without a network or a terminal.

mod mocks;

pub use mocks::{
    Operation, RecordedCall, RecordingInstaller, RecordingService, ScriptedConfirm, StubLoader,
};
