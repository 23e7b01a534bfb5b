//! Recording test doubles for the client and bootstrap seams.
//!
//! Each double is cheap to clone and clones share their recordings, so a test
//! can hand one copy to the code under test and inspect the other.

use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::bootstrap::{ClientLoader, Confirm, Installer};
use crate::client::{ClientHandle, Credentials, FirecrawlService};
use crate::errors::{InstallError, ServiceError};
use crate::mapper::WireOptions;

/// Which service operation a call targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// A crawl.
    Crawl,
    /// A scrape.
    Scrape,
}

/// A call made against a [`RecordingService`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// The operation invoked.
    pub operation: Operation,
    /// The target URL.
    pub url: String,
    /// The options sent.
    pub options: WireOptions,
}

/// A service that records calls and replays scripted responses.
///
/// Once the script runs out, every call returns `{"success": true}`.
#[derive(Debug, Clone, Default)]
pub struct RecordingService {
    responses: Arc<Mutex<VecDeque<Result<Value, ServiceError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingService {
    /// Creates a service with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next call.
    #[must_use]
    pub fn then_respond(self, response: Result<Value, ServiceError>) -> Self {
        self.responses.lock().push_back(response);
        self
    }

    /// Returns every call made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Returns the number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(
        &self,
        operation: Operation,
        url: &str,
        options: &WireOptions,
    ) -> Result<Value, ServiceError> {
        self.calls.lock().push(RecordedCall {
            operation,
            url: url.to_string(),
            options: options.clone(),
        });
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({"success": true})))
    }
}

impl FirecrawlService for RecordingService {
    fn crawl_url(&self, url: &str, options: &WireOptions) -> Result<Value, ServiceError> {
        self.record(Operation::Crawl, url, options)
    }

    fn scrape_url(&self, url: &str, options: &WireOptions) -> Result<Value, ServiceError> {
        self.record(Operation::Scrape, url, options)
    }
}

/// A loader whose availability follows a script and whose clients share one
/// [`RecordingService`].
///
/// The last scripted availability repeats once the script is exhausted.
#[derive(Debug, Clone)]
pub struct StubLoader {
    availability: Arc<Mutex<VecDeque<bool>>>,
    service: RecordingService,
    checks: Arc<Mutex<usize>>,
    loads: Arc<Mutex<Vec<bool>>>,
}

impl StubLoader {
    /// A loader whose library is always available.
    #[must_use]
    pub fn available(service: RecordingService) -> Self {
        Self::scripted([true], service)
    }

    /// A loader whose library is never available.
    #[must_use]
    pub fn missing(service: RecordingService) -> Self {
        Self::scripted([false], service)
    }

    /// A loader reporting each scripted availability in turn.
    #[must_use]
    pub fn scripted(availability: impl IntoIterator<Item = bool>, service: RecordingService) -> Self {
        Self {
            availability: Arc::new(Mutex::new(availability.into_iter().collect())),
            service,
            checks: Arc::new(Mutex::new(0)),
            loads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the number of availability checks.
    #[must_use]
    pub fn check_count(&self) -> usize {
        *self.checks.lock()
    }

    /// Returns the number of clients built.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.lock().len()
    }

    /// Returns, per client built, whether it was given an API key.
    #[must_use]
    pub fn loads_with_key(&self) -> Vec<bool> {
        self.loads.lock().clone()
    }
}

impl ClientLoader for StubLoader {
    fn is_available(&self) -> bool {
        *self.checks.lock() += 1;
        let mut availability = self.availability.lock();
        if availability.len() > 1 {
            availability.pop_front().unwrap_or(false)
        } else {
            availability.front().copied().unwrap_or(false)
        }
    }

    fn load(&self, credentials: &Credentials) -> Result<ClientHandle, ServiceError> {
        self.loads.lock().push(credentials.has_key());
        Ok(ClientHandle::new(self.service.clone()))
    }
}

/// Gives a fixed answer and records every question asked.
#[derive(Debug, Clone)]
pub struct ScriptedConfirm {
    answer: bool,
    questions: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConfirm {
    /// Answers yes to everything.
    #[must_use]
    pub fn accept() -> Self {
        Self::answering(true)
    }

    /// Answers no to everything.
    #[must_use]
    pub fn decline() -> Self {
        Self::answering(false)
    }

    fn answering(answer: bool) -> Self {
        Self {
            answer,
            questions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the questions asked so far.
    #[must_use]
    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, question: &str) -> bool {
        self.questions.lock().push(question.to_string());
        self.answer
    }
}

/// An installer that records invocations instead of running anything.
#[derive(Debug, Clone)]
pub struct RecordingInstaller {
    outcome: Result<(), InstallError>,
    installs: Arc<Mutex<usize>>,
}

impl RecordingInstaller {
    /// An installer whose installs succeed.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::with_outcome(Ok(()))
    }

    /// An installer whose installs fail with `error`.
    #[must_use]
    pub fn failing(error: InstallError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<(), InstallError>) -> Self {
        Self {
            outcome,
            installs: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns the number of install attempts.
    #[must_use]
    pub fn install_count(&self) -> usize {
        *self.installs.lock()
    }
}

impl Installer for RecordingInstaller {
    fn describe(&self) -> String {
        "cargo add firecrawl-tools --features http-client".to_string()
    }

    fn install(&self) -> Result<(), InstallError> {
        *self.installs.lock() += 1;
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_service_replays_script() {
        let service = RecordingService::new()
            .then_respond(Err(ServiceError::Transport("reset".to_string())))
            .then_respond(Ok(json!({"data": 1})));

        assert!(service.scrape_url("https://a.example", &WireOptions::new()).is_err());
        assert_eq!(
            service.crawl_url("https://b.example", &WireOptions::new()),
            Ok(json!({"data": 1}))
        );
        assert_eq!(
            service.scrape_url("https://c.example", &WireOptions::new()),
            Ok(json!({"success": true}))
        );

        let calls = service.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].operation, Operation::Crawl);
        assert_eq!(calls[1].url, "https://b.example");
    }

    #[test]
    fn test_stub_loader_script_repeats_last() {
        let loader = StubLoader::scripted([false, true], RecordingService::new());

        assert!(!loader.is_available());
        assert!(loader.is_available());
        assert!(loader.is_available());
        assert_eq!(loader.check_count(), 3);
    }

    #[test]
    fn test_clones_share_recordings() {
        let error = InstallError::Spawn {
            program: "cargo".to_string(),
            reason: "not found".to_string(),
        };
        let installer = RecordingInstaller::failing(error.clone());
        let copy = installer.clone();

        assert_eq!(copy.install(), Err(error));
        assert_eq!(installer.install_count(), 1);
    }
}
