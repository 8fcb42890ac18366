/*!
 * Mock backend for testing.
 *
 * The mock simulates the behaviors the batch translator has to cope with:
 * - `MockTranslator::working()` - upper-cases the text, keeping separators
 * - `MockTranslator::failing()` - always fails with the given error
 * - `MockTranslator::fail_times()` - fails a number of times, then works
 * - `MockTranslator::drop_separators()` - merges all segments into one
 * - `MockTranslator::empty()` - returns an empty translation
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::BackendError;
use crate::providers::Translator;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Always fails with this error
    Failing(BackendError),
    /// Fails with this error for the first `times` requests, then works
    FailTimes { times: usize, error: BackendError },
    /// Succeeds but loses the blank-line separators
    DropSeparators,
    /// Returns an empty string
    Empty,
}

/// A request as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

/// Mock backend for testing batch behavior
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every request received, shared between clones
    requests: Arc<Mutex<Vec<MockRequest>>>,
    /// Custom translation function used in working mode
    custom_response: Option<fn(&str) -> String>,
}

impl MockTranslator {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing(error: BackendError) -> Self {
        Self::new(MockBehavior::Failing(error))
    }

    pub fn fail_times(times: usize, error: BackendError) -> Self {
        Self::new(MockBehavior::FailTimes { times, error })
    }

    pub fn drop_separators() -> Self {
        Self::new(MockBehavior::DropSeparators)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Set a custom translation function for working mode
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the requests received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    fn translate_text(&self, text: &str) -> String {
        match self.custom_response {
            Some(generator) => generator(text),
            None => text.to_uppercase(),
        }
    }
}

impl Clone for MockTranslator {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            request_count: Arc::clone(&self.request_count),
            requests: Arc::clone(&self.requests),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, BackendError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(MockRequest {
            text: text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        });

        match &self.behavior {
            MockBehavior::Working => Ok(self.translate_text(text)),
            MockBehavior::Failing(error) => Err(error.clone()),
            MockBehavior::FailTimes { times, error } => {
                if count < *times {
                    Err(error.clone())
                } else {
                    Ok(self.translate_text(text))
                }
            }
            MockBehavior::DropSeparators => Ok(self.translate_text(&text.replace("\n\n", " "))),
            MockBehavior::Empty => Ok(String::new()),
        }
    }

    async fn test_connection(&self) -> Result<(), BackendError> {
        match &self.behavior {
            MockBehavior::Failing(error) => Err(error.clone()),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
