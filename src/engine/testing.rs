//! Test doubles for the generation pipeline.
//!
//! `ScriptedBackend` replays canned backend results in order, and
//! `RecordingPacer` captures backoff waits instead of sleeping.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::engine::generation::Pacer;
use crate::engine::llm_client::{BackendError, NarrativeBackend};
use crate::model::message::ChatMessage;

/// Shared view of how many times a backend was called.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Backend that returns scripted results, then fails once the script runs out.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, BackendError>>>,
    calls: CallCounter,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<String, BackendError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: CallCounter::default(),
        }
    }

    /// Backend that fails every call with a non-retryable error.
    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl NarrativeBackend for ScriptedBackend {
    fn complete(&self, _conversation: &[ChatMessage]) -> Result<String, BackendError> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .map_err(|_| BackendError::Other("script lock poisoned".into()))?
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Other("script exhausted".into())))
    }
}

/// Pacer that records requested waits and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingPacer {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, wait: Duration) {
        if let Ok(mut waits) = self.waits.lock() {
            waits.push(wait);
        }
    }
}
