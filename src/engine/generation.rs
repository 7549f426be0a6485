use std::time::Duration;

use rand::Rng;

use crate::engine::fallback;
use crate::engine::llm_client::{conversation, BackendError, NarrativeBackend};
use crate::engine::sanitizer::{ReasoningFilter, ResponseSanitizer};
use crate::model::settings::RetrySettings;

/// Sanitized output shorter than this is treated as unusable.
pub const MIN_NARRATIVE_CHARS: usize = 50;

/// Blocks the calling thread between attempts. Injected so tests don't sleep.
pub trait Pacer: Send {
    fn pause(&self, wait: Duration);
}

pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, wait: Duration) {
        std::thread::sleep(wait);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub loading_wait_min: Duration,
    pub loading_wait_max: Duration,
    pub rate_limit_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(s: &RetrySettings) -> Self {
        Self {
            max_attempts: s.max_attempts.max(1),
            loading_wait_min: Duration::from_secs(s.loading_wait_min_secs),
            loading_wait_max: Duration::from_secs(s.loading_wait_max_secs),
            rate_limit_wait: Duration::from_secs(s.rate_limit_wait_secs),
        }
    }
}

impl RetryPolicy {
    /// How long to back off before retrying after `err`.
    pub fn wait_for(&self, err: &BackendError) -> Duration {
        let lo = self.loading_wait_min.min(self.loading_wait_max);
        let hi = self.loading_wait_min.max(self.loading_wait_max);

        match err {
            BackendError::Loading {
                estimated_wait: Some(hint),
            } => (*hint).clamp(lo, hi),
            BackendError::Loading { estimated_wait: None } => {
                if lo == hi {
                    lo
                } else {
                    rand::thread_rng().gen_range(lo..=hi)
                }
            }
            BackendError::RateLimited => self.rate_limit_wait,
            _ => Duration::ZERO,
        }
    }
}

/// Result of one generation call. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub story: String,
    pub is_fallback: bool,

    /// Why the canned story was used, for display
    pub notice: Option<String>,
}

pub struct GenerationClient {
    backend: Box<dyn NarrativeBackend>,
    sanitizer: Box<dyn ResponseSanitizer>,
    pacer: Box<dyn Pacer>,
    policy: RetryPolicy,
}

impl GenerationClient {
    pub fn new(backend: Box<dyn NarrativeBackend>) -> Self {
        Self {
            backend,
            sanitizer: Box::new(ReasoningFilter),
            pacer: Box::new(ThreadPacer),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_pacer(mut self, pacer: Box<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Box<dyn ResponseSanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn generate(&self, prompt: &str) -> Generation {
        let raw = match self.request(prompt) {
            Ok(raw) => raw,
            Err(err) => {
                let notice = if err.is_transient() {
                    format!("Le générateur n'a pas répondu après plusieurs tentatives ({err}). Récit de secours affiché.")
                } else {
                    format!("Le générateur est indisponible ({err}). Récit de secours affiché.")
                };
                return self.fallback(prompt, notice);
            }
        };

        let story = self.sanitizer.clean(&raw);
        if story.chars().count() < MIN_NARRATIVE_CHARS {
            tracing::warn!(
                raw_chars = raw.chars().count(),
                clean_chars = story.chars().count(),
                "sanitized narrative unusable"
            );
            return self.fallback(
                prompt,
                "Le texte généré était vide ou inutilisable. Récit de secours affiché.".into(),
            );
        }

        tracing::info!(chars = story.chars().count(), "narrative generated");
        Generation {
            story,
            is_fallback: false,
            notice: None,
        }
    }

    fn request(&self, prompt: &str) -> Result<String, BackendError> {
        let conversation = conversation(prompt);
        let mut attempt = 1;

        loop {
            match self.backend.complete(&conversation) {
                Ok(raw) => return Ok(raw),
                Err(err) if err.is_transient() && attempt < self.policy.max_attempts => {
                    let wait = self.policy.wait_for(&err);
                    tracing::warn!(attempt, ?wait, %err, "transient backend failure, retrying");
                    self.pacer.pause(wait);
                    attempt += 1;
                }
                Err(err) => {
                    tracing::warn!(attempt, %err, "giving up on backend");
                    return Err(err);
                }
            }
        }
    }

    fn fallback(&self, prompt: &str, notice: String) -> Generation {
        tracing::info!("serving canned story");
        Generation {
            story: fallback::story_for_prompt(prompt).to_string(),
            is_fallback: true,
            notice: Some(notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fallback::{BELLE_EPOQUE_STORY, RENAISSANCE_STORY};
    use crate::engine::testing::{RecordingPacer, ScriptedBackend};

    const GOOD_STORY: &str = "Dans les rues de Paris, les fiacres électriques glissaient sans bruit sous les réverbères.";

    fn client(backend: ScriptedBackend, pacer: &RecordingPacer) -> GenerationClient {
        GenerationClient::new(Box::new(backend)).with_pacer(Box::new(pacer.clone()))
    }

    #[test]
    fn success_returns_sanitized_story() {
        let pacer = RecordingPacer::default();
        let backend = ScriptedBackend::new(vec![Ok(format!("<think>I need a plan.</think>\n{GOOD_STORY}"))]);
        let generation = client(backend, &pacer).generate("pendant Belle Époque");

        assert_eq!(generation.story, GOOD_STORY);
        assert!(!generation.is_fallback);
        assert!(generation.notice.is_none());
        assert!(pacer.waits().is_empty());
    }

    #[test]
    fn permanent_error_falls_back_without_retrying() {
        let pacer = RecordingPacer::default();
        let backend = ScriptedBackend::new(vec![Err(BackendError::Other("boom".into()))]);
        let calls = backend.calls();
        let generation = client(backend, &pacer).generate("pendant Belle Époque");

        assert_eq!(generation.story, BELLE_EPOQUE_STORY);
        assert!(generation.is_fallback);
        assert!(generation.notice.is_some());
        assert_eq!(calls.get(), 1);
        assert!(pacer.waits().is_empty());
    }

    #[test]
    fn transient_errors_exhaust_three_attempts() {
        let pacer = RecordingPacer::default();
        let backend = ScriptedBackend::new(vec![
            Err(BackendError::RateLimited),
            Err(BackendError::Loading { estimated_wait: None }),
            Err(BackendError::RateLimited),
            Ok(GOOD_STORY.into()),
        ]);
        let calls = backend.calls();
        let policy = RetryPolicy {
            loading_wait_min: Duration::from_secs(15),
            loading_wait_max: Duration::from_secs(15),
            ..RetryPolicy::default()
        };
        let generation = client(backend, &pacer).with_policy(policy).generate("nulle part");

        assert_eq!(calls.get(), 3);
        assert_eq!(
            pacer.waits(),
            vec![Duration::from_secs(30), Duration::from_secs(15)]
        );
        assert_eq!(generation.story, RENAISSANCE_STORY);
        assert!(generation.is_fallback);
    }

    #[test]
    fn retry_then_success() {
        let pacer = RecordingPacer::default();
        let backend = ScriptedBackend::new(vec![Err(BackendError::RateLimited), Ok(GOOD_STORY.into())]);
        let generation = client(backend, &pacer).generate("x");

        assert!(!generation.is_fallback);
        assert_eq!(pacer.waits(), vec![Duration::from_secs(30)]);
    }

    #[test]
    fn empty_sanitized_output_falls_back() {
        let pacer = RecordingPacer::default();
        let backend = ScriptedBackend::new(vec![Ok("<think>I need to think about Renaissance".into())]);
        let generation = client(backend, &pacer).generate("pendant Renaissance");

        assert!(generation.is_fallback);
        assert_eq!(generation.story, RENAISSANCE_STORY);
    }

    #[test]
    fn loading_hint_is_clamped() {
        let policy = RetryPolicy::default();
        let hinted = |secs| BackendError::Loading {
            estimated_wait: Some(Duration::from_secs(secs)),
        };
        assert_eq!(policy.wait_for(&hinted(2)), Duration::from_secs(10));
        assert_eq!(policy.wait_for(&hinted(12)), Duration::from_secs(12));
        assert_eq!(policy.wait_for(&hinted(90)), Duration::from_secs(20));

        let random = policy.wait_for(&BackendError::Loading { estimated_wait: None });
        assert!((Duration::from_secs(10)..=Duration::from_secs(20)).contains(&random));
    }
}
