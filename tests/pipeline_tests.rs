/// Pipeline integration tests: parameters in, recorded narrative out.
use parallel_narratives::engine::analyzer::TextAnalyzer;
use parallel_narratives::engine::fallback::{story_for_epoch, FALLBACK_STORIES, RENAISSANCE_STORY};
use parallel_narratives::engine::generation::{GenerationClient, RetryPolicy};
use parallel_narratives::engine::llm_client::BackendError;
use parallel_narratives::engine::orchestrator::Orchestrator;
use parallel_narratives::engine::prompt_builder::PromptBuilder;
use parallel_narratives::engine::sanitizer::{ReasoningFilter, ResponseSanitizer};
use parallel_narratives::engine::testing::{RecordingPacer, ScriptedBackend};
use parallel_narratives::model::epoch::EPOCHS;
use parallel_narratives::model::parameters::{GenerationParameters, LengthTier};

fn client(script: Vec<Result<String, BackendError>>) -> GenerationClient {
    GenerationClient::new(Box::new(ScriptedBackend::new(script)))
        .with_pacer(Box::new(RecordingPacer::default()))
}

#[test]
fn renaissance_with_dead_backend_serves_canned_story() {
    let mut orchestrator = Orchestrator::new(client(vec![Err(BackendError::Other(
        "connection refused".into(),
    ))]));
    let params = GenerationParameters {
        epoch: "Renaissance (1400-1600)".into(),
        tech_level: 30,
        social_change: 40,
        fantasy_elements: 20,
        length_tier: LengthTier::Short,
    };

    let report = orchestrator.generate(&params);

    assert_eq!(report.entry.story, RENAISSANCE_STORY);
    assert!(report.entry.is_fallback);
    assert!(report.error.is_none());
    assert!(report.notice.is_some());
    assert_eq!(report.entry.analysis.word_count, 113);
    assert_eq!(
        report.entry.analysis.word_count,
        TextAnalyzer::analyze(RENAISSANCE_STORY).word_count
    );
    assert_eq!(orchestrator.current().map(|e| e.parameters.clone()), Some(params));
}

#[test]
fn reasoning_trace_is_removed() {
    let raw = "<think>I need to plan.\n</think>\n\nÀ Florence, les artistes peignaient.";
    let narrative = ReasoningFilter.clean(raw);

    assert!(narrative.contains("À Florence, les artistes peignaient."));
    assert!(!narrative.contains("I need to plan"));
    assert!(!narrative.contains("<think>"));
    assert!(!narrative.contains("</think>"));
}

#[test]
fn client_never_returns_empty_text() {
    let exhausted = vec![
        Err(BackendError::Loading { estimated_wait: None }),
        Err(BackendError::RateLimited),
        Err(BackendError::Loading { estimated_wait: None }),
    ];
    let scripts = vec![
        vec![Err(BackendError::MissingCredentials("KEY".into()))],
        exhausted,
        vec![Ok("<think>Let me draft something.</think>".into())],
        vec![Ok(String::new())],
    ];

    for script in scripts {
        let policy = RetryPolicy {
            max_attempts: 3,
            ..RetryPolicy::default()
        };
        let generation = client(script)
            .with_policy(policy)
            .generate("pendant Années folles");
        assert!(!generation.story.trim().is_empty());
        assert!(generation.is_fallback);
    }
}

#[test]
fn canned_stories_are_already_clean() {
    for (_, story) in FALLBACK_STORIES {
        assert_eq!(ReasoningFilter.clean(story), story);
    }
    for epoch in &EPOCHS {
        assert!(!story_for_epoch(epoch).is_empty());
    }
}

#[test]
fn prompts_are_deterministic_for_every_setting() {
    let levels = [0u8, 10, 11, 40, 41, 70, 71, 100];
    for epoch in &EPOCHS {
        for tier in LengthTier::ALL {
            for &tech in &levels {
                let (social, fantasy) = (100 - tech, tech / 2);
                let a = PromptBuilder::build(epoch, tech, social, fantasy, tier);
                let b = PromptBuilder::build(epoch, tech, social, fantasy, tier);

                assert_eq!(a, b);
                assert!(!a.is_empty());
                assert!(a.contains(epoch.context));
                let suffix = &epoch.name[epoch.bare_name().len()..];
                assert!(!a.contains(suffix.trim()), "{} leaked into prompt", suffix.trim());
            }
        }
    }
}

#[test]
fn history_keeps_ten_most_recent_generations() {
    let mut orchestrator = Orchestrator::new(client(Vec::new()));

    for level in 0..11u8 {
        let params = GenerationParameters {
            tech_level: level,
            ..Default::default()
        };
        orchestrator.generate(&params);
    }

    let history = orchestrator.history().list();
    assert_eq!(history.len(), 10);
    assert_eq!(history[0].parameters.tech_level, 10);
    assert_eq!(history[9].parameters.tech_level, 1);
    assert!(history.iter().all(|e| e.parameters.tech_level != 0));
}
