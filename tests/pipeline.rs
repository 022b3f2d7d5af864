//! End-to-end pipeline tests
//!
//! Exercises full runs over simulated utterance lists; no audio
//! hardware or network access required thanks to the echo fallback.

use doxibox::{Config, ConfigOverrides, Error, Pipeline, run_pipeline};

mod common;

use common::{isolated_overrides, prompts};

#[tokio::test]
async fn test_wake_word_triggers_single_response() {
    let (_dirs, overrides) = isolated_overrides();
    let outputs = run_pipeline(
        Some(prompts(&["hello", "Doxi tell me a joke", "bye"])),
        Some(overrides),
    )
    .await
    .unwrap();

    assert_eq!(outputs, vec!["[voice:en] Doxibox heard: Doxi tell me a joke"]);
}

#[tokio::test]
async fn test_agent_mode_marks_response_context() {
    let (_dirs, mut overrides) = isolated_overrides();
    overrides.enable_agent_mode = Some(true);

    let outputs = run_pipeline(
        Some(prompts(&["nothing", "doxi plan the day"])),
        Some(overrides),
    )
    .await
    .unwrap();

    assert_eq!(outputs.len(), 1);
    assert!(outputs[0].contains("agent-mode"));
}

#[tokio::test]
async fn test_empty_prompt_list_produces_empty_log() {
    let (_dirs, overrides) = isolated_overrides();
    let outputs = run_pipeline(Some(Vec::new()), Some(overrides)).await.unwrap();
    assert!(outputs.is_empty());
}

#[tokio::test]
async fn test_mixed_case_wake_word_triggers() {
    let (_dirs, overrides) = isolated_overrides();
    let outputs = run_pipeline(Some(prompts(&["DOXI now"])), Some(overrides))
        .await
        .unwrap();

    assert_eq!(outputs, vec!["[voice:en] Doxibox heard: DOXI now"]);
}

#[tokio::test]
async fn test_log_length_equals_triggered_count() {
    let (_dirs, overrides) = isolated_overrides();
    let outputs = run_pipeline(
        Some(prompts(&[
            "doxi one",
            "quiet",
            "doxi two",
            "also quiet",
            "doxi three",
        ])),
        Some(overrides),
    )
    .await
    .unwrap();

    assert_eq!(outputs.len(), 3);
}

#[tokio::test]
async fn test_unknown_provider_falls_back_to_echo() {
    let (_dirs, mut overrides) = isolated_overrides();
    overrides.llm_provider = Some("no-such-provider".to_string());

    let outputs = run_pipeline(Some(prompts(&["doxi ping"])), Some(overrides))
        .await
        .unwrap();

    assert_eq!(outputs, vec!["[voice:en] Doxibox heard: doxi ping"]);
}

#[tokio::test]
async fn test_custom_wake_word_override() {
    let (_dirs, mut overrides) = isolated_overrides();
    overrides.wake_word = Some("nova".to_string());

    let outputs = run_pipeline(
        Some(prompts(&["doxi ignored", "Nova respond"])),
        Some(overrides),
    )
    .await
    .unwrap();

    assert_eq!(outputs, vec!["[voice:en] Doxibox heard: Nova respond"]);
}

#[tokio::test]
async fn test_no_prompts_in_text_mode_is_config_error() {
    let (_dirs, overrides) = isolated_overrides();
    let err = run_pipeline(None, Some(overrides)).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_ensure_dirs_is_idempotent() {
    let (_dirs, overrides) = isolated_overrides();
    let config = Config::from_overrides(Some(overrides));

    config.ensure_dirs().unwrap();
    config.ensure_dirs().unwrap();
    assert!(config.transcript_dir.is_dir());
    assert!(config.cache_dir.is_dir());
}

#[test]
fn test_pipeline_exposes_its_config() {
    let (_dirs, mut overrides) = isolated_overrides();
    overrides.wake_word = Some("nova".to_string());

    let pipeline = Pipeline::new(Config::from_overrides(Some(overrides))).unwrap();
    assert_eq!(pipeline.config().wake_word, "nova");
}

#[tokio::test]
async fn test_runs_are_independent() {
    // Each run owns its sink; history never leaks across runs
    let (_dirs, overrides) = isolated_overrides();
    let pipeline = Pipeline::new(Config::from_overrides(Some(overrides))).unwrap();

    let first = pipeline
        .run(Some(prompts(&["doxi first"])))
        .await
        .unwrap();
    let second = pipeline
        .run(Some(prompts(&["doxi second"])))
        .await
        .unwrap();

    assert_eq!(first, vec!["[voice:en] Doxibox heard: doxi first"]);
    assert_eq!(second, vec!["[voice:en] Doxibox heard: doxi second"]);
}

#[tokio::test]
async fn test_missing_provider_key_fails_at_construction() {
    // Fail-fast: requesting a remote backend without credentials is a
    // construction error, not a first-call error. Only meaningful when
    // the ambient environment carries no key.
    if std::env::var("OPENAI_API_KEY").is_ok() {
        return;
    }

    let (_dirs, mut overrides) = isolated_overrides();
    overrides.provider_options = Some(
        [(
            "openai".to_string(),
            [("model".to_string(), "gpt-4o-mini".to_string())]
                .into_iter()
                .collect(),
        )]
        .into_iter()
        .collect(),
    );

    let err = Pipeline::new(Config::from_overrides(Some(overrides))).unwrap_err();
    assert!(matches!(err, Error::Dependency(_)));
}

#[test]
fn test_config_overlay_round_trips_from_toml() {
    // The CLI surface accepts the same overlay the library does
    let overrides: ConfigOverrides = toml::from_str(
        r#"
        wake_word = "doxi"
        llm_provider = "local-echo"
        enable_agent_mode = true
        "#,
    )
    .unwrap();
    let config = Config::from_overrides(Some(overrides));
    assert!(config.enable_agent_mode);
    assert_eq!(config.llm_provider, "local-echo");

    // An empty overlay is valid and yields pure defaults
    let empty: ConfigOverrides = toml::from_str("").unwrap();
    let config = Config::from_overrides(Some(empty));
    assert_eq!(config.wake_word, "doxi");
}
