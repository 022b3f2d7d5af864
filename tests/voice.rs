//! Voice component integration tests
//!
//! Tests detector, sink, and capture-format behavior without requiring
//! audio hardware.

use doxibox::{Config, OutputMode, VoiceOutput, WakeWordDetector, samples_to_wav};

mod common;

use common::{isolated_overrides, prompts};

#[test]
fn test_detector_normalizes_wake_word() {
    let detector = WakeWordDetector::new("  Hey DOXI  ");
    assert_eq!(detector.wake_word(), "hey doxi");
}

#[test]
fn test_detector_case_insensitive() {
    let detector = WakeWordDetector::new("doxi");

    assert!(detector.observe("DOXI now").triggered);
    assert!(detector.observe("HeY dOxI there").triggered);
    assert!(detector.observe("doxi").triggered);
    assert!(!detector.observe("nothing here").triggered);
}

#[test]
fn test_detector_is_one_to_one_and_order_preserving() {
    let detector = WakeWordDetector::new("doxi");
    let inputs = prompts(&["hello", "doxi one", "bye", "doxi two"]);

    let events: Vec<_> = inputs.iter().map(|text| detector.observe(text)).collect();

    assert_eq!(events.len(), inputs.len());
    let flags: Vec<bool> = events.iter().map(|e| e.triggered).collect();
    assert_eq!(flags, vec![false, true, false, true]);
    // Non-triggered events are still emitted with their original text
    assert_eq!(events[0].text, "hello");
    assert_eq!(events[3].text, "doxi two");
}

#[test]
fn test_empty_wake_word_triggers_everything() {
    let detector = WakeWordDetector::new("");
    assert!(detector.observe("any text").triggered);
}

#[tokio::test]
async fn test_output_log_renders_voice_tag() {
    let (_dirs, overrides) = isolated_overrides();
    let config = Config::from_overrides(Some(overrides));
    let mut output = VoiceOutput::new(&config);

    output.speak("first response").await.unwrap();
    output.speak("second response").await.unwrap();

    assert_eq!(
        output.history(),
        &[
            "[voice:en] first response".to_string(),
            "[voice:en] second response".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_notifications_append_after_voice_lines() {
    let (_dirs, overrides) = isolated_overrides();
    let config = Config::from_overrides(Some(overrides));
    let mut output = VoiceOutput::new(&config);

    output.speak("response").await.unwrap();
    output
        .play_notifications(prompts(&["reminder set"]))
        .await
        .unwrap();

    let history = output.into_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1], "[notification] reminder set");
}

#[test]
fn test_text_is_default_output_mode() {
    let config = Config::default();
    assert_eq!(config.output_mode, OutputMode::Text);
}

#[test]
fn test_wav_encoding_is_16_bit_pcm() {
    let samples: Vec<f32> = (0..160).map(|i| (i as f32 / 160.0).sin() * 0.5).collect();
    let wav = samples_to_wav(&samples, 16000, 1).unwrap();

    let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.len(), 160);
}
