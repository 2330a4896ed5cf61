use async_trait::async_trait;
use services::{SpeechEngine, SpeechError, SpeechSettings};

/// Stand-in engine for terminals: prints each utterance to stdout.
pub struct ConsoleSpeech;

#[async_trait]
impl SpeechEngine for ConsoleSpeech {
    async fn speak(&self, text: &str, settings: &SpeechSettings) -> Result<(), SpeechError> {
        println!("🔊 [{} x{}] {text}", settings.language, settings.rate);
        Ok(())
    }

    fn stop(&self) {}
}
