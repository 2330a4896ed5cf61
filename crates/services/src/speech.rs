use std::sync::Arc;

use async_trait::async_trait;
use literacy_core::model::Word;

use crate::error::SpeechError;

/// Voice parameters handed to the engine on every utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSettings {
    /// BCP-47 language tag.
    pub language: String,
    /// 1.0 is the engine's normal speed.
    pub rate: f32,
    pub pitch: f32,
}

impl SpeechSettings {
    pub const MANDARIN: &'static str = "zh-CN";

    /// Mandarin at half speed, normal pitch.
    #[must_use]
    pub fn slow_mandarin() -> Self {
        Self {
            language: Self::MANDARIN.to_owned(),
            rate: 0.5,
            pitch: 1.0,
        }
    }
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self::slow_mandarin()
    }
}

/// Platform text-to-speech backend.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    async fn speak(&self, text: &str, settings: &SpeechSettings) -> Result<(), SpeechError>;

    /// Cut off whatever is being spoken. No-op when idle.
    fn stop(&self);
}

/// Reads words, hints and instructions aloud.
///
/// Speech is best effort: engine failures are logged and never reach the caller.
#[derive(Clone)]
pub struct Narrator {
    engine: Arc<dyn SpeechEngine>,
    settings: SpeechSettings,
}

impl Narrator {
    #[must_use]
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        Self {
            engine,
            settings: SpeechSettings::default(),
        }
    }

    pub async fn speak_text(&self, text: &str) {
        self.say(text).await;
    }

    pub async fn speak_pinyin(&self, pinyin: &str) {
        self.say(&format!("拼音：{pinyin}")).await;
    }

    pub async fn speak_meaning(&self, meaning: &str) {
        self.say(&format!("意思是：{meaning}")).await;
    }

    pub async fn speak_instruction(&self, instruction: &str) {
        self.say(instruction).await;
    }

    /// Character, then its pinyin, then its meaning.
    pub async fn speak_word(&self, word: &Word) {
        self.speak_text(word.character()).await;
        self.speak_pinyin(word.pinyin()).await;
        self.speak_meaning(word.meaning()).await;
    }

    pub fn stop(&self) {
        self.engine.stop();
    }

    async fn say(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        if let Err(err) = self.engine.speak(text, &self.settings).await {
            tracing::warn!(error = %err, %text, "speech failed");
        }
    }
}
