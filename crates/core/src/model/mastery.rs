use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Attempts needed before mastery tracks raw accuracy. Fewer attempts scale the
/// score down proportionally, so one lucky answer cannot mark a word mastered.
pub const MASTERY_RAMP_ATTEMPTS: u32 = 5;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("mastery level {0} is above 100")]
pub struct MasteryOutOfRange(pub u8);

/// Bounded mastery score in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(into = "u8")]
pub struct MasteryLevel(u8);

impl MasteryLevel {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// # Errors
    ///
    /// Returns `MasteryOutOfRange` for values above 100.
    pub fn new(value: u8) -> Result<Self, MasteryOutOfRange> {
        if value > Self::MAX.0 {
            return Err(MasteryOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Mastery for the given counts.
    ///
    /// `round(100 * correct/total * min(total, 5)/5)`, rounded half up. Zero
    /// attempts score 0; `correct` is clamped to `total`.
    #[must_use]
    pub fn from_counts(correct: u32, total: u32) -> Self {
        if total == 0 {
            return Self::MIN;
        }
        let correct = u64::from(correct.min(total));
        let total = u64::from(total);
        let ramp = u64::from(MASTERY_RAMP_ATTEMPTS);
        let weight = total.min(ramp);

        let numerator = 100 * correct * weight;
        let denominator = total * ramp;
        let rounded = (2 * numerator + denominator) / (2 * denominator);

        // numerator <= 100 * denominator, so rounded <= 100
        Self(u8::try_from(rounded).unwrap_or(100))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn band(self) -> MasteryBand {
        MasteryBand::classify(self)
    }

    #[must_use]
    pub fn is_mastered(self) -> bool {
        self.band() == MasteryBand::Mastered
    }
}

impl From<MasteryLevel> for u8 {
    fn from(level: MasteryLevel) -> Self {
        level.0
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

//
// ─── BANDS ─────────────────────────────────────────────────────────────────────
//

/// Display bucket for a mastery level. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryBand {
    Mastered,
    Proficient,
    Fair,
    NeedsPractice,
}

impl MasteryBand {
    pub const MASTERED_FROM: u8 = 80;
    pub const PROFICIENT_FROM: u8 = 60;
    pub const FAIR_FROM: u8 = 40;

    #[must_use]
    pub fn classify(level: MasteryLevel) -> Self {
        match level.value() {
            v if v >= Self::MASTERED_FROM => Self::Mastered,
            v if v >= Self::PROFICIENT_FROM => Self::Proficient,
            v if v >= Self::FAIR_FROM => Self::Fair,
            _ => Self::NeedsPractice,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Mastered => "mastered",
            Self::Proficient => "proficient",
            Self::Fair => "fair",
            Self::NeedsPractice => "needs practice",
        }
    }

    /// Label shown to learners in the app.
    #[must_use]
    pub fn label_zh(self) -> &'static str {
        match self {
            Self::Mastered => "已掌握",
            Self::Proficient => "熟练",
            Self::Fair => "一般",
            Self::NeedsPractice => "需练习",
        }
    }

    #[must_use]
    pub fn color_hex(self) -> &'static str {
        match self {
            Self::Mastered => "#4CAF50",
            Self::Proficient => "#FF9800",
            Self::Fair => "#FFC107",
            Self::NeedsPractice => "#F44336",
        }
    }
}

impl fmt::Display for MasteryBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_scales_early_attempts() {
        assert_eq!(MasteryLevel::from_counts(0, 0).value(), 0);
        assert_eq!(MasteryLevel::from_counts(0, 1).value(), 0);
        assert_eq!(MasteryLevel::from_counts(1, 1).value(), 20);
        assert_eq!(MasteryLevel::from_counts(2, 3).value(), 40);
        assert_eq!(MasteryLevel::from_counts(4, 5).value(), 80);
        assert_eq!(MasteryLevel::from_counts(5, 5).value(), 100);
    }

    #[test]
    fn tracks_accuracy_after_ramp() {
        assert_eq!(MasteryLevel::from_counts(9, 10).value(), 90);
        assert_eq!(MasteryLevel::from_counts(4, 10).value(), 40);
        // 2/3 of 100 rounds half up
        assert_eq!(MasteryLevel::from_counts(4, 6).value(), 67);
        assert_eq!(MasteryLevel::from_counts(1, 8).value(), 13);
    }

    #[test]
    fn correct_is_clamped_to_total() {
        assert_eq!(MasteryLevel::from_counts(12, 10).value(), 100);
    }

    #[test]
    fn new_rejects_values_above_100() {
        assert!(MasteryLevel::new(100).is_ok());
        assert_eq!(MasteryLevel::new(101), Err(MasteryOutOfRange(101)));
    }

    #[test]
    fn bands_follow_thresholds() {
        let band = |v| MasteryLevel::new(v).unwrap().band();
        assert_eq!(band(100), MasteryBand::Mastered);
        assert_eq!(band(80), MasteryBand::Mastered);
        assert_eq!(band(79), MasteryBand::Proficient);
        assert_eq!(band(60), MasteryBand::Proficient);
        assert_eq!(band(59), MasteryBand::Fair);
        assert_eq!(band(40), MasteryBand::Fair);
        assert_eq!(band(39), MasteryBand::NeedsPractice);
        assert_eq!(band(0), MasteryBand::NeedsPractice);
    }

    #[test]
    fn band_presentation() {
        assert_eq!(MasteryBand::Mastered.label_zh(), "已掌握");
        assert_eq!(MasteryBand::NeedsPractice.to_string(), "needs practice");
        assert_eq!(MasteryBand::Fair.color_hex(), "#FFC107");
    }
}
