//! Pure aggregation of a progress snapshot into progress-screen statistics.
//!
//! Nothing here is cached; callers recompute a summary whenever they need one.

use serde::Serialize;

use crate::catalog::WordCatalog;
use crate::model::{LearningProgress, MasteryBand, Word};

/// Statistics shown on the progress screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_words: usize,
    pub mastered_count: usize,
    pub studied_count: usize,
    /// Mean per-word accuracy as a whole percentage.
    pub average_accuracy: u32,
    pub distribution: MasteryDistribution,
    /// Studied words, highest mastery first.
    pub details: Vec<ProgressDetail>,
}

impl ProgressSummary {
    /// True when nothing has been studied yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.studied_count == 0
    }
}

/// How the catalog splits into mastered, in-progress and untouched words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MasteryDistribution {
    pub mastered: usize,
    pub learning: usize,
    pub unstudied: usize,
}

/// Segment sizes as percentages of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DistributionShares {
    pub mastered: f64,
    pub learning: f64,
    pub unstudied: f64,
}

impl MasteryDistribution {
    #[must_use]
    pub fn total(&self) -> usize {
        self.mastered + self.learning + self.unstudied
    }

    /// Percentage of the whole each segment covers. All zero for an empty catalog.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn shares(&self) -> DistributionShares {
        let total = self.total();
        if total == 0 {
            return DistributionShares::default();
        }
        let pct = |n: usize| n as f64 * 100.0 / total as f64;
        DistributionShares {
            mastered: pct(self.mastered),
            learning: pct(self.learning),
            unstudied: pct(self.unstudied),
        }
    }
}

/// A studied word joined with its progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressDetail {
    pub word: Word,
    pub progress: LearningProgress,
}

impl ProgressDetail {
    #[must_use]
    pub fn band(&self) -> MasteryBand {
        self.progress.mastery_level().band()
    }
}

/// Number of records at or above the mastered threshold.
#[must_use]
pub fn mastered_count(progress: &[LearningProgress]) -> usize {
    progress
        .iter()
        .filter(|p| p.mastery_level().is_mastered())
        .count()
}

/// `round(100 * mean(correct / total))` over the records, `0` for none.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn average_accuracy(progress: &[LearningProgress]) -> u32 {
    if progress.is_empty() {
        return 0;
    }
    let sum: f64 = progress.iter().map(LearningProgress::accuracy).sum();
    let mean = sum / progress.len() as f64;
    (mean * 100.0).round() as u32
}

/// Builds the progress-screen summary for one learner.
///
/// Records whose word is missing from the catalog still count towards the
/// totals but are left out of `details`.
#[must_use]
pub fn summarize(catalog: &WordCatalog, progress: Vec<LearningProgress>) -> ProgressSummary {
    let total_words = catalog.len();
    let studied_count = progress.len();
    let mastered_count = mastered_count(&progress);
    let average_accuracy = average_accuracy(&progress);

    let distribution = MasteryDistribution {
        mastered: mastered_count,
        learning: studied_count - mastered_count,
        unstudied: total_words.saturating_sub(studied_count),
    };

    let mut details: Vec<ProgressDetail> = progress
        .into_iter()
        .filter_map(|progress| {
            let word = catalog.get(progress.word_id())?.clone();
            Some(ProgressDetail { word, progress })
        })
        .collect();
    // stable: equal mastery keeps input order
    details.sort_by(|a, b| b.progress.mastery_level().cmp(&a.progress.mastery_level()));

    ProgressSummary {
        total_words,
        mastered_count,
        studied_count,
        average_accuracy,
        distribution,
        details,
    }
}
