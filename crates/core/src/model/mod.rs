mod ids;
mod mastery;
mod progress;
mod word;

pub use ids::{IdError, ProgressKey, UserId, WordId};
pub use mastery::{MASTERY_RAMP_ATTEMPTS, MasteryBand, MasteryLevel, MasteryOutOfRange};
pub use progress::{LearningProgress, ProgressError};
pub use word::{Word, WordEntry, WordError};
