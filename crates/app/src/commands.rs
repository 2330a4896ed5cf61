use std::io::Write;

use literacy_core::model::{IdError, LearningProgress, UserId, Word, WordId};
use literacy_core::stats::ProgressSummary;
use literacy_core::time::Clock;
use services::{AppServices, ProgressService, ProgressServiceError};
use thiserror::Error;

use crate::config::{Command, PracticeArgs};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    InvalidWordId(#[from] IdError),
    #[error("no word {0} in the catalog")]
    UnknownWord(WordId),
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub async fn dispatch(
    services: &AppServices,
    user: &UserId,
    clock: &Clock,
    command: Command,
) -> Result<(), CommandError> {
    let progress = services.progress();
    let mut out = std::io::stdout().lock();
    match command {
        Command::Words => {
            for word in progress.catalog().iter() {
                writeln!(out, "{}", word_line(word))?;
            }
        }
        Command::Show { word } => {
            let word = known_word(&progress, &word)?.clone();
            let record = progress.progress_for_word(user, word.id()).await?;
            writeln!(out, "{}", word_line(&word))?;
            writeln!(out, "{}", progress_line(record.as_ref(), clock))?;
            drop(out);
            services.narrator().speak_word(&word).await;
            return Ok(());
        }
        Command::Practice(PracticeArgs { word, correct, .. }) => {
            let word = known_word(&progress, &word)?.id().clone();
            let record = progress.record_attempt(user, &word, correct).await?;
            writeln!(out, "{word}: {}", progress_line(Some(&record), clock))?;
        }
        Command::Progress { json } => {
            let summary = progress.summary(user).await;
            if json {
                serde_json::to_writer_pretty(&mut out, &summary)?;
                writeln!(out)?;
            } else {
                write_summary(&mut out, &summary, clock)?;
            }
        }
        Command::Reset { word } => {
            let word = WordId::new(&word)?;
            if progress.reset_word(user, &word).await? {
                writeln!(out, "{word}: progress cleared")?;
            } else {
                writeln!(out, "{word}: nothing to clear")?;
            }
        }
    }
    Ok(())
}

fn known_word<'a>(progress: &'a ProgressService, raw: &str) -> Result<&'a Word, CommandError> {
    let id = WordId::new(raw)?;
    progress.word(&id).ok_or(CommandError::UnknownWord(id))
}

fn word_line(word: &Word) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        word.id(),
        word.character(),
        word.pinyin(),
        word.meaning()
    )
}

fn progress_line(record: Option<&LearningProgress>, clock: &Clock) -> String {
    match record {
        None => "not studied yet".to_owned(),
        Some(p) => {
            let band = p.mastery_level().band();
            let studied_on = p.last_studied().date_naive();
            let today = if studied_on == clock.today() { " (今天)" } else { "" };
            format!(
                "{}/{} 次正确, mastery {}% ({} {}), 最后学习: {}{today}",
                p.correct_count(),
                p.total_attempts(),
                p.mastery_level().value(),
                band.label_zh(),
                band.color_hex(),
                studied_on.format("%Y-%m-%d")
            )
        }
    }
}

fn write_summary(
    out: &mut impl Write,
    summary: &ProgressSummary,
    clock: &Clock,
) -> std::io::Result<()> {
    if summary.is_empty() {
        writeln!(out, "还没有学习记录 (nothing studied yet)")?;
    }
    let shares = summary.distribution.shares();
    writeln!(out, "words:     {}", summary.total_words)?;
    writeln!(out, "studied:   {}", summary.studied_count)?;
    writeln!(out, "mastered:  {}", summary.mastered_count)?;
    writeln!(out, "accuracy:  {}%", summary.average_accuracy)?;
    writeln!(
        out,
        "split:     {:.0}% mastered / {:.0}% learning / {:.0}% unstudied",
        shares.mastered, shares.learning, shares.unstudied
    )?;
    for detail in &summary.details {
        writeln!(
            out,
            "  {}  {}",
            detail.word.character(),
            progress_line(Some(&detail.progress), clock)
        )?;
    }
    Ok(())
}
