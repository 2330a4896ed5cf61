use std::sync::Arc;
use std::time::Duration;

use literacy_core::WordCatalog;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::speech::{Narrator, SpeechEngine};

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
    narrator: Arc<Narrator>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        io_timeout: Duration,
        clock: Clock,
        catalog: WordCatalog,
        speech: Arc<dyn SpeechEngine>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url, io_timeout).await?;
        tracing::info!(words = catalog.len(), "progress store ready");
        Ok(Self::from_storage(&storage, clock, catalog, speech))
    }

    /// Build services over a volatile in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock, catalog: WordCatalog, speech: Arc<dyn SpeechEngine>) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, catalog, speech)
    }

    fn from_storage(
        storage: &Storage,
        clock: Clock,
        catalog: WordCatalog,
        speech: Arc<dyn SpeechEngine>,
    ) -> Self {
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::new(catalog),
            Arc::clone(&storage.progress),
        ));
        let narrator = Arc::new(Narrator::new(speech));
        Self { progress, narrator }
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn narrator(&self) -> Arc<Narrator> {
        Arc::clone(&self.narrator)
    }
}
