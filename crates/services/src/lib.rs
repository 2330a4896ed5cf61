#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod progress_service;
pub mod speech;

pub use literacy_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, ProgressServiceError, SpeechError};
pub use progress_service::ProgressService;
pub use speech::{Narrator, SpeechEngine, SpeechSettings};
