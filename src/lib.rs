pub mod api;
pub mod error;
pub mod models;
pub mod notify;
pub mod presenters;
pub mod screen;
pub mod services;
pub mod settings;

pub use api::{HttpTransport, Transport};
pub use error::{ApiError, ScreenError};
pub use notify::{LogNotifier, Notification, Notifier};
pub use screen::{AnalysisScreen, MeetingHeader, ScreenPresenters, ScreenState};
pub use services::{AiAnalysisClient, MeetingClient};
pub use settings::ClientSettings;

/// Initialise `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
pub fn init_logging() {
    // A logger may already be installed by an embedding binary or test harness
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()
        .ok();
}
