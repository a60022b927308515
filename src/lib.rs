// Library surface for the binary, headless driving and integration tests.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod history_db;
pub mod input_policy;
pub mod logging;
pub mod metrics;
pub mod record;
pub mod runtime;
pub mod session;
pub mod snippet;
pub mod time_series;
pub mod tracker;
pub mod ui;
pub mod util;

pub use app::{App, AppState};
pub use record::SessionRecord;
pub use tracker::SessionTracker;
