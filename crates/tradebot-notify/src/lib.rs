//! Logging setup and notification delivery.

mod file_notifier;
mod logging;

pub use file_notifier::FileNotifier;
pub use logging::init_logging;
