//! Notification interface.

use std::collections::HashMap;
use std::path::Path;

use crate::error::BotError;
use crate::types::{QualifiedOrder, ScanDetails, ScanHit};

/// Delivery of order records and scan reports.
///
/// Transport (file, e-mail, chat) is an implementation concern; the engine
/// only decides *when* to notify, driven by the configured notify level.
pub trait Notifier: Send + Sync {
    /// Append a submitted order to the order summary at `destination`.
    fn record_order(&self, order: &QualifiedOrder, destination: &Path) -> Result<(), BotError>;

    /// Send a single-order notification.
    fn send_order_email(
        &self,
        order: &QualifiedOrder,
        recipients: &[String],
        sender: &str,
    ) -> Result<(), BotError>;

    /// Send an aggregated scan report.
    fn send_scan_report(
        &self,
        results: &HashMap<String, ScanHit>,
        details: &ScanDetails,
        recipients: &[String],
        sender: &str,
    ) -> Result<(), BotError>;
}
