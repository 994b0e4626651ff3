//! File-based notification delivery.

use chrono::Utc;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use tradebot_core::error::BotError;
use tradebot_core::traits::Notifier;
use tradebot_core::types::{QualifiedOrder, ScanDetails, ScanHit};

/// Delivers order records to an append-only summary file and renders
/// e-mail notifications as messages in an outbox directory.
pub struct FileNotifier {
    outbox: Option<PathBuf>,
}

impl FileNotifier {
    pub fn new() -> Self {
        Self { outbox: None }
    }

    /// Directory receiving rendered e-mail messages.
    pub fn with_outbox(mut self, outbox: impl Into<PathBuf>) -> Self {
        self.outbox = Some(outbox.into());
        self
    }

    fn write_message(&self, subject: &str, body: &str) -> Result<(), BotError> {
        let Some(outbox) = &self.outbox else {
            info!(subject, "No outbox configured; notification logged only");
            return Ok(());
        };
        std::fs::create_dir_all(outbox)?;
        let filename = format!("{}.txt", Utc::now().format("%Y%m%dT%H%M%S%.3f"));
        let mut file = std::fs::File::create(outbox.join(filename))?;
        writeln!(file, "Subject: {}", subject)?;
        writeln!(file)?;
        write!(file, "{}", body)?;
        Ok(())
    }
}

impl Default for FileNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for FileNotifier {
    fn record_order(&self, order: &QualifiedOrder, destination: &Path) -> Result<(), BotError> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(destination)?;
        writeln!(
            file,
            "{}, {}, price={}, hcf={}, strategy={}",
            Utc::now().to_rfc3339(),
            order.order,
            order.price,
            order.hcf,
            order.order.strategy,
        )?;
        Ok(())
    }

    fn send_order_email(
        &self,
        order: &QualifiedOrder,
        recipients: &[String],
        sender: &str,
    ) -> Result<(), BotError> {
        let body = format!(
            "From: {}\nTo: {}\n\nOrder submitted: {} at {}\n",
            sender,
            recipients.join(", "),
            order.order,
            order.price,
        );
        self.write_message(&format!("Order placed: {}", order.order), &body)
    }

    fn send_scan_report(
        &self,
        results: &HashMap<String, ScanHit>,
        details: &ScanDetails,
        recipients: &[String],
        sender: &str,
    ) -> Result<(), BotError> {
        let mut body = format!(
            "From: {}\nTo: {}\n\nScan results for {} ({} {})\n",
            sender,
            recipients.join(", "),
            details.index,
            details.strategy,
            details.granularity,
        );
        if results.is_empty() {
            body.push_str("No hits.\n");
        }
        let mut instruments: Vec<_> = results.keys().collect();
        instruments.sort();
        for instrument in instruments {
            if let Some(hit) = results.get(instrument) {
                body.push_str(&format!(
                    "{}: signal={:?} entry={} stop={:?} take={:?}\n",
                    instrument, hit.signal, hit.entry, hit.stop, hit.take,
                ));
            }
        }
        self.write_message(&format!("Scan report: {}", details.index), &body)
    }
}
