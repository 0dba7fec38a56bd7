//! Low-stock notification worker
//!
//! Alerts flow through an mpsc channel to a background worker, so order
//! placement never waits on (or fails because of) delivery. The worker
//! posts to a webhook when one is configured and logs otherwise.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::db::models::Inventory;

const CHANNEL_CAPACITY: usize = 256;

/// One alert per ledger record that crossed its reorder threshold
#[derive(Debug, Clone, Serialize)]
pub struct LowStockAlert {
    pub sku: String,
    pub product_name: String,
    pub quantity_available: i64,
    pub reorder_level: i64,
    pub recipient: String,
}

impl LowStockAlert {
    pub fn from_inventory(record: &Inventory, recipient: &str) -> Self {
        Self {
            sku: record.sku.clone(),
            product_name: record.product_name.clone(),
            quantity_available: record.quantity_available,
            reorder_level: record.reorder_level,
            recipient: recipient.to_string(),
        }
    }
}

/// Handle for enqueueing alerts; cheap to clone
#[derive(Clone)]
pub struct NotificationService {
    tx: mpsc::Sender<LowStockAlert>,
    recipient: String,
}

impl NotificationService {
    /// Spawn the delivery worker and return the sending handle.
    ///
    /// The worker runs until every handle is dropped.
    pub fn spawn(webhook_url: Option<String>, recipient: String) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(run_worker(rx, webhook_url));
        Self { tx, recipient }
    }

    /// Fire-and-forget: enqueue an alert for a record below its threshold.
    /// A full channel drops the alert with a log line rather than blocking.
    pub fn notify_low_stock(&self, record: &Inventory) {
        if !record.is_low_stock() {
            return;
        }
        let alert = LowStockAlert::from_inventory(record, &self.recipient);
        if let Err(e) = self.tx.try_send(alert) {
            tracing::error!(sku = %record.sku, error = %e, "Dropped low-stock alert");
        }
    }
}

async fn run_worker(mut rx: mpsc::Receiver<LowStockAlert>, webhook_url: Option<String>) {
    tracing::info!("Low-stock notification worker started");
    let client = reqwest::Client::new();

    while let Some(alert) = rx.recv().await {
        match &webhook_url {
            Some(url) => deliver_webhook(&client, url, &alert).await,
            None => {
                let payload = serde_json::to_string(&alert).unwrap_or_default();
                tracing::warn!(alert = %payload, "Low stock (no webhook configured)");
            }
        }
    }
    tracing::info!("Notification channel closed, worker stopping");
}

async fn deliver_webhook(client: &reqwest::Client, url: &str, alert: &LowStockAlert) {
    match client.post(url).json(alert).send().await {
        Ok(response) if response.status().is_success() => {
            tracing::info!(sku = %alert.sku, "Low-stock alert delivered");
        }
        Ok(response) => {
            tracing::error!(
                sku = %alert.sku,
                status = %response.status(),
                "Low-stock webhook rejected the alert"
            );
        }
        Err(e) => {
            tracing::error!(sku = %alert.sku, error = %e, "Low-stock webhook unreachable");
        }
    }
}
