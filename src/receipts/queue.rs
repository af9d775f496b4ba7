//! Delivery-log queue — where accepted receipts go.
//!
//! In production the queue is an external service; the in-memory
//! implementation here stands in for it locally and under test, and a
//! draining consumer can forward it wherever receipts are analyzed.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use super::model::QueuedReceipt;

/// Name of the queue delivery receipts are published to.
pub const DELIVERY_LOG_QUEUE: &str = "sms-delivery-log";

/// Sink for accepted delivery receipts.
#[async_trait]
pub trait ReceiptQueue: Send + Sync {
    /// The queue's name, for diagnostics.
    fn name(&self) -> &str;

    /// Append a receipt. Failures are the implementation's problem to
    /// report; the webhook has already answered the caller by then.
    async fn enqueue(&self, receipt: QueuedReceipt);

    /// Number of receipts currently queued.
    async fn len(&self) -> usize;
}

/// In-memory delivery-log queue.
#[derive(Default)]
pub struct MemoryReceiptQueue {
    items: RwLock<VecDeque<QueuedReceipt>>,
}

impl MemoryReceiptQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything currently queued, oldest first.
    pub async fn drain(&self) -> Vec<QueuedReceipt> {
        self.items.write().await.drain(..).collect()
    }
}

#[async_trait]
impl ReceiptQueue for MemoryReceiptQueue {
    fn name(&self) -> &str {
        DELIVERY_LOG_QUEUE
    }

    async fn enqueue(&self, receipt: QueuedReceipt) {
        info!(
            queue = DELIVERY_LOG_QUEUE,
            id = receipt.receipt.id.as_deref().unwrap_or("-"),
            reference = %receipt.receipt.reference,
            status = %receipt.receipt.status,
            "delivery receipt queued"
        );
        self.items.write().await.push_back(receipt);
    }

    async fn len(&self) -> usize {
        self.items.read().await.len()
    }
}
