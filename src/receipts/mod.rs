//! SMS delivery-receipt webhook.
//!
//! The SMS provider calls back with the outcome of each message we sent;
//! well-formed receipts are echoed to the caller and queued onto the
//! delivery log for later analysis. Malformed payloads are answered with a
//! fixed diagnostic and never take the service down.

pub mod model;
pub mod queue;
pub mod routes;

pub use model::{DeliveryReceipt, QueuedReceipt};
pub use queue::{DELIVERY_LOG_QUEUE, MemoryReceiptQueue, ReceiptQueue};
pub use routes::{MALFORMED_PAYLOAD_DIAGNOSTIC, ReceiptRouteState, receipt_routes};
