//! Delivery receipt data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A delivery receipt forwarded by the SMS provider.
///
/// Wire form is camelCase (`notificationType`). The `id` is optional in the
/// body because callers may supply it as a query parameter instead; the
/// remaining fields are required for a payload to count as well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub reference: String,
    pub recipient: String,
    pub status: String,
    pub notification_type: String,
}

/// A receipt as it sits on the delivery-log queue, stamped with the time the
/// webhook accepted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedReceipt {
    pub receipt: DeliveryReceipt,
    pub received_at: DateTime<Utc>,
}

impl QueuedReceipt {
    pub fn now(receipt: DeliveryReceipt) -> Self {
        Self {
            receipt,
            received_at: Utc::now(),
        }
    }
}
