use chrono::{DateTime, Utc};

/// Activity feed entries shown on the staff dashboard.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityEvent {
    RecordReceived {
        record_id: String,
        customer_id: String,
        at: DateTime<Utc>,
    },
    RecordStatusChanged {
        record_id: String,
        from: String,
        to: String,
        at: DateTime<Utc>,
    },
    PaymentRecorded {
        record_id: String,
        amount: rust_decimal::Decimal,
        method: String,
        at: DateTime<Utc>,
    },
}

impl ActivityEvent {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            ActivityEvent::RecordReceived { at, .. }
            | ActivityEvent::RecordStatusChanged { at, .. }
            | ActivityEvent::PaymentRecorded { at, .. } => *at,
        }
    }

    pub fn record_id(&self) -> &str {
        match self {
            ActivityEvent::RecordReceived { record_id, .. }
            | ActivityEvent::RecordStatusChanged { record_id, .. }
            | ActivityEvent::PaymentRecorded { record_id, .. } => record_id,
        }
    }
}
