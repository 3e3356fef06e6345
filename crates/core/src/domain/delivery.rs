use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryChannel {
    Notify,
    Persist,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Ok,
    Failed,
    Skipped,
}

/// Result of one side effect of a submission. Produced per request for
/// logging and verdict assembly, never stored on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub channel: DeliveryChannel,
    pub status: DeliveryStatus,
    pub detail: String,
}

impl DeliveryOutcome {
    pub fn ok(channel: DeliveryChannel, detail: impl Into<String>) -> Self {
        Self { channel, status: DeliveryStatus::Ok, detail: detail.into() }
    }

    pub fn failed(channel: DeliveryChannel, detail: impl Into<String>) -> Self {
        Self { channel, status: DeliveryStatus::Failed, detail: detail.into() }
    }

    pub fn skipped(channel: DeliveryChannel, detail: impl Into<String>) -> Self {
        Self { channel, status: DeliveryStatus::Skipped, detail: detail.into() }
    }
}
