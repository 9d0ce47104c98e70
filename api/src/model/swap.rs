use chrono::{DateTime, Utc};
use kernel::model::{
    id::{SlotId, SwapRequestId},
    swap::{SwapRequestListing, SwapRequestSummary},
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwapRequestRequest {
    pub my_slot_id: SlotId,
    pub their_slot_id: SlotId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRespondRequest {
    pub accept: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequestSummaryResponse {
    pub id: SwapRequestId,
    pub status: String,
    pub requested_slot_title: String,
    pub requested_slot_start: DateTime<Utc>,
    pub offered_slot_title: String,
    pub offered_slot_start: DateTime<Utc>,
    pub counterpart_name: String,
}

impl From<SwapRequestSummary> for SwapRequestSummaryResponse {
    fn from(value: SwapRequestSummary) -> Self {
        let SwapRequestSummary {
            swap_request_id,
            status,
            requested_slot_title,
            requested_slot_start,
            offered_slot_title,
            offered_slot_start,
            counterpart_name,
        } = value;
        Self {
            id: swap_request_id,
            status: status.as_ref().to_string(),
            requested_slot_title,
            requested_slot_start,
            offered_slot_title,
            offered_slot_start,
            counterpart_name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequestsResponse {
    pub incoming: Vec<SwapRequestSummaryResponse>,
    pub outgoing: Vec<SwapRequestSummaryResponse>,
}

impl From<SwapRequestListing> for SwapRequestsResponse {
    fn from(value: SwapRequestListing) -> Self {
        let SwapRequestListing { incoming, outgoing } = value;
        Self {
            incoming: incoming.into_iter().map(Into::into).collect(),
            outgoing: outgoing.into_iter().map(Into::into).collect(),
        }
    }
}
