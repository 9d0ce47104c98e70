use std::str::FromStr;

use chrono::{DateTime, Utc};
use kernel::model::{
    id::{SlotId, SwapRequestId, UserId},
    swap::{SwapRequest, SwapRequestSummary, SwapStatus},
};
use shared::error::AppError;

#[derive(sqlx::FromRow)]
pub struct SwapRequestRow {
    pub swap_request_id: SwapRequestId,
    pub requested_slot_id: SlotId,
    pub offered_slot_id: SlotId,
    pub requester_id: UserId,
    pub owner_id: UserId,
    pub status: String,
}

impl TryFrom<SwapRequestRow> for SwapRequest {
    type Error = AppError;

    fn try_from(value: SwapRequestRow) -> Result<Self, Self::Error> {
        let SwapRequestRow {
            swap_request_id,
            requested_slot_id,
            offered_slot_id,
            requester_id,
            owner_id,
            status,
        } = value;
        let status = SwapStatus::from_str(&status)
            .map_err(|_| AppError::ConversionEntityError(format!("unknown swap status: {status}")))?;
        Ok(SwapRequest {
            swap_request_id,
            requested_slot_id,
            offered_slot_id,
            requester_id,
            owner_id,
            status,
        })
    }
}

// 受信・送信一覧の JOIN 結果を受ける型。
// counterpart_name は受信側なら要求者名、送信側なら所有者名になる
#[derive(sqlx::FromRow)]
pub struct SwapSummaryRow {
    pub swap_request_id: SwapRequestId,
    pub status: String,
    pub requested_slot_title: String,
    pub requested_slot_start: DateTime<Utc>,
    pub offered_slot_title: String,
    pub offered_slot_start: DateTime<Utc>,
    pub counterpart_name: String,
}

impl TryFrom<SwapSummaryRow> for SwapRequestSummary {
    type Error = AppError;

    fn try_from(value: SwapSummaryRow) -> Result<Self, Self::Error> {
        let SwapSummaryRow {
            swap_request_id,
            status,
            requested_slot_title,
            requested_slot_start,
            offered_slot_title,
            offered_slot_start,
            counterpart_name,
        } = value;
        let status = SwapStatus::from_str(&status)
            .map_err(|_| AppError::ConversionEntityError(format!("unknown swap status: {status}")))?;
        Ok(SwapRequestSummary {
            swap_request_id,
            status,
            requested_slot_title,
            requested_slot_start,
            offered_slot_title,
            offered_slot_start,
            counterpart_name,
        })
    }
}
