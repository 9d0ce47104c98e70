use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::id::{SlotId, UserId};

use super::SlotStatus;

#[derive(new)]
pub struct CreateSlot {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// 所有者自身による BUSY/SWAPPABLE の切り替え。
/// SWAP_PENDING を直接指定できないことは api 層の変換で保証する。
#[derive(Debug, new)]
pub struct UpdateSlotStatus {
    pub slot_id: SlotId,
    pub requested_user: UserId,
    pub status: SlotStatus,
}
