use chrono::{DateTime, Utc};
use strum::{AsRefStr, EnumString};

use crate::model::{
    id::{SlotId, SwapRequestId, UserId},
    slot::SlotStatus,
};

pub mod event;

/// スワップリクエストの状態遷移は PENDING -> {ACCEPTED, REJECTED} のみ。
/// 終端状態からの遷移は存在しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
}

impl SwapStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SwapStatus::Accepted | SwapStatus::Rejected)
    }
}

#[derive(Debug)]
pub struct SwapRequest {
    pub swap_request_id: SwapRequestId,
    pub requested_slot_id: SlotId,
    pub offered_slot_id: SlotId,
    pub requester_id: UserId,
    pub owner_id: UserId,
    pub status: SwapStatus,
}

/// 片方のスロットに適用する更新内容。
#[derive(Debug, PartialEq, Eq)]
pub struct SlotDisposition {
    pub slot_id: SlotId,
    pub new_owner: UserId,
    pub new_status: SlotStatus,
}

/// PENDING なリクエストを承諾または拒否したときに、
/// リクエスト自身と両スロットへ一括適用すべき結果。
/// どちらの分岐でも部分適用は許されないため、ひとつの値として返す。
#[derive(Debug)]
pub struct SwapResolution {
    pub request_status: SwapStatus,
    pub requested_slot: SlotDisposition,
    pub offered_slot: SlotDisposition,
}

impl SwapRequest {
    /// 承諾なら所有者を交換して両スロットを BUSY に、
    /// 拒否なら所有者はそのままで両スロットを SWAPPABLE に戻す。
    pub fn resolve(&self, accept: bool) -> SwapResolution {
        if accept {
            SwapResolution {
                request_status: SwapStatus::Accepted,
                requested_slot: SlotDisposition {
                    slot_id: self.requested_slot_id,
                    new_owner: self.requester_id,
                    new_status: SlotStatus::Busy,
                },
                offered_slot: SlotDisposition {
                    slot_id: self.offered_slot_id,
                    new_owner: self.owner_id,
                    new_status: SlotStatus::Busy,
                },
            }
        } else {
            SwapResolution {
                request_status: SwapStatus::Rejected,
                requested_slot: SlotDisposition {
                    slot_id: self.requested_slot_id,
                    new_owner: self.owner_id,
                    new_status: SlotStatus::Swappable,
                },
                offered_slot: SlotDisposition {
                    slot_id: self.offered_slot_id,
                    new_owner: self.requester_id,
                    new_status: SlotStatus::Swappable,
                },
            }
        }
    }
}

/// 一覧表示用。相手側の名前と両スロットの概要を持つ。
#[derive(Debug)]
pub struct SwapRequestSummary {
    pub swap_request_id: SwapRequestId,
    pub status: SwapStatus,
    pub requested_slot_title: String,
    pub requested_slot_start: DateTime<Utc>,
    pub offered_slot_title: String,
    pub offered_slot_start: DateTime<Utc>,
    pub counterpart_name: String,
}

#[derive(Debug)]
pub struct SwapRequestListing {
    pub incoming: Vec<SwapRequestSummary>,
    pub outgoing: Vec<SwapRequestSummary>,
}
