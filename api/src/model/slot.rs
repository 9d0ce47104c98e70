use std::str::FromStr;

use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{SlotId, UserId},
    slot::{
        event::{CreateSlot, UpdateSlotStatus},
        Slot, SlotStatus,
    },
};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    #[garde(length(min = 1))]
    pub title: String,
    // 終了時刻が開始時刻より後であることは検証しない
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
}

impl From<CreateSlotRequest> for CreateSlot {
    fn from(value: CreateSlotRequest) -> Self {
        let CreateSlotRequest {
            title,
            start_time,
            end_time,
        } = value;
        CreateSlot {
            title,
            start_time,
            end_time,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlotStatusRequest {
    pub status: String,
}

#[derive(new)]
pub struct UpdateSlotStatusRequestWithIds(SlotId, UserId, UpdateSlotStatusRequest);

impl TryFrom<UpdateSlotStatusRequestWithIds> for UpdateSlotStatus {
    type Error = AppError;

    fn try_from(value: UpdateSlotStatusRequestWithIds) -> Result<Self, Self::Error> {
        let UpdateSlotStatusRequestWithIds(slot_id, user_id, UpdateSlotStatusRequest { status }) =
            value;
        // 所有者が直接指定できる状態は BUSY と SWAPPABLE のみ。
        // SWAP_PENDING を含むそれ以外の値はここで弾く
        let status = match SlotStatus::from_str(&status) {
            Ok(SlotStatus::Busy) => SlotStatus::Busy,
            Ok(SlotStatus::Swappable) => SlotStatus::Swappable,
            _ => {
                return Err(AppError::UnprocessableEntity(format!(
                    "指定できない状態です: {status}"
                )))
            }
        };
        Ok(UpdateSlotStatus {
            slot_id,
            requested_user: user_id,
            status,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotResponse {
    pub id: SlotId,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
}

impl From<Slot> for SlotResponse {
    fn from(value: Slot) -> Self {
        let Slot {
            slot_id,
            title,
            start_time,
            end_time,
            status,
            owner: _,
        } = value;
        Self {
            id: slot_id,
            title,
            start_time,
            end_time,
            status: status.as_ref().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwappableSlotResponse {
    pub id: SlotId,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub owner_name: String,
}

impl From<Slot> for SwappableSlotResponse {
    fn from(value: Slot) -> Self {
        let Slot {
            slot_id,
            title,
            start_time,
            end_time,
            status: _,
            owner,
        } = value;
        Self {
            id: slot_id,
            title,
            start_time,
            end_time,
            owner_name: owner.owner_name,
        }
    }
}
