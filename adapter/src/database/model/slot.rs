use std::str::FromStr;

use chrono::{DateTime, Utc};
use kernel::model::{
    id::{SlotId, UserId},
    slot::{Slot, SlotStatus},
    user::SlotOwner,
};
use shared::error::AppError;

#[derive(sqlx::FromRow)]
pub struct SlotRow {
    pub slot_id: SlotId,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub owned_by: UserId,
    pub owner_name: String,
}

impl TryFrom<SlotRow> for Slot {
    type Error = AppError;

    fn try_from(value: SlotRow) -> Result<Self, Self::Error> {
        let SlotRow {
            slot_id,
            title,
            start_time,
            end_time,
            status,
            owned_by,
            owner_name,
        } = value;
        // status 列には CHECK 制約があるため、ここで失敗するのはデータ破損時のみ
        let status = SlotStatus::from_str(&status)
            .map_err(|_| AppError::ConversionEntityError(format!("unknown slot status: {status}")))?;
        Ok(Slot {
            slot_id,
            title,
            start_time,
            end_time,
            status,
            owner: SlotOwner {
                owner_id: owned_by,
                owner_name,
            },
        })
    }
}

// スワップ対象チェックに使う最小限の型
#[derive(sqlx::FromRow)]
pub struct SlotStateRow {
    pub slot_id: SlotId,
    pub owned_by: UserId,
    pub status: String,
}
