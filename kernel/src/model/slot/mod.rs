use chrono::{DateTime, Utc};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::model::{id::SlotId, user::SlotOwner};

pub mod event;

/// スロットの状態。SWAP_PENDING へはスワップリクエスト作成の副作用としてのみ遷移する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Busy,
    Swappable,
    SwapPending,
}

#[derive(Debug)]
pub struct Slot {
    pub slot_id: SlotId,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SlotStatus,
    pub owner: SlotOwner,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn status_uses_wire_representation() {
        assert_eq!(SlotStatus::Busy.as_ref(), "BUSY");
        assert_eq!(SlotStatus::Swappable.as_ref(), "SWAPPABLE");
        assert_eq!(SlotStatus::SwapPending.as_ref(), "SWAP_PENDING");
    }

    #[test]
    fn status_roundtrips_through_string() {
        for status in SlotStatus::iter() {
            assert_eq!(SlotStatus::from_str(status.as_ref()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(SlotStatus::from_str("LOCKED").is_err());
    }
}
