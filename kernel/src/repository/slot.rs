use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::UserId,
    slot::{
        event::{CreateSlot, UpdateSlotStatus},
        Slot,
    },
};

#[mockall::automock]
#[async_trait]
pub trait SlotRepository: Send + Sync {
    // スロットを登録する。初期状態は BUSY
    async fn create(&self, event: CreateSlot, owner_id: UserId) -> AppResult<Slot>;
    // ユーザーが所有するスロットを開始時刻の昇順で取得する
    async fn find_by_owner(&self, owner_id: UserId) -> AppResult<Vec<Slot>>;
    // 所有者自身による BUSY/SWAPPABLE の切り替え。
    // 存在しない・所有していないは区別せずエラーにする
    async fn update_status(&self, event: UpdateSlotStatus) -> AppResult<()>;
    // 他ユーザーが所有する SWAPPABLE なスロットの一覧（マーケットプレイス表示用）
    async fn find_swappable_excluding(&self, excluded_owner_id: UserId) -> AppResult<Vec<Slot>>;
}
