use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{SwapRequestId, UserId},
    swap::{
        event::{CreateSwapRequest, RespondSwapRequest},
        SwapRequestListing,
    },
};

#[mockall::automock]
#[async_trait]
pub trait SwapRepository: Send + Sync {
    // スワップリクエストを作成し、両スロットを SWAP_PENDING にする。
    // 挿入とステータス更新はひとつのトランザクションで行う
    async fn create(&self, event: CreateSwapRequest) -> AppResult<SwapRequestId>;
    // リクエストの所有者による承諾・拒否。
    // リクエストの終端化とスロットの更新はひとつのトランザクションで行う
    async fn respond(&self, event: RespondSwapRequest) -> AppResult<()>;
    // ユーザーが当事者になっている PENDING なリクエストの一覧
    async fn find_pending_by_user(&self, user_id: UserId) -> AppResult<SwapRequestListing>;
}
