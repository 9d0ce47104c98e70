use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::{SwapRequestId, UserId},
        slot::SlotStatus,
        swap::{
            event::{CreateSwapRequest, RespondSwapRequest},
            SlotDisposition, SwapRequest, SwapRequestListing, SwapRequestSummary, SwapStatus,
        },
    },
    repository::swap::SwapRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{
        slot::SlotStateRow,
        swap::{SwapRequestRow, SwapSummaryRow},
    },
    ConnectionPool,
};

#[derive(new)]
pub struct SwapRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl SwapRepository for SwapRepositoryImpl {
    // スワップリクエストの作成
    async fn create(&self, event: CreateSwapRequest) -> AppResult<SwapRequestId> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する。
        // SWAPPABLE -> SWAP_PENDING のチェックと更新を排他ゲートとして
        // 機能させるため、同じスロットを対象とする並行リクエストは
        // どちらか一方しか成立しない
        self.set_transaction_serializable(&mut tx).await?;

        // 事前のチェックとして、以下を調べる。
        // - 差し出すスロットを要求者自身が所有しており、SWAPPABLE か
        // - 要求するスロットを他のユーザーが所有しており、SWAPPABLE か
        //
        // 上記の両方が Yes だった場合、このブロック以降の処理に進む
        let owner_id = {
            let offered = sqlx::query_as::<_, SlotStateRow>(
                r#"
                    SELECT slot_id, owned_by, status
                    FROM slots
                    WHERE slot_id = $1
                      AND owned_by = $2
                      AND status = $3
                "#,
            )
            .bind(event.offered_slot_id)
            .bind(event.requester_id)
            .bind(SlotStatus::Swappable.as_ref())
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if offered.is_none() {
                return Err(AppError::UnprocessableEntity(format!(
                    "スロット（{}）は差し出せません。所有していないか、交換可能ではありません。",
                    event.offered_slot_id
                )));
            }

            let requested = sqlx::query_as::<_, SlotStateRow>(
                r#"
                    SELECT slot_id, owned_by, status
                    FROM slots
                    WHERE slot_id = $1
                      AND owned_by <> $2
                      AND status = $3
                "#,
            )
            .bind(event.requested_slot_id)
            .bind(event.requester_id)
            .bind(SlotStatus::Swappable.as_ref())
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            let Some(requested) = requested else {
                return Err(AppError::UnprocessableEntity(format!(
                    "スロット（{}）は要求できません。他ユーザーの交換可能なスロットではありません。",
                    event.requested_slot_id
                )));
            };

            requested.owned_by
        };

        // リクエストを PENDING で挿入する
        let swap_request_id = SwapRequestId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO swap_requests
                (swap_request_id, requested_slot_id, offered_slot_id,
                requester_id, owner_id, status)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(swap_request_id)
        .bind(event.requested_slot_id)
        .bind(event.offered_slot_id)
        .bind(event.requester_id)
        .bind(owner_id)
        .bind(SwapStatus::Pending.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No swap request record has been created".into(),
            ));
        }

        // 両スロットを SWAP_PENDING にし、交換可能プールから外す。
        // 片方だけ更新された状態は許されないため件数を確認する
        let res = sqlx::query(
            r#"
                UPDATE slots
                SET status = $1
                WHERE slot_id = $2 OR slot_id = $3
            "#,
        )
        .bind(SlotStatus::SwapPending.as_ref())
        .bind(event.offered_slot_id)
        .bind(event.requested_slot_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() != 2 {
            return Err(AppError::NoRowsAffectedError(
                "Both slots must be locked for the swap request".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(swap_request_id)
    }

    // スワップリクエストへの応答（承諾・拒否）
    async fn respond(&self, event: RespondSwapRequest) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する
        self.set_transaction_serializable(&mut tx).await?;

        // PENDING であり、かつ応答者が要求されたスロットの所有者である
        // リクエストだけを対象にする。
        // 存在しない場合と所有者でない場合は区別しない
        let row = sqlx::query_as::<_, SwapRequestRow>(
            r#"
                SELECT
                    swap_request_id,
                    requested_slot_id,
                    offered_slot_id,
                    requester_id,
                    owner_id,
                    status
                FROM swap_requests
                WHERE swap_request_id = $1
                  AND owner_id = $2
                  AND status = $3
            "#,
        )
        .bind(event.swap_request_id)
        .bind(event.responder_id)
        .bind(SwapStatus::Pending.as_ref())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Err(AppError::EntityNotFound(format!(
                "スワップリクエスト（{}）が見つからないか、応答する権限がありません。",
                event.swap_request_id
            )));
        };

        let request: SwapRequest = row.try_into()?;
        let resolution = request.resolve(event.accept);

        // リクエストを終端状態にする
        let res = sqlx::query(
            r#"
                UPDATE swap_requests
                SET status = $1
                WHERE swap_request_id = $2
            "#,
        )
        .bind(resolution.request_status.as_ref())
        .bind(request.swap_request_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No swap request record has been updated".into(),
            ));
        }

        // 両スロットへ解決結果を適用する。
        // 承諾なら所有者交換＋BUSY、拒否なら所有者そのまま＋SWAPPABLE
        self.apply_disposition(&mut tx, &resolution.requested_slot)
            .await?;
        self.apply_disposition(&mut tx, &resolution.offered_slot)
            .await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn find_pending_by_user(&self, user_id: UserId) -> AppResult<SwapRequestListing> {
        // 受信（自分が要求されたスロットの所有者）。相手は要求者
        let incoming = sqlx::query_as::<_, SwapSummaryRow>(
            r#"
                SELECT
                    sr.swap_request_id,
                    sr.status,
                    req_slot.title AS requested_slot_title,
                    req_slot.start_time AS requested_slot_start,
                    off_slot.title AS offered_slot_title,
                    off_slot.start_time AS offered_slot_start,
                    requester.user_name AS counterpart_name
                FROM swap_requests AS sr
                INNER JOIN slots AS req_slot ON sr.requested_slot_id = req_slot.slot_id
                INNER JOIN slots AS off_slot ON sr.offered_slot_id = off_slot.slot_id
                INNER JOIN users AS requester ON sr.requester_id = requester.user_id
                WHERE sr.owner_id = $1
                  AND sr.status = $2
            "#,
        )
        .bind(user_id)
        .bind(SwapStatus::Pending.as_ref())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // 送信（自分が要求者）。相手は所有者
        let outgoing = sqlx::query_as::<_, SwapSummaryRow>(
            r#"
                SELECT
                    sr.swap_request_id,
                    sr.status,
                    req_slot.title AS requested_slot_title,
                    req_slot.start_time AS requested_slot_start,
                    off_slot.title AS offered_slot_title,
                    off_slot.start_time AS offered_slot_start,
                    owner.user_name AS counterpart_name
                FROM swap_requests AS sr
                INNER JOIN slots AS req_slot ON sr.requested_slot_id = req_slot.slot_id
                INNER JOIN slots AS off_slot ON sr.offered_slot_id = off_slot.slot_id
                INNER JOIN users AS owner ON sr.owner_id = owner.user_id
                WHERE sr.requester_id = $1
                  AND sr.status = $2
            "#,
        )
        .bind(user_id)
        .bind(SwapStatus::Pending.as_ref())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(SwapRequestListing {
            incoming: incoming
                .into_iter()
                .map(SwapRequestSummary::try_from)
                .collect::<AppResult<Vec<_>>>()?,
            outgoing: outgoing
                .into_iter()
                .map(SwapRequestSummary::try_from)
                .collect::<AppResult<Vec<_>>>()?,
        })
    }
}

impl SwapRepositoryImpl {
    // create, respond メソッドでのトランザクションを利用するにあたり
    // トランザクション分離レベルを SERIALIZABLE にするために
    // 内部的に使うメソッド
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn apply_disposition(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        disposition: &SlotDisposition,
    ) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE slots
                SET owned_by = $1, status = $2
                WHERE slot_id = $3
            "#,
        )
        .bind(disposition.new_owner)
        .bind(disposition.new_status.as_ref())
        .bind(disposition.slot_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No slot record has been updated for the swap resolution".into(),
            ));
        }

        Ok(())
    }
}
