use std::str::FromStr;

use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::{SlotId, UserId},
        slot::{
            event::{CreateSlot, UpdateSlotStatus},
            Slot, SlotStatus,
        },
    },
    repository::slot::SlotRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{model::slot::SlotRow, ConnectionPool};

#[derive(new)]
pub struct SlotRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl SlotRepository for SlotRepositoryImpl {
    async fn create(&self, event: CreateSlot, owner_id: UserId) -> AppResult<Slot> {
        let slot_id = SlotId::new();

        // 新規スロットは必ず BUSY で作成する
        let res = sqlx::query(
            r#"
                INSERT INTO slots (slot_id, title, start_time, end_time, status, owned_by)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(slot_id)
        .bind(&event.title)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(SlotStatus::Busy.as_ref())
        .bind(owner_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No slot record has been created".into(),
            ));
        }

        let row = sqlx::query_as::<_, SlotRow>(
            r#"
                SELECT
                    s.slot_id,
                    s.title,
                    s.start_time,
                    s.end_time,
                    s.status,
                    s.owned_by,
                    u.user_name AS owner_name
                FROM slots AS s
                INNER JOIN users AS u ON s.owned_by = u.user_id
                WHERE s.slot_id = $1
            "#,
        )
        .bind(slot_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.try_into()
    }

    async fn find_by_owner(&self, owner_id: UserId) -> AppResult<Vec<Slot>> {
        let rows = sqlx::query_as::<_, SlotRow>(
            r#"
                SELECT
                    s.slot_id,
                    s.title,
                    s.start_time,
                    s.end_time,
                    s.status,
                    s.owned_by,
                    u.user_name AS owner_name
                FROM slots AS s
                INNER JOIN users AS u ON s.owned_by = u.user_id
                WHERE s.owned_by = $1
                ORDER BY s.start_time ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Slot::try_from).collect()
    }

    async fn update_status(&self, event: UpdateSlotStatus) -> AppResult<()> {
        // SWAP_PENDING のスロットは交渉の解決以外で状態を変えられない。
        // 条件付き UPDATE 一文で判定と更新を不可分にする
        let res = sqlx::query(
            r#"
                UPDATE slots
                SET status = $1
                WHERE slot_id = $2
                  AND owned_by = $3
                  AND status <> $4
            "#,
        )
        .bind(event.status.as_ref())
        .bind(event.slot_id)
        .bind(event.requested_user)
        .bind(SlotStatus::SwapPending.as_ref())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            // 更新できなかった理由を調べて返す。
            // 存在しない場合と所有していない場合は区別しない
            let status: Option<String> = sqlx::query_scalar(
                r#"
                    SELECT status
                    FROM slots
                    WHERE slot_id = $1 AND owned_by = $2
                "#,
            )
            .bind(event.slot_id)
            .bind(event.requested_user)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            return match status {
                Some(s) if SlotStatus::from_str(&s) == Ok(SlotStatus::SwapPending) => {
                    Err(AppError::UnprocessableEntity(format!(
                        "スロット（{}）はスワップ交渉中のため状態を変更できません。",
                        event.slot_id
                    )))
                }
                _ => Err(AppError::EntityNotFound(format!(
                    "スロット（{}）が見つかりませんでした。",
                    event.slot_id
                ))),
            };
        }

        Ok(())
    }

    async fn find_swappable_excluding(&self, excluded_owner_id: UserId) -> AppResult<Vec<Slot>> {
        let rows = sqlx::query_as::<_, SlotRow>(
            r#"
                SELECT
                    s.slot_id,
                    s.title,
                    s.start_time,
                    s.end_time,
                    s.status,
                    s.owned_by,
                    u.user_name AS owner_name
                FROM slots AS s
                INNER JOIN users AS u ON s.owned_by = u.user_id
                WHERE s.status = $1
                  AND s.owned_by <> $2
            "#,
        )
        .bind(SlotStatus::Swappable.as_ref())
        .bind(excluded_owner_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Slot::try_from).collect()
    }
}
