use kernel::model::{id::UserId, user::User};

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        let UserRow {
            user_id,
            user_name,
            email,
        } = value;
        User {
            user_id,
            user_name,
            email,
        }
    }
}

// ログイン検証に使う型。password_hash はこの型から外に出さない
#[derive(sqlx::FromRow)]
pub struct UserItemRow {
    pub user_id: UserId,
    pub password_hash: String,
}
