use crate::model::id::UserId;

pub mod event;

#[derive(Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
}

#[derive(Debug)]
pub struct SlotOwner {
    pub owner_id: UserId,
    pub owner_name: String,
}
