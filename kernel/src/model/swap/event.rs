use derive_new::new;

use crate::model::id::{SlotId, SwapRequestId, UserId};

#[derive(Debug, new)]
pub struct CreateSwapRequest {
    pub requester_id: UserId,
    pub offered_slot_id: SlotId,
    pub requested_slot_id: SlotId,
}

#[derive(Debug, new)]
pub struct RespondSwapRequest {
    pub swap_request_id: SwapRequestId,
    pub responder_id: UserId,
    pub accept: bool,
}
