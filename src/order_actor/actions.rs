//! Custom actions for the Order actor.
//!
//! Every action is a status transition. Both return the order as it was stored
//! after the transition.

use crate::model::{OrderStatus, UserId};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Moves the order to the given status.
    Transition(OrderStatus),
    /// Moves a pending order to `accepted` and assigns `supplier_id`.
    ///
    /// # Errors
    /// Under the strict policy, fails if the order was placed with a different supplier.
    Accept { supplier_id: UserId },
}
