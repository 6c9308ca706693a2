//! Client-side narrowing of order lists by status and creation date.

use crate::model::{Order, OrderStatus};
use chrono::NaiveDate;

/// Both date bounds are inclusive calendar days (UTC), so `end` covers the whole day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// `None` means every status.
    pub status: Option<OrderStatus>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        let day = order.created_at.date_naive();
        self.status.map_or(true, |status| order.status == status)
            && self.start.map_or(true, |start| day >= start)
            && self.end.map_or(true, |end| day <= end)
    }

    pub fn apply<'a>(&self, orders: impl IntoIterator<Item = &'a Order>) -> Vec<&'a Order> {
        orders.into_iter().filter(|order| self.matches(order)).collect()
    }
}
