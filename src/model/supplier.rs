use super::{GeoPoint, Role, User, UserId};
use serde::Serialize;

/// A supplier account as seen from a search origin.
///
/// Built from a [`User`] with role `supplier` and a price. `distance_km` is computed per
/// query and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(flatten)]
    pub user: User,
    // already present in the flattened user document
    #[serde(skip)]
    pub price_per_liter: f64,
    pub distance_km: Option<f64>,
}

impl Supplier {
    pub fn id(&self) -> UserId {
        self.user.id
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.user.location
    }

    /// Price for `liters` at this supplier's rate.
    pub fn quote(&self, liters: f64) -> f64 {
        liters * self.price_per_liter
    }
}

impl TryFrom<User> for Supplier {
    type Error = User;

    /// Fails, handing the user back, unless it is a supplier with a price.
    fn try_from(user: User) -> Result<Self, Self::Error> {
        match (user.role, user.price_per_liter) {
            (Role::Supplier, Some(price)) => Ok(Self {
                price_per_liter: price,
                user,
                distance_km: None,
            }),
            _ => Err(user),
        }
    }
}
