//! Nearest-supplier search.
//!
//! Suppliers are pulled from the user store, given a haversine distance from the search
//! origin, sorted nearest first and then narrowed by [`SupplierFilters`].

use super::geocoding::Geocoder;
use crate::clients::UserClient;
use crate::error::MarketError;
use crate::model::{GeoPoint, Supplier, User};
use crate::user_actor::UserError;
use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument};

/// What to do with suppliers that never shared a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingLocation {
    /// Leave them out of the results.
    Exclude,
    /// Keep them, without a distance, after every located supplier.
    #[default]
    Unranked,
}

impl FromStr for MissingLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclude" => Ok(MissingLocation::Exclude),
            "unranked" => Ok(MissingLocation::Unranked),
            other => Err(format!("expected 'exclude' or 'unranked', got '{other}'")),
        }
    }
}

/// Narrowing applied after ranking. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierFilters {
    pub max_price: Option<f64>,
    /// Suppliers without a distance never pass this filter.
    pub max_distance_km: Option<f64>,
    pub online_only: bool,
    /// Case-insensitive substring of the supplier's address.
    pub address_contains: Option<String>,
}

impl SupplierFilters {
    pub fn accepts(&self, supplier: &Supplier) -> bool {
        if let Some(max) = self.max_price {
            if supplier.price_per_liter > max {
                return false;
            }
        }
        if let Some(max) = self.max_distance_km {
            match supplier.distance_km {
                Some(distance) if distance <= max => {}
                _ => return false,
            }
        }
        if self.online_only && !supplier.user.online {
            return false;
        }
        if let Some(needle) = &self.address_contains {
            let needle = needle.trim().to_lowercase();
            if !needle.is_empty() {
                let address = supplier.user.address.as_deref().unwrap_or_default();
                if !address.to_lowercase().contains(&needle) {
                    return false;
                }
            }
        }
        true
    }

    pub fn apply(&self, mut suppliers: Vec<Supplier>) -> Vec<Supplier> {
        suppliers.retain(|supplier| self.accepts(supplier));
        suppliers
    }
}

fn by_distance(a: &Supplier, b: &Supplier) -> Ordering {
    match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Turns supplier accounts into [`Supplier`]s ranked by distance from `origin`.
///
/// Users that are not priced suppliers are skipped. Ties keep their input order.
pub fn rank_suppliers(
    users: impl IntoIterator<Item = User>,
    origin: GeoPoint,
    missing: MissingLocation,
) -> Vec<Supplier> {
    let mut ranked: Vec<Supplier> = users
        .into_iter()
        .filter_map(|user| Supplier::try_from(user).ok())
        .filter_map(|mut supplier| {
            supplier.distance_km = supplier.location().map(|at| origin.distance_km(&at));
            match (supplier.distance_km, missing) {
                (None, MissingLocation::Exclude) => None,
                _ => Some(supplier),
            }
        })
        .collect();
    ranked.sort_by(by_distance);
    ranked
}

/// Supplier search backed by the user store.
#[derive(Clone)]
pub struct SupplierSearch {
    users: UserClient,
    geocoder: Arc<dyn Geocoder>,
    missing: MissingLocation,
}

impl SupplierSearch {
    pub fn new(users: UserClient, geocoder: Arc<dyn Geocoder>, missing: MissingLocation) -> Self {
        Self {
            users,
            geocoder,
            missing,
        }
    }

    /// Suppliers around `origin`, nearest first.
    #[instrument(skip(self))]
    pub async fn nearby(
        &self,
        origin: GeoPoint,
        filters: &SupplierFilters,
    ) -> Result<Vec<Supplier>, UserError> {
        let users = self.users.suppliers().await?;
        let total = users.len();
        let ranked = filters.apply(rank_suppliers(users, origin, self.missing));
        debug!(total, matched = ranked.len(), "Supplier search");
        Ok(ranked)
    }

    /// Geocodes `address` and searches around the result.
    #[instrument(skip(self))]
    pub async fn near_address(
        &self,
        address: &str,
        filters: &SupplierFilters,
    ) -> Result<(GeoPoint, Vec<Supplier>), MarketError> {
        let origin = self.geocoder.geocode(address).await?;
        let suppliers = self.nearby(origin, filters).await?;
        Ok((origin, suppliers))
    }
}
