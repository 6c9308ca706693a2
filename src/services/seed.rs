//! Demo supplier accounts spread over the Lubango neighbourhoods.

use crate::clients::UserClient;
use crate::model::{GeoPoint, Role, UserCreate, UserId};
use rand::Rng;
use tracing::{info, instrument, warn};

pub const LUBANGO_NEIGHBOURHOODS: [&str; 12] = [
    "Arco-Íris",
    "Santo António",
    "São João",
    "Comandante Cowboy",
    "Chioco",
    "Hossi",
    "Tchimukua",
    "Santo Cristo",
    "Lucrécia",
    "Casimiro",
    "11 de Novembro",
    "Samucongo",
];

/// Approximate centre of Lubango.
pub const LUBANGO_CENTRE: GeoPoint = GeoPoint {
    lat: -14.917,
    lng: 13.492,
};

/// Maximum offset from [`LUBANGO_CENTRE`] on each axis, in degrees.
pub const JITTER_DEG: f64 = 0.01;

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "Fornecedor123";

/// The `index`-th seed supplier, with its position drawn from `rng`.
pub fn seed_supplier<R: Rng>(
    index: usize,
    neighbourhood: &str,
    password_hash: &str,
    rng: &mut R,
) -> UserCreate {
    let location = GeoPoint::new(
        LUBANGO_CENTRE.lat + rng.gen_range(-JITTER_DEG..=JITTER_DEG),
        LUBANGO_CENTRE.lng + rng.gen_range(-JITTER_DEG..=JITTER_DEG),
    );
    UserCreate {
        name: format!("Fornecedor {neighbourhood}"),
        email: format!("fornecedor{}@aguaexpressa.ao", index + 1),
        password_hash: password_hash.to_string(),
        role: Role::Supplier,
        phone: None,
        address: Some(format!("Bairro {neighbourhood}, Lubango")),
        photo_url: Some(format!("https://i.pravatar.cc/150?img={}", index + 1)),
        location: Some(location),
        price_per_liter: Some(10.0 + index as f64 * 4.0),
        online: true,
    }
}

/// Registers one supplier per neighbourhood. Failures are logged and skipped.
#[instrument(skip(users, password_hash, rng))]
pub async fn seed_suppliers<R: Rng>(
    users: &UserClient,
    password_hash: &str,
    rng: &mut R,
) -> Vec<UserId> {
    let mut created = Vec::with_capacity(LUBANGO_NEIGHBOURHOODS.len());
    for (index, neighbourhood) in LUBANGO_NEIGHBOURHOODS.iter().enumerate() {
        let params = seed_supplier(index, neighbourhood, password_hash, rng);
        let email = params.email.clone();
        match users.create_user(params).await {
            Ok(id) => created.push(id),
            Err(e) => warn!(%email, error = %e, "Seeding supplier failed"),
        }
    }
    info!(count = created.len(), "Suppliers seeded");
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn prices_step_by_four_and_positions_stay_near_the_centre() {
        let mut rng = StdRng::seed_from_u64(7);
        for (index, neighbourhood) in LUBANGO_NEIGHBOURHOODS.iter().enumerate() {
            let supplier = seed_supplier(index, neighbourhood, "hash", &mut rng);
            assert_eq!(supplier.price_per_liter, Some(10.0 + 4.0 * index as f64));
            assert_eq!(
                supplier.address.as_deref(),
                Some(format!("Bairro {neighbourhood}, Lubango").as_str())
            );
            let at = supplier.location.unwrap();
            assert!((at.lat - LUBANGO_CENTRE.lat).abs() <= JITTER_DEG + 1e-9);
            assert!((at.lng - LUBANGO_CENTRE.lng).abs() <= JITTER_DEG + 1e-9);
            assert!(supplier.online);
        }
    }
}
