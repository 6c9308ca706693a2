//! Shared fixtures: a marketplace with cheap password hashing and the two Luanda sample
//! suppliers.
#![allow(dead_code)]

use agua_expressa::config::AppConfig;
use agua_expressa::lifecycle::Marketplace;
use agua_expressa::model::{DeliveryLocation, GeoPoint, Role, UserId};
use agua_expressa::services::{RegistrationForm, StaticGeocoder};
use std::sync::Arc;

pub const PASSWORD: &str = "Segura123";

/// Where the test consumer lives.
pub const HOME: GeoPoint = GeoPoint {
    lat: -8.8383,
    lng: 13.2344,
};
pub const HOME_ADDRESS: &str = "Rua A, Luanda";

pub struct SampleSupplier {
    pub name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub address: &'static str,
    pub location: GeoPoint,
    pub price_per_liter: f64,
    pub online: bool,
}

pub const SAMPLE_SUPPLIERS: [SampleSupplier; 2] = [
    SampleSupplier {
        name: "Fornecedor A",
        email: "fornecedora@example.com",
        phone: "912345678",
        address: "Rua A, Luanda",
        location: GeoPoint {
            lat: -8.8383,
            lng: 13.2344,
        },
        price_per_liter: 100.0,
        online: true,
    },
    SampleSupplier {
        name: "Fornecedor B",
        email: "fornecedorb@example.com",
        phone: "923456789",
        address: "Rua B, Luanda",
        location: GeoPoint {
            lat: -8.8390,
            lng: 13.2350,
        },
        price_per_liter: 120.0,
        online: false,
    },
];

pub fn test_config() -> AppConfig {
    AppConfig {
        channel_buffer: 16,
        argon2_memory_kib: 1024,
        argon2_iterations: 1,
        ..AppConfig::default()
    }
}

pub fn geocoder() -> StaticGeocoder {
    StaticGeocoder::new()
        .with(HOME_ADDRESS, HOME)
        .with("Rua B, Luanda", SAMPLE_SUPPLIERS[1].location)
}

pub fn start_with(config: &AppConfig) -> Marketplace {
    Marketplace::with_geocoder(config, Arc::new(geocoder())).expect("Failed to start marketplace")
}

pub fn start() -> Marketplace {
    start_with(&test_config())
}

pub fn form(name: &str, email: &str, role: Role) -> RegistrationForm {
    RegistrationForm {
        name: name.to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        confirm_password: PASSWORD.to_string(),
        role,
        phone: None,
        address: None,
        location: None,
        price_per_liter: None,
    }
}

/// Registers both sample suppliers and applies their presence. Returns their ids in order.
pub async fn register_sample_suppliers(market: &Marketplace) -> Vec<UserId> {
    let mut ids = Vec::new();
    for sample in &SAMPLE_SUPPLIERS {
        let id = market
            .auth
            .register(RegistrationForm {
                phone: Some(sample.phone.to_string()),
                address: Some(sample.address.to_string()),
                location: Some(sample.location),
                price_per_liter: Some(sample.price_per_liter),
                ..form(sample.name, sample.email, Role::Supplier)
            })
            .await
            .expect("Failed to register supplier");
        market
            .users
            .set_online(id, sample.online)
            .await
            .expect("Failed to set presence");
        ids.push(id);
    }
    ids
}

pub async fn register_consumer(market: &Marketplace, name: &str, email: &str) -> UserId {
    market
        .auth
        .register(RegistrationForm {
            address: Some(HOME_ADDRESS.to_string()),
            location: Some(HOME),
            ..form(name, email, Role::Consumer)
        })
        .await
        .expect("Failed to register consumer")
}

pub fn home() -> DeliveryLocation {
    DeliveryLocation {
        address: HOME_ADDRESS.to_string(),
        point: HOME,
    }
}
