//! ActorEntity implementation for [`User`].

use super::actions::UserAction;
use super::error::UserError;
use crate::model::{Role, User, UserCreate, UserId, UserQuery, UserUpdate};
use async_trait::async_trait;
use chrono::Utc;
use resource_store::ActorEntity;

/// Rejects anything that is not a finite, positive price.
pub(crate) fn validate_price(price: f64) -> Result<f64, UserError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(UserError::Validation(format!(
            "price per liter must be positive, got {price}"
        )))
    }
}

fn non_blank(field: &str, value: String) -> Result<String, UserError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Stored emails and `ByEmail` lookups go through the same Unicode lowercasing.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl ActorEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = UserAction;
    type ActionResult = bool;
    type Query = UserQuery;
    type Context = ();
    type Error = UserError;

    /// Creates a new User from creation parameters.
    ///
    /// The email is normalized; suppliers must carry a positive price and consumers
    /// never carry one.
    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, Self::Error> {
        let name = non_blank("name", params.name)?;
        let email = normalize_email(&params.email);
        if !email.contains('@') {
            return Err(UserError::Validation(format!("invalid email '{email}'")));
        }
        let price_per_liter = match params.role {
            Role::Supplier => Some(validate_price(params.price_per_liter.ok_or_else(
                || UserError::Validation("suppliers need a price per liter".to_string()),
            )?)?),
            Role::Consumer => None,
        };
        if let Some(location) = params.location {
            if !location.is_valid() {
                return Err(UserError::Validation(format!(
                    "invalid location {location:?}"
                )));
            }
        }

        Ok(Self {
            id,
            name,
            email,
            phone: params.phone,
            photo_url: params.photo_url,
            address: params.address,
            role: params.role,
            location: params.location,
            online: params.online,
            price_per_liter,
            created_at: Utc::now(),
            password_hash: params.password_hash,
        })
    }

    fn id(&self) -> &UserId {
        &self.id
    }

    fn matches(&self, query: &UserQuery) -> bool {
        match query {
            UserQuery::All => true,
            UserQuery::ByRole(role) => self.role == *role,
            UserQuery::ByEmail(email) => self.email == normalize_email(email),
        }
    }

    /// Applies profile edits.
    ///
    /// # Fields Updated
    /// - `name`: must not be blank
    /// - `phone`, `address`, `photo_url`: replaced as given
    /// - `price_per_liter`: suppliers only, must be positive
    async fn on_update(&mut self, update: UserUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = non_blank("name", name)?;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(photo_url) = update.photo_url {
            self.photo_url = Some(photo_url);
        }
        if let Some(price) = update.price_per_liter {
            if self.role != Role::Supplier {
                return Err(UserError::Validation(
                    "only suppliers have a price per liter".to_string(),
                ));
            }
            self.price_per_liter = Some(validate_price(price)?);
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: UserAction, _ctx: &()) -> Result<bool, Self::Error> {
        match action {
            UserAction::SetOnline(online) => {
                let changed = self.online != online;
                self.online = online;
                Ok(changed)
            }
            UserAction::UpdateLocation(point) => {
                if !point.is_valid() {
                    return Err(UserError::Validation(format!("invalid location {point:?}")));
                }
                let changed = self.location != Some(point);
                self.location = Some(point);
                Ok(changed)
            }
        }
    }
}
