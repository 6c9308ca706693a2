//! Registration, sign-in and password reset.
//!
//! Passwords are hashed with Argon2id; only the PHC hash string is ever stored on the
//! [`User`].

use crate::clients::UserClient;
use crate::model::{GeoPoint, Role, User, UserCreate, UserId};
use crate::user_actor::UserError;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand_core::OsRng;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// One failed form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("Invalid form: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    InvalidForm(Vec<FieldError>),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    User(#[from] UserError),
}

/// Loose structural check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

/// Everything the sign-up screen collects.
#[derive(Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    /// Required for suppliers.
    pub price_per_liter: Option<f64>,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    /// Checks every field and reports all failures at once.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "name is required"));
        }
        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "email is required"));
        } else if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "invalid email"));
        }

        let password = &self.password;
        if password.chars().count() < 8 {
            errors.push(FieldError::new("password", "must be at least 8 characters"));
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            errors.push(FieldError::new("password", "must contain a lowercase letter"));
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            errors.push(FieldError::new("password", "must contain an uppercase letter"));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push(FieldError::new("password", "must contain a digit"));
        }
        if self.confirm_password != self.password {
            errors.push(FieldError::new("confirm_password", "passwords must match"));
        }

        if self.role == Role::Supplier {
            match self.price_per_liter {
                Some(price) if price.is_finite() && price > 0.0 => {}
                Some(_) => errors.push(FieldError::new(
                    "price_per_liter",
                    "price per liter must be positive",
                )),
                None => errors.push(FieldError::new(
                    "price_per_liter",
                    "suppliers must set a price per liter",
                )),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Account operations on top of the user store.
#[derive(Clone)]
pub struct AuthService {
    users: UserClient,
    hasher: Argon2<'static>,
}

impl AuthService {
    /// Uses the Argon2 default parameters.
    pub fn new(users: UserClient) -> Self {
        Self {
            users,
            hasher: Argon2::default(),
        }
    }

    /// Argon2id with explicit memory (KiB) and iteration costs.
    pub fn with_costs(users: UserClient, memory_kib: u32, iterations: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self {
            users,
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    #[instrument(skip(self, password), err(Display))]
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        if password.is_empty() {
            return Err(AuthError::Hashing("password must not be empty".to_string()));
        }
        let salt = SaltString::generate(&mut OsRng);
        self.hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!(error = %e, "Argon2 password hashing failed");
                AuthError::Hashing(e.to_string())
            })
    }

    fn verify_password(&self, hash: &str, password: &str) -> Result<bool, AuthError> {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password hash is unusable");
                return Ok(false);
            }
        };
        match self.hasher.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }

    /// Validates the form, rejects duplicate emails and stores the new account.
    #[instrument(skip(self))]
    pub async fn register(&self, form: RegistrationForm) -> Result<UserId, AuthError> {
        form.validate().map_err(AuthError::InvalidForm)?;

        if self.users.find_by_email(&form.email).await?.is_some() {
            warn!(email = %form.email, "Email already registered");
            return Err(AuthError::EmailTaken(form.email.trim().to_lowercase()));
        }

        let password_hash = self.hash_password(&form.password)?;
        let id = self
            .users
            .create_user(UserCreate {
                name: form.name,
                email: form.email,
                password_hash,
                role: form.role,
                phone: form.phone,
                address: form.address,
                photo_url: None,
                location: form.location,
                price_per_liter: form.price_per_liter,
                online: false,
            })
            .await?;
        info!(user_id = %id, role = %form.role, "Registered");
        Ok(id)
    }

    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            debug!("Unknown email");
            return Err(AuthError::InvalidCredentials);
        };
        if !self.verify_password(&user.password_hash, password)? {
            debug!(user_id = %user.id, "Wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// Records a reset request. Unknown emails succeed silently.
    #[instrument(skip(self))]
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        if !is_valid_email(email) {
            return Err(AuthError::InvalidForm(vec![FieldError::new(
                "email",
                "invalid email",
            )]));
        }
        match self.users.find_by_email(email).await? {
            Some(user) => info!(user_id = %user.id, "Password reset requested"),
            None => debug!("Password reset requested for unknown email"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "Segura123".into(),
            confirm_password: "Segura123".into(),
            role: Role::Consumer,
            phone: None,
            address: None,
            location: None,
            price_per_liter: None,
        }
    }

    #[test]
    fn valid_form_passes() {
        assert_eq!(form().validate(), Ok(()));
    }

    #[test]
    fn every_failing_field_is_reported() {
        let bad = RegistrationForm {
            name: " ".into(),
            email: "ana@".into(),
            password: "short".into(),
            confirm_password: "other".into(),
            ..form()
        };
        let errors = bad.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"confirm_password"));
        // too short, no uppercase, no digit
        assert_eq!(fields.iter().filter(|f| **f == "password").count(), 3);
    }

    #[test]
    fn suppliers_need_a_positive_price() {
        let supplier = RegistrationForm {
            role: Role::Supplier,
            ..form()
        };
        assert_eq!(supplier.validate().unwrap_err()[0].field, "price_per_liter");

        let priced = RegistrationForm {
            price_per_liter: Some(12.5),
            ..supplier
        };
        assert!(priced.validate().is_ok());
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email(" Ana.Lemos@mail.co.ao "));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@mail.com"));
        assert!(!is_valid_email("@mail.com"));
        assert!(!is_valid_email("a@b@mail.com"));
    }

    #[tokio::test]
    async fn hash_verifies_only_its_own_password() {
        let (client, _receiver) = resource_store::mock::create_mock_client(1);
        let auth = AuthService::with_costs(UserClient::new(client), 1024, 1).unwrap();

        let hash = auth.hash_password("Segura123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(auth.verify_password(&hash, "Segura123").unwrap());
        assert!(!auth.verify_password(&hash, "segura123").unwrap());
    }

    #[tokio::test]
    async fn unusable_hash_is_a_mismatch() {
        let (client, _receiver) = resource_store::mock::create_mock_client(1);
        let auth = AuthService::with_costs(UserClient::new(client), 1024, 1).unwrap();

        assert!(!auth.verify_password("", "Segura123").unwrap());
        assert!(!auth.verify_password("plain-text", "Segura123").unwrap());
    }
}
