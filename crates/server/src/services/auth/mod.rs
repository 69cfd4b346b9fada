//! Authentication service.
//!
//! Password registration and login. Both hand back a signed token carrying
//! the caller's identity claim with their current affiliation.

mod error;
pub mod jwt;

pub use error::AuthError;
pub use jwt::JwtService;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use shopping_planner_core::{Affiliation, Email, IdentityClaim};

use crate::db::{RepositoryError, families, users};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// A user together with a freshly signed token.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub claim: IdentityClaim,
    pub token: String,
}

/// Authentication service.
pub struct AuthService<'a> {
    pool: &'a PgPool,
    jwt: &'a JwtService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, jwt: &'a JwtService) -> Self {
        Self { pool, jwt }
    }

    /// Register a new user with name, email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if a field is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[tracing::instrument(skip_all)]
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(AuthError::MissingField("full name"));
        }
        if email.trim().is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = users::create(self.pool, full_name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "Registered user");
        let claim = IdentityClaim::new(user.id, user.email.clone(), Affiliation::Unaffiliated);
        let token = self.jwt.issue(&claim)?;
        Ok(Session { user, claim, token })
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = users::get_password_hash(self.pool, &email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let affiliation = families::membership_for_user(self.pool, user.id)
            .await?
            .map_or(Affiliation::Unaffiliated, |m| m.affiliation());
        let claim = IdentityClaim::new(user.id, user.email.clone(), affiliation);
        let token = self.jwt.issue(&claim)?;
        Ok(Session { user, claim, token })
    }

    /// Sign a token for a claim refreshed by a membership change.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if encoding fails.
    pub fn reissue(&self, claim: &IdentityClaim) -> Result<String, AuthError> {
        self.jwt.issue(claim)
    }
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
