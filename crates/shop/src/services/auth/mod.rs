//! Authentication service.
//!
//! Handles registration, password policy enforcement, and login. Every
//! login failure, whether the account is missing, disabled, or the
//! password is wrong, collapses into `AuthError::InvalidCredentials` so
//! responses cannot be used to probe which accounts exist.

mod error;
mod password;

pub use error::AuthError;
pub use password::validate_password;

use std::sync::LazyLock;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use sqlx::PgPool;

use secure_shop_core::{Email, Role, UserId, Username};

use crate::config::Argon2Config;
use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::user::User;

/// Hash of a fixed throwaway password, verified against when a login
/// identifier matches no account. Keeps the unknown-identifier path as
/// slow as a real verification so response timing does not reveal
/// whether the account exists.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"timing-equalizer", &salt)
        .map(|h| h.to_string())
        .unwrap_or_default()
});

/// Argon2id password hasher with configured cost parameters.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a hasher from cost parameters.
    ///
    /// # Errors
    ///
    /// Returns `argon2::Error` if the parameters are out of range.
    pub fn new(config: Argon2Config) -> Result<Self, argon2::Error> {
        let params = Params::new(config.m_cost, config.t_cost, config.p_cost, None)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Hashing` if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::Hashing)
    }

    /// Verify a password against a stored hash.
    ///
    /// Cost parameters come from the hash string itself, so hashes written
    /// under older parameters keep verifying after a config change.
    #[must_use]
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash).is_ok_and(|parsed| {
            self.argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }

    /// Burn one verification against the dummy hash.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &DUMMY_HASH);
    }
}

/// Input for registering a new account.
#[derive(Debug)]
pub struct RegisterInput<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub full_name: Option<&'a str>,
    pub phone_number: Option<&'a str>,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    hasher: &'a PasswordHasher,
    password_min_length: usize,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        hasher: &'a PasswordHasher,
        password_min_length: usize,
    ) -> Self {
        Self {
            users: UserRepository::new(pool),
            hasher,
            password_min_length,
        }
    }

    /// Register a new user account.
    ///
    /// New accounts always start as enabled regular users; roles are only
    /// ever changed by administrative action afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` / `AuthError::InvalidEmail` if
    /// the identifiers don't parse.
    /// Returns `AuthError::PasswordMismatch` if the confirmation differs.
    /// Returns `AuthError::WeakPassword` naming the first failing policy rule.
    /// Returns `AuthError::DuplicateIdentity` if the username or email is taken.
    pub async fn register(&self, input: RegisterInput<'_>) -> Result<User, AuthError> {
        let username = Username::parse(input.username)?;
        let email = Email::parse(input.email)?;

        if input.password != input.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(input.password, self.password_min_length)
            .map_err(AuthError::WeakPassword)?;

        let password_hash = self.hasher.hash(input.password)?;

        let user = self
            .users
            .create(NewUser {
                username: &username,
                email: &email,
                password_hash: &password_hash,
                full_name: input.full_name,
                phone_number: input.phone_number,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(field) => AuthError::DuplicateIdentity(field),
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    /// Authenticate with a username or email plus password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for every failure cause:
    /// unknown identifier, wrong password, or disabled account. The real
    /// cause is logged server-side only.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> Result<User, AuthError> {
        let Some((user, stored_hash)) = self.users.get_credential(identifier).await? else {
            // Unknown identifier still costs one verification.
            self.hasher.verify_dummy(password);
            tracing::info!("Login failed: unknown identifier");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &stored_hash) {
            tracing::info!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.enabled {
            tracing::warn!(user_id = %user.id, "Login failed: account disabled");
            return Err(AuthError::InvalidCredentials);
        }

        self.users.update_last_login(user.id).await?;

        tracing::info!(user_id = %user.id, "User authenticated");

        Ok(user)
    }

    /// Whether a username could still be registered.
    ///
    /// A value that fails to parse is reported as unavailable, since
    /// registration would reject it anyway.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn username_available(&self, username: &str) -> Result<bool, AuthError> {
        let Ok(username) = Username::parse(username) else {
            return Ok(false);
        };
        Ok(!self.users.username_taken(&username).await?)
    }

    /// Whether an email could still be registered.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn email_available(&self, email: &str) -> Result<bool, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Ok(false);
        };
        Ok(!self.users.email_taken(&email).await?)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Enable or disable an account. Administrative action.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn set_account_enabled(&self, user_id: UserId, enabled: bool) -> Result<(), AuthError> {
        self.users
            .set_enabled(user_id, enabled)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(%user_id, enabled, "Account enabled flag changed");

        Ok(())
    }

    /// Change an account's role. Administrative action.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn set_account_role(&self, user_id: UserId, role: Role) -> Result<(), AuthError> {
        self.users
            .set_role(user_id, role)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(%user_id, %role, "Account role changed");

        Ok(())
    }
}
