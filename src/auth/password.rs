use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{NewUser, User};

const ARGON2_MEMORY: u32 = 64 * 1024; // 64KB
const ARGON2_ITERATIONS: u32 = 1;
const ARGON2_PARALLELISM: u32 = 4;
const ARGON2_OUTPUT_LEN: usize = 32;

const RESET_UUID_LENGTH: usize = 32;

/// Password handling for registry identities: registration, database login,
/// password change and the email reset flow. Hashes are Argon2id in PHC
/// format; the salt lives inside the hash string.
pub struct Authenticator {
    argon2: Argon2<'static>,
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new()
    }
}

impl Authenticator {
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(
            ARGON2_MEMORY,
            ARGON2_ITERATIONS,
            ARGON2_PARALLELISM,
            Some(ARGON2_OUTPUT_LEN),
        )
        .expect("invalid argon2 params");

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hashes a password using Argon2id
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::Config(format!("failed to hash password: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verifies a password against a stored hash
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| Error::Config(format!("invalid hash format: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Config(format!("failed to verify password: {e}"))),
        }
    }

    /// Registers a user: the plaintext password is hashed before the row is
    /// inserted. Returns the store-generated user id.
    pub fn register(&self, store: &dyn Store, mut user: NewUser, password: &str) -> Result<i64> {
        user.password = self.hash(password)?;
        store.create_user(&user)
    }

    /// Database login: the principal may be a username or an email address.
    /// Soft-deleted identities and identities with an empty password
    /// placeholder (admin before its password is set, anonymous) never match.
    /// Returns the user with the password hash cleared.
    pub fn login(&self, store: &dyn Store, principal: &str, password: &str) -> Result<Option<User>> {
        let Some(mut user) = store.login_candidate(principal)? else {
            return Ok(None);
        };
        if user.password.is_empty() || !self.verify(password, &user.password)? {
            return Ok(None);
        }
        user.password = String::new();
        Ok(Some(user))
    }

    /// Changes a password, verifying the old one first when given.
    pub fn change_password(
        &self,
        store: &dyn Store,
        user_id: i64,
        old_password: Option<&str>,
        new_password: &str,
    ) -> Result<()> {
        let user = store.user_by_id(user_id)?.ok_or(Error::NotFound)?;
        if let Some(old) = old_password {
            if user.password.is_empty() || !self.verify(old, &user.password)? {
                return Err(Error::Unauthorized);
            }
        }
        store.update_password(user_id, &self.hash(new_password)?)
    }

    /// Starts the reset flow for the account behind an email address and
    /// returns the opaque token the reset link carries.
    pub fn request_reset(&self, store: &dyn Store, email: &str) -> Result<String> {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RESET_UUID_LENGTH)
            .map(char::from)
            .collect();
        store.set_reset_uuid(email, &token)?;
        Ok(token)
    }

    /// Completes the reset flow; the token is single-use.
    pub fn reset_password(
        &self,
        store: &dyn Store,
        reset_uuid: &str,
        new_password: &str,
    ) -> Result<()> {
        let user = store.user_by_reset_uuid(reset_uuid)?.ok_or(Error::NotFound)?;
        store.reset_password(user.user_id, &self.hash(new_password)?)
    }
}
