//! Token Service
//!
//! Random namespace tokens, element keys and invite codes, plus Argon2id
//! hashing of namespace tokens.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::Rng;
use tracing::debug;

use crate::shared::error::{PlatformError, Result};

const TOKEN_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.+-#*";
const ELEMENT_KEY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const TOKEN_LENGTH: usize = 64;
pub const ELEMENT_KEY_LENGTH: usize = 8;
pub const INVITE_CODE_LENGTH: usize = 32;

/// Attempts at finding a free random key or code before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 16;

fn random_string(alphabet: &[u8], length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

/// Namespace access token (64 chars).
pub fn generate_token() -> String {
    random_string(TOKEN_ALPHABET, TOKEN_LENGTH)
}

/// Element key candidate (8 lowercase alphanumeric chars).
pub fn generate_element_key() -> String {
    random_string(ELEMENT_KEY_ALPHABET, ELEMENT_KEY_LENGTH)
}

/// Invite code candidate (32 chars, token alphabet).
pub fn generate_invite_code() -> String {
    random_string(TOKEN_ALPHABET, INVITE_CODE_LENGTH)
}

/// Argon2id configuration
#[derive(Debug, Clone)]
pub struct Argon2Config {
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations) (default: 1)
    pub time_cost: u32,
    /// Parallelism (default: 2)
    pub parallelism: u32,
    /// Output hash length in bytes (default: 32)
    pub output_len: usize,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 65536,
            time_cost: 1,
            parallelism: 2,
            output_len: 32,
        }
    }
}

impl Argon2Config {
    /// Low memory config for testing (faster but less secure)
    pub fn testing() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
            output_len: 32,
        }
    }

    fn to_params(&self) -> Result<Params> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(self.output_len),
        )
        .map_err(|e| PlatformError::internal(format!("Invalid Argon2 params: {}", e)))
    }
}

/// Hashes and verifies namespace tokens.
#[derive(Clone)]
pub struct TokenService {
    argon2: Argon2<'static>,
}

impl TokenService {
    pub fn new(config: Argon2Config) -> Result<Self> {
        let params = config.to_params()?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        Ok(Self { argon2 })
    }

    /// Hash a plaintext token into a PHC string.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PlatformError::internal(format!("Failed to hash token: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Verify a plaintext token against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; a malformed stored hash is an error.
    pub fn check(&self, hash: &str, plaintext: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PlatformError::internal(format!("Invalid token hash format: {}", e)))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Token verification failed");
                Ok(false)
            }
            Err(e) => Err(PlatformError::internal(format!(
                "Token verification error: {}",
                e
            ))),
        }
    }
}
