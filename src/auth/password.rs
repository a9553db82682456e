//! Password hashing compatible with the vacation site's stored credentials.
//!
//! Hashes use the `<algorithm>$<fields...>` encoding written by the vacation
//! site. Supported algorithms:
//!
//! * `pbkdf2_sha256$<iterations>$<salt>$<base64 digest>` (default for new hashes)
//! * `bcrypt_sha256$<bcrypt hash>` (bcrypt over the hex SHA-256 of the password)
//! * `bcrypt$<bcrypt hash>` and bare `$2a$`/`$2b$`/`$2y$` bcrypt hashes
//!
//! Anything else, including unusable passwords starting with `!`, never verifies.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

pub const PBKDF2_ALGORITHM: &str = "pbkdf2_sha256";
const SALT_LENGTH: usize = 22;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("hash error: {0}")]
    Hash(String),
    #[error("unsupported or malformed password hash")]
    Malformed,
}

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self { iterations: iterations.max(1) }
    }

    /// Encodes `password` with the default algorithm and a fresh random salt.
    pub fn make_password(&self, password: &str) -> Result<String, PasswordError> {
        let salt: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LENGTH)
            .map(char::from)
            .collect();
        self.encode_pbkdf2(password, &salt)
    }

    fn encode_pbkdf2(&self, password: &str, salt: &str) -> Result<String, PasswordError> {
        let digest = pbkdf2_sha256(password.as_bytes(), salt.as_bytes(), self.iterations);
        Ok(format!(
            "{PBKDF2_ALGORITHM}${}${salt}${}",
            self.iterations,
            STANDARD.encode(digest)
        ))
    }

    /// Checks `password` against an encoded hash. Unknown or malformed
    /// encodings are reported as errors so callers can log them; they must
    /// still be treated as a failed check.
    pub fn check_password(&self, password: &str, encoded: &str) -> Result<bool, PasswordError> {
        if encoded.is_empty() || encoded.starts_with('!') {
            return Ok(false);
        }
        if is_bare_bcrypt(encoded) {
            return verify_bcrypt(password.as_bytes(), encoded);
        }

        let (algorithm, rest) = encoded.split_once('$').ok_or(PasswordError::Malformed)?;
        match algorithm {
            PBKDF2_ALGORITHM => verify_pbkdf2(password, rest),
            "bcrypt_sha256" => {
                let prehashed = format!("{:x}", Sha256::digest(password.as_bytes()));
                verify_bcrypt(prehashed.as_bytes(), rest)
            }
            "bcrypt" => verify_bcrypt(password.as_bytes(), rest),
            _ => Err(PasswordError::Malformed),
        }
    }
}

fn is_bare_bcrypt(encoded: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"].iter().any(|p| encoded.starts_with(p))
}

fn verify_bcrypt(password: &[u8], hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, hash).map_err(|e| PasswordError::Hash(e.to_string()))
}

fn verify_pbkdf2(password: &str, fields: &str) -> Result<bool, PasswordError> {
    let mut parts = fields.splitn(3, '$');
    let (Some(iterations), Some(salt), Some(expected)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PasswordError::Malformed);
    };
    let iterations: u32 = iterations.parse().map_err(|_| PasswordError::Malformed)?;
    if iterations == 0 {
        return Err(PasswordError::Malformed);
    }
    let expected = STANDARD.decode(expected).map_err(|_| PasswordError::Malformed)?;
    let actual = pbkdf2_sha256(password.as_bytes(), salt.as_bytes(), iterations);
    Ok(bool::from(actual.as_slice().ct_eq(expected.as_slice())))
}

/// PBKDF2-HMAC-SHA256 with a 32-byte derived key.
fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut output = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut output);
    output
}
