//! Salted, iterated SHA-256 password hashing

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::PortalError;

const HASH_ITERATIONS: u32 = 10_000;
const MIN_PASSWORD_LENGTH: usize = 8;

pub fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_password(password: &str, salt: &str) -> String {
    let mut digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();

    for _ in 1..HASH_ITERATIONS {
        digest = Sha256::new()
            .chain_update(digest)
            .chain_update(password.as_bytes())
            .finalize();
    }

    hex::encode(digest)
}

pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let computed = hash_password(password, salt);
    computed.as_bytes().ct_eq(expected_hash.as_bytes()).into()
}

pub fn check_strength(password: &str) -> Result<(), PortalError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PortalError::ValidationError(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}
