//! Opaque token generator.

use rand::{distributions::Uniform, rngs::OsRng, Rng, RngCore};
use sha2::{Digest, Sha256};

const ALPHANUMERIC_LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Hex-encoded random token of `bytes` bytes from the OS CSPRNG.
pub fn generate_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Hex SHA-256 digest of `value`.
pub fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Random string over `[a-z0-9]`.
pub fn random_alphanumeric(len: usize) -> String {
    let dist = Uniform::from(0..ALPHANUMERIC_LOWER.len());
    OsRng
        .sample_iter(dist)
        .take(len)
        .map(|i| ALPHANUMERIC_LOWER[i] as char)
        .collect()
}
