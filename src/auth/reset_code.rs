use sha2::{Digest, Sha256};

/// Generate an opaque one-time reset code. The raw value only ever leaves the
/// process inside the emailed link; the store keeps its hash.
pub fn generate() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

pub fn hash(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}
