// hasher.rs — SHA-256 of history lines, lowercase hex.

use sha2::{Digest, Sha256};

pub fn hash_str(s: &str) -> String {
    format!("{:x}", Sha256::digest(s.as_bytes()))
}
