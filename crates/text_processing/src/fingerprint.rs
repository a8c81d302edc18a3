//! Content fingerprint
//!
//! SHA-256 over the normalized text. Stored next to generated timestamps;
//! a different fingerprint at render time means the timestamps are stale.

use narration_core::NormalizedText;
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the normalized text
pub fn fingerprint(text: &NormalizedText) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_str().as_bytes());
    format!("{:x}", hasher.finalize())
}
