//! Random URL-safe route IDs.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;

use super::IdSource;

/// Number of random bytes behind each ID.
pub const ID_BYTES: usize = 16;

/// Generates IDs from 16 bytes of the thread-local CSPRNG, encoded as
/// URL-safe base64 without padding (22 characters).
///
/// # Examples
///
/// ```
/// use u_evoroute::store::{IdSource, RandomIdSource};
///
/// let id = RandomIdSource.new_id();
/// assert_eq!(id.len(), 22);
/// assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn new_id(&self) -> String {
        let mut bytes = [0u8; ID_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_shape() {
        let id = RandomIdSource.new_id();
        assert_eq!(id.len(), 22);
        assert!(!id.contains(['+', '/', '=']));
    }

    #[test]
    fn test_ids_are_distinct() {
        let ids: HashSet<String> = (0..10_000).map(|_| RandomIdSource.new_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_decodes_to_sixteen_bytes() {
        let decoded = URL_SAFE_NO_PAD
            .decode(RandomIdSource.new_id())
            .expect("valid base64");
        assert_eq!(decoded.len(), ID_BYTES);
    }
}
