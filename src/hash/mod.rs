//! SHA-256 hashing
//!
//! Provides the [`Digest`] value type and one-shot helpers on top of the
//! streaming [`Sha256`] engine.

pub mod sha256;

pub use sha256::Sha256;

use std::fmt;

/// Digest length in bytes
pub const DIGEST_LEN: usize = 32;

/// SHA-256 digest (32 bytes)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Create digest from raw bytes
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }

    /// Copy a digest out of a slice, which must be exactly 32 bytes long
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; DIGEST_LEN] = bytes.try_into().ok()?;
        Some(Digest(arr))
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes).ok_or(hex::FromHexError::InvalidStringLength)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Hash a complete byte sequence
pub fn hash(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize()
}

/// Hash `length` bytes of `data` starting at `offset`.
///
/// Out-of-range arguments are clamped instead of rejected: a negative offset
/// shortens the length by the same amount and starts at zero, the length is
/// cut to what remains after the offset, and anything that leaves no bytes
/// hashes the empty message.
pub fn hash_range(data: &[u8], offset: i64, length: i64) -> Digest {
    // Widened so extreme arguments cannot overflow
    let available = data.len() as i128;
    let (mut offset, mut length) = (offset as i128, length as i128);

    if offset < 0 {
        length += offset;
        offset = 0;
    }
    if length > available - offset {
        length = available - offset;
    }
    if available == 0 || length <= 0 {
        return Sha256::new().finalize();
    }

    let start = offset as usize;
    hash(&data[start..start + length as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_fixture_vectors() {
        let cases: [(&[u8], &str); 3] = [
            (
                b"78a6273103d17c39a0b6126e226cec70e33337f4bc6a38067401b54a33e78ead",
                "ca244c7cf492084796d8287b70c736e8fcf45e25bb6c4e8f96f699505bfac956",
            ),
            (
                b"iashgfoaghsfoiknaodfgjgafinaslkfhalsjkfhalskfn",
                "3acb11d290778448f73ae77db9ae8bbd906344dd38b7b87a69af2ad55672081e",
            ),
            (
                &[
                    82, 105, 100, 97, 32, 84, 101, 115, 116, 32, 48, 53, 45, 48, 57, 45, 50, 48,
                    50, 50,
                ],
                "e1da45629bae9fbaf062a02880db8822a0ce8e7644a372226fcfa7c8402a02e6",
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(hash(input).to_hex(), expected);
        }
    }

    #[test]
    fn test_hash_empty() {
        assert_eq!(hash(&[]).to_hex(), EMPTY);
    }

    #[test]
    fn test_hash_range_full() {
        let data = b"hello world";
        assert_eq!(hash_range(data, 0, data.len() as i64), hash(data));
    }

    #[test]
    fn test_hash_range_slice() {
        let data = b"hello world";
        assert_eq!(hash_range(data, 6, 5), hash(b"world"));
    }

    #[test]
    fn test_hash_range_negative_offset() {
        // offset -2, length 7 -> bytes 0..5
        let data = b"hello world";
        assert_eq!(hash_range(data, -2, 7), hash(b"hello"));
    }

    #[test]
    fn test_hash_range_overlong_length() {
        let data = b"hello world";
        assert_eq!(hash_range(data, 6, 1000), hash(b"world"));
    }

    #[test]
    fn test_hash_range_degenerate() {
        let data = b"hello world";
        assert_eq!(hash_range(data, 0, 0).to_hex(), EMPTY);
        assert_eq!(hash_range(data, 3, -4).to_hex(), EMPTY);
        assert_eq!(hash_range(data, -20, 5).to_hex(), EMPTY);
        assert_eq!(hash_range(data, 50, 5).to_hex(), EMPTY);
        assert_eq!(hash_range(&[], 0, 10).to_hex(), EMPTY);
    }

    #[test]
    fn test_hash_range_extreme_arguments() {
        let data = b"hello world";
        assert_eq!(hash_range(data, -1, i64::MIN).to_hex(), EMPTY);
        assert_eq!(hash_range(data, i64::MIN, -1).to_hex(), EMPTY);
        assert_eq!(hash_range(data, i64::MIN, i64::MIN).to_hex(), EMPTY);
        assert_eq!(hash_range(data, i64::MIN, i64::MAX).to_hex(), EMPTY);
        assert_eq!(hash_range(data, i64::MAX, i64::MAX).to_hex(), EMPTY);
        assert_eq!(hash_range(data, i64::MAX, i64::MIN).to_hex(), EMPTY);
        assert_eq!(hash_range(data, 0, i64::MAX), hash(data));
        assert_eq!(hash_range(data, -1, i64::MAX), hash(data));
        assert_eq!(hash_range(data, 6, i64::MAX), hash(b"world"));
    }

    /// Clamp by hand in i128 and slice
    fn clamped_slice(data: &[u8], offset: i64, length: i64) -> &[u8] {
        let len = data.len() as i128;
        let (offset, length) = (offset as i128, length as i128);
        let start = offset.clamp(0, len);
        let end = (offset + length).clamp(start, len);
        &data[start as usize..end as usize]
    }

    proptest! {
        #[test]
        fn test_hash_range_never_panics(
            data in proptest::collection::vec(any::<u8>(), 0..64),
            offset in any::<i64>(),
            length in any::<i64>(),
        ) {
            let digest = hash_range(&data, offset, length);
            prop_assert_eq!(digest, hash(clamped_slice(&data, offset, length)));
        }

        #[test]
        fn test_hash_range_small_arguments(
            data in proptest::collection::vec(any::<u8>(), 0..64),
            offset in -80i64..80,
            length in -80i64..80,
        ) {
            let digest = hash_range(&data, offset, length);
            prop_assert_eq!(digest, hash(clamped_slice(&data, offset, length)));
        }
    }

    #[test]
    fn test_digest_hex_roundtrip() {
        let digest = hash(b"test");
        let parsed = Digest::from_hex(&digest.to_hex()).unwrap();
        assert_eq!(digest, parsed);
        assert!(Digest::from_hex("abcd").is_err());
    }

    #[test]
    fn test_digest_display() {
        assert_eq!(hash(&[]).to_string(), EMPTY);
        assert_eq!(format!("{:?}", hash(&[])), "Digest(e3b0c44298fc1c14)");
    }
}
