//! CIDv1 content identifiers
//!
//! Builds the `b`-prefixed base32 form of a CIDv1 for raw binary content
//! hashed with SHA-256, as produced by web3.storage and friends:
//!
//! ```text
//! "b" + lowercase(base32(0x01 0x55 0x12 0x20 || sha256(data)))   (no padding)
//! ```
//!
//! Only this one shape is built or parsed.

use crate::encoding::base32::{self, DecodeError};
use crate::hash::{self, Digest, DIGEST_LEN};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Multibase prefix for lowercase base32
pub const MULTIBASE_BASE32: char = 'b';

/// CID version 1
pub const CID_VERSION: &str = "01";
/// Multicodec "raw binary"
pub const CODEC_RAW: &str = "55";
/// Multihash function "sha2-256"
pub const HASH_SHA2_256: &str = "12";
/// Multihash digest length (32 bytes)
pub const HASH_DIGEST_LEN: &str = "20";

/// Binary header preceding the digest
const HEADER: [u8; 4] = [0x01, 0x55, 0x12, 0x20];

/// CID parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidError {
    #[error("missing multibase prefix 'b'")]
    MissingPrefix,

    #[error("CID body must be lowercase base32")]
    NotLowercase,

    #[error("invalid base32: {0}")]
    Base32(#[from] DecodeError),

    #[error("wrong CID length: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("unsupported CID header {0}, expected CIDv1 raw sha2-256")]
    UnsupportedHeader(String),
}

/// CIDv1 for raw content hashed with SHA-256
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cid {
    digest: Digest,
}

impl Cid {
    /// Hash `data` and wrap the digest
    pub fn from_data(data: &[u8]) -> Self {
        Self::from_digest(hash::hash(data))
    }

    /// Wrap an existing SHA-256 digest
    pub fn from_digest(digest: Digest) -> Self {
        Self { digest }
    }

    /// SHA-256 digest of the addressed content
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Hex form of the binary CID: version, codec, hash function and length
    /// tags followed by the digest
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(8 + DIGEST_LEN * 2);
        out.push_str(CID_VERSION);
        out.push_str(CODEC_RAW);
        out.push_str(HASH_SHA2_256);
        out.push_str(HASH_DIGEST_LEN);
        out.push_str(&self.digest.to_hex());
        out
    }

    /// Binary CID
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER.len() + DIGEST_LEN);
        out.extend_from_slice(&HEADER);
        out.extend_from_slice(self.digest.as_bytes());
        out
    }

    /// Check that `data` is the content this CID addresses
    pub fn verify(&self, data: &[u8]) -> bool {
        hash::hash(data) == self.digest
    }

    /// Parse the `b`-prefixed string form
    pub fn parse(s: &str) -> Result<Self, CidError> {
        let body = s
            .strip_prefix(MULTIBASE_BASE32)
            .ok_or(CidError::MissingPrefix)?;
        if body.bytes().any(|c| c.is_ascii_uppercase()) {
            return Err(CidError::NotLowercase);
        }

        let bytes = base32::decode(&body.to_ascii_uppercase())?;
        let expected = HEADER.len() + DIGEST_LEN;
        if bytes.len() != expected {
            return Err(CidError::WrongLength {
                expected,
                actual: bytes.len(),
            });
        }

        let (header, digest) = bytes.split_at(HEADER.len());
        if header != HEADER {
            return Err(CidError::UnsupportedHeader(hex::encode(header)));
        }

        let digest = Digest::from_slice(digest).ok_or(CidError::WrongLength {
            expected,
            actual: bytes.len(),
        })?;
        Ok(Self::from_digest(digest))
    }
}

impl FromStr for Cid {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = base32::encode(&self.to_bytes()).to_lowercase();
        let body = encoded.trim_end_matches(base32::PAD as char).trim_end();
        write!(f, "{}{}", MULTIBASE_BASE32, body)
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({})", self)
    }
}

/// Compute the CIDv1 string for raw `data`
pub fn build_cid_v1(data: &[u8]) -> String {
    Cid::from_data(data).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_CID: &str = "bafkreihdwdcefgh4dqkjv67uzcmw7ojee6xedzdetojuzjevtenxquvyku";
    const HELLO_WORLD_CID: &str = "bafkreifzjut3te2nhyekklss27nh3k72ysco7y32koao5eei66wof36n5e";

    #[test]
    fn test_build_known_cids() {
        assert_eq!(build_cid_v1(b""), EMPTY_CID);
        assert_eq!(build_cid_v1(b"hello world"), HELLO_WORLD_CID);
        assert_eq!(
            build_cid_v1(b"abc"),
            "bafkreif2pall7dybz7vecqka3zo24irdwabwdi4wc55jznaq75q7eaavvu"
        );
    }

    #[test]
    fn test_cid_shape() {
        let cid = build_cid_v1(b"Hello IPFS!");
        assert_eq!(cid, "bafkreidbasoljijtgo2pzbonlg2wh3zq3omhfnv2ggubfmncsd24y3245u");
        assert_eq!(cid.len(), 59);
        assert!(cid.starts_with("bafkrei"));
        assert!(!cid.contains('='));
    }

    #[test]
    fn test_to_hex() {
        let cid = Cid::from_data(b"");
        assert_eq!(
            cid.to_hex(),
            "01551220e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(hex::decode(cid.to_hex()).unwrap(), cid.to_bytes());
    }

    #[test]
    fn test_parse_roundtrip() {
        let cid: Cid = HELLO_WORLD_CID.parse().unwrap();
        assert_eq!(cid, Cid::from_data(b"hello world"));
        assert_eq!(cid.to_string(), HELLO_WORLD_CID);
    }

    #[test]
    fn test_parse_fixture_cids() {
        let image: Cid = "bafkreihutddv4nrs3fj246puy72mexgbnf5bvmqug3o2sjgjubia7ka64i"
            .parse()
            .unwrap();
        assert_eq!(
            image.digest().to_hex(),
            "f498c75e3632d953ae79f4c7f4c25cc1697a1ab21436dda924c9a0500fa81ee2"
        );

        let text: Cid = "bafkreih77yzma2itvkuw3xnfaarqhi4wcihkd5fg2ihq2kmiwignuaafsm"
            .parse()
            .unwrap();
        assert_eq!(
            text.digest().to_hex(),
            "fffe32c06913aaa96ddda5002303a396120ea1f4a6d20f0d2988b20cda000593"
        );
    }

    #[test]
    fn test_parse_rejects_directory_cid() {
        // dag-pb codec, not raw
        let result = Cid::parse("bafybeidqlo4cju5m3rgw3vpkukfk5yobzgs7xxpuaga4leqfmpwui4fmuu");
        assert_eq!(result, Err(CidError::UnsupportedHeader("01701220".to_string())));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Cid::parse("Qmfoo"), Err(CidError::MissingPrefix));
        assert_eq!(
            Cid::parse(&HELLO_WORLD_CID.to_uppercase().replacen('B', "b", 1)),
            Err(CidError::NotLowercase)
        );
        assert!(matches!(Cid::parse("bafkrei1"), Err(CidError::Base32(_))));
        assert!(matches!(
            Cid::parse("bmfrggzdf"),
            Err(CidError::WrongLength { expected: 36, actual: 5 })
        ));
    }

    #[test]
    fn test_verify() {
        let cid = Cid::from_data(b"hello world");
        assert!(cid.verify(b"hello world"));
        assert!(!cid.verify(b"hello world!"));
    }
}
