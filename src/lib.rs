//! IPFS content identifiers with gateway retrieval and pinning-service upload
//!
//! This crate computes CIDv1 identifiers for raw data (SHA-256 digest, raw
//! codec, lowercase base32 multibase) without any IPFS node, and talks to
//! public HTTP gateways and pinning services to fetch and publish content.

pub mod cid;
pub mod config;
pub mod encoding;
pub mod file;
pub mod hash;
pub mod http;
pub mod ipfs;

pub use cid::{build_cid_v1, Cid, CidError};
pub use config::{Config, ConfigError};
pub use encoding::DecodeError;
pub use hash::{hash, hash_range, Digest, Sha256};
pub use ipfs::{IpfsAddress, IpfsClient, IpfsError};
