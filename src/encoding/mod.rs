//! Text encodings for binary data

pub mod base32;

pub use base32::DecodeError;
