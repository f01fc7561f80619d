mod hkdf;
mod keys;
mod nonce;
mod x25519;

pub use hkdf::{Hkdf, HkdfSha256};
pub use keys::{
    decrypt, encrypt, fill_random, from_hex, hash, hash_parts, hmac_sha256, to_hex, Aead,
};
pub use nonce::{Nonce, NonceError, MAX_NONCE};
pub use x25519::{clamp, diffie_hellman, public_key};

/// ChaCha20-Poly1305 key size
pub const KEY_SIZE: usize = 32;
/// Poly1305 tag size
pub const TAG_SIZE: usize = 16;
/// ChaCha20-Poly1305 nonce size
pub const NONCE_SIZE: usize = 12;
/// X25519 key and shared secret size
pub const DHLEN: usize = 32;
/// SHA-256 output size
pub const HASHLEN: usize = 32;

#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid hex encoding")]
    HexError,
    #[error("invalid key length")]
    InvalidKeyLength,
    #[error("input of {0} bytes is too short")]
    InvalidLength(usize),
    #[error("os random number generator failed")]
    OsRngError,
    #[error("destination buffer too small")]
    DestTooSmall,
    #[error("hkdf output too long")]
    HkdfExpandTooLong,
    #[error("aead encryption failed")]
    EncryptionError(chacha20poly1305::Error),
    #[error("aead decryption failed")]
    DecryptionError(chacha20poly1305::Error),
}
