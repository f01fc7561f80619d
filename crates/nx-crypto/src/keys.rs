use crate::{CryptoError, HASHLEN, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
use chacha20poly1305::{aead::AeadInPlace, ChaCha20Poly1305, KeyInit};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, TryRngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

impl From<digest::InvalidLength> for CryptoError {
    fn from(_: digest::InvalidLength) -> Self {
        CryptoError::InvalidKeyLength
    }
}

impl From<rand::rand_core::OsError> for CryptoError {
    fn from(_: rand::rand_core::OsError) -> Self {
        CryptoError::OsRngError
    }
}

impl From<hex::FromHexError> for CryptoError {
    fn from(_: hex::FromHexError) -> Self {
        CryptoError::HexError
    }
}

pub fn to_hex(bytes: &[u8], str: &mut [u8]) -> Result<(), CryptoError> {
    Ok(hex::encode_to_slice(bytes, str)?)
}

pub fn from_hex(str: &[u8], bytes: &mut [u8]) -> Result<(), CryptoError> {
    Ok(hex::decode_to_slice(str, bytes)?)
}

pub fn fill_random(dest: &mut [u8]) -> Result<(), CryptoError> {
    Ok(OsRng.try_fill_bytes(dest)?)
}

/// SHA-256 of `data`
pub fn hash(data: &[u8]) -> [u8; HASHLEN] {
    Sha256::digest(data).into()
}

/// SHA-256 over the concatenation of `parts`
pub fn hash_parts(parts: &[&[u8]]) -> [u8; HASHLEN] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// HMAC-SHA-256 of `data` under `key`
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<[u8; HASHLEN], CryptoError> {
    let mut mac = <Hmac<Sha256> as KeyInit>::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// ChaCha20-Poly1305 bound to a single key.
#[derive(Clone)]
pub struct Aead(ChaCha20Poly1305);

impl std::fmt::Debug for Aead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aead").finish_non_exhaustive()
    }
}

impl Aead {
    /// Binds `key` and zeroes the caller's copy
    pub fn new(key: &mut [u8; KEY_SIZE]) -> Self {
        let cipher = ChaCha20Poly1305::new(chacha20poly1305::Key::from_slice(key));
        key.zeroize();
        Self(cipher)
    }

    pub fn new_from_slice(key: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self(ChaCha20Poly1305::new_from_slice(key)?))
    }

    /// Writes `ciphertext || tag` into `dest`, returning the number of bytes written
    pub fn seal(
        &self,
        dest: &mut [u8],
        plaintext: &[u8],
        nonce: &[u8; NONCE_SIZE],
        associated_data: &[u8],
    ) -> Result<usize, CryptoError> {
        let p_len = plaintext.len();
        if dest.len() < p_len + TAG_SIZE {
            return Err(CryptoError::DestTooSmall);
        }
        dest[..p_len].copy_from_slice(plaintext);
        let tag = self
            .0
            .encrypt_in_place_detached(
                chacha20poly1305::Nonce::from_slice(nonce),
                associated_data,
                &mut dest[..p_len],
            )
            .map_err(|e| {
                dest.zeroize();
                CryptoError::EncryptionError(e)
            })?;
        dest[p_len..p_len + TAG_SIZE].copy_from_slice(&tag);
        Ok(p_len + TAG_SIZE)
    }

    /// Verifies and opens `ciphertext || tag` into `dest`, returning the plaintext length
    pub fn open(
        &self,
        dest: &mut [u8],
        ciphertext: &[u8],
        nonce: &[u8; NONCE_SIZE],
        associated_data: &[u8],
    ) -> Result<usize, CryptoError> {
        if ciphertext.len() < TAG_SIZE {
            return Err(CryptoError::InvalidLength(ciphertext.len()));
        }
        let (data, tag) = ciphertext.split_at(ciphertext.len() - TAG_SIZE);
        if dest.len() < data.len() {
            return Err(CryptoError::DestTooSmall);
        }
        let dest = &mut dest[..data.len()];
        dest.copy_from_slice(data);

        self.0
            .decrypt_in_place_detached(
                chacha20poly1305::Nonce::from_slice(nonce),
                associated_data,
                dest,
                chacha20poly1305::Tag::from_slice(tag),
            )
            .map_err(|e| {
                dest.zeroize();
                CryptoError::DecryptionError(e)
            })?;
        Ok(data.len())
    }
}

pub fn encrypt(
    dest: &mut [u8],
    plaintext: &[u8],
    key: &[u8],
    nonce: &[u8; NONCE_SIZE],
    associated_data: &[u8],
) -> Result<usize, CryptoError> {
    Aead::new_from_slice(key)?.seal(dest, plaintext, nonce, associated_data)
}

pub fn decrypt(
    dest: &mut [u8],
    ciphertext: &[u8],
    key: &[u8],
    nonce: &[u8; NONCE_SIZE],
    associated_data: &[u8],
) -> Result<usize, CryptoError> {
    Aead::new_from_slice(key)?.open(dest, ciphertext, nonce, associated_data)
}
