use nx_crypto::{hash, hash_parts, HkdfSha256};
use zeroize::Zeroize;

use crate::{CipherState, NoiseError, HASHLEN, PROTOCOL_NAME};

/// Transport ciphers `(c1, c2)` and the final handshake hash.
pub type SplitResult = (CipherState, CipherState, [u8; HASHLEN]);

pub struct SymmetricState {
    cipher_state: Option<CipherState>,
    ck: [u8; HASHLEN],
    h: [u8; HASHLEN],
}

impl SymmetricState {
    pub fn new() -> Self {
        Self::initialize_symmetric(PROTOCOL_NAME)
    }

    /// Names up to `HASHLEN` bytes are zero padded, longer ones are hashed.
    pub fn initialize_symmetric(protocol_name: &[u8]) -> Self {
        let h = match protocol_name.len() {
            n if n <= HASHLEN => {
                let mut out = [0u8; HASHLEN];
                out[..n].copy_from_slice(protocol_name);
                out
            }
            _ => hash(protocol_name),
        };
        Self {
            cipher_state: None,
            ck: h,
            h,
        }
    }

    pub fn has_key(&self) -> bool {
        self.cipher_state.is_some()
    }

    pub fn mix_key(&mut self, input_key_material: &[u8]) -> Result<(), NoiseError> {
        let mut keys = [[0u8; HASHLEN]; 2];
        HkdfSha256::derive_keys(&mut keys, &self.ck, input_key_material, &[])?;
        self.ck.copy_from_slice(&keys[0]);
        self.cipher_state = Some(CipherState::new(keys[1]));
        keys.zeroize();
        Ok(())
    }

    pub fn mix_hash(&mut self, data: &[u8]) {
        self.h = hash_parts(&[&self.h[..], data]);
    }

    pub fn handshake_hash(&self) -> [u8; HASHLEN] {
        self.h
    }

    pub fn encrypt_and_hash(&mut self, plaintext: &[u8]) -> Result<Vec<u8>, NoiseError> {
        let ciphertext = match &self.cipher_state {
            Some(cipher) => cipher.encrypt(plaintext, &self.h)?,
            None => plaintext.to_vec(),
        };
        self.mix_hash(&ciphertext);
        Ok(ciphertext)
    }

    /// `h` is left untouched when authentication fails
    pub fn decrypt_and_hash(&mut self, ciphertext: &[u8]) -> Result<Vec<u8>, NoiseError> {
        let plaintext = match &self.cipher_state {
            Some(cipher) => cipher.decrypt(ciphertext, &self.h)?,
            None => ciphertext.to_vec(),
        };
        self.mix_hash(ciphertext);
        Ok(plaintext)
    }

    pub fn split(self) -> Result<SplitResult, NoiseError> {
        let mut keys = [[0u8; HASHLEN]; 2];
        HkdfSha256::derive_keys(&mut keys, &self.ck, &[], &[])?;
        let c1 = CipherState::new(keys[0]);
        let c2 = CipherState::new(keys[1]);
        keys.zeroize();
        Ok((c1, c2, self.h))
    }
}

impl Default for SymmetricState {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SymmetricState {
    fn drop(&mut self) {
        self.ck.zeroize();
        self.h.zeroize();
    }
}
