use std::{
    fmt,
    sync::{Mutex, MutexGuard},
};

use nx_crypto::{Aead, Nonce, TAG_SIZE};
use tracing::{trace, warn};

use crate::{NoiseError, KEY_SIZE};

/// One ChaCha20-Poly1305 key and its nonce counter.
pub struct CipherState {
    cipher: Aead,
    nonce: Mutex<Nonce>,
}

impl CipherState {
    /// Binds `key`; the caller's copy is zeroed.
    pub fn new(mut key: [u8; KEY_SIZE]) -> Self {
        Self {
            cipher: Aead::new(&mut key),
            nonce: Mutex::new(Nonce::default()),
        }
    }

    pub fn from_slice(key: &[u8]) -> Result<Self, NoiseError> {
        if key.len() != KEY_SIZE {
            Err(NoiseError::InvalidKeySize)?
        }
        Ok(Self {
            cipher: Aead::new_from_slice(key)?,
            nonce: Mutex::new(Nonce::default()),
        })
    }

    fn lock_nonce(&self) -> MutexGuard<'_, Nonce> {
        match self.nonce.lock() {
            Ok(nonce) => nonce,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Takes the current nonce and advances the counter, or fails at the ceiling
    fn next_nonce(nonce: &mut Nonce) -> Result<Nonce, NoiseError> {
        if nonce.needs_rotation() {
            warn!(nonce = nonce.counter(), "nonce counter exhausted");
            Err(NoiseError::NonceOverflow)?
        }
        let current = *nonce;
        nonce.to_next()?;
        Ok(current)
    }

    /// Returns `ciphertext || tag`
    pub fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, NoiseError> {
        let mut guard = self.lock_nonce();
        let nonce = Self::next_nonce(&mut guard)?;

        let mut ciphertext = vec![0u8; plaintext.len() + TAG_SIZE];
        self.cipher
            .seal(&mut ciphertext, plaintext, nonce.as_bytes(), associated_data)?;
        trace!(nonce = nonce.counter(), len = ciphertext.len(), "sealed");
        Ok(ciphertext)
    }

    /// The counter advances even when the tag does not verify.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, NoiseError> {
        let mut guard = self.lock_nonce();
        let nonce = Self::next_nonce(&mut guard)?;

        if ciphertext.len() < TAG_SIZE {
            warn!(nonce = nonce.counter(), len = ciphertext.len(), "ciphertext shorter than tag");
            Err(NoiseError::DecryptionFailed)?
        }
        let mut plaintext = vec![0u8; ciphertext.len() - TAG_SIZE];
        if let Err(e) = self
            .cipher
            .open(&mut plaintext, ciphertext, nonce.as_bytes(), associated_data)
        {
            warn!(nonce = nonce.counter(), "authentication failed");
            Err(e)?
        }
        trace!(nonce = nonce.counter(), len = ciphertext.len(), "opened");
        Ok(plaintext)
    }

    /// Counter value the next call will use
    pub fn nonce(&self) -> u64 {
        self.lock_nonce().counter()
    }

    #[cfg(test)]
    pub(crate) fn set_nonce(&self, counter: u64) {
        *self.lock_nonce() = Nonce::new(counter);
    }
}

impl fmt::Debug for CipherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherState")
            .field("nonce", &self.nonce())
            .finish_non_exhaustive()
    }
}
