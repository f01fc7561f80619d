use crate::NONCE_SIZE;

/// Last counter value a key may be used with. Reaching it retires the key.
pub const MAX_NONCE: u64 = u64::MAX - 1;

#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum NonceError {
    #[error("nonce counter exhausted")]
    CounterExpired,
}

/// Counter(8 bytes, little endian) || Zero(4 bytes) - transport record nonce
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Nonce {
    bytes: [u8; NONCE_SIZE],
}

impl Nonce {
    pub fn new(counter: u64) -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        bytes[..8].copy_from_slice(&counter.to_le_bytes());
        Self { bytes }
    }

    pub fn counter(&self) -> u64 {
        let mut counter = [0u8; 8];
        counter.copy_from_slice(&self.bytes[..8]);
        u64::from_le_bytes(counter)
    }

    /// True once the counter has reached `MAX_NONCE`
    pub fn needs_rotation(&self) -> bool {
        self.counter() >= MAX_NONCE
    }

    pub fn to_next(&mut self) -> Result<(), NonceError> {
        let num = self.counter();
        if num >= MAX_NONCE {
            return Err(NonceError::CounterExpired);
        }
        self.bytes[..8].copy_from_slice(&(num + 1).to_le_bytes());
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> [u8; NONCE_SIZE] {
        self.bytes
    }

    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self { bytes }
    }
}
