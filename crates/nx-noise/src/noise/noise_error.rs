use nx_crypto::{CryptoError, NonceError};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum NoiseError {
    #[error("invalid key size")]
    InvalidKeySize,
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("handshake failed")]
    HandshakeFailed,
    #[error("invalid message")]
    InvalidMessage,
    #[error("nonce overflow, rekey required")]
    NonceOverflow,
    #[error("decryption failed")]
    DecryptionFailed,
    #[error("secure channel not established")]
    NotEstablished,
    #[error(transparent)]
    Crypto(CryptoError),
}

impl From<CryptoError> for NoiseError {
    fn from(value: CryptoError) -> Self {
        match value {
            CryptoError::InvalidKeyLength => NoiseError::InvalidKeySize,
            CryptoError::DecryptionError(_) => NoiseError::DecryptionFailed,
            other => NoiseError::Crypto(other),
        }
    }
}

impl From<NonceError> for NoiseError {
    fn from(value: NonceError) -> Self {
        match value {
            NonceError::CounterExpired => NoiseError::NonceOverflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::NoiseError;
    use nx_crypto::{decrypt, CryptoError, NonceError, KEY_SIZE, NONCE_SIZE, TAG_SIZE};

    #[test]
    fn conversions() {
        let forged = decrypt(
            &mut [0u8; 0],
            &[0u8; TAG_SIZE],
            &[0u8; KEY_SIZE],
            &[0u8; NONCE_SIZE],
            &[],
        )
        .unwrap_err();
        assert!(matches!(forged, CryptoError::DecryptionError(_)));
        assert_eq!(NoiseError::from(forged), NoiseError::DecryptionFailed);

        assert_eq!(
            NoiseError::from(CryptoError::InvalidKeyLength),
            NoiseError::InvalidKeySize
        );
        assert_eq!(
            NoiseError::from(CryptoError::OsRngError),
            NoiseError::Crypto(CryptoError::OsRngError)
        );
        assert_eq!(
            NoiseError::from(NonceError::CounterExpired),
            NoiseError::NonceOverflow
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            NoiseError::NonceOverflow.to_string(),
            "nonce overflow, rekey required"
        );
        assert_eq!(
            NoiseError::Crypto(CryptoError::DestTooSmall).to_string(),
            "destination buffer too small"
        );
    }
}
