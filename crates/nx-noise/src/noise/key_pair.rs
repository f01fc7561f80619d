use std::fmt;

use nx_crypto::{clamp, diffie_hellman, fill_random, public_key, to_hex};
use zeroize::Zeroize;

use crate::{NoiseError, DHLEN};

/// X25519 public point. Safe to log and display.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct PublicKey([u8; DHLEN]);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NoiseError> {
        let array: [u8; DHLEN] = bytes.try_into().map_err(|_| NoiseError::InvalidKeySize)?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; DHLEN] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; DHLEN] {
        self.0
    }

    /// True for the placeholder held before a remote key is learned
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; DHLEN]
    }
}

impl From<[u8; DHLEN]> for PublicKey {
    fn from(value: [u8; DHLEN]) -> Self {
        Self(value)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hex = [0u8; 2 * DHLEN];
        to_hex(&self.0, &mut hex).map_err(|_| fmt::Error)?;
        f.write_str(std::str::from_utf8(&hex).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

/// Clamped X25519 private scalar and its public point.
#[derive(Clone)]
pub struct KeyPair {
    private: [u8; DHLEN],
    public: PublicKey,
}

impl KeyPair {
    /// Draws a fresh private scalar from the OS random source
    pub fn generate() -> Result<Self, NoiseError> {
        let mut private = [0u8; DHLEN];
        fill_random(&mut private)?;
        let pair = Self::from_scalar(private);
        private.zeroize();
        Ok(pair)
    }

    /// Loads an externally stored private key, clamping it on the way in
    pub fn from_private_bytes(bytes: &[u8]) -> Result<Self, NoiseError> {
        let mut private: [u8; DHLEN] = bytes.try_into().map_err(|_| NoiseError::InvalidKeySize)?;
        let pair = Self::from_scalar(private);
        private.zeroize();
        Ok(pair)
    }

    fn from_scalar(mut private: [u8; DHLEN]) -> Self {
        clamp(&mut private);
        let public = PublicKey(public_key(&private));
        Self { private, public }
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// X25519 with `their_public`. An all-zero shared secret means a low-order point.
    pub fn dh(&self, their_public: &PublicKey) -> Result<[u8; DHLEN], NoiseError> {
        let mut shared = diffie_hellman(&self.private, their_public.as_bytes());
        if shared.iter().fold(0u8, |acc, b| acc | b) == 0 {
            shared.zeroize();
            Err(NoiseError::InvalidPublicKey)?
        }
        Ok(shared)
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.private.zeroize();
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::{KeyPair, NoiseError, PublicKey, DHLEN};

    #[test]
    fn generate() {
        let a = KeyPair::generate().unwrap();
        let b = KeyPair::generate().unwrap();
        assert_ne!(a.public(), b.public());
        assert!(!a.public().is_zero());

        // clamped on creation
        assert_eq!(a.private[0] & 7, 0);
        assert_eq!(a.private[31] & 0xc0, 0x40);
    }

    #[test]
    fn dh_commutes() {
        let a = KeyPair::generate().unwrap();
        let b = KeyPair::generate().unwrap();
        assert_eq!(a.dh(b.public()).unwrap(), b.dh(a.public()).unwrap());
    }

    #[test]
    fn dh_rejects_zero_point() {
        let a = KeyPair::generate().unwrap();
        assert_eq!(
            a.dh(&PublicKey::default()),
            Err(NoiseError::InvalidPublicKey)
        );
        // small order point, also collapses to zero
        let mut low_order = [0u8; DHLEN];
        low_order[0] = 1;
        assert_eq!(
            a.dh(&PublicKey::from(low_order)),
            Err(NoiseError::InvalidPublicKey)
        );
    }

    #[test]
    fn from_private_bytes() {
        // RFC 7748, section 6.1 (Alice)
        let mut private = [0u8; DHLEN];
        nx_crypto::from_hex(
            b"77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a",
            &mut private,
        )
        .unwrap();
        let pair = KeyPair::from_private_bytes(&private).unwrap();
        assert_eq!(
            pair.public().to_string(),
            "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a"
        );

        assert_eq!(
            KeyPair::from_private_bytes(&private[..31]).unwrap_err(),
            NoiseError::InvalidKeySize
        );
    }

    #[test]
    fn public_key_from_bytes() {
        assert_eq!(
            PublicKey::from_bytes(&[1u8; 33]),
            Err(NoiseError::InvalidKeySize)
        );
        let key = PublicKey::from_bytes(&[0xab; DHLEN]).unwrap();
        assert_eq!(key.as_bytes(), &[0xab; DHLEN]);
        assert_eq!(
            format!("{key:?}"),
            format!("PublicKey({})", "ab".repeat(DHLEN))
        );
    }

    #[test]
    fn debug_hides_private() {
        let pair = KeyPair::from_private_bytes(&[0x42; DHLEN]).unwrap();
        let debug = format!("{pair:?}");
        assert!(debug.starts_with("KeyPair { public: PublicKey("));
        assert!(debug.ends_with(".. }"));
    }
}
