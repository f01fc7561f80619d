use std::fmt;

use tracing::debug;

use crate::{CipherState, HandshakeState, NoiseError, HASHLEN};

/// Transport encryption for an established connection.
/// Records must be decrypted in the order the peer encrypted them.
pub struct SecureChannel {
    send: CipherState,
    recv: CipherState,
    handshake_hash: [u8; HASHLEN],
    initiator: bool,
}

impl SecureChannel {
    /// The initiator sends with `c1`, the responder with `c2`
    pub fn split(handshake: HandshakeState) -> Result<Self, NoiseError> {
        let initiator = handshake.is_initiator();
        let (c1, c2, handshake_hash) = handshake.split()?;
        let (send, recv) = if initiator { (c1, c2) } else { (c2, c1) };
        debug!(initiator, "secure channel established");
        Ok(Self {
            send,
            recv,
            handshake_hash,
            initiator,
        })
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, NoiseError> {
        self.send.encrypt(plaintext, &[])
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, NoiseError> {
        self.recv.decrypt(ciphertext, &[])
    }

    pub fn send_nonce(&self) -> u64 {
        self.send.nonce()
    }

    pub fn recv_nonce(&self) -> u64 {
        self.recv.nonce()
    }

    /// Identical on both ends of the connection
    pub fn handshake_hash(&self) -> &[u8; HASHLEN] {
        &self.handshake_hash
    }

    pub fn is_initiator(&self) -> bool {
        self.initiator
    }
}

impl fmt::Debug for SecureChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureChannel")
            .field("initiator", &self.initiator)
            .field("send", &self.send)
            .field("recv", &self.recv)
            .finish_non_exhaustive()
    }
}
