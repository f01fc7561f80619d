use std::fmt;

use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::{
    KeyPair, NoiseError, PublicKey, SplitResult, SymmetricState, DHLEN, HASHLEN,
    MESSAGE_1_MIN_LEN, MESSAGE_2_MIN_LEN, TAG_SIZE,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Initiator,
    Responder,
}

/// -> e
/// <- e, ee, s, es
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InitiatorStep {
    Init,
    SentHello,
    Complete,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResponderStep {
    Init,
    ReceivedHello,
    Complete,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    Initiator(InitiatorStep),
    Responder(ResponderStep),
    /// Terminal, the state must be discarded
    Failed(Role),
}

impl Step {
    pub fn role(&self) -> Role {
        match self {
            Step::Initiator(_) => Role::Initiator,
            Step::Responder(_) => Role::Responder,
            Step::Failed(role) => *role,
        }
    }
}

/// `Noise_NX_25519_ChaChaPoly_SHA256` handshake for one connection attempt.
pub struct HandshakeState {
    symmetric_state: SymmetricState,
    s: Option<KeyPair>,
    e: KeyPair,
    rs: PublicKey,
    re: PublicKey,
    step: Step,
}

impl HandshakeState {
    /// Only the responder carries a static key pair.
    pub fn new(role: Role, s: Option<KeyPair>) -> Result<Self, NoiseError> {
        let step = match (role, &s) {
            (Role::Initiator, None) => Step::Initiator(InitiatorStep::Init),
            (Role::Responder, Some(_)) => Step::Responder(ResponderStep::Init),
            _ => Err(NoiseError::InvalidKeySize)?,
        };
        let state = Self {
            symmetric_state: SymmetricState::new(),
            s,
            e: KeyPair::generate()?,
            rs: PublicKey::default(),
            re: PublicKey::default(),
            step,
        };
        debug!(?role, "handshake initialized");
        Ok(state)
    }

    pub fn initiator() -> Result<Self, NoiseError> {
        Self::new(Role::Initiator, None)
    }

    pub fn responder(s: KeyPair) -> Result<Self, NoiseError> {
        Self::new(Role::Responder, Some(s))
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_initiator(&self) -> bool {
        self.step.role() == Role::Initiator
    }

    pub fn is_complete(&self) -> bool {
        matches!(
            self.step,
            Step::Initiator(InitiatorStep::Complete) | Step::Responder(ResponderStep::Complete)
        )
    }

    /// All zero until message 2 has been read
    pub fn remote_static(&self) -> &PublicKey {
        &self.rs
    }

    pub fn remote_ephemeral(&self) -> &PublicKey {
        &self.re
    }

    pub fn local_static(&self) -> Option<&PublicKey> {
        self.s.as_ref().map(KeyPair::public)
    }

    pub fn handshake_hash(&self) -> [u8; HASHLEN] {
        self.symmetric_state.handshake_hash()
    }

    /// Produces the next handshake message carrying `payload`
    pub fn write_message(&mut self, payload: &[u8]) -> Result<Vec<u8>, NoiseError> {
        let result = match self.step {
            Step::Initiator(InitiatorStep::Init) => self
                .write_hello(payload)
                .map(|message| (message, Step::Initiator(InitiatorStep::SentHello))),
            Step::Responder(ResponderStep::ReceivedHello) => self
                .write_identity(payload)
                .map(|message| (message, Step::Responder(ResponderStep::Complete))),
            _ => Err(NoiseError::HandshakeFailed),
        };
        self.advance(result)
    }

    /// Consumes the peer's next handshake message, returning its payload
    pub fn read_message(&mut self, message: &[u8]) -> Result<Vec<u8>, NoiseError> {
        let result = match self.step {
            Step::Responder(ResponderStep::Init) => self
                .read_hello(message)
                .map(|payload| (payload, Step::Responder(ResponderStep::ReceivedHello))),
            Step::Initiator(InitiatorStep::SentHello) => self
                .read_identity(message)
                .map(|payload| (payload, Step::Initiator(InitiatorStep::Complete))),
            _ => Err(NoiseError::HandshakeFailed),
        };
        self.advance(result)
    }

    /// Derives the transport ciphers. Consumes the handshake.
    pub fn split(self) -> Result<SplitResult, NoiseError> {
        if !self.is_complete() {
            Err(NoiseError::NotEstablished)?
        }
        self.symmetric_state.split()
    }

    fn advance(
        &mut self,
        result: Result<(Vec<u8>, Step), NoiseError>,
    ) -> Result<Vec<u8>, NoiseError> {
        match result {
            Ok((out, next)) => {
                debug!(from = ?self.step, to = ?next, "handshake step");
                self.step = next;
                Ok(out)
            }
            Err(e) => {
                // a completed handshake is still usable for split
                if !self.is_complete() {
                    warn!(step = ?self.step, error = %e, "handshake failed");
                    self.step = Step::Failed(self.step.role());
                }
                Err(e)
            }
        }
    }

    fn mix_dh(
        symmetric_state: &mut SymmetricState,
        local: &KeyPair,
        remote: &PublicKey,
    ) -> Result<(), NoiseError> {
        let mut dh = local.dh(remote)?;
        let result = symmetric_state.mix_key(&dh);
        dh.zeroize();
        result
    }

    /// -> e
    fn write_hello(&mut self, payload: &[u8]) -> Result<Vec<u8>, NoiseError> {
        let e_pub = self.e.public().to_bytes();
        self.symmetric_state.mix_hash(&e_pub);

        let mut message = Vec::with_capacity(MESSAGE_1_MIN_LEN + payload.len());
        message.extend_from_slice(&e_pub);
        message.extend_from_slice(&self.symmetric_state.encrypt_and_hash(payload)?);
        Ok(message)
    }

    /// <- e, ee, s, es
    fn write_identity(&mut self, payload: &[u8]) -> Result<Vec<u8>, NoiseError> {
        let s = self.s.as_ref().ok_or(NoiseError::HandshakeFailed)?;
        let e_pub = self.e.public().to_bytes();
        self.symmetric_state.mix_hash(&e_pub);

        let mut message = Vec::with_capacity(MESSAGE_2_MIN_LEN + payload.len());
        message.extend_from_slice(&e_pub);

        Self::mix_dh(&mut self.symmetric_state, &self.e, &self.re)?;
        message.extend_from_slice(&self.symmetric_state.encrypt_and_hash(s.public().as_bytes())?);
        Self::mix_dh(&mut self.symmetric_state, s, &self.re)?;
        message.extend_from_slice(&self.symmetric_state.encrypt_and_hash(payload)?);
        Ok(message)
    }

    fn read_hello(&mut self, message: &[u8]) -> Result<Vec<u8>, NoiseError> {
        if message.len() < MESSAGE_1_MIN_LEN {
            Err(NoiseError::InvalidMessage)?
        }
        let (re, payload) = message.split_at(DHLEN);
        self.re = PublicKey::from_bytes(re)?;
        self.symmetric_state.mix_hash(re);

        // no key yet, the payload travels in the clear
        self.symmetric_state.decrypt_and_hash(payload)
    }

    fn read_identity(&mut self, message: &[u8]) -> Result<Vec<u8>, NoiseError> {
        // our own hello reflected back
        if message.len() >= DHLEN && message[..DHLEN] == self.e.public().as_bytes()[..] {
            Err(NoiseError::HandshakeFailed)?
        }
        if message.len() < MESSAGE_2_MIN_LEN {
            Err(NoiseError::InvalidMessage)?
        }
        let (re, rest) = message.split_at(DHLEN);
        self.re = PublicKey::from_bytes(re)?;
        self.symmetric_state.mix_hash(re);
        Self::mix_dh(&mut self.symmetric_state, &self.e, &self.re)?;

        let (enc_s, enc_payload) = rest.split_at(DHLEN + TAG_SIZE);
        let mut rs = self.symmetric_state.decrypt_and_hash(enc_s)?;
        let parsed = PublicKey::from_bytes(&rs);
        rs.zeroize();
        self.rs = parsed?;
        Self::mix_dh(&mut self.symmetric_state, &self.e, &self.rs)?;

        let payload = self.symmetric_state.decrypt_and_hash(enc_payload)?;
        debug!(remote_static = %self.rs, "responder authenticated");
        Ok(payload)
    }
}

impl fmt::Debug for HandshakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandshakeState")
            .field("step", &self.step)
            .field("re", &self.re)
            .field("rs", &self.rs)
            .finish_non_exhaustive()
    }
}
