// Noise NX over X25519, ChaCha20-Poly1305 and SHA-256: noiseprotocol.org/noise.html
//
// -> e
// <- e, ee, s, es

const KEY_SIZE: usize = nx_crypto::KEY_SIZE;
const TAG_SIZE: usize = nx_crypto::TAG_SIZE;
pub const DHLEN: usize = nx_crypto::DHLEN;
pub const HASHLEN: usize = nx_crypto::HASHLEN;

/// Exactly `HASHLEN` bytes, so it seeds the transcript hash without hashing
pub const PROTOCOL_NAME: &[u8] = b"Noise_NX_25519_ChaChaPoly_SHA256";

/// e
pub const MESSAGE_1_MIN_LEN: usize = DHLEN;
/// e || enc(s) || enc(payload)
pub const MESSAGE_2_MIN_LEN: usize = DHLEN + (DHLEN + TAG_SIZE) + TAG_SIZE;

mod noise;

pub use noise::{
    cipher_state::CipherState,
    handshake_state::{HandshakeState, InitiatorStep, ResponderStep, Role, Step},
    key_pair::{KeyPair, PublicKey},
    noise_error::NoiseError,
    secure_channel::SecureChannel,
    symmetric_state::{SplitResult, SymmetricState},
};
