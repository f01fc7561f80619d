pub mod cipher_state;
pub mod handshake_state;
pub mod key_pair;
pub mod noise_error;
pub mod secure_channel;
pub mod symmetric_state;
