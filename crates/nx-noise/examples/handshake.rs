// # Noise NX Handshake
//
// Establishes a secure channel between a miner (initiator) and a pool (responder) and exchanges
// a few records over it:
//
// - Generate the pool's static X25519 identity.
// - Run the two message NX handshake.
// - Split into transport ciphers and encrypt in both directions.
//
// ## Run
//
// ```sh
// RUST_LOG=trace cargo run -p nx-noise --example handshake
// ```

use nx_noise::{HandshakeState, KeyPair, SecureChannel};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    let pool_identity = KeyPair::generate().expect("OS randomness unavailable");
    println!("pool identity: {}", pool_identity.public());

    let mut miner = HandshakeState::initiator().expect("Failed to create initiator");
    let mut pool = HandshakeState::responder(pool_identity).expect("Failed to create responder");

    let hello = miner
        .write_message(b"hello")
        .expect("Miner failed to write message 1");
    pool.read_message(&hello)
        .expect("Pool failed to read message 1");

    let reply = pool
        .write_message(b"welcome")
        .expect("Pool failed to write message 2");
    let payload = miner
        .read_message(&reply)
        .expect("Miner failed to read message 2");
    assert_eq!(payload, b"welcome");
    println!("miner authenticated pool: {}", miner.remote_static());

    let miner = SecureChannel::split(miner).expect("Miner handshake incomplete");
    let pool = SecureChannel::split(pool).expect("Pool handshake incomplete");

    let secret_message = b"Ciao, Mondo!";
    let record = miner.encrypt(secret_message).expect("Miner failed to encrypt");
    assert!(record[..secret_message.len()] != secret_message[..]);

    let opened = pool.decrypt(&record).expect("Pool failed to decrypt");
    assert_eq!(opened, secret_message);
    println!("pool received: {}", String::from_utf8_lossy(&opened));
}
