use crate::DHLEN;
use x25519_dalek::{x25519, X25519_BASEPOINT_BYTES};

/// Clears bits 0-2 of byte 0, clears bit 7 and sets bit 6 of byte 31
pub fn clamp(scalar: &mut [u8; DHLEN]) {
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
}

/// Scalar base multiplication: public point for `private`
pub fn public_key(private: &[u8; DHLEN]) -> [u8; DHLEN] {
    x25519(*private, X25519_BASEPOINT_BYTES)
}

/// Raw X25519 shared secret. The caller decides what to do with a zero output.
pub fn diffie_hellman(private: &[u8; DHLEN], public: &[u8; DHLEN]) -> [u8; DHLEN] {
    x25519(*private, *public)
}

#[cfg(test)]
mod tests {
    use crate::{clamp, diffie_hellman, from_hex, public_key, DHLEN};

    // RFC 7748, section 6.1
    const ALICE_PRIVATE: &str = "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a";
    const ALICE_PUBLIC: &str = "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a";
    const BOB_PRIVATE: &str = "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb";
    const BOB_PUBLIC: &str = "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f";
    const SHARED: &str = "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742";

    fn decode(s: &str) -> [u8; DHLEN] {
        let mut out = [0u8; DHLEN];
        from_hex(s.as_bytes(), &mut out).unwrap();
        out
    }

    #[test]
    fn clamping() {
        let mut scalar = [0xffu8; DHLEN];
        clamp(&mut scalar);
        assert_eq!(scalar[0], 0xf8);
        assert_eq!(scalar[31], 0x7f);
        assert_eq!(&scalar[1..31], &[0xffu8; 30]);

        let mut scalar = [0u8; DHLEN];
        clamp(&mut scalar);
        assert_eq!(scalar[31], 0x40);
    }

    #[test]
    fn rfc7748_vectors() {
        let alice = decode(ALICE_PRIVATE);
        let bob = decode(BOB_PRIVATE);
        assert_eq!(public_key(&alice), decode(ALICE_PUBLIC));
        assert_eq!(public_key(&bob), decode(BOB_PUBLIC));

        let shared = decode(SHARED);
        assert_eq!(diffie_hellman(&alice, &decode(BOB_PUBLIC)), shared);
        assert_eq!(diffie_hellman(&bob, &decode(ALICE_PUBLIC)), shared);
    }

    #[test]
    fn low_order_point_gives_zero() {
        let alice = decode(ALICE_PRIVATE);
        assert_eq!(diffie_hellman(&alice, &[0u8; DHLEN]), [0u8; DHLEN]);
    }
}
