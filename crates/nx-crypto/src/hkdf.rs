use crate::{CryptoError, HASHLEN};
use digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::marker::PhantomData;
use zeroize::Zeroize;

/// HKDF over HMAC-SHA-256, the key schedule used by the handshake.
pub type HkdfSha256 = Hkdf<Hmac<Sha256>, HASHLEN>;

/// Generic HKDF following RFC 5869.
/// H: MAC built on the hash function (eg. `Hmac<Sha256>`).
/// N: Output size of the hash in bytes.
pub struct Hkdf<H: Mac + KeyInit, const N: usize>(PhantomData<H>);

impl<H: Mac + KeyInit, const N: usize> Hkdf<H, N> {
    /// HKDF-Extract (salt, IKM) -> Pseudorandom Key
    pub fn extract(
        dest: &mut [u8; N],
        salt: &[u8],
        initial_key_material: &[u8],
    ) -> Result<(), CryptoError> {
        let mut mac = <H as KeyInit>::new_from_slice(salt)?;
        mac.update(initial_key_material);
        let mut result = mac.finalize().into_bytes();
        dest.copy_from_slice(&result[..N]);
        result.as_mut_slice().zeroize();
        Ok(())
    }

    /// HKDF-Expand (PRK, info, L) -> Output Keying Material
    pub fn expand<const L: usize>(
        dest: &mut [u8; L],
        prk: &[u8; N],
        info: &[u8],
    ) -> Result<(), CryptoError> {
        Self::expand_into(dest, prk, info)
    }

    fn expand_into(dest: &mut [u8], prk: &[u8; N], info: &[u8]) -> Result<(), CryptoError> {
        let n = dest.len().div_ceil(N);
        if n > 255 {
            Err(CryptoError::HkdfExpandTooLong)?
        }

        let mut head = 0;
        let mut t = Vec::with_capacity(N);

        for i in 1..=n {
            let mut mac = <H as KeyInit>::new_from_slice(prk)?;
            mac.update(&t); // T(i-1)
            mac.update(info);
            mac.update(&[i as u8]); // Counter

            t.zeroize();
            t = mac.finalize().into_bytes().to_vec();

            // take min of hash_len (N) or remaining
            let taking = N.min(dest.len() - head);
            dest[head..head + taking].copy_from_slice(&t[..taking]);
            head += taking;
        }

        t.zeroize();
        Ok(())
    }

    /// Single HKDF (extract + expand)
    pub fn derive<const L: usize>(
        dest: &mut [u8; L],
        salt: &[u8],
        initial_key_material: &[u8],
        info: &[u8],
    ) -> Result<(), CryptoError> {
        Self::derive_into(dest, salt, initial_key_material, info)
    }

    /// Derives `K` consecutive hash-sized keys from one HKDF output.
    pub fn derive_keys<const K: usize>(
        dest: &mut [[u8; N]; K],
        salt: &[u8],
        initial_key_material: &[u8],
        info: &[u8],
    ) -> Result<(), CryptoError> {
        match N.checked_mul(K) {
            Some(total_len) => {
                let mut okm = vec![0u8; total_len];
                let result = Self::derive_into(&mut okm, salt, initial_key_material, info);
                if result.is_ok() {
                    for (i, key) in dest.iter_mut().enumerate() {
                        key.copy_from_slice(&okm[i * N..(i + 1) * N]);
                    }
                }
                okm.zeroize();
                result
            }
            None => Err(CryptoError::HkdfExpandTooLong),
        }
    }

    fn derive_into(
        dest: &mut [u8],
        salt: &[u8],
        initial_key_material: &[u8],
        info: &[u8],
    ) -> Result<(), CryptoError> {
        let mut prk = [0u8; N];
        Self::extract(&mut prk, salt, initial_key_material)?;
        let result = Self::expand_into(dest, &prk, info);
        prk.zeroize();
        result
    }
}
