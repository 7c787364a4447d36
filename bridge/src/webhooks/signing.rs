//! HMAC Webhook Signing
//!
//! Signs role-grant payloads so the configurator can authenticate them.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use super::types::HashAlgorithm;

fn sign_with<M: Mac + KeyInit>(secret: &[u8], payload: &[u8]) -> String {
    let mut mac =
        <M as KeyInit>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Sign a payload and return the hex-encoded signature.
pub fn sign_payload(algorithm: HashAlgorithm, secret: &str, payload: &[u8]) -> String {
    let secret = secret.as_bytes();
    match algorithm {
        HashAlgorithm::Sha256 => sign_with::<Hmac<Sha256>>(secret, payload),
        HashAlgorithm::Sha384 => sign_with::<Hmac<Sha384>>(secret, payload),
        HashAlgorithm::Sha512 => sign_with::<Hmac<Sha512>>(secret, payload),
    }
}
