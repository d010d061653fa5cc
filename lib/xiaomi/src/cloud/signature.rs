use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// 8 random bytes followed by the minutes since epoch, big endian.
pub fn nonce(random: [u8; 8], minutes: u32) -> String {
    let mut bytes = [0; 12];
    bytes[..8].copy_from_slice(&random);
    bytes[8..].copy_from_slice(&minutes.to_be_bytes());

    STANDARD.encode(bytes)
}

pub fn signed_nonce(ssecurity: &str, nonce: &str) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(STANDARD.decode(ssecurity)?);
    hasher.update(STANDARD.decode(nonce)?);

    Ok(STANDARD.encode(hasher.finalize()))
}

pub fn signature(
    path: &str,
    signed_nonce: &str,
    nonce: &str,
    params: &[(&str, &str)],
) -> Result<String> {
    let mut parts = vec![path.to_string(), signed_nonce.to_string(), nonce.to_string()];
    parts.extend(params.iter().map(|(key, value)| format!("{key}={value}")));

    let key = STANDARD.decode(signed_nonce)?;
    let mut mac = HmacSha256::new_from_slice(&key).map_err(|_| Error::Signature)?;
    mac.update(parts.join("&").as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
