use sha1::{Digest, Sha1};
use uuid::Uuid;

const TEMPLATE: &[u8; 36] = b"xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx";

/// Derives a stable accessory UUID from arbitrary data, the way HAP
/// bridges do: the SHA-1 hex digest is poured into a v4-shaped template.
pub fn generate(data: &str) -> Uuid {
    let digest = Sha1::digest(data.as_bytes());
    let nibbles: Vec<u8> = digest.iter().flat_map(|byte| [byte >> 4, byte & 0xf]).collect();

    let mut consumed = nibbles.iter();
    let mut bytes = [0u8; 16];
    let mut position = 0;

    for placeholder in TEMPLATE {
        let nibble = match placeholder {
            b'x' => consumed.next().copied().unwrap_or_default(),
            b'y' => consumed.next().map(|n| (n & 0x3) | 0x8).unwrap_or_default(),
            b'4' => 0x4,
            _ => continue,
        };

        bytes[position / 2] |= if position % 2 == 0 { nibble << 4 } else { nibble };
        position += 1;
    }

    Uuid::from_bytes(bytes)
}
