use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use md5::{Digest, Md5};

use crate::{Result, Token};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// AES-128-CBC with PKCS#7 padding, keyed the way miio devices expect:
/// `key = md5(token)`, `iv = md5(key ++ token)`.
#[derive(Clone, Copy)]
pub struct Cipher {
    key: Token<16>,
    iv: Token<16>,
}

impl Cipher {
    pub fn from_token(token: Token<16>) -> Cipher {
        let mut hasher = Md5::new();
        hasher.update(token);

        let mut key = [0; 16];
        key.copy_from_slice(&hasher.finalize_reset());

        hasher.update(key);
        hasher.update(token);

        let mut iv = [0; 16];
        iv.copy_from_slice(&hasher.finalize());

        Cipher { key, iv }
    }

    pub fn encrypt(&self, data: &[u8]) -> Vec<u8> {
        Aes128CbcEnc::new(&self.key.into(), &self.iv.into()).encrypt_padded_vec_mut::<Pkcs7>(data)
    }

    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        let data = Aes128CbcDec::new(&self.key.into(), &self.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(data)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use hex_literal::hex;

    const TOKEN: Token<16> = hex!("00112233445566778899aabbccddeeff");
    const KEY: Token<16> = hex!("6e8311168ee16d6aa1aa48c64145003c");
    const IV: Token<16> = hex!("6f434fa9acd75da73e5fb999f641cda2");
    const ENCRYPTED: [u8; 32] =
        hex!("22a1 9fb1 3a30 0c7e 932c 52fd 24a2 d430 74ea c69f 3240 0626 5298 3f2f f3e5 53b9");

    #[test]
    fn test_key_iv_from_token() {
        let cipher = Cipher::from_token(TOKEN);

        assert_eq!(cipher.key, KEY);
        assert_eq!(cipher.iv, IV);
    }

    #[test]
    fn test_encrypt() {
        let cipher = Cipher::from_token(TOKEN);
        let encrypted = cipher.encrypt(b"{\"test\":\"message\"}");

        assert_eq!(encrypted, ENCRYPTED);
    }

    #[test]
    fn test_decrypt() {
        let cipher = Cipher::from_token(TOKEN);
        let decrypted = cipher.decrypt(&ENCRYPTED).unwrap();

        assert_eq!(decrypted, b"{\"test\":\"message\"}");
    }

    #[test]
    fn test_encrypt_block_aligned_input() {
        let cipher = Cipher::from_token(TOKEN);
        let encrypted = cipher.encrypt(&[0x42; 16]);

        assert_eq!(encrypted.len(), 32);
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), [0x42; 16]);
    }

    #[test]
    fn test_decrypt_garbage() {
        let cipher = Cipher::from_token(TOKEN);
        let error = cipher.decrypt(&[0xff; 16]).unwrap_err();

        assert!(matches!(error, Error::Decrypt(_)));
    }
}
