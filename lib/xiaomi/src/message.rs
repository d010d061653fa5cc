use crypto::{Cipher, Token};
use md5::{Digest, Md5};

use crate::{Error, Result};

pub const HEADER_LEN: usize = 32;
const MAGIC: [u8; 2] = [0x21, 0x31];

#[derive(Debug)]
pub struct Message {
    header: Header,
    checksum: [u8; 16],
    data: Vec<u8>,
}

impl Message {
    pub fn encode(data: &[u8], token: Token<16>, id: u32, send_ts: u32) -> Message {
        let data = Cipher::from_token(token).encrypt(data);

        let header = Header {
            id,
            ts: send_ts,
            length: data.len() + HEADER_LEN,
        };

        let checksum = Self::checksum(&header, &token, &data);

        Message {
            header,
            checksum,
            data,
        }
    }

    pub fn decode(self, token: Token<16>) -> Result<Vec<u8>> {
        let checksum = Self::checksum(&self.header, &token, &self.data);

        if checksum != self.checksum {
            return Err(Error::InvalidChecksum);
        }

        let mut data = Cipher::from_token(token).decrypt(&self.data)?;
        while data.ends_with(&[0x0]) {
            data.pop();
        }

        Ok(data)
    }

    fn checksum(header: &Header, token: &[u8], data: &[u8]) -> [u8; 16] {
        let mut hasher = Md5::new();

        {
            let mut header_data = [0; 16];
            header.write_to(&mut header_data);

            hasher.update(header_data);
        }

        hasher.update(token);
        hasher.update(data);

        let mut checksum = [0; 16];
        checksum.copy_from_slice(&hasher.finalize());

        checksum
    }

    pub fn read_from(bytes: &[u8]) -> Result<Message> {
        let header = Header::read_from(bytes)?;

        if header.length < HEADER_LEN || header.length > bytes.len() {
            return Err(Error::InvalidPacket(bytes.len()));
        }

        let mut checksum = [0; 16];
        checksum.copy_from_slice(&bytes[16..32]);

        let data = bytes[HEADER_LEN..header.length].to_vec();

        Ok(Message {
            header,
            checksum,
            data,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0; self.len()];

        self.header.write_to(&mut bytes);
        bytes[16..32].copy_from_slice(&self.checksum);
        bytes[32..].copy_from_slice(&self.data);

        bytes
    }

    pub fn len(&self) -> usize {
        self.header.length
    }

    pub fn header(&self) -> &Header {
        &self.header
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    pub length: usize,
    pub id: u32,
    pub ts: u32,
}

impl Header {
    pub fn read_from(bytes: &[u8]) -> Result<Header> {
        if bytes.len() < HEADER_LEN || bytes[0..2] != MAGIC {
            return Err(Error::InvalidPacket(bytes.len()));
        }

        let length = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;
        let id = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let ts = u32::from_be_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

        Ok(Header { id, ts, length })
    }

    pub fn write_to(&self, bytes: &mut [u8]) {
        bytes[0..2].copy_from_slice(&MAGIC);

        let length = self.length as u16;
        bytes[2..4].copy_from_slice(&length.to_be_bytes());

        bytes[4..8].fill(0);

        bytes[8..12].copy_from_slice(&self.id.to_be_bytes());
        bytes[12..16].copy_from_slice(&self.ts.to_be_bytes());
    }
}

/// The "hello" packet which makes a device answer with its id and uptime stamp.
pub const fn hello_bytes() -> [u8; HEADER_LEN] {
    let mut bytes = [0xff; HEADER_LEN];

    bytes[0] = MAGIC[0];
    bytes[1] = MAGIC[1];
    bytes[2] = 0x00;
    bytes[3] = 0x20;

    bytes
}
