use crate::{Error, Result};

pub type Token<const N: usize> = [u8; N];

/// Parses a hex string (case-insensitive) of exactly `2 * N` digits.
pub fn parse_token<const N: usize>(hex: &str) -> Result<Token<N>> {
    if hex.len() != N * 2 {
        return Err(Error::InvalidToken(hex.to_string()));
    }

    let mut result = [0; N];
    let iterator = TokenIterator {
        token: hex.as_bytes(),
        pos: 0,
    };

    for (idx, value) in iterator.enumerate() {
        result[idx] = value.ok_or_else(|| Error::InvalidToken(hex.to_string()))?;
    }

    Ok(result)
}

struct TokenIterator<'t> {
    token: &'t [u8],
    pos: usize,
}

impl TokenIterator<'_> {
    fn next_value(&mut self) -> Option<Option<u8>> {
        let value = *self.token.get(self.pos)?;
        self.pos += 1;

        Some(match value {
            b'0'..=b'9' => Some(value - b'0'),
            b'a'..=b'f' => Some(value - b'a' + 10),
            b'A'..=b'F' => Some(value - b'A' + 10),
            _ => None,
        })
    }
}

impl Iterator for TokenIterator<'_> {
    type Item = Option<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        let high = self.next_value()?;
        let low = self.next_value()?;

        Some(high.zip(low).map(|(high, low)| (high << 4) + low))
    }
}
