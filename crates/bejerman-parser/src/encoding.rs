//! Decoding of raw document bytes
//!
//! Undecodable bytes are dropped, never reported: a wrong encoding simply
//! produces lines that fail to parse.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Text encodings accepted for `.rec` documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    #[serde(rename = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "utf-16", alias = "utf16")]
    Utf16,
}

impl TextEncoding {
    /// Decode `bytes`, silently dropping anything that is not valid
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            TextEncoding::Utf8 => {
                let mut text = String::with_capacity(bytes.len());
                for chunk in bytes.utf8_chunks() {
                    text.push_str(chunk.valid());
                }
                text
            }
            TextEncoding::Utf16 => decode_utf16(bytes),
        }
    }
}

fn decode_utf16(bytes: &[u8]) -> String {
    let (body, big_endian) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (rest, false),
        [0xFE, 0xFF, rest @ ..] => (rest, true),
        _ => (bytes, false),
    };

    let units = body.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });

    char::decode_utf16(units).filter_map(Result::ok).collect()
}

impl std::str::FromStr for TextEncoding {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-16" | "utf16" => Ok(TextEncoding::Utf16),
            _ => Err(ParseError::UnsupportedEncoding { name: s.to_string() }),
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextEncoding::Latin1 => write!(f, "latin-1"),
            TextEncoding::Utf8 => write!(f, "utf-8"),
            TextEncoding::Utf16 => write!(f, "utf-16"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_maps_every_byte() {
        let bytes = b"Compa\xf1\xeda";
        assert_eq!(TextEncoding::Latin1.decode(bytes), "Compañía");
    }

    #[test]
    fn test_utf8_drops_invalid_bytes() {
        let bytes = b"ACME\xff SA \xc3\xb1";
        assert_eq!(TextEncoding::Utf8.decode(bytes), "ACME SA ñ");
    }

    #[test]
    fn test_utf16_with_and_without_bom() {
        let le: Vec<u8> = "año".encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        let be: Vec<u8> = "año".encode_utf16().flat_map(|u| u.to_be_bytes()).collect();

        let mut with_le_bom = vec![0xFF, 0xFE];
        with_le_bom.extend(&le);
        let mut with_be_bom = vec![0xFE, 0xFF];
        with_be_bom.extend(&be);

        assert_eq!(TextEncoding::Utf16.decode(&le), "año");
        assert_eq!(TextEncoding::Utf16.decode(&with_le_bom), "año");
        assert_eq!(TextEncoding::Utf16.decode(&with_be_bom), "año");
    }

    #[test]
    fn test_utf16_drops_odd_byte_and_lone_surrogate() {
        let mut bytes: Vec<u8> = "ok".encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        bytes.extend([0x00, 0xD8]); // lone high surrogate
        bytes.push(0x41);
        assert_eq!(TextEncoding::Utf16.decode(&bytes), "ok");
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!("latin-1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert_eq!("ISO-8859-1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert_eq!("UTF8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("utf-16".parse::<TextEncoding>().unwrap(), TextEncoding::Utf16);
        assert!("cp1252".parse::<TextEncoding>().is_err());
        assert_eq!(TextEncoding::Latin1.to_string(), "latin-1");
    }

    #[test]
    fn test_default_is_latin1() {
        assert_eq!(TextEncoding::default(), TextEncoding::Latin1);
    }
}
