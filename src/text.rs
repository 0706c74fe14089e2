//! Text scheme conversions between character strings and raw bytes.
//!
//! The direction follows the buffer API: [`encode`] interprets a string
//! under a scheme to produce the bytes it denotes (so `"ff00"` under
//! [`TextEncoding::Hex`] yields two bytes), and [`decode`] renders bytes
//! back as text under the same scheme.

use core::fmt;
use core::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::{Error, Result};

/// A text scheme accepted by [`OffsetBuffer::write_str`](crate::OffsetBuffer::write_str)
/// and [`OffsetBuffer::decode_text`](crate::OffsetBuffer::decode_text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Ascii,
    Hex,
    Base64,
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "utf8" | "utf-8" => Ok(TextEncoding::Utf8),
            "ascii" => Ok(TextEncoding::Ascii),
            "hex" => Ok(TextEncoding::Hex),
            "base64" => Ok(TextEncoding::Base64),
            _ => Err(Error::UnsupportedEncoding { scheme: s.to_owned() }),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextEncoding::Utf8 => "utf8",
            TextEncoding::Ascii => "ascii",
            TextEncoding::Hex => "hex",
            TextEncoding::Base64 => "base64",
        };
        f.write_str(name)
    }
}

/// Converts `text` into the raw bytes it denotes under `encoding`.
pub fn encode(text: &str, encoding: TextEncoding) -> Result<Vec<u8>> {
    match encoding {
        TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        TextEncoding::Ascii => {
            if !text.is_ascii() {
                return Err(Error::InvalidArgument {
                    op: "text::encode",
                    reason: format!("{text:?} is not representable as ASCII"),
                });
            }
            Ok(text.as_bytes().to_vec())
        }
        TextEncoding::Hex => from_hex(text),
        TextEncoding::Base64 => BASE64.decode(text).map_err(|_| Error::ParseError {
            op: "text::encode",
            input: text.to_owned(),
        }),
    }
}

/// Renders `bytes` as text under `encoding`.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<String> {
    match encoding {
        TextEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|_| Error::ParseError {
            op: "text::decode",
            input: to_hex(bytes),
        }),
        TextEncoding::Ascii => {
            if !bytes.is_ascii() {
                return Err(Error::ParseError {
                    op: "text::decode",
                    input: to_hex(bytes),
                });
            }
            // Checked just above: every byte is ASCII, hence valid UTF-8.
            Ok(String::from_utf8(bytes.to_vec()).expect("ASCII bytes"))
        }
        TextEncoding::Hex => Ok(to_hex(bytes)),
        TextEncoding::Base64 => Ok(BASE64.encode(bytes)),
    }
}

/// Renders bytes as a lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    use core::fmt::Write as _;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(out, "{byte:02x}").expect("writing to a String cannot fail");
    }
    out
}

fn from_hex(text: &str) -> Result<Vec<u8>> {
    let parse_error = || Error::ParseError {
        op: "text::encode",
        input: text.to_owned(),
    };

    if text.len() % 2 != 0 {
        return Err(parse_error());
    }

    text.as_bytes()
        .chunks(2)
        .map(|pair| {
            let pair = core::str::from_utf8(pair).map_err(|_| parse_error())?;
            u8::from_str_radix(pair, 16).map_err(|_| parse_error())
        })
        .collect()
}
