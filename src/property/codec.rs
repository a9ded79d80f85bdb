//! Wire codec for property maps.
//!
//! Encoding writes entries straight from the caller's ordered sequence, so
//! the byte stream follows that order exactly. Decoding walks the input as a
//! sequence of structural tokens (`{`, key, `:`, value, `,`, `}`, end) and
//! hands each entry to a sink in the order it appears. Keys and values are
//! parsed in place by `serde_json`'s stream deserializer; the top-level
//! object itself is never collected into an unordered map.

use serde_json::de::{SliceRead, StreamDeserializer};
use serde_json::{Deserializer, Value};

use super::errors::{DecodeError, Expected, Found};
use super::Property;

/// Writes `entries` as a single JSON object, in iteration order.
pub(crate) fn encode_entries<'a, I>(entries: I) -> Result<Vec<u8>, serde_json::Error>
where
    I: IntoIterator<Item = (&'a str, &'a Property)>,
{
    let mut out = Vec::with_capacity(128);
    out.push(b'{');
    for (index, (name, property)) in entries.into_iter().enumerate() {
        if index > 0 {
            out.push(b',');
        }
        serde_json::to_writer(&mut out, name)?;
        out.push(b':');
        serde_json::to_writer(&mut out, property)?;
    }
    out.push(b'}');
    Ok(out)
}

/// Reads one JSON object from `input`, calling `sink` for every entry in
/// stream order.
///
/// Entries are delivered as soon as they are read; callers that must not
/// expose a partial result should collect into a scratch map and only keep
/// it once this returns `Ok`.
pub(crate) fn decode_entries<F>(input: &[u8], mut sink: F) -> Result<usize, DecodeError>
where
    F: FnMut(String, Property),
{
    let mut reader = ObjectReader::new(input);
    let mut count = 0;

    reader.expect(b'{', Expected::ObjectOpen)?;

    if reader.peek() == Some(b'}') {
        reader.bump();
    } else {
        loop {
            let name = reader.key()?;
            reader.expect(b':', Expected::Colon)?;
            let value = reader.value()?;
            let property = Property::try_from(value)
                .map_err(|source| DecodeError::InvalidProperty {
                    name: name.clone(),
                    source,
                })?;
            sink(name, property);
            count += 1;

            match reader.peek() {
                Some(b',') => reader.bump(),
                Some(b'}') => {
                    reader.bump();
                    break;
                }
                other => return Err(reader.unexpected(Expected::CommaOrObjectClose, other)),
            }
        }
    }

    match reader.peek() {
        None => Ok(count),
        other => Err(reader.unexpected(Expected::EndOfInput, other)),
    }
}

/// Cursor over the raw bytes of a single top-level object.
struct ObjectReader<'de> {
    input: &'de [u8],
    pos: usize,
}

impl<'de> ObjectReader<'de> {
    const fn new(input: &'de [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Skips whitespace and returns the next byte without consuming it.
    fn peek(&mut self) -> Option<u8> {
        while let Some(&b) = self.input.get(self.pos) {
            if matches!(b, b' ' | b'\n' | b'\t' | b'\r') {
                self.pos += 1;
            } else {
                return Some(b);
            }
        }
        None
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn unexpected(&self, expected: Expected, found: Option<u8>) -> DecodeError {
        DecodeError::Unexpected {
            expected,
            found: found.map_or(Found::EndOfInput, Found::Byte),
            offset: self.pos,
        }
    }

    fn expect(&mut self, byte: u8, expected: Expected) -> Result<(), DecodeError> {
        match self.peek() {
            Some(b) if b == byte => {
                self.bump();
                Ok(())
            }
            other => Err(self.unexpected(expected, other)),
        }
    }

    fn stream<T>(&self) -> StreamDeserializer<'de, SliceRead<'de>, T>
    where
        T: serde::de::Deserialize<'de>,
    {
        Deserializer::from_slice(&self.input[self.pos..]).into_iter::<T>()
    }

    fn key(&mut self) -> Result<String, DecodeError> {
        match self.peek() {
            Some(b'"') => {}
            other => return Err(self.unexpected(Expected::Key, other)),
        }

        let start = self.pos;
        let mut stream = self.stream::<String>();
        match stream.next() {
            Some(Ok(key)) => {
                self.pos += stream.byte_offset();
                if key.is_empty() {
                    return Err(DecodeError::EmptyKey { offset: start });
                }
                Ok(key)
            }
            Some(Err(source)) => Err(DecodeError::Malformed {
                expected: Expected::Key,
                offset: start,
                source,
            }),
            None => Err(self.unexpected(Expected::Key, None)),
        }
    }

    fn value(&mut self) -> Result<Value, DecodeError> {
        let start = match self.peek() {
            None => return Err(self.unexpected(Expected::Value, None)),
            Some(_) => self.pos,
        };

        let mut stream = self.stream::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                self.pos += stream.byte_offset();
                Ok(value)
            }
            Some(Err(source)) => Err(DecodeError::Malformed {
                expected: Expected::Value,
                offset: start,
                source,
            }),
            None => Err(self.unexpected(Expected::Value, None)),
        }
    }
}
