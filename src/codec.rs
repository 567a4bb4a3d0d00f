//! Primitive wire codec shared by every expression kind.
//!
//! Two surfaces carry the same byte format:
//! - a random-access buffer (`bytes::Buf` / `bytes::BufMut`), read with
//!   read-then-advance cursor semantics
//! - a forward-only stream (`std::io::Read` / `std::io::Write`)
//!
//! All integers are big-endian. Strings are an `i32` byte length followed by
//! raw UTF-8.

pub mod error;

pub use error::{DecodeError, DecodeResult};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::{Buf, BufMut};
use std::convert::Infallible;
use std::io::{self, Read, Write};

/// Destination for encoded primitives.
pub trait WireSink {
    type Error;

    fn encode_u8(&mut self, value: u8) -> Result<(), Self::Error>;

    fn encode_i32(&mut self, value: i32) -> Result<(), Self::Error>;

    fn encode_raw(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    fn encode_bool(&mut self, value: bool) -> Result<(), Self::Error> {
        self.encode_u8(u8::from(value))
    }

    /// Length-prefixed UTF-8 string.
    ///
    /// # Panics
    ///
    /// Panics if the string is longer than [`MAX_WIRE_LEN`] bytes.
    fn encode_string(&mut self, value: &str) -> Result<(), Self::Error> {
        self.encode_len(value.len())?;
        self.encode_raw(value.as_bytes())
    }

    /// Collection size prefix.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds [`MAX_WIRE_LEN`].
    fn encode_len(&mut self, len: usize) -> Result<(), Self::Error> {
        self.encode_i32(wire_len(len))
    }
}

/// Largest string byte length or collection size an `i32` prefix can carry.
pub const MAX_WIRE_LEN: usize = i32::MAX as usize;

fn wire_len(len: usize) -> i32 {
    match i32::try_from(len) {
        Ok(len) => len,
        Err(_) => panic!("length {} exceeds the wire limit of {}", len, MAX_WIRE_LEN),
    }
}

impl<B: BufMut> WireSink for B {
    type Error = Infallible;

    fn encode_u8(&mut self, value: u8) -> Result<(), Infallible> {
        self.put_u8(value);
        Ok(())
    }

    fn encode_i32(&mut self, value: i32) -> Result<(), Infallible> {
        self.put_i32(value);
        Ok(())
    }

    fn encode_raw(&mut self, bytes: &[u8]) -> Result<(), Infallible> {
        self.put_slice(bytes);
        Ok(())
    }
}

/// Forward-only sink over any `io::Write`.
pub struct StreamSink<'a, W: Write> {
    inner: &'a mut W,
}

impl<'a, W: Write> StreamSink<'a, W> {
    pub fn new(inner: &'a mut W) -> Self {
        Self { inner }
    }
}

impl<W: Write> WireSink for StreamSink<'_, W> {
    type Error = io::Error;

    fn encode_u8(&mut self, value: u8) -> io::Result<()> {
        self.inner.write_u8(value)
    }

    fn encode_i32(&mut self, value: i32) -> io::Result<()> {
        self.inner.write_i32::<BigEndian>(value)
    }

    fn encode_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }
}

/// Origin of encoded primitives.
pub trait WireSource {
    fn decode_u8(&mut self) -> DecodeResult<u8>;

    fn decode_i32(&mut self) -> DecodeResult<i32>;

    fn decode_raw(&mut self, len: usize) -> DecodeResult<Vec<u8>>;

    fn decode_bool(&mut self) -> DecodeResult<bool> {
        match self.decode_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidBool(other)),
        }
    }

    fn decode_string(&mut self) -> DecodeResult<String> {
        let len = self.decode_len()?;
        let bytes = self.decode_raw(len)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Non-negative size prefix for strings and collections.
    fn decode_len(&mut self) -> DecodeResult<usize> {
        let len = self.decode_i32()?;
        usize::try_from(len).map_err(|_| DecodeError::InvalidLength(len))
    }
}

fn ensure_remaining<B: Buf>(buf: &B, needed: usize) -> DecodeResult<()> {
    if buf.remaining() < needed {
        return Err(DecodeError::UnexpectedEof {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

impl<B: Buf> WireSource for B {
    fn decode_u8(&mut self) -> DecodeResult<u8> {
        ensure_remaining(self, 1)?;
        Ok(self.get_u8())
    }

    fn decode_i32(&mut self) -> DecodeResult<i32> {
        ensure_remaining(self, 4)?;
        Ok(self.get_i32())
    }

    fn decode_raw(&mut self, len: usize) -> DecodeResult<Vec<u8>> {
        ensure_remaining(self, len)?;
        let mut data = vec![0u8; len];
        self.copy_to_slice(&mut data);
        Ok(data)
    }
}

/// Forward-only source over any `io::Read`.
pub struct StreamSource<'a, R: Read> {
    inner: &'a mut R,
}

impl<'a, R: Read> StreamSource<'a, R> {
    pub fn new(inner: &'a mut R) -> Self {
        Self { inner }
    }
}

impl<R: Read> WireSource for StreamSource<'_, R> {
    fn decode_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.inner.read_u8()?)
    }

    fn decode_i32(&mut self) -> DecodeResult<i32> {
        Ok(self.inner.read_i32::<BigEndian>()?)
    }

    fn decode_raw(&mut self, len: usize) -> DecodeResult<Vec<u8>> {
        // Never allocate more than the stream actually yields.
        let mut data = Vec::new();
        Read::take(&mut *self.inner, len as u64).read_to_end(&mut data)?;
        if data.len() < len {
            return Err(DecodeError::UnexpectedEof {
                needed: len,
                remaining: data.len(),
            });
        }
        Ok(data)
    }
}
