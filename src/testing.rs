//! In-memory channels for unit tests.

extern crate alloc;

use alloc::{collections::VecDeque, vec::Vec};
use core::convert::Infallible;

use embedded_io::{ErrorKind, ErrorType, Read, Write};

use crate::{FLAG, bits::BitWriter};

#[derive(Debug, Default)]
pub struct TxBuffer(pub Vec<u8>);

impl TxBuffer {
    pub fn new() -> TxBuffer {
        TxBuffer(Vec::new())
    }
}

impl ErrorType for TxBuffer {
    type Error = Infallible;
}

impl Write for TxBuffer {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct RxBuffer(pub VecDeque<u8>);

impl RxBuffer {
    pub fn from_slice(data: &[u8]) -> RxBuffer {
        RxBuffer(data.iter().copied().collect())
    }

    pub fn remaining(&self) -> usize {
        self.0.len()
    }
}

impl ErrorType for RxBuffer {
    type Error = Infallible;
}

impl Read for RxBuffer {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut n = 0;
        for slot in buf.iter_mut() {
            match self.0.pop_front() {
                Some(b) => {
                    *slot = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

/// Accepts `limit` bytes, then fails every write.
#[derive(Debug)]
pub struct FailingTx {
    pub written: Vec<u8>,
    limit: usize,
}

impl FailingTx {
    pub fn new(limit: usize) -> FailingTx {
        FailingTx {
            written: Vec::new(),
            limit,
        }
    }
}

impl ErrorType for FailingTx {
    type Error = ErrorKind;
}

impl Write for FailingTx {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.written.len() >= self.limit {
            return Err(ErrorKind::BrokenPipe);
        }
        self.written.push(buf[0]);
        Ok(1)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Yields its bytes, then fails instead of reporting end of stream.
#[derive(Debug)]
pub struct FailingRx(VecDeque<u8>);

impl FailingRx {
    pub fn new(data: &[u8]) -> FailingRx {
        FailingRx(data.iter().copied().collect())
    }
}

impl ErrorType for FailingRx {
    type Error = ErrorKind;
}

impl Read for FailingRx {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        let b = self.0.pop_front().ok_or(ErrorKind::Other)?;
        buf[0] = b;
        Ok(1)
    }
}

/// Bits of `bytes`, MSB-first.
pub fn bits_of(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|b| (0..8).rev().map(move |i| (b >> i) & 1 == 1))
        .collect()
}

/// Parses a string of `0`/`1`, ignoring anything else (spaces, underscores).
pub fn bits(s: &str) -> Vec<bool> {
    s.chars()
        .filter_map(|c| match c {
            '0' => Some(false),
            '1' => Some(true),
            _ => None,
        })
        .collect()
}

/// Wraps raw, unstuffed `body` bits in flags and pads with ones, producing
/// wire bytes a conforming encoder might never emit.
pub fn raw_frame(body: &[bool]) -> Vec<u8> {
    let mut tx = TxBuffer::new();
    let mut w = BitWriter::new(&mut tx);
    w.write_flag().unwrap();
    for bit in body {
        w.write_bit(*bit).unwrap();
    }
    w.write_flag().unwrap();
    w.pad_ones().unwrap();
    tx.0
}

#[test]
fn raw_frame_of_nothing_is_two_flags() {
    assert_eq!(raw_frame(&[]), [FLAG, FLAG]);
}
