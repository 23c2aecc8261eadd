//! Bit-level cursors over `embedded-io` byte channels.
//!
//! Both cursors borrow their channel for the length of one encode or decode
//! call and are dropped with it, so no bit state survives between calls.
//! Bits are packed and unpacked MSB-first.

use embedded_io::{Read, ReadExactError, Write};

use crate::{FLAG, FrameError};

/// Packs single bits into bytes, writing each byte as soon as it fills.
pub struct BitWriter<'a, W: Write> {
    tx: &'a mut W,
    byte: u8,
    /// Next bit to fill, 7 down to 0.
    pos: u8,
}

impl<'a, W: Write> BitWriter<'a, W> {
    pub fn new(tx: &'a mut W) -> BitWriter<'a, W> {
        BitWriter { tx, byte: 0, pos: 7 }
    }

    /// True when no bits are pending in the current byte.
    pub fn is_aligned(&self) -> bool {
        self.pos == 7
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<(), FrameError<W::Error>> {
        if bit {
            self.byte |= 1 << self.pos;
        }
        if self.pos > 0 {
            self.pos -= 1;
            return Ok(());
        }
        let byte = core::mem::take(&mut self.byte);
        self.pos = 7;
        self.tx
            .write_all(&[byte])
            .map_err(|e| FrameError::Io(e).report())
    }

    /// Writes the flag byte bit by bit, never stuffed.
    pub fn write_flag(&mut self) -> Result<(), FrameError<W::Error>> {
        for i in (0..8).rev() {
            self.write_bit((FLAG >> i) & 1 == 1)?;
        }
        Ok(())
    }

    /// Fills the rest of a partially written byte with ones so it reaches the
    /// channel. Does nothing on a byte boundary.
    pub fn pad_ones(&mut self) -> Result<(), FrameError<W::Error>> {
        while !self.is_aligned() {
            self.write_bit(true)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), FrameError<W::Error>> {
        self.tx.flush().map_err(|e| FrameError::Io(e).report())
    }
}

/// Pulls single bits out of the channel, one byte read at a time.
pub struct BitReader<'a, R: Read> {
    rx: &'a mut R,
    byte: u8,
    /// Bits of `byte` not yet handed out.
    remaining: u8,
}

impl<'a, R: Read> BitReader<'a, R> {
    pub fn new(rx: &'a mut R) -> BitReader<'a, R> {
        BitReader {
            rx,
            byte: 0,
            remaining: 0,
        }
    }

    /// Next bit, or `None` once the channel has no more bytes.
    pub fn read_bit(&mut self) -> Result<Option<bool>, FrameError<R::Error>> {
        if self.remaining == 0 {
            let mut buf = [0; 1];
            match self.rx.read_exact(&mut buf) {
                Ok(()) => {}
                Err(ReadExactError::UnexpectedEof) => return Ok(None),
                Err(ReadExactError::Other(e)) => return Err(FrameError::Io(e).report()),
            }
            self.byte = buf[0];
            self.remaining = 8;
        }
        self.remaining -= 1;
        Ok(Some((self.byte >> self.remaining) & 1 == 1))
    }
}
