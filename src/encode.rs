use embedded_io::Write;

use crate::{FrameError, MAX_MESSAGE_LEN, RUN_LIMIT, bits::BitWriter};

/// One bit of the stuffed payload section of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireBit {
    Payload(bool),
    /// Zero inserted after a run of five payload ones. Carries no data.
    Stuffed,
}

impl WireBit {
    pub fn value(self) -> bool {
        matches!(self, WireBit::Payload(true))
    }
}

/// Iterator over the bits that go on the wire between the two flags.
#[derive(Debug, Clone)]
pub struct StuffedBits<'a> {
    bytes: core::slice::Iter<'a, u8>,
    byte: u8,
    remaining: u8,
    ones: u8,
}

/// Stuffs `payload`, MSB-first. A zero follows every fifth consecutive
/// payload one, including one at the very end of the payload.
pub fn stuffed_bits(payload: &[u8]) -> StuffedBits<'_> {
    StuffedBits {
        bytes: payload.iter(),
        byte: 0,
        remaining: 0,
        ones: 0,
    }
}

impl Iterator for StuffedBits<'_> {
    type Item = WireBit;

    fn next(&mut self) -> Option<WireBit> {
        if self.ones == RUN_LIMIT {
            self.ones = 0;
            return Some(WireBit::Stuffed);
        }
        if self.remaining == 0 {
            self.byte = *self.bytes.next()?;
            self.remaining = 8;
        }
        self.remaining -= 1;
        let bit = (self.byte >> self.remaining) & 1 == 1;
        if bit {
            self.ones += 1;
        } else {
            self.ones = 0;
        }
        Some(WireBit::Payload(bit))
    }
}

/// Encode `payload` as one frame and write it to `tx`.
///
/// Wire layout, MSB-first:
/// ```text
/// <0x7E> <stuffed payload bits> <0x7E> <ones up to a byte boundary>
/// ```
/// Returns the payload length. Payloads longer than [`MAX_MESSAGE_LEN`] are
/// refused before anything is written; a failed write leaves a truncated
/// frame on the channel that no decoder will accept as complete.
pub fn write_message<W: Write>(tx: &mut W, payload: &[u8]) -> Result<usize, FrameError<W::Error>> {
    if payload.len() > MAX_MESSAGE_LEN {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
        }
        .report());
    }

    let mut w = BitWriter::new(tx);
    w.write_flag()?;
    let mut stuffed = 0usize;
    for bit in stuffed_bits(payload) {
        if bit == WireBit::Stuffed {
            stuffed += 1;
        }
        w.write_bit(bit.value())?;
    }
    w.write_flag()?;
    w.pad_ones()?;
    w.flush()?;

    log::trace!(
        "wrote frame: {} payload bytes, {} stuffed bits",
        payload.len(),
        stuffed
    );
    Ok(payload.len())
}
