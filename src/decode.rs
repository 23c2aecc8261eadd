use core::fmt::Debug;

use embedded_io::Read;
use heapless::Vec;

use crate::{FLAG, FrameError, MAX_MESSAGE_LEN, RUN_LIMIT, bits::BitReader};

/// Extra capture room for the end flag (which is captured before it is
/// recognised) plus alignment slack.
pub const FLAG_MARGIN_BITS: usize = 32;

/// Capture capacity for one frame, in bits.
///
/// `MAX_MESSAGE_LEN * 8 * 5 / 4` bounds a maximum payload after stuffing
/// (at most one inserted zero per five payload bits), then
/// [`FLAG_MARGIN_BITS`] on top: 2048 * 5 / 4 + 32 = 2592.
pub const FRAME_BITS_MAX: usize = MAX_MESSAGE_LEN * 8 * 5 / 4 + FLAG_MARGIN_BITS;

/// Raw bits captured between two flags, still stuffed.
pub type FrameBits = Vec<bool, FRAME_BITS_MAX>;

/// Bits left after destuffing. Kept as a separate buffer from [`FrameBits`].
pub type PayloadBits = Vec<bool, FRAME_BITS_MAX>;

/// Shift `bit` into an 8-bit sliding window.
fn slide(window: u8, bit: bool) -> u8 {
    (window << 1) | bit as u8
}

/// Read until the window matches a flag.
fn seek_flag<R: Read>(r: &mut BitReader<'_, R>) -> Result<(), FrameError<R::Error>> {
    let mut window = 0u8;
    let mut skipped = 0usize;
    loop {
        let Some(bit) = r.read_bit()? else {
            return Err(FrameError::Sync.report());
        };
        window = slide(window, bit);
        if window == FLAG {
            if skipped >= 8 {
                log::debug!("skipped {} bits before start flag", skipped - 7);
            }
            return Ok(());
        }
        skipped += 1;
    }
}

/// Capture bits up to and including the end flag, then drop the flag.
fn capture_frame<R: Read>(r: &mut BitReader<'_, R>) -> Result<FrameBits, FrameError<R::Error>> {
    let mut frame = FrameBits::new();
    let mut window = 0u8;
    loop {
        let Some(bit) = r.read_bit()? else {
            return Err(FrameError::UnexpectedEof.report());
        };
        if frame.push(bit).is_err() {
            return Err(FrameError::FrameTooLong.report());
        }
        window = slide(window, bit);
        if window == FLAG {
            if frame.len() < 8 {
                return Err(FrameError::Frame.report());
            }
            frame.truncate(frame.len() - 8);
            return Ok(frame);
        }
    }
}

/// Remove stuffed zeros from captured frame bits.
///
/// A zero directly after five ones is dropped. A sixth one in a row is a
/// protocol violation, since a conforming sender would have stuffed a zero
/// before it.
pub fn destuff<E: Debug>(frame: &[bool]) -> Result<PayloadBits, FrameError<E>> {
    let mut out = PayloadBits::new();
    let mut ones = 0u8;
    for &bit in frame {
        if bit {
            ones += 1;
            if ones > RUN_LIMIT {
                return Err(FrameError::Protocol.report());
            }
        } else if ones == RUN_LIMIT {
            ones = 0;
            continue;
        } else {
            ones = 0;
        }
        // out is never longer than frame, which shares its capacity
        if out.push(bit).is_err() {
            return Err(FrameError::FrameTooLong.report());
        }
    }
    Ok(out)
}

/// Check length and alignment, then pack bits MSB-first into `out`.
fn pack<E: Debug>(bits: &[bool], out: &mut [u8; MAX_MESSAGE_LEN]) -> Result<usize, FrameError<E>> {
    if bits.len() % 8 != 0 {
        return Err(FrameError::Alignment { bits: bits.len() }.report());
    }
    let len = bits.len() / 8;
    if len > MAX_MESSAGE_LEN {
        return Err(FrameError::Oversize { bytes: len }.report());
    }
    for (byte, chunk) in out.iter_mut().zip(bits.chunks_exact(8)) {
        *byte = chunk.iter().fold(0, |acc, &b| (acc << 1) | b as u8);
    }
    Ok(len)
}

/// Read exactly one frame from `rx` and write its payload into `out`.
///
/// Bits before the first start flag are discarded. The channel is consumed
/// through the byte holding the last bit of the end flag; padding in that
/// byte is dropped with the reader. Returns the payload length. `out` is
/// untouched on error, and a fresh call resynchronises on the next flag.
pub fn read_message<R: Read>(
    rx: &mut R,
    out: &mut [u8; MAX_MESSAGE_LEN],
) -> Result<usize, FrameError<R::Error>> {
    let mut r = BitReader::new(rx);
    seek_flag(&mut r)?;
    let frame = capture_frame(&mut r)?;
    let payload = destuff::<R::Error>(&frame)?;
    let len = pack::<R::Error>(&payload, out)?;
    log::trace!(
        "read frame: {} captured bits, {} payload bytes",
        frame.len(),
        len
    );
    Ok(len)
}
