use core::fmt::Debug;

use crate::{FRAME_BITS_MAX, MAX_MESSAGE_LEN};

/// Fieldless discriminant of [`FrameError`], handy for matching without
/// caring about the channel error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Sync,
    UnexpectedEof,
    FrameTooLong,
    Frame,
    Protocol,
    Alignment,
    Oversize,
    PayloadTooLarge,
}

/// Error type for encoding and decoding frames over a channel whose own
/// error type is `E`.
///
/// Every variant is terminal for the call that produced it. Nothing is
/// written to the caller's buffer when decoding fails.
#[derive(Debug, thiserror::Error)]
pub enum FrameError<E> {
    /// The channel failed a read or a write.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// The channel ran dry before any start flag was seen.
    #[error("read error: start flag not found")]
    Sync,

    /// The channel ran dry after the start flag but before the end flag.
    #[error("read error: unexpected end of stream inside frame")]
    UnexpectedEof,

    /// No end flag within the capture capacity.
    #[error("frame too long: no end flag within {} bits", FRAME_BITS_MAX)]
    FrameTooLong,

    /// End flag matched before a full flag's worth of bits was captured.
    #[error("protocol error: malformed frame")]
    Frame,

    /// More than five consecutive ones after destuffing.
    #[error("protocol error: invalid sequence of ones")]
    Protocol,

    #[error("payload is not a whole number of bytes ({bits} bits)")]
    Alignment { bits: usize },

    #[error("payload of {bytes} bytes exceeds {} bytes", MAX_MESSAGE_LEN)]
    Oversize { bytes: usize },

    /// Rejected before anything is written to the channel.
    #[error("cannot encode {size} byte payload, limit is {} bytes", MAX_MESSAGE_LEN)]
    PayloadTooLarge { size: usize },
}

impl<E> FrameError<E> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FrameError::Io(_) => ErrorKind::Io,
            FrameError::Sync => ErrorKind::Sync,
            FrameError::UnexpectedEof => ErrorKind::UnexpectedEof,
            FrameError::FrameTooLong => ErrorKind::FrameTooLong,
            FrameError::Frame => ErrorKind::Frame,
            FrameError::Protocol => ErrorKind::Protocol,
            FrameError::Alignment { .. } => ErrorKind::Alignment,
            FrameError::Oversize { .. } => ErrorKind::Oversize,
            FrameError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
        }
    }
}

impl<E: Debug> FrameError<E> {
    /// Emit the diagnostic on the `log` facade and hand the error back.
    pub(crate) fn report(self) -> Self {
        log::warn!("{}", self);
        self
    }
}

impl<E: embedded_io::Error> embedded_io::Error for FrameError<E> {
    fn kind(&self) -> embedded_io::ErrorKind {
        use embedded_io::ErrorKind as Io;
        match self {
            FrameError::Io(e) => e.kind(),
            FrameError::PayloadTooLarge { .. } => Io::InvalidInput,
            FrameError::FrameTooLong | FrameError::Oversize { .. } => Io::OutOfMemory,
            FrameError::Sync | FrameError::UnexpectedEof => Io::Other,
            FrameError::Frame | FrameError::Protocol | FrameError::Alignment { .. } => {
                Io::InvalidData
            }
        }
    }
}
