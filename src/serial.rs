//! Blocking byte channel over a word-oriented, non-blocking UART.
//!
//! `embedded-hal-nb` serial peripherals move one word at a time and answer
//! `WouldBlock` while the hardware is busy. The frame codec wants a blocking
//! `embedded-io` channel, so [`SerialChannel`] spins on `nb::block!` for the
//! first word of every transfer.

use embedded_hal_nb::serial;

#[derive(Debug)]
pub struct SerialChannel<S> {
    serial: S,
}

impl<S> SerialChannel<S> {
    pub fn new(serial: S) -> SerialChannel<S> {
        SerialChannel { serial }
    }

    pub fn into_inner(self) -> S {
        self.serial
    }
}

/// UART error carried through `embedded-io`.
#[derive(Debug)]
pub struct SerialError<E: serial::Error>(pub E);

impl<E: serial::Error> embedded_io::Error for SerialError<E> {
    fn kind(&self) -> embedded_io::ErrorKind {
        use embedded_hal_nb::serial::ErrorKind::*;
        match self.0.kind() {
            Overrun => embedded_io::ErrorKind::OutOfMemory,
            FrameFormat => embedded_io::ErrorKind::InvalidData,
            Noise => embedded_io::ErrorKind::Other,
            Parity => embedded_io::ErrorKind::InvalidData,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl<S: serial::ErrorType> embedded_io::ErrorType for SerialChannel<S> {
    type Error = SerialError<S::Error>;
}

impl<S: serial::Read> embedded_io::Read for SerialChannel<S> {
    /// Blocks for the first byte, then takes whatever else is already
    /// waiting without blocking again. A UART never reports end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let Some((first, rest)) = buf.split_first_mut() else {
            return Ok(0);
        };
        *first = nb::block!(self.serial.read()).map_err(SerialError)?;
        let mut n = 1;
        for slot in rest {
            match self.serial.read() {
                Ok(word) => {
                    *slot = word;
                    n += 1;
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => return Err(SerialError(e)),
            }
        }
        Ok(n)
    }
}

impl<S: serial::Write> embedded_io::Write for SerialChannel<S> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let Some(&word) = buf.first() else {
            return Ok(0);
        };
        nb::block!(self.serial.write(word)).map_err(SerialError)?;
        Ok(1)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        nb::block!(self.serial.flush()).map_err(SerialError)
    }
}
