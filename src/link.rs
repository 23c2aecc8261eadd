use embedded_io::{Read, Write};

use crate::{FrameError, MAX_MESSAGE_LEN, read_message, write_message};

/// Owned payload of one received frame.
pub type Message = heapless::Vec<u8, MAX_MESSAGE_LEN>;

pub trait FrameSend<Tx: Write> {
    /// Encode `data` as one frame. Returns the payload length.
    fn send(&mut self, data: &[u8]) -> Result<usize, FrameError<Tx::Error>>;
}

pub trait FrameRecv<Rx: Read> {
    /// Block until one whole frame has been read.
    fn recv(&mut self) -> Result<Message, FrameError<Rx::Error>>;

    /// Like `recv`, but into caller storage. Returns the payload length.
    fn recv_into(&mut self, buf: &mut [u8; MAX_MESSAGE_LEN]) -> Result<usize, FrameError<Rx::Error>>;
}

pub struct FrameTx<Tx: Write> {
    pub tx: Tx,
}

impl<Tx: Write> FrameTx<Tx> {
    pub fn new(tx: Tx) -> FrameTx<Tx> {
        FrameTx { tx }
    }

    pub fn into_inner(self) -> Tx {
        self.tx
    }
}

impl<Tx: Write> FrameSend<Tx> for FrameTx<Tx> {
    fn send(&mut self, data: &[u8]) -> Result<usize, FrameError<Tx::Error>> {
        write_message(&mut self.tx, data)
    }
}

pub struct FrameRx<Rx: Read> {
    pub rx: Rx,
}

impl<Rx: Read> FrameRx<Rx> {
    pub fn new(rx: Rx) -> FrameRx<Rx> {
        FrameRx { rx }
    }

    pub fn into_inner(self) -> Rx {
        self.rx
    }
}

impl<Rx: Read> FrameRecv<Rx> for FrameRx<Rx> {
    fn recv(&mut self) -> Result<Message, FrameError<Rx::Error>> {
        let mut buf = [0; MAX_MESSAGE_LEN];
        let len = self.recv_into(&mut buf)?;
        // len is bounded by MAX_MESSAGE_LEN, so this always fits
        Message::from_slice(&buf[..len]).map_err(|_| FrameError::Oversize { bytes: len })
    }

    fn recv_into(&mut self, buf: &mut [u8; MAX_MESSAGE_LEN]) -> Result<usize, FrameError<Rx::Error>> {
        read_message(&mut self.rx, buf)
    }
}

/// Both directions of a link, e.g. the two halves of a UART.
pub struct FrameTxRx<Tx: Write, Rx: Read> {
    ftx: FrameTx<Tx>,
    frx: FrameRx<Rx>,
}

impl<Tx: Write, Rx: Read> FrameTxRx<Tx, Rx> {
    pub fn new(tx: Tx, rx: Rx) -> FrameTxRx<Tx, Rx> {
        FrameTxRx {
            ftx: FrameTx::new(tx),
            frx: FrameRx::new(rx),
        }
    }

    pub fn split(self) -> (FrameTx<Tx>, FrameRx<Rx>) {
        (self.ftx, self.frx)
    }
}

impl<Tx: Write, Rx: Read> FrameSend<Tx> for FrameTxRx<Tx, Rx> {
    fn send(&mut self, data: &[u8]) -> Result<usize, FrameError<Tx::Error>> {
        self.ftx.send(data)
    }
}

impl<Tx: Write, Rx: Read> FrameRecv<Rx> for FrameTxRx<Tx, Rx> {
    fn recv(&mut self) -> Result<Message, FrameError<Rx::Error>> {
        self.frx.recv()
    }

    fn recv_into(&mut self, buf: &mut [u8; MAX_MESSAGE_LEN]) -> Result<usize, FrameError<Rx::Error>> {
        self.frx.recv_into(buf)
    }
}
