//! Frame transport abstraction.
//!
//! The board speaks a strict request/reply protocol over one bulk endpoint
//! pair: a command frame goes out, and for commands that produce data a
//! 64-byte reply comes back. Only one exchange may be in flight.

use std::time::Duration;

use hkusbio_protocol::{CommandFrame, Reply};

use crate::error::BoardResult;

pub trait Transport {
    /// Write one command frame to the bulk OUT endpoint.
    fn send(&mut self, frame: &CommandFrame, timeout: Duration) -> BoardResult<()>;

    /// Read one 64-byte reply from the bulk IN endpoint.
    fn receive(&mut self, timeout: Duration) -> BoardResult<Reply>;

    /// Reset the underlying device.
    fn reset(&mut self) -> BoardResult<()>;

    /// Send a frame and read its reply.
    fn exchange(&mut self, frame: &CommandFrame, timeout: Duration) -> BoardResult<Reply> {
        self.send(frame, timeout)?;
        self.receive(timeout)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, frame: &CommandFrame, timeout: Duration) -> BoardResult<()> {
        (**self).send(frame, timeout)
    }

    fn receive(&mut self, timeout: Duration) -> BoardResult<Reply> {
        (**self).receive(timeout)
    }

    fn reset(&mut self) -> BoardResult<()> {
        (**self).reset()
    }

    fn exchange(&mut self, frame: &CommandFrame, timeout: Duration) -> BoardResult<Reply> {
        (**self).exchange(frame, timeout)
    }
}
