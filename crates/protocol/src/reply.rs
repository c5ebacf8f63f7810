//! Reply decoding.
//!
//! Every answered command produces a full 64-byte packet. Byte 0 echoes the
//! opcode; the payload starts at byte 1. Which bytes carry data depends on
//! the command, so decoding is done through the accessor matching the
//! request.

use std::fmt;

use crate::decode::combine_u16;
use crate::error::{ProtocolError, ProtocolResult};
use crate::ids::REPLY_LEN;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    buf: [u8; REPLY_LEN],
}

impl Reply {
    pub fn new(buf: [u8; REPLY_LEN]) -> Self {
        Self { buf }
    }

    pub fn from_bytes(data: &[u8]) -> ProtocolResult<Self> {
        let buf: [u8; REPLY_LEN] = data
            .get(..REPLY_LEN)
            .and_then(|head| head.try_into().ok())
            .ok_or(ProtocolError::InvalidLength {
                expected: REPLY_LEN,
                actual: data.len(),
            })?;
        Ok(Self { buf })
    }

    /// Builds a reply the way the firmware does: opcode echo followed by payload.
    pub fn with_payload(echo: u8, payload: &[u8]) -> Self {
        let mut buf = [0u8; REPLY_LEN];
        buf[0] = echo;
        for (dst, src) in buf.iter_mut().skip(1).zip(payload) {
            *dst = *src;
        }
        Self { buf }
    }

    pub fn as_bytes(&self) -> &[u8; REPLY_LEN] {
        &self.buf
    }

    /// Byte 0: the opcode the firmware was answering.
    pub fn echo(&self) -> u8 {
        self.buf[0]
    }

    pub fn byte(&self, index: usize) -> Option<u8> {
        self.buf.get(index).copied()
    }

    /// Byte 1, the result of most single-value commands.
    pub fn value(&self) -> u8 {
        self.buf[1]
    }

    /// Byte 1 as a boolean (UART has-char, I2C data-ready, SFR bits).
    pub fn flag(&self) -> bool {
        self.buf[1] != 0
    }

    /// 10-bit ADC result, little-endian across bytes 1 and 2.
    pub fn adc_value(&self) -> u16 {
        combine_u16(self.buf[2], self.buf[1])
    }

    /// The on-board switch pulls its pin low when pressed.
    pub fn switch_pressed(&self) -> bool {
        self.buf[1] == 0
    }

    /// The firmware reports 0 for ACK and 1 for no ACK.
    pub fn slave_acked(&self) -> bool {
        self.buf[1] == 0
    }

    /// UART get-char reply: byte 1 is the availability flag, byte 2 the character.
    pub fn uart_char(&self) -> Option<u8> {
        if self.buf[1] == 0 {
            None
        } else {
            Some(self.buf[2])
        }
    }

    /// ROM version formatted as `<b1>.<b2><b3>`, e.g. `"1.03"`.
    pub fn rom_version(&self) -> String {
        let [major, minor, patch] = [self.buf[1], self.buf[2], self.buf[3]].map(char::from);
        format!("{major}.{minor}{patch}")
    }
}

impl Default for Reply {
    fn default() -> Self {
        Self {
            buf: [0u8; REPLY_LEN],
        }
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reply {:02x?}", self.buf.get(..4).unwrap_or(&self.buf))
    }
}
