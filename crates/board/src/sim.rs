//! In-process model of the board firmware.
//!
//! [`SimulatedBoard`] implements [`Transport`] by interpreting command frames
//! the way the firmware does: SFR memory with the port latch mirroring, the
//! four GPIO pins on PORTD, both ADC channels, UART buffers, the I2C engine
//! with a set of register-file slaves, the SPI engine with one register-file
//! slave (also reachable through MSSP1 SFR writes) and a 74HC595 shift
//! register wired to RD4..RD7. Every frame sent is logged.
//!
//! Like the firmware, the I2C engine ignores bus traffic until it has received
//! the I2C init command; slaves never acknowledge before that.
//!
//! Clones share state, so a test can keep a handle after moving one into a
//! [`Board`](crate::Board).

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use hkusbio_protocol::{
    AdcChannel, CommandFrame, GpioPin, Opcode, Reply, SFR_ADDR_OFFSET, SFR_BIT_VALUE_OFFSET,
    SFR_VALUE_OFFSET, Sfr,
};
use tracing::trace;

use crate::error::{BoardError, BoardResult};
use crate::transport::Transport;

const SSPEN: u8 = 1 << 5;
const BF: u8 = 1 << 0;
const SFR_SPI_CS_BIT: u8 = 5;
const SR_SER_BIT: u8 = 4;
const SR_RCLK_BIT: u8 = 5;
const SR_SRCLK_BIT: u8 = 6;
const SR_OE_BIT: u8 = 7;

/// A register-file I2C slave that auto-increments its register pointer.
#[derive(Debug, Clone)]
pub struct SimI2cSlave {
    registers: [u8; 256],
    nacks: u32,
    writes: Vec<(u8, u8)>,
}

impl SimI2cSlave {
    pub fn new() -> Self {
        Self {
            registers: [0; 256],
            nacks: 0,
            writes: Vec::new(),
        }
    }

    /// Leave the first `count` acknowledge polls unanswered.
    #[must_use]
    pub fn with_nacks(mut self, count: u32) -> Self {
        self.nacks = count;
        self
    }

    /// Preload consecutive registers starting at `start`.
    #[must_use]
    pub fn with_registers(mut self, start: u8, values: &[u8]) -> Self {
        for (offset, value) in values.iter().enumerate() {
            let register = usize::from(start).wrapping_add(offset) % self.registers.len();
            if let Some(slot) = self.registers.get_mut(register) {
                *slot = *value;
            }
        }
        self
    }

    pub fn set_register(&mut self, register: u8, value: u8) {
        self.registers[usize::from(register)] = value;
    }
}

impl Default for SimI2cSlave {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct I2cEngine {
    expect_address: bool,
    address: Option<u8>,
    reading: bool,
    pointer: Option<u8>,
    acked: bool,
}

#[derive(Debug, Default)]
struct SpiEngine {
    selected: bool,
    /// Register address and read flag latched from the first byte after select.
    command: Option<(u8, bool)>,
}

#[derive(Debug, Default, Clone, Copy)]
struct ShiftRegister {
    shift: u8,
    latch: u8,
}

#[derive(Debug)]
struct SimState {
    sfr: [u8; 256],
    led_on: bool,
    switch_pressed: bool,
    adc: [u16; 2],
    uart_rx: VecDeque<u8>,
    uart_tx: Vec<u8>,
    rom_version: [u8; 3],
    i2c_enabled: bool,
    i2c: I2cEngine,
    i2c_slaves: HashMap<u8, SimI2cSlave>,
    spi: SpiEngine,
    spi_registers: [u8; 128],
    spi_log: Vec<(u8, u8)>,
    sfr_spi_stalled: bool,
    shift_register: ShiftRegister,
    frames: Vec<Vec<u8>>,
    pending: VecDeque<Reply>,
    failures: u32,
    failure_skip: u32,
    resets: u32,
}

impl SimState {
    fn new() -> Self {
        Self {
            sfr: [0; 256],
            led_on: false,
            switch_pressed: false,
            adc: [0; 2],
            uart_rx: VecDeque::new(),
            uart_tx: Vec::new(),
            rom_version: *b"100",
            i2c_enabled: false,
            i2c: I2cEngine::default(),
            i2c_slaves: HashMap::new(),
            spi: SpiEngine::default(),
            spi_registers: [0; 128],
            spi_log: Vec::new(),
            sfr_spi_stalled: false,
            shift_register: ShiftRegister::default(),
            frames: Vec::new(),
            pending: VecDeque::new(),
            failures: 0,
            failure_skip: 0,
            resets: 0,
        }
    }

    /// Whether the current transfer should fail with an injected timeout.
    fn take_failure(&mut self) -> bool {
        if self.failures == 0 {
            return false;
        }
        if self.failure_skip > 0 {
            self.failure_skip -= 1;
            return false;
        }
        self.failures -= 1;
        true
    }

    fn read_sfr(&mut self, address: u8) -> u8 {
        let value = self.sfr[usize::from(address)];
        if address == Sfr::Ssp1Buf.address() {
            self.sfr[usize::from(Sfr::Ssp1Stat.address())] &= !BF;
        }
        value
    }

    fn write_sfr(&mut self, address: u8, value: u8) {
        let old = self.sfr[usize::from(address)];
        self.sfr[usize::from(address)] = value;

        if (Sfr::LatA.address()..=Sfr::LatE.address()).contains(&address) {
            let port = address - (Sfr::LatA.address() - Sfr::PortA.address());
            self.sfr[usize::from(port)] = value;
        }
        let cs_changed = bit(old, SFR_SPI_CS_BIT) != bit(value, SFR_SPI_CS_BIT);
        if address == Sfr::LatA.address() && cs_changed {
            self.spi_select(!bit(value, SFR_SPI_CS_BIT));
        }
        if address == Sfr::LatD.address() {
            self.clock_shift_register(old, value);
        }
        let mssp_enabled = self.sfr[usize::from(Sfr::Ssp1Con1.address())] & SSPEN != 0;
        if address == Sfr::Ssp1Buf.address() && mssp_enabled {
            let rx = self.spi_exchange(value);
            self.sfr[usize::from(address)] = rx;
            if !self.sfr_spi_stalled {
                self.sfr[usize::from(Sfr::Ssp1Stat.address())] |= BF;
            }
        }
    }

    fn clock_shift_register(&mut self, old: u8, new: u8) {
        let rising = |b: u8| !bit(old, b) && bit(new, b);
        if rising(SR_SRCLK_BIT) {
            let ser = u8::from(bit(new, SR_SER_BIT));
            self.shift_register.shift = (self.shift_register.shift << 1) | ser;
        }
        if rising(SR_RCLK_BIT) {
            self.shift_register.latch = self.shift_register.shift;
        }
    }

    fn spi_select(&mut self, selected: bool) {
        self.spi.selected = selected;
        self.spi.command = None;
    }

    fn spi_exchange(&mut self, byte: u8) -> u8 {
        if !self.spi.selected {
            return 0xFF;
        }
        match self.spi.command {
            None => {
                self.spi.command = Some((byte & 0x7F, byte & 0x80 != 0));
                0x00
            }
            Some((register, read)) => {
                let slot = usize::from(register) % self.spi_registers.len();
                let value = if read {
                    self.spi_registers[slot]
                } else {
                    self.spi_registers[slot] = byte;
                    self.spi_log.push((register, byte));
                    0x00
                };
                self.spi.command = Some((register.wrapping_add(1) & 0x7F, read));
                value
            }
        }
    }

    fn gpio_bit(pin: GpioPin) -> u8 {
        pin.to_u8() + 3
    }

    fn i2c_write(&mut self, byte: u8) {
        let engine = &mut self.i2c;
        if engine.expect_address {
            let address = byte >> 1;
            engine.expect_address = false;
            engine.address = Some(address);
            engine.reading = byte & 1 == 1;
            engine.acked = self.i2c_slaves.contains_key(&address);
            if !engine.reading {
                engine.pointer = None;
            }
            return;
        }
        let slave = match engine.address.and_then(|a| self.i2c_slaves.get_mut(&a)) {
            Some(slave) if !engine.reading => slave,
            _ => {
                engine.acked = false;
                return;
            }
        };
        engine.acked = true;
        match engine.pointer {
            None => engine.pointer = Some(byte),
            Some(register) => {
                slave.registers[usize::from(register)] = byte;
                slave.writes.push((register, byte));
                engine.pointer = Some(register.wrapping_add(1));
            }
        }
    }

    fn i2c_slave_ack(&mut self) -> bool {
        if !self.i2c_enabled || !self.i2c.acked {
            return false;
        }
        match self.i2c.address.and_then(|a| self.i2c_slaves.get_mut(&a)) {
            Some(slave) if slave.nacks > 0 => {
                slave.nacks -= 1;
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    fn i2c_read(&mut self) -> u8 {
        if !self.i2c_enabled {
            return 0xFF;
        }
        let engine = &mut self.i2c;
        let slave = match engine.address.and_then(|a| self.i2c_slaves.get(&a)) {
            Some(slave) if engine.reading => slave,
            _ => return 0xFF,
        };
        let register = engine.pointer.unwrap_or(0);
        engine.pointer = Some(register.wrapping_add(1));
        slave.registers[usize::from(register)]
    }

    /// Run one command frame; returns the reply payload for answered commands.
    fn execute(&mut self, frame: &[u8]) -> Option<Reply> {
        let param = |i: usize| frame.get(i).copied().unwrap_or(0);
        let opcode = match Opcode::try_from(param(0)) {
            Ok(opcode) => opcode,
            Err(err) => {
                trace!(%err, "simulated firmware ignores frame");
                return None;
            }
        };
        let op = opcode.to_u8();
        let reply = |payload: &[u8]| Some(Reply::with_payload(op, payload));

        match opcode {
            Opcode::ToggleLed => {
                self.led_on = !self.led_on;
                None
            }
            Opcode::ReadSwitch => reply(&[u8::from(!self.switch_pressed)]),
            Opcode::GpioRead => {
                let port = self.sfr[usize::from(Sfr::PortD.address())];
                let level = GpioPin::from_u8(param(1))
                    .map(|pin| bit(port, Self::gpio_bit(pin)))
                    .unwrap_or(false);
                reply(&[u8::from(level), 0])
            }
            Opcode::GpioWrite => {
                if let Ok(pin) = GpioPin::from_u8(param(1)) {
                    let lat = Sfr::LatD.address();
                    let level = param(2) != 0;
                    let value = with_bit(self.sfr[usize::from(lat)], Self::gpio_bit(pin), level);
                    self.write_sfr(lat, value);
                }
                None
            }
            Opcode::GpioDirection => {
                if let Ok(pin) = GpioPin::from_u8(param(1)) {
                    let tris = usize::from(Sfr::TrisD.address());
                    self.sfr[tris] = with_bit(self.sfr[tris], Self::gpio_bit(pin), param(2) != 0);
                }
                None
            }
            Opcode::RomVersion => reply(&self.rom_version),
            Opcode::UartPutString => {
                let text = frame.get(1..).unwrap_or(&[]);
                self.uart_tx.extend(text.iter().take_while(|b| **b != 0));
                None
            }
            Opcode::UartHasChar => reply(&[u8::from(!self.uart_rx.is_empty())]),
            Opcode::UartGetChar => match self.uart_rx.pop_front() {
                Some(ch) => reply(&[1, ch]),
                None => reply(&[0]),
            },
            Opcode::UartPutChar => {
                self.uart_tx.push(param(1));
                None
            }
            Opcode::AdcRa0 | Opcode::AdcRa1 => {
                let value = self.adc[usize::from(opcode == Opcode::AdcRa1)];
                reply(&value.to_le_bytes())
            }
            Opcode::SfrGetRegister => {
                let value = self.read_sfr(param(SFR_ADDR_OFFSET));
                reply(&[value])
            }
            Opcode::SfrSetRegister => {
                let address = param(SFR_ADDR_OFFSET);
                self.write_sfr(address, param(SFR_VALUE_OFFSET));
                reply(&[self.sfr[usize::from(address)]])
            }
            Opcode::SfrGetBit => {
                let value = self.read_sfr(param(SFR_ADDR_OFFSET));
                reply(&[u8::from(bit(value, param(SFR_VALUE_OFFSET)))])
            }
            Opcode::SfrSetBit => {
                let address = param(SFR_ADDR_OFFSET);
                let index = param(SFR_VALUE_OFFSET);
                let set = param(SFR_BIT_VALUE_OFFSET) != 0;
                let value = with_bit(self.sfr[usize::from(address)], index, set);
                self.write_sfr(address, value);
                reply(&[u8::from(bit(value, index))])
            }
            Opcode::I2cInit => {
                self.i2c_enabled = true;
                self.i2c = I2cEngine::default();
                None
            }
            Opcode::I2cIdle | Opcode::I2cMasterAck => None,
            Opcode::I2cStart => {
                // MSSP1 stays in its reset mode until the I2C init command
                self.i2c.expect_address = self.i2c_enabled;
                self.i2c.acked = false;
                None
            }
            Opcode::I2cStop => {
                self.i2c = I2cEngine::default();
                None
            }
            Opcode::I2cWrite => {
                if self.i2c_enabled {
                    self.i2c_write(param(1));
                }
                None
            }
            Opcode::I2cSlaveAck => {
                let acked = self.i2c_slave_ack();
                reply(&[u8::from(!acked)])
            }
            Opcode::I2cRead => {
                let value = self.i2c_read();
                reply(&[value])
            }
            Opcode::I2cDataReady => reply(&[1]),
            Opcode::SpiInit => None,
            Opcode::SpiTransfer => {
                let value = self.spi_exchange(param(1));
                reply(&[value])
            }
            Opcode::SpiChipSelect => {
                self.spi_select(param(1) == 0);
                None
            }
        }
    }
}

fn bit(value: u8, index: u8) -> bool {
    index < 8 && value & (1 << index) != 0
}

fn with_bit(value: u8, index: u8, set: bool) -> u8 {
    if index >= 8 {
        value
    } else if set {
        value | (1 << index)
    } else {
        value & !(1 << index)
    }
}

/// Simulated HKUSBIO board.
#[derive(Debug, Clone)]
pub struct SimulatedBoard {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedBoard {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState::new())),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every frame sent so far, trimmed to its wire length.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.state().frames.clone()
    }

    pub fn clear_frames(&self) {
        self.state().frames.clear();
    }

    /// Make the next `count` transfers fail with `Timeout`.
    pub fn fail_next_transfers(&self, count: u32) {
        self.fail_transfers_after(0, count);
    }

    /// Let `skip` transfers through, then fail the following `count`.
    ///
    /// Sends and receives each count as one transfer.
    pub fn fail_transfers_after(&self, skip: u32, count: u32) {
        let mut state = self.state();
        state.failure_skip = skip;
        state.failures = count;
    }

    pub fn reset_count(&self) -> u32 {
        self.state().resets
    }

    pub fn led_on(&self) -> bool {
        self.state().led_on
    }

    pub fn set_switch_pressed(&self, pressed: bool) {
        self.state().switch_pressed = pressed;
    }

    pub fn set_rom_version(&self, version: [u8; 3]) {
        self.state().rom_version = version;
    }

    pub fn set_adc(&self, channel: AdcChannel, value: u16) {
        let index = usize::from(channel == AdcChannel::Ra1);
        self.state().adc[index] = value;
    }

    /// Output latch level of a GPIO pin.
    pub fn gpio_level(&self, pin: GpioPin) -> bool {
        bit(self.state().sfr[usize::from(Sfr::LatD.address())], SimState::gpio_bit(pin))
    }

    /// Drive a GPIO pin from outside the board.
    pub fn set_gpio_input(&self, pin: GpioPin, high: bool) {
        let mut state = self.state();
        let port = usize::from(Sfr::PortD.address());
        state.sfr[port] = with_bit(state.sfr[port], SimState::gpio_bit(pin), high);
    }

    pub fn gpio_is_input(&self, pin: GpioPin) -> bool {
        bit(self.state().sfr[usize::from(Sfr::TrisD.address())], SimState::gpio_bit(pin))
    }

    pub fn push_uart_rx(&self, bytes: &[u8]) {
        self.state().uart_rx.extend(bytes.iter().copied());
    }

    pub fn uart_tx(&self) -> Vec<u8> {
        self.state().uart_tx.clone()
    }

    /// Raw SFR memory, without read side effects.
    pub fn sfr(&self, address: u8) -> u8 {
        self.state().sfr[usize::from(address)]
    }

    /// Set SFR memory directly, without write side effects.
    pub fn set_sfr(&self, address: u8, value: u8) {
        self.state().sfr[usize::from(address)] = value;
    }

    /// Keep SSP1STAT.BF clear after MSSP1 transfers.
    pub fn stall_sfr_spi(&self, stalled: bool) {
        self.state().sfr_spi_stalled = stalled;
    }

    /// Whether the I2C engine has been initialised since power-up or reset.
    pub fn i2c_enabled(&self) -> bool {
        self.state().i2c_enabled
    }

    pub fn add_i2c_slave(&self, address: u8, slave: SimI2cSlave) {
        self.state().i2c_slaves.insert(address, slave);
    }

    pub fn i2c_register(&self, address: u8, register: u8) -> Option<u8> {
        self.state()
            .i2c_slaves
            .get(&address)
            .map(|slave| slave.registers[usize::from(register)])
    }

    pub fn set_i2c_register(&self, address: u8, register: u8, value: u8) {
        if let Some(slave) = self.state().i2c_slaves.get_mut(&address) {
            slave.set_register(register, value);
        }
    }

    /// Register writes the slave at `address` has received, in order.
    pub fn i2c_writes(&self, address: u8) -> Vec<(u8, u8)> {
        self.state()
            .i2c_slaves
            .get(&address)
            .map(|slave| slave.writes.clone())
            .unwrap_or_default()
    }

    /// Whether the SPI slave currently sees its chip select asserted.
    pub fn spi_selected(&self) -> bool {
        self.state().spi.selected
    }

    pub fn spi_register(&self, register: u8) -> u8 {
        self.state().spi_registers[usize::from(register & 0x7F)]
    }

    pub fn set_spi_register(&self, register: u8, value: u8) {
        self.state().spi_registers[usize::from(register & 0x7F)] = value;
    }

    /// Register writes the SPI slave has received, in order.
    pub fn spi_writes(&self) -> Vec<(u8, u8)> {
        self.state().spi_log.clone()
    }

    /// 74HC595 output latch, or `None` while its outputs are disabled.
    pub fn shift_register_output(&self) -> Option<u8> {
        let state = self.state();
        let oe_high = bit(state.sfr[usize::from(Sfr::LatD.address())], SR_OE_BIT);
        (!oe_high).then_some(state.shift_register.latch)
    }
}

impl Default for SimulatedBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for SimulatedBoard {
    fn send(&mut self, frame: &CommandFrame, timeout: Duration) -> BoardResult<()> {
        let mut state = self.state();
        if state.take_failure() {
            return Err(timeout_error(timeout));
        }
        let bytes = frame.as_bytes();
        state.frames.push(bytes.to_vec());
        if let Some(reply) = state.execute(bytes) {
            state.pending.push_back(reply);
        }
        Ok(())
    }

    fn receive(&mut self, timeout: Duration) -> BoardResult<Reply> {
        let mut state = self.state();
        if state.take_failure() {
            return Err(timeout_error(timeout));
        }
        state.pending.pop_front().ok_or_else(|| timeout_error(timeout))
    }

    fn reset(&mut self) -> BoardResult<()> {
        let mut state = self.state();
        state.resets += 1;
        state.pending.clear();
        state.i2c_enabled = false;
        state.i2c = I2cEngine::default();
        state.spi = SpiEngine::default();
        Ok(())
    }
}

fn timeout_error(timeout: Duration) -> BoardError {
    BoardError::Timeout {
        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hkusbio_protocol::{
        I2cStart, build_i2c_init, build_i2c_slave_ack, build_i2c_start, build_i2c_write,
        build_sfr_get_register, build_sfr_set_bit, build_sfr_set_register,
    };

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const TIMEOUT: Duration = Duration::from_millis(100);

    fn set_bit(sim: &mut SimulatedBoard, sfr: Sfr, index: u8, value: bool) -> TestResult {
        let frame = build_sfr_set_bit(sfr.address(), index, value)?;
        sim.exchange(&frame, TIMEOUT)?;
        Ok(())
    }

    #[test]
    fn test_latch_write_mirrors_port() -> TestResult {
        let mut sim = SimulatedBoard::new();
        sim.exchange(&build_sfr_set_register(Sfr::LatB.address(), 0x5A), TIMEOUT)?;
        assert_eq!(sim.sfr(Sfr::PortB.address()), 0x5A);
        Ok(())
    }

    #[test]
    fn test_receive_without_pending_reply_times_out() {
        let mut sim = SimulatedBoard::new();
        assert!(matches!(
            sim.receive(TIMEOUT),
            Err(BoardError::Timeout { timeout_ms: 100 })
        ));
    }

    #[test]
    fn test_shift_register_clocks_on_rising_edges() -> TestResult {
        let mut sim = SimulatedBoard::new();
        // shift in 1, 0, 1 then latch
        for ser in [true, false, true] {
            set_bit(&mut sim, Sfr::LatD, SR_SRCLK_BIT, false)?;
            set_bit(&mut sim, Sfr::LatD, SR_SER_BIT, ser)?;
            set_bit(&mut sim, Sfr::LatD, SR_SRCLK_BIT, true)?;
        }
        set_bit(&mut sim, Sfr::LatD, SR_RCLK_BIT, true)?;
        assert_eq!(sim.shift_register_output(), Some(0b101));

        set_bit(&mut sim, Sfr::LatD, SR_OE_BIT, true)?;
        assert_eq!(sim.shift_register_output(), None);
        Ok(())
    }

    #[test]
    fn test_mssp_transfer_sets_and_clears_bf() -> TestResult {
        let mut sim = SimulatedBoard::new();
        sim.set_spi_register(0x0F, 0xD3);
        set_bit(&mut sim, Sfr::LatA, SFR_SPI_CS_BIT, true)?;
        sim.exchange(&build_sfr_set_register(Sfr::Ssp1Con1.address(), SSPEN), TIMEOUT)?;
        set_bit(&mut sim, Sfr::LatA, SFR_SPI_CS_BIT, false)?;

        sim.exchange(&build_sfr_set_register(Sfr::Ssp1Buf.address(), 0x8F), TIMEOUT)?;
        assert_eq!(sim.sfr(Sfr::Ssp1Stat.address()) & BF, BF);
        sim.exchange(&build_sfr_get_register(Sfr::Ssp1Buf.address()), TIMEOUT)?;
        assert_eq!(sim.sfr(Sfr::Ssp1Stat.address()) & BF, 0);

        sim.exchange(&build_sfr_set_register(Sfr::Ssp1Buf.address(), 0x00), TIMEOUT)?;
        let reply = sim.exchange(&build_sfr_get_register(Sfr::Ssp1Buf.address()), TIMEOUT)?;
        assert_eq!(reply.value(), 0xD3);
        Ok(())
    }

    #[test]
    fn test_i2c_traffic_before_init_is_not_acknowledged() -> TestResult {
        let mut sim = SimulatedBoard::new();
        sim.add_i2c_slave(0x69, SimI2cSlave::new());

        sim.send(&build_i2c_start(I2cStart::Start), TIMEOUT)?;
        sim.send(&build_i2c_write(0xD2), TIMEOUT)?;
        assert!(!sim.exchange(&build_i2c_slave_ack(), TIMEOUT)?.slave_acked());

        sim.send(&build_i2c_init(), TIMEOUT)?;
        assert!(sim.i2c_enabled());
        sim.send(&build_i2c_start(I2cStart::Start), TIMEOUT)?;
        sim.send(&build_i2c_write(0xD2), TIMEOUT)?;
        assert!(sim.exchange(&build_i2c_slave_ack(), TIMEOUT)?.slave_acked());

        sim.reset()?;
        assert!(!sim.i2c_enabled());
        Ok(())
    }

    #[test]
    fn test_unknown_opcode_gets_no_reply() {
        let sim = SimulatedBoard::new();
        let mut state = sim.state();
        assert!(state.execute(&[0x9C, 0x00]).is_none());
        assert!(state.execute(&[0x85]).is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let sim = SimulatedBoard::new();
        let other = sim.clone();
        other.set_switch_pressed(true);
        other.push_uart_rx(b"x");
        assert!(sim.state().switch_pressed);
        assert_eq!(sim.state().uart_rx.len(), 1);
    }
}
