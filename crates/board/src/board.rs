//! Primitive board operations.
//!
//! Each method is one firmware command. Commands the firmware answers are
//! sent as a request/reply exchange; the rest are written and not read back,
//! since the firmware never queues a reply for them.

use std::thread::sleep;
use std::time::Duration;

use hkusbio_protocol::{
    AdcChannel, ChipSelect, CommandFrame, Direction, GpioPin, I2cAck, I2cStart, Reply, SfrBit,
    SpiBaud, SpiMode, SpiSample, build_adc_read, build_gpio_direction, build_gpio_read,
    build_gpio_write, build_i2c_data_ready, build_i2c_idle, build_i2c_init, build_i2c_master_ack,
    build_i2c_read, build_i2c_slave_ack, build_i2c_start, build_i2c_stop, build_i2c_write,
    build_read_switch, build_rom_version, build_sfr_get_bit, build_sfr_get_register,
    build_sfr_set_bit, build_sfr_set_register, build_spi_chip_select, build_spi_init,
    build_spi_transfer, build_toggle_led, build_uart_get_char, build_uart_has_char,
    build_uart_put_char, build_uart_put_str,
};
use tracing::{debug, trace, warn};

use crate::config::BoardConfig;
use crate::error::BoardResult;
use crate::transport::Transport;
use crate::usb::UsbTransport;

/// An open HKUSBIO board.
///
/// The board exclusively owns its transport. [`Board::close`] consumes it,
/// so no operation can be issued on a closed handle.
pub struct Board<T: Transport> {
    transport: T,
    config: BoardConfig,
}

impl Board<UsbTransport> {
    /// Open the first attached board over USB.
    pub fn open(config: BoardConfig) -> BoardResult<Self> {
        Self::open_nth(0, config)
    }

    /// Open the `nth` attached board over USB.
    pub fn open_nth(nth: usize, config: BoardConfig) -> BoardResult<Self> {
        config.validate()?;
        let transport = UsbTransport::open_nth(nth)?;
        Ok(Self { transport, config })
    }
}

impl<T: Transport> Board<T> {
    /// Wrap an already-open transport.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `config` does not validate.
    pub fn new(transport: T, config: BoardConfig) -> BoardResult<Self> {
        config.validate()?;
        Ok(Self { transport, config })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Reset the device and release it.
    pub fn close(mut self) -> BoardResult<()> {
        debug!("closing board");
        self.transport.reset()
    }

    /// Block for `duration`; zero durations return immediately.
    pub fn delay(&self, duration: Duration) {
        if !duration.is_zero() {
            sleep(duration);
        }
    }

    fn send(&mut self, frame: CommandFrame) -> BoardResult<()> {
        trace!(?frame, "send");
        self.transport.send(&frame, self.config.usb_timeout())
    }

    fn query(&mut self, frame: CommandFrame) -> BoardResult<Reply> {
        trace!(?frame, "query");
        let reply = self.transport.exchange(&frame, self.config.usb_timeout())?;
        trace!(?reply, "reply");
        if reply.echo() != frame.opcode().to_u8() {
            warn!(
                opcode = frame.opcode().to_u8(),
                echo = reply.echo(),
                "reply does not echo the command opcode"
            );
        }
        Ok(reply)
    }

    /// Firmware ROM version, e.g. `"1.00"`.
    pub fn rom_version(&mut self) -> BoardResult<String> {
        Ok(self.query(build_rom_version())?.rom_version())
    }

    pub fn toggle_led(&mut self) -> BoardResult<()> {
        self.send(build_toggle_led())
    }

    /// Returns `true` while the on-board push button is held down.
    pub fn read_switch(&mut self) -> BoardResult<bool> {
        Ok(self.query(build_read_switch())?.switch_pressed())
    }

    pub fn gpio_set_direction(&mut self, pin: GpioPin, direction: Direction) -> BoardResult<()> {
        self.send(build_gpio_direction(pin, direction))
    }

    pub fn gpio_write(&mut self, pin: GpioPin, high: bool) -> BoardResult<()> {
        self.send(build_gpio_write(pin, high))
    }

    pub fn gpio_read(&mut self, pin: GpioPin) -> BoardResult<bool> {
        Ok(self.query(build_gpio_read(pin))?.flag())
    }

    /// 10-bit conversion result of the selected analog input.
    pub fn adc_read(&mut self, channel: AdcChannel) -> BoardResult<u16> {
        Ok(self.query(build_adc_read(channel))?.adc_value())
    }

    pub fn uart_has_char(&mut self) -> BoardResult<bool> {
        Ok(self.query(build_uart_has_char())?.flag())
    }

    /// Next received UART byte, or `None` if the receive buffer is empty.
    pub fn uart_get_char(&mut self) -> BoardResult<Option<u8>> {
        Ok(self.query(build_uart_get_char())?.uart_char())
    }

    pub fn uart_put_char(&mut self, ch: u8) -> BoardResult<()> {
        self.send(build_uart_put_char(ch))
    }

    /// Send a string out of the UART.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the text does not fit one frame or
    /// contains a NUL byte.
    pub fn uart_put_str(&mut self, text: &str) -> BoardResult<()> {
        self.uart_put_bytes(text.as_bytes())
    }

    /// Send raw bytes out of the UART, e.g. serial LCD control codes.
    pub fn uart_put_bytes(&mut self, bytes: &[u8]) -> BoardResult<()> {
        let frame = build_uart_put_str(bytes)?;
        self.send(frame)
    }

    pub fn sfr_get_register(&mut self, register: impl Into<u8>) -> BoardResult<u8> {
        Ok(self.query(build_sfr_get_register(register.into()))?.value())
    }

    pub fn sfr_set_register(&mut self, register: impl Into<u8>, value: u8) -> BoardResult<()> {
        self.query(build_sfr_set_register(register.into(), value))?;
        Ok(())
    }

    pub fn sfr_get_bit(&mut self, register: impl Into<u8>, bit: u8) -> BoardResult<bool> {
        let frame = build_sfr_get_bit(register.into(), bit)?;
        Ok(self.query(frame)?.flag())
    }

    pub fn sfr_set_bit(&mut self, register: impl Into<u8>, bit: u8, value: bool) -> BoardResult<()> {
        let frame = build_sfr_set_bit(register.into(), bit, value)?;
        self.query(frame)?;
        Ok(())
    }

    /// Read a named control bit.
    pub fn sfr_read_flag(&mut self, bit: SfrBit) -> BoardResult<bool> {
        self.sfr_get_bit(bit.register(), bit.index())
    }

    /// Write a named control bit.
    pub fn sfr_write_flag(&mut self, bit: SfrBit, value: bool) -> BoardResult<()> {
        self.sfr_set_bit(bit.register(), bit.index(), value)
    }

    pub fn i2c_init(&mut self) -> BoardResult<()> {
        self.send(build_i2c_init())
    }

    pub fn i2c_idle(&mut self) -> BoardResult<()> {
        self.send(build_i2c_idle())
    }

    pub fn i2c_start(&mut self, kind: I2cStart) -> BoardResult<()> {
        self.send(build_i2c_start(kind))
    }

    pub fn i2c_stop(&mut self) -> BoardResult<()> {
        self.send(build_i2c_stop())
    }

    pub fn i2c_write(&mut self, byte: u8) -> BoardResult<()> {
        self.send(build_i2c_write(byte))
    }

    pub fn i2c_read(&mut self) -> BoardResult<u8> {
        Ok(self.query(build_i2c_read())?.value())
    }

    pub fn i2c_master_ack(&mut self, ack: I2cAck) -> BoardResult<()> {
        self.send(build_i2c_master_ack(ack))
    }

    /// Returns `true` once the addressed slave has acknowledged.
    pub fn i2c_slave_ack(&mut self) -> BoardResult<bool> {
        Ok(self.query(build_i2c_slave_ack())?.slave_acked())
    }

    pub fn i2c_data_ready(&mut self) -> BoardResult<bool> {
        Ok(self.query(build_i2c_data_ready())?.flag())
    }

    pub fn spi_init(&mut self, mode: SpiMode, baud: SpiBaud, sample: SpiSample) -> BoardResult<()> {
        self.send(build_spi_init(mode, baud, sample))
    }

    pub fn spi_chip_select(&mut self, select: ChipSelect) -> BoardResult<()> {
        self.send(build_spi_chip_select(select))
    }

    /// Shift `byte` out and return the byte shifted in.
    pub fn spi_transfer(&mut self, byte: u8) -> BoardResult<u8> {
        Ok(self.query(build_spi_transfer(byte))?.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::sim::SimulatedBoard;
    use hkusbio_protocol::{Opcode, Sfr};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn board() -> (SimulatedBoard, Board<SimulatedBoard>) {
        let sim = SimulatedBoard::new();
        let board = Board::new(sim.clone(), BoardConfig::immediate());
        (sim, board.unwrap_or_else(|err| panic!("valid config: {err}")))
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BoardConfig {
            usb_timeout_ms: 0,
            ..BoardConfig::default()
        };
        let result = Board::new(SimulatedBoard::new(), config);
        assert!(matches!(result, Err(BoardError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_rom_version() -> TestResult {
        let (_, mut board) = board();
        assert_eq!(board.rom_version()?, "1.00");
        Ok(())
    }

    #[test]
    fn test_switch_and_led() -> TestResult {
        let (sim, mut board) = board();
        assert!(!board.read_switch()?);
        sim.set_switch_pressed(true);
        assert!(board.read_switch()?);

        board.toggle_led()?;
        board.toggle_led()?;
        board.toggle_led()?;
        assert!(sim.led_on());
        Ok(())
    }

    #[test]
    fn test_gpio_round_trip() -> TestResult {
        let (sim, mut board) = board();
        board.gpio_set_direction(GpioPin::Rd5, Direction::Output)?;
        board.gpio_write(GpioPin::Rd5, true)?;
        assert!(sim.gpio_level(GpioPin::Rd5));
        assert!(board.gpio_read(GpioPin::Rd5)?);

        board.gpio_write(GpioPin::Rd5, false)?;
        assert!(!board.gpio_read(GpioPin::Rd5)?);
        Ok(())
    }

    #[test]
    fn test_gpio_write_frame_carries_level() -> TestResult {
        let (sim, mut board) = board();
        board.gpio_write(GpioPin::Rd6, false)?;
        let frames = sim.frames();
        assert_eq!(frames.last().map(Vec::as_slice), Some(&[0x83, 3, 0][..]));
        Ok(())
    }

    #[test]
    fn test_adc_read() -> TestResult {
        let (sim, mut board) = board();
        sim.set_adc(AdcChannel::Ra0, 0x3FF);
        sim.set_adc(AdcChannel::Ra1, 0x120);
        assert_eq!(board.adc_read(AdcChannel::Ra0)?, 0x3FF);
        assert_eq!(board.adc_read(AdcChannel::Ra1)?, 0x120);
        Ok(())
    }

    #[test]
    fn test_uart() -> TestResult {
        let (sim, mut board) = board();
        assert!(!board.uart_has_char()?);
        assert_eq!(board.uart_get_char()?, None);

        sim.push_uart_rx(b"ok");
        assert!(board.uart_has_char()?);
        assert_eq!(board.uart_get_char()?, Some(b'o'));
        assert_eq!(board.uart_get_char()?, Some(b'k'));

        board.uart_put_char(b'>')?;
        board.uart_put_str("hello")?;
        assert_eq!(sim.uart_tx(), b">hello");
        Ok(())
    }

    #[test]
    fn test_uart_put_str_rejects_nul() {
        let (_, mut board) = board();
        assert!(matches!(
            board.uart_put_str("a\0b"),
            Err(BoardError::Protocol(_))
        ));
    }

    #[test]
    fn test_sfr_register_and_bits() -> TestResult {
        let (sim, mut board) = board();
        board.sfr_set_register(Sfr::GpRam1, 0xA5)?;
        assert_eq!(board.sfr_get_register(Sfr::GpRam1)?, 0xA5);
        assert_eq!(sim.sfr(Sfr::GpRam1.address()), 0xA5);

        board.sfr_set_bit(Sfr::GpRam2, 3, true)?;
        assert!(board.sfr_get_bit(Sfr::GpRam2, 3)?);
        assert_eq!(board.sfr_get_register(Sfr::GpRam2)?, 0x08);

        board.sfr_write_flag(SfrBit::Vrefcon1Dacen, true)?;
        assert!(board.sfr_read_flag(SfrBit::Vrefcon1Dacen)?);
        assert_eq!(sim.sfr(Sfr::Vrefcon1.address()), 0x80);
        Ok(())
    }

    #[test]
    fn test_sfr_bit_index_checked_before_sending() {
        let (sim, mut board) = board();
        let result = board.sfr_set_bit(Sfr::LatD, 8, true);
        assert!(matches!(result, Err(BoardError::Protocol(_))));
        assert!(sim.frames().is_empty());
    }

    #[test]
    fn test_no_reply_commands_are_send_only() -> TestResult {
        let (sim, mut board) = board();
        board.toggle_led()?;
        board.i2c_init()?;
        board.spi_chip_select(ChipSelect::Enable)?;
        let frames = sim.frames();
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| {
            Opcode::from_u8(f[0]).map(|op| !op.expects_reply()).unwrap_or(false)
        }));
        Ok(())
    }

    #[test]
    fn test_timeout_surfaces() {
        let (sim, mut board) = board();
        sim.fail_next_transfers(1);
        assert!(matches!(
            board.adc_read(AdcChannel::Ra0),
            Err(BoardError::Timeout { timeout_ms: 100 })
        ));
    }

    #[test]
    fn test_close_resets_device() -> TestResult {
        let (sim, board) = board();
        board.close()?;
        assert_eq!(sim.reset_count(), 1);
        Ok(())
    }
}
