//! The SPI transaction layer and the register access API built on it.
//!
//! Every transaction follows the same shape:
//!
//! 1. CSN is driven low.
//! 2. The opcode and any data bytes are exchanged in one full-duplex transfer.
//!    The first byte clocked out of the radio is always the STATUS register.
//! 3. The bus is flushed and CSN is driven high.
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use super::{commands, Nrf24Error, NRF24L01};
use crate::StatusFlags;

impl<SPI, DO, DELAY> NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Exchange the first `len` bytes of the internal buffer.
    ///
    /// CSN is released even if the bus reports an error.
    /// A bus error takes precedence over a failure to release CSN.
    fn spi_transfer(&mut self, len: usize) -> Result<StatusFlags, Nrf24Error<SPI::Error, DO::Error>> {
        self._csn_pin.set_low().map_err(Nrf24Error::Gpo)?;
        let result = self
            ._spi
            .transfer_in_place(&mut self._buf[..len])
            .and_then(|_| self._spi.flush());
        let released = self._csn_pin.set_high();
        result.map_err(Nrf24Error::Spi)?;
        released.map_err(Nrf24Error::Gpo)?;
        self._status = StatusFlags::from_bits(self._buf[0]);
        Ok(self._status)
    }

    /// Send `command` followed by `len` NOP bytes.
    ///
    /// The bytes clocked out are left in `self._buf[1..=len]`.
    /// This is also used to write SPI commands that consist of 1 byte:
    /// ```ignore
    /// self.spi_read(0, commands::FLUSH_TX)?;
    /// ```
    pub(super) fn spi_read(
        &mut self,
        len: usize,
        command: u8,
    ) -> Result<StatusFlags, Nrf24Error<SPI::Error, DO::Error>> {
        if len > Self::MAX_PAYLOAD_SIZE {
            return Err(Nrf24Error::InvalidArgument);
        }
        self._buf[0] = command;
        self._buf[1..=len].fill(commands::NOP);
        self.spi_transfer(len + 1)
    }

    /// Send `command` followed by the bytes in `data`.
    pub(super) fn spi_write_buf(
        &mut self,
        command: u8,
        data: &[u8],
    ) -> Result<StatusFlags, Nrf24Error<SPI::Error, DO::Error>> {
        let len = data.len();
        if len > Self::MAX_PAYLOAD_SIZE {
            return Err(Nrf24Error::InvalidArgument);
        }
        self._buf[0] = command;
        self._buf[1..=len].copy_from_slice(data);
        self.spi_transfer(len + 1)
    }

    /// Send any command (with optional data) to the radio.
    ///
    /// Pass an empty `payload` for commands that have no data, like
    /// [`commands::FLUSH_TX`] or [`commands::NOP`].
    /// Returns the STATUS byte clocked out during the opcode.
    ///
    /// A `payload` longer than 32 bytes is rejected with [`Nrf24Error::InvalidArgument`].
    pub fn send_command(
        &mut self,
        opcode: u8,
        payload: &[u8],
    ) -> Result<StatusFlags, Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_write_buf(opcode, payload)
    }

    /// Send any command and clock the radio's response into `buf`.
    ///
    /// One NOP byte is sent for every byte of `buf`.
    /// This is how payloads ([`commands::R_RX_PAYLOAD`]) and
    /// payload widths ([`commands::R_RX_PL_WID`]) are fetched.
    pub fn send_recv_command(
        &mut self,
        opcode: u8,
        buf: &mut [u8],
    ) -> Result<StatusFlags, Nrf24Error<SPI::Error, DO::Error>> {
        let len = buf.len();
        let status = self.spi_read(len, opcode)?;
        buf.copy_from_slice(&self._buf[1..=len]);
        Ok(status)
    }

    /// Write a single byte to a register.
    pub fn write_register(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = commands::W_REGISTER | (register & commands::REGISTER_MASK);
        self._buf[1] = value;
        self.spi_transfer(2)?;
        Ok(())
    }

    /// Write multiple bytes to a register (eg. a pipe address).
    ///
    /// Multi-byte registers are written LSByte first.
    pub fn write_register_multi(
        &mut self,
        register: u8,
        buf: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_write_buf(
            commands::W_REGISTER | (register & commands::REGISTER_MASK),
            buf,
        )?;
        Ok(())
    }

    /// Read a single byte from a register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(1, commands::R_REGISTER | (register & commands::REGISTER_MASK))?;
        Ok(self._buf[1])
    }

    /// Read `buf.len()` bytes from a register.
    ///
    /// Returns the STATUS byte clocked out during the opcode.
    pub fn read_register_multi(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> Result<StatusFlags, Nrf24Error<SPI::Error, DO::Error>> {
        self.send_recv_command(commands::R_REGISTER | (register & commands::REGISTER_MASK), buf)
    }
}
