use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};
mod auto_ack;
pub(crate) mod bit_fields;
mod channel;
mod constants;
mod data_rate;
mod fifo;
mod init;
mod pa_level;
mod pipe;
mod power;
mod radio;
mod status;
mod transaction;
pub use constants::{commands, mnemonics, registers};
use bit_fields::Feature;

use crate::{RadioState, StatusFlags};

/// A collection of error types to describe hardware malfunctions
/// and misuse of the driver's API.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nrf24Error<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput error (from either the CE or CSN pin).
    Gpo(DO),
    /// Represents a corruption of binary data (as it was transferred over the SPI bus' MISO)
    BinaryCorruption,
    /// A parameter was out of the range the radio supports
    /// (eg. a pipe number above 5 or a payload longer than 32 bytes).
    ///
    /// Nothing is written to the radio when this is returned.
    InvalidArgument,
    /// The operation is not allowed in the radio's current [`RadioState`].
    InvalidState,
    /// The TX FIFO already holds 3 payloads.
    TxFifoFull,
    /// The given buffer cannot hold the available payload.
    BufferTooSmall,
    /// A bounded wait ran out of attempts before the awaited event occurred.
    Timeout,
}

#[cfg(feature = "defmt")]
impl<SPI, DO> defmt::Format for Nrf24Error<SPI, DO> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Nrf24Error::Spi(_) => defmt::write!(fmt, "SPI error"),
            Nrf24Error::Gpo(_) => defmt::write!(fmt, "GPIO error"),
            Nrf24Error::BinaryCorruption => defmt::write!(fmt, "binary corruption"),
            Nrf24Error::InvalidArgument => defmt::write!(fmt, "invalid argument"),
            Nrf24Error::InvalidState => defmt::write!(fmt, "invalid state"),
            Nrf24Error::TxFifoFull => defmt::write!(fmt, "TX FIFO full"),
            Nrf24Error::BufferTooSmall => defmt::write!(fmt, "buffer too small"),
            Nrf24Error::Timeout => defmt::write!(fmt, "timeout"),
        }
    }
}

/// This struct implements the [`Esb*` traits](mod@crate::radio::prelude)
/// for the nRF24L01 transceiver.
///
/// Unlike drivers built on an [`SpiDevice`](trait@embedded_hal::spi::SpiDevice),
/// this driver owns the radio's CSN pin and brackets every
/// SPI transaction itself. One instance should exist per physical radio.
///
/// The register access API (see [`NRF24L01::read_register()`] and friends)
/// is public for advanced usage.
pub struct NRF24L01<SPI, DO, DELAY> {
    _spi: SPI,
    _ce_pin: DO,
    _csn_pin: DO,
    _delay_impl: DELAY,
    _buf: [u8; 33],
    _status: StatusFlags,
    _state: RadioState,
    _feature: Feature,
}

impl<SPI, DO, DELAY> NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// The most bytes any payload (or command frame data) can have.
    pub const MAX_PAYLOAD_SIZE: usize = 32;

    /// Instantiate a [`NRF24L01`] object for use on the specified
    /// `spi` bus with the given `ce_pin` and `csn_pin`.
    ///
    /// No pins are driven until [`init()`](fn@crate::radio::prelude::EsbInit::init)
    /// is called. Until then, the driver assumes the radio is powered down.
    pub fn new(ce_pin: DO, csn_pin: DO, spi: SPI, delay_impl: DELAY) -> NRF24L01<SPI, DO, DELAY> {
        NRF24L01 {
            _spi: spi,
            _ce_pin: ce_pin,
            _csn_pin: csn_pin,
            _delay_impl: delay_impl,
            _buf: [0u8; 33],
            _status: StatusFlags::from_bits(0),
            _state: RadioState::PowerDown,
            _feature: Feature::from_bits(0),
        }
    }

    /// Release the bus, pins and delay implementation.
    pub fn free(self) -> (SPI, DO, DO, DELAY) {
        (self._spi, self._ce_pin, self._csn_pin, self._delay_impl)
    }

    /// The radio's state as last driven by this library.
    pub fn state(&self) -> RadioState {
        self._state
    }

    fn ce_high(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._ce_pin.set_high().map_err(Nrf24Error::Gpo)
    }

    fn ce_low(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._ce_pin.set_low().map_err(Nrf24Error::Gpo)
    }

    fn set_state(&mut self, state: RadioState) {
        #[cfg(feature = "defmt")]
        if self._state != state {
            defmt::debug!("nRF24L01 state {} -> {}", self._state, state);
        }
        self._state = state;
    }

    /// Check whether there is an RF carrier on the current channel.
    ///
    /// On the nRF24L01+ this reads the Received Power Detector (signals above -64 dBm).
    pub fn carrier_detect(&mut self) -> Result<bool, Nrf24Error<SPI::Error, DO::Error>> {
        Ok(self.read_register(registers::CD)? & 1 == 1)
    }
}
