use super::registers;
use crate::radio::{prelude::EsbChannel, Nrf24Error, NRF24L01};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

impl<SPI, DO, DELAY> EsbChannel for NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ChannelErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// The RF_CH register holds a 7 bit value.
    /// A `channel` above 127 is rejected with [`Nrf24Error::InvalidArgument`].
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelErrorType> {
        if channel > 127 {
            return Err(Nrf24Error::InvalidArgument);
        }
        self.write_register(registers::RF_CH, channel)
    }

    /// See also [`NRF24L01::set_channel()`].
    fn get_channel(&mut self) -> Result<u8, Self::ChannelErrorType> {
        Ok(self.read_register(registers::RF_CH)? & 0x7F)
    }
}
