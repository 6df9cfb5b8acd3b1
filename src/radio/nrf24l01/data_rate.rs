use super::{bit_fields::RfSetup, registers};
use crate::radio::{prelude::EsbDataRate, Nrf24Error, NRF24L01};
use crate::DataRate;
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

impl<SPI, DO, DELAY> EsbDataRate for NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type DataRateErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Returns [`Nrf24Error::BinaryCorruption`] if the reserved
    /// bit combination (both RF_DR_LOW and RF_DR_HIGH set) is read.
    fn get_data_rate(&mut self) -> Result<DataRate, Self::DataRateErrorType> {
        let rf_setup = self.read_register(registers::RF_SETUP)?;
        if rf_setup & DataRate::MASK == DataRate::MASK {
            return Err(Nrf24Error::BinaryCorruption);
        }
        Ok(DataRate::from_bits(rf_setup))
    }

    fn set_data_rate(&mut self, data_rate: DataRate) -> Result<(), Self::DataRateErrorType> {
        let rf_setup = RfSetup::from_bits(self.read_register(registers::RF_SETUP)?);
        self.write_register(
            registers::RF_SETUP,
            rf_setup.with_data_rate(data_rate).into_bits(),
        )
    }
}
