use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use super::{bit_fields::RfSetup, registers};
use crate::radio::{prelude::EsbPaLevel, Nrf24Error, NRF24L01};
use crate::PaLevel;

impl<SPI, DO, DELAY> EsbPaLevel for NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PaLevelErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn get_pa_level(&mut self) -> Result<PaLevel, Self::PaLevelErrorType> {
        Ok(PaLevel::from_bits(self.read_register(registers::RF_SETUP)?))
    }

    fn set_pa_level(&mut self, pa_level: PaLevel) -> Result<(), Self::PaLevelErrorType> {
        let rf_setup = RfSetup::from_bits(self.read_register(registers::RF_SETUP)?);
        self.write_register(
            registers::RF_SETUP,
            rf_setup.with_pa_level(pa_level).into_bits(),
        )
    }
}

impl<SPI, DO, DELAY> NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Enable or disable the Low Noise Amplifier gain (RF_SETUP bit 0).
    ///
    /// This only has an effect on the original nRF24L01 (not the plus variant).
    pub fn set_lna(&mut self, enable: bool) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let rf_setup = RfSetup::from_bits(self.read_register(registers::RF_SETUP)?);
        self.write_register(
            registers::RF_SETUP,
            rf_setup.with_lna_hcurr(enable).into_bits(),
        )
    }
}
