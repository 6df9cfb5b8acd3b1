use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use crate::{
    radio::{prelude::EsbPower, Nrf24Error, NRF24L01},
    RadioState,
};

use super::{mnemonics, registers};

impl<SPI, DO, DELAY> NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Time (Tpd2stby) for the crystal oscillator to start after leaving power down mode.
    const POWER_UP_DELAY_US: u32 = 1500;
}

impl<SPI, DO, DELAY> EsbPower for NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PowerErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// In power standby mode (when not receiving nor transmitting), the radio
    /// consumes about 26uA (.026mA).
    /// In full power down mode (a sleep state), the radio consumes approximately
    /// 900nA (.0009mA).
    ///
    /// This is allowed from any state.
    fn power_down(&mut self) -> Result<(), Self::PowerErrorType> {
        self.ce_low()?; // Guarantee CE is low on powerDown
        let config = self.read_register(registers::CONFIG)?;
        self.write_register(registers::CONFIG, config & !mnemonics::PWR_UP)?;
        self.set_state(RadioState::PowerDown);
        Ok(())
    }

    /// This does nothing if the radio is already powered up.
    ///
    /// Otherwise, this blocks for 1.5 milliseconds while the radio's crystal
    /// oscillator starts.
    fn power_up(&mut self) -> Result<(), Self::PowerErrorType> {
        if self._state != RadioState::PowerDown {
            return Ok(());
        }
        let config = self.read_register(registers::CONFIG)?;
        self.write_register(registers::CONFIG, config | mnemonics::PWR_UP)?;
        self._delay_impl.delay_us(Self::POWER_UP_DELAY_US);
        self.set_state(RadioState::Standby);
        Ok(())
    }

    /// Is the radio powered up?
    fn is_powered(&self) -> bool {
        self._state != RadioState::PowerDown
    }
}
