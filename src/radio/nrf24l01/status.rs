use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use crate::{
    radio::{prelude::EsbStatus, Nrf24Error, NRF24L01},
    types::StatusFlags,
};

use super::{commands, registers};

impl<SPI, DO, DELAY> EsbStatus for NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type StatusErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// The STATUS register's IRQ flags are cleared by writing a `1` to them.
    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusErrorType> {
        self.write_register(registers::STATUS, flags.into_bits() & StatusFlags::IRQ_MASK)
    }

    fn update(&mut self) -> Result<StatusFlags, Self::StatusErrorType> {
        self.spi_read(0, commands::NOP)
    }

    fn get_status_flags(&self) -> StatusFlags {
        self._status
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{commands, registers, EsbStatus, StatusFlags};
    use crate::{spi_test_expects, test::mk_radio};
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    #[test]
    pub fn update_refreshes_status() {
        let spi_expectations = spi_test_expects![(vec![commands::NOP], vec![0x70u8]),];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin, mut csn_pin) = (mocks.0, mocks.1, mocks.2, mocks.3);
        let flags = radio.update().unwrap();
        assert_eq!(flags, radio.get_status_flags());
        assert!(flags.rx_dr());
        assert!(flags.tx_ds());
        assert!(flags.max_rt());
        spi.done();
        ce_pin.done();
        csn_pin.done();
    }

    #[test]
    pub fn clear_status_flags() {
        let spi_expectations = spi_test_expects![
            // only the IRQ bits are written
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
                vec![0x7Eu8, 0u8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x20u8],
                vec![0x2Eu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin, mut csn_pin) = (mocks.0, mocks.1, mocks.2, mocks.3);
        radio
            .clear_status_flags(StatusFlags::from_bits(0xFF))
            .unwrap();
        radio
            .clear_status_flags(StatusFlags::default().with_tx_ds(true))
            .unwrap();
        // the STATUS byte is captured before the write takes effect
        assert!(radio.get_status_flags().tx_ds());
        spi.done();
        ce_pin.done();
        csn_pin.done();
    }
}
