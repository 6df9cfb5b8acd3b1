//! A `no_std` driver for the nRF24L01(+) 2.4 GHz transceiver,
//! built on the [`embedded-hal`](https://docs.rs/embedded-hal) 1.0 traits.
//!
//! The driver owns the SPI bus and both the CE and CSN pins,
//! so every SPI transaction is framed by the driver itself.
//!
//! ## Register access API
//!
//! - [`NRF24L01::send_command()`](fn@crate::radio::NRF24L01::send_command)
//! - [`NRF24L01::send_recv_command()`](fn@crate::radio::NRF24L01::send_recv_command)
//! - [`NRF24L01::write_register()`](fn@crate::radio::NRF24L01::write_register)
//! - [`NRF24L01::write_register_multi()`](fn@crate::radio::NRF24L01::write_register_multi)
//! - [`NRF24L01::read_register()`](fn@crate::radio::NRF24L01::read_register)
//! - [`NRF24L01::read_register_multi()`](fn@crate::radio::NRF24L01::read_register_multi)
//!
//! ## Device control API
//!
//! The device control API is spread across the traits in [`radio::prelude`].
//!
//! - [`EsbInit`](trait@crate::radio::prelude::EsbInit): `init()`, `with_config()`
//! - [`EsbPower`](trait@crate::radio::prelude::EsbPower): `power_up()`, `power_down()`
//! - [`EsbRadio`](trait@crate::radio::prelude::EsbRadio): RX/TX modes and the
//!   high-level `send_data()`/`read_data()` flow
//! - [`EsbChannel`](trait@crate::radio::prelude::EsbChannel),
//!   [`EsbDataRate`](trait@crate::radio::prelude::EsbDataRate),
//!   [`EsbPaLevel`](trait@crate::radio::prelude::EsbPaLevel): RF settings
//! - [`EsbFifo`](trait@crate::radio::prelude::EsbFifo),
//!   [`EsbPipe`](trait@crate::radio::prelude::EsbPipe),
//!   [`EsbStatus`](trait@crate::radio::prelude::EsbStatus),
//!   [`EsbAutoAck`](trait@crate::radio::prelude::EsbAutoAck)
//!
//! ```ignore
//! use nrf24l01::radio::{prelude::*, NRF24L01};
//! use nrf24l01::PollLimit;
//!
//! let mut radio = NRF24L01::new(ce_pin, csn_pin, spi_bus, delay);
//! radio.init()?;
//! radio.set_channel(76)?;
//! radio.set_tx_address(b"1Node")?;
//! let outcome = radio.send_data(b"Hello", PollLimit::default())?;
//! ```
#![no_std]

mod types;
pub use types::{DataRate, PaLevel, PollLimit, RadioState, StatusFlags, TxOutcome, WaitMode};
pub mod radio;

#[cfg(test)]
mod test {
    extern crate std;
    use crate::radio::NRF24L01;
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction},
        spi::{Mock as SpiMock, Transaction as SpiTransaction},
    };
    use std::vec::Vec;

    /// Takes an indefinite repetition of a tuple of 2 vectors: `(expected_data, response_data)`
    /// and generates an array of `SpiTransaction`s.
    ///
    /// NOTE: This macro is only used to generate code in unit tests (for this crate only).
    #[macro_export]
    macro_rules! spi_test_expects {
        ($( ($expected:expr , $response:expr $(,)? ) , ) + ) => {
            [
                $(
                    SpiTransaction::transfer_in_place($expected, $response),
                    SpiTransaction::flush(),
                )*
            ]
        }
    }

    /// A tuple struct to encapsulate objects used to mock [`NRF24L01`].
    ///
    /// Fields are (radio, SPI bus, CE pin, CSN pin).
    pub struct MockRadio(
        pub NRF24L01<SpiMock<u8>, PinMock, NoopDelay>,
        pub SpiMock<u8>,
        pub PinMock,
        pub PinMock,
    );

    /// Create mock objects using the given expectations.
    ///
    /// The CSN pin expects one low/high pair per SPI transaction, where
    /// `spi_expectations` is generated with [`spi_test_expects!`].
    pub fn mk_radio(
        ce_expectations: &[PinTransaction],
        spi_expectations: &[SpiTransaction<u8>],
    ) -> MockRadio {
        let mut csn_expectations = Vec::new();
        for _ in 0..spi_expectations.len() / 2 {
            csn_expectations.push(PinTransaction::set(PinState::Low));
            csn_expectations.push(PinTransaction::set(PinState::High));
        }
        mk_radio_with_csn(ce_expectations, &csn_expectations, spi_expectations)
    }

    /// Like [`mk_radio()`], but with explicit CSN pin expectations.
    pub fn mk_radio_with_csn(
        ce_expectations: &[PinTransaction],
        csn_expectations: &[PinTransaction],
        spi_expectations: &[SpiTransaction<u8>],
    ) -> MockRadio {
        let spi = SpiMock::new(spi_expectations);
        let ce_pin = PinMock::new(ce_expectations);
        let csn_pin = PinMock::new(csn_expectations);
        let radio = NRF24L01::new(ce_pin.clone(), csn_pin.clone(), spi.clone(), NoopDelay);
        MockRadio(radio, spi, ce_pin, csn_pin)
    }
}
