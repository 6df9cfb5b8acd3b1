//! A module to encapsulate all things related to radio operation.
pub mod prelude;

pub(crate) mod nrf24l01;
pub use nrf24l01::{commands, mnemonics, registers, Nrf24Error, NRF24L01};

mod config;
pub use config::RadioConfig;
