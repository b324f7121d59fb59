pub mod data_packet;
pub mod direction;
pub mod trade_setup;

pub use data_packet::{DataPacket, PriceLevel};
pub use direction::*;
pub use trade_setup::{TpLevel, TradeSetup};
