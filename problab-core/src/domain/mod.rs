//! Domain types for ProbLab

pub mod equity;
pub mod observation;
pub mod trade;

pub use equity::{equity_values, EquityPoint};
pub use observation::DailyObservation;
pub use trade::TradeRecord;
