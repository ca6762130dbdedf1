//! Domain types for rlab

pub mod position;
pub mod series;
pub mod signal;
pub mod timeframe;
pub mod trade;

pub use position::Position;
pub use series::{PriceSeries, SeriesError};
pub use signal::{Direction, Signal};
pub use timeframe::{Timeframe, TimeframeError};
pub use trade::{ExitReason, TradeRecord};
