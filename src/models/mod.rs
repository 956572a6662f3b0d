pub mod feed;
pub mod side;
pub mod timeframe;
pub mod trade;

pub use feed::{AccountSnapshot, RawCode, RawDeal, RawTime, ReportInput, TradeFeed};
pub use side::{EntryFlag, Side};
pub use timeframe::TimeframeBand;
pub use trade::{Trade, TradeSeries};
