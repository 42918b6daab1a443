pub mod candle;
pub mod early;
pub mod institutional;
pub mod opportunity;
pub mod orderbook;
pub mod turn;

pub use candle::*;
pub use early::*;
pub use institutional::*;
pub use opportunity::*;
pub use orderbook::*;
pub use turn::*;
