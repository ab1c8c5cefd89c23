// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator functions over daily closes.  Undefined
// results are `Option`s or documented numeric defaults, never errors.

pub mod day_change;
pub mod momentum;
pub mod rsi;

pub use day_change::{day_change, period_change};
pub use momentum::{calculate_momentum, MOMENTUM_WINDOW};
pub use rsi::{calculate_rsi, current_rsi, DEFAULT_RSI_PERIOD};
