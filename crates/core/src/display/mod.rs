//! Presentation helpers for the rendering layer. None of them fail: bad input
//! formats to a fixed fallback.

pub mod date;
pub mod html;
pub mod number;

pub use date::format_date;
pub use html::escape_html;
pub use number::{format_pnl, format_price, format_price_value};
