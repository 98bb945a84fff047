//! clicktrack — derive bars, tempo and lead-in from beat annotations and
//! click along with them.

pub mod beats;
pub mod click;
pub mod config;
