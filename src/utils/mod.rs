//! Supporting utilities.

pub mod logging;
