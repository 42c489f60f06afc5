//! HD44780 LCD module.
//!
//! Only the 4-bit parallel interface is supported, and the busy flag is never read: the R/W pin of
//! the display must be tied to GND, and every instruction is followed by a fixed delay long enough
//! for the slowest controller variants. See [driver::GpioHD44780Driver] for the driver itself and
//! [driver::HD44780Driver] for the raw instruction set.

pub mod driver;
