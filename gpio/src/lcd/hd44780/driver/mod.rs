//! HD44780 instruction set and driver interface.
//!
//! See [HD44780Driver] for the raw instructions, and [GpioHD44780Driver] for the stateful driver
//! talking to the controller over GPIO pins.

mod gpio;

use crate::{GpioError, GpioResult};
use bitflags::bitflags;
pub use gpio::*;
use std::fmt::Debug;
use std::time::Duration;

/// Clears the display and sets the DDRAM address to 0.
pub const CLEAR_DISPLAY: u8 = 0x01;
/// Sets the DDRAM address to 0 and unshifts the display.
pub const RETURN_HOME: u8 = 0x02;
pub const ENTRY_MODE_SET: u8 = 0x04;
pub const DISPLAY_CONTROL: u8 = 0x08;
pub const CURSOR_SHIFT: u8 = 0x10;
pub const FUNCTION_SET: u8 = 0x20;
pub const SET_CGRAM_ADDRESS: u8 = 0x40;
pub const SET_DDRAM_ADDRESS: u8 = 0x80;

/// Time the controller needs to execute an ordinary instruction or data write.
///
/// The datasheet gives 37 µs (43 µs for data writes) at 270 kHz; slower oscillators need more.
pub const COMMAND_SETTLE: Duration = Duration::from_micros(100);
/// Additional time needed by [CLEAR_DISPLAY] and [RETURN_HOME], on top of [COMMAND_SETTLE].
pub const CLEAR_SETTLE: Duration = Duration::from_millis(2);
/// Minimum width of the enable pulse.
pub const ENABLE_PULSE: Duration = Duration::from_micros(1);
/// Time for VCC to rise and the controller to run its own reset after power on.
pub const POWER_ON_DELAY: Duration = Duration::from_millis(50);

bitflags! {
    /// Entry mode register, sent with [ENTRY_MODE_SET].
    pub struct EntryFlags: u8 {
        /// Cursor moves right after each write (I/D bit). Cleared, text flows right to left.
        const ENTRY_LEFT            = 0b0000_0010;
        /// The display shifts on each write (S bit), keeping the cursor in place.
        const ENTRY_SHIFT_INCREMENT = 0b0000_0001;
    }
}

bitflags! {
    /// Display on/off control register, sent with [DISPLAY_CONTROL].
    pub struct ControlFlags: u8 {
        const DISPLAY_ON = 0b0000_0100;
        const CURSOR_ON  = 0b0000_0010;
        const BLINK_ON   = 0b0000_0001;
    }
}

bitflags! {
    /// Arguments of the one-shot [CURSOR_SHIFT] instruction.
    pub struct ShiftFlags: u8 {
        /// Shift the whole display instead of moving the cursor.
        const DISPLAY_MOVE = 0b0000_1000;
        const MOVE_RIGHT   = 0b0000_0100;
    }
}

bitflags! {
    /// Function set register, sent with [FUNCTION_SET].
    pub struct FunctionFlags: u8 {
        // DL (bit 4) stays clear, the bus is always 4-bit
        const TWO_LINES = 0b0000_1000;
        const DOTS_5X10 = 0b0000_0100;
    }
}

/// Font of the display.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CharacterSize {
    /// 5x8 dots, the only font supported by two-line displays.
    #[default]
    Dots5x8,
    /// 5x10 dots.
    Dots5x10,
}

impl From<u8> for CharacterSize {
    /// `0` is 5x8, anything else is 5x10.
    fn from(value: u8) -> Self {
        match value {
            0 => CharacterSize::Dots5x8,
            _ => CharacterSize::Dots5x10,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorDirection {
    Left,
    Right,
}

/// Raw HD44780 instruction set.
///
/// Each instruction is a single byte, sent with [HD44780Driver::send_command]. Implementations only
/// have to provide the transport; the encoding of every instruction lives in the default methods.
/// None of these keep state, so toggling a single flag of a register is up to the caller, see
/// [GpioHD44780Driver] for a driver that does.
pub trait HD44780Driver: Debug {
    /// Clears the display and sets the cursor to the home position.
    ///
    /// Command: `00000001`.
    fn clear_display(&mut self) -> GpioResult<()> {
        self.send_command(CLEAR_DISPLAY)?;
        self.wait(CLEAR_SETTLE);
        Ok(())
    }

    /// Sets the cursor to the home position, and shifts the display back to its original position.
    /// DDRAM contents are unchanged.
    ///
    /// Command: `0000001?`.
    fn return_home(&mut self) -> GpioResult<()> {
        self.send_command(RETURN_HOME)?;
        self.wait(CLEAR_SETTLE);
        Ok(())
    }

    /// Replaces the entry mode register.
    ///
    /// Command: `000001IS`.
    fn set_entry_mode(&mut self, flags: EntryFlags) -> GpioResult<()> {
        self.send_command(ENTRY_MODE_SET | flags.bits())
    }

    /// Replaces the display control register.
    ///
    /// Command: `00001DCB`.
    fn set_display_control(&mut self, flags: ControlFlags) -> GpioResult<()> {
        self.send_command(DISPLAY_CONTROL | flags.bits())
    }

    /// Moves the cursor or shifts the display by one in the specified direction.
    ///
    /// Command: `0001DR??`.
    fn cursor_shift(&mut self, display_shift: bool, direction: CursorDirection) -> GpioResult<()> {
        let mut flags = ShiftFlags::empty();
        flags.set(ShiftFlags::DISPLAY_MOVE, display_shift);
        flags.set(ShiftFlags::MOVE_RIGHT, direction == CursorDirection::Right);
        self.send_command(CURSOR_SHIFT | flags.bits())
    }

    /// Replaces the function set register.
    ///
    /// Command: `001DNF??`.
    fn function_set(&mut self, flags: FunctionFlags) -> GpioResult<()> {
        self.send_command(FUNCTION_SET | flags.bits())
    }

    /// Sets the CGRAM address. Subsequent data writes go to the glyph memory.
    fn set_cgram_address(&mut self, address: u8) -> GpioResult<()> {
        if address > 0b00111111 {
            return Err(GpioError::InvalidArgument);
        }
        self.send_command(SET_CGRAM_ADDRESS | address)
    }

    /// Sets the DDRAM address. Subsequent data writes go to the display memory.
    fn set_ddram_address(&mut self, address: u8) -> GpioResult<()> {
        if address > 0b01111111 {
            return Err(GpioError::InvalidArgument);
        }
        self.send_command(SET_DDRAM_ADDRESS | address)
    }

    // Low-level commands, implemented by the transport.

    /// Sends a command to the HD44780 controller.
    /// Sets the RS pin to 0 (command).
    fn send_command(&mut self, command: u8) -> GpioResult<()>;

    /// Sends data to the HD44780 controller.
    /// Sets the RS pin to 1 (data).
    fn send_data(&mut self, data: u8) -> GpioResult<()>;

    /// Blocks for at least the given duration.
    fn wait(&mut self, duration: Duration);
}
