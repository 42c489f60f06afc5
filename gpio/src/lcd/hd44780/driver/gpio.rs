use crate::lcd::hd44780::driver::{
    CharacterSize, ControlFlags, CursorDirection, EntryFlags, FunctionFlags, HD44780Driver,
    COMMAND_SETTLE, ENABLE_PULSE, POWER_ON_DELAY,
};
use crate::{GpioResult, PinIo};
use log::{debug, trace, warn};
use std::fmt;
use std::time::Duration;

/// GpioHD44780Driver for HD44780 LCD controller using GPIO pins on a 4-bit bus.
///
/// The controller only accepts whole registers, so the driver keeps a copy of the function set,
/// display control and entry mode registers. Methods toggling a single setting (like
/// [GpioHD44780Driver::cursor] or [GpioHD44780Driver::blink]) update only their own bit in the copy
/// and resend the whole register.
///
/// Every byte is followed by [COMMAND_SETTLE], and the E pin is held high for [ENABLE_PULSE].
/// [GpioHD44780Driver::begin] has to be called before anything else.
#[derive(Debug)]
pub struct GpioHD44780Driver<P: PinIo> {
    io: P,
    pin_rs: usize,
    pin_e: usize,
    data_pins: [usize; 4],

    columns: u8,
    rows: u8,
    character_size: CharacterSize,

    function: FunctionFlags,
    control: ControlFlags,
    entry: EntryFlags,
    initialized: bool,
}

impl<P: PinIo> GpioHD44780Driver<P> {
    /// Creates a new driver for a 16x2 display with a 5x8 font. Doesn't touch the pins.
    ///
    /// # Parameters
    ///
    /// - `io`: The pin I/O used to drive the lines.
    /// - `pin_rs`: Register select pin.
    /// - `pin_e`: Enable pin.
    /// - `data_pins`: D4, D5, D6, D7, in this order. The first one carries the least significant bit
    ///   of each nibble.
    pub fn new(io: P, pin_rs: usize, pin_e: usize, data_pins: [usize; 4]) -> Self {
        GpioHD44780Driver {
            io,
            pin_rs,
            pin_e,
            data_pins,
            columns: 16,
            rows: 2,
            character_size: CharacterSize::Dots5x8,
            function: FunctionFlags::empty(),
            control: ControlFlags::empty(),
            entry: EntryFlags::empty(),
            initialized: false,
        }
    }

    /// Consumes the driver, giving back the pin I/O.
    pub fn release(self) -> P {
        self.io
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn character_size(&self) -> CharacterSize {
        self.character_size
    }

    pub fn function_flags(&self) -> FunctionFlags {
        self.function
    }

    pub fn control_flags(&self) -> ControlFlags {
        self.control
    }

    pub fn entry_flags(&self) -> EntryFlags {
        self.entry
    }

    /// Initializes the controller, switching it to 4-bit mode regardless of the mode it's in.
    ///
    /// Geometry and font are only overridden when given. Afterwards the display is on, the cursor
    /// and blinking are off, text flows left to right and the display is cleared.
    ///
    /// The controller can't tell whether it powered up in 8-bit or 4-bit mode (or halfway through a
    /// 4-bit transfer), so it's sent `0011` three times, which is a valid 8-bit function set in any
    /// case, followed by `0010` to switch to 4 bits. This has to happen exactly once, before any
    /// other method.
    pub fn begin(
        &mut self,
        columns: Option<u8>,
        rows: Option<u8>,
        character_size: Option<CharacterSize>,
    ) -> GpioResult<()> {
        if let Some(columns) = columns {
            self.columns = columns;
        }
        if let Some(rows) = rows {
            self.rows = rows;
        }
        if let Some(character_size) = character_size {
            self.character_size = character_size;
        }

        debug!(
            "Initializing HD44780 {}x{} ({:?}) @ RS: {}, E: {}, Data: {:?}",
            self.columns, self.rows, self.character_size, self.pin_rs, self.pin_e, self.data_pins
        );

        self.io.configure_output(self.pin_rs)?;
        self.io.configure_output(self.pin_e)?;
        for pin in self.data_pins {
            self.io.configure_output(pin)?;
        }

        self.io.wait(POWER_ON_DELAY);
        self.io.write(self.pin_rs, false)?;
        self.io.write(self.pin_e, false)?;

        // Synchronize
        self.write_nibble(0b0011)?;
        self.io.wait(Duration::from_millis(5));
        self.write_nibble(0b0011)?;
        self.io.wait(Duration::from_millis(5));
        self.write_nibble(0b0011)?;
        self.io.wait(Duration::from_millis(1));
        // 4-bit mode from here on
        self.write_nibble(0b0010)?;
        self.io.wait(COMMAND_SETTLE);
        self.initialized = true;

        self.function = FunctionFlags::empty();
        self.function.set(FunctionFlags::TWO_LINES, self.rows > 1);
        self.function.set(
            FunctionFlags::DOTS_5X10,
            self.character_size == CharacterSize::Dots5x10,
        );
        self.function_set(self.function)?;

        self.control = ControlFlags::DISPLAY_ON;
        self.set_display_control(self.control)?;

        self.entry = EntryFlags::ENTRY_LEFT;
        self.set_entry_mode(self.entry)?;

        self.clear()?;
        debug!("HD44780 initialized");
        Ok(())
    }

    /// Puts the nibble on D4..D7 and pulses E, making the controller latch it on the falling edge.
    fn write_nibble(&mut self, nibble: u8) -> GpioResult<()> {
        trace!("Writing nibble: {:04b}", nibble & 0x0F);
        for (i, pin) in self.data_pins.into_iter().enumerate() {
            self.io.write(pin, (nibble >> i) & 0x01 != 0)?;
        }
        self.io.write(self.pin_e, false)?;
        self.io.write(self.pin_e, true)?;
        self.io.wait(ENABLE_PULSE);
        self.io.write(self.pin_e, false)?;
        Ok(())
    }

    fn send(&mut self, data: u8, rs: bool) -> GpioResult<()> {
        debug_assert!(self.initialized, "HD44780 used before begin()");
        trace!("Sending data: {:08b}, RS: {}", data, rs);

        self.io.write(self.pin_rs, rs)?;
        self.write_nibble(data >> 4)?;
        self.write_nibble(data & 0x0F)?;
        self.io.wait(COMMAND_SETTLE);
        Ok(())
    }

    /// Writes a byte to the current DDRAM or CGRAM address.
    pub fn write_byte(&mut self, value: u8) -> GpioResult<()> {
        self.send_data(value)
    }

    /// Sends a raw instruction byte.
    pub fn command(&mut self, code: u8) -> GpioResult<()> {
        self.send_command(code)
    }

    /// Clears the display and moves the cursor to (0, 0).
    pub fn clear(&mut self) -> GpioResult<()> {
        self.clear_display()
    }

    /// Moves the cursor to (0, 0) and undoes any scrolling, keeping the contents.
    pub fn home(&mut self) -> GpioResult<()> {
        self.return_home()
    }

    pub fn on(&mut self) -> GpioResult<()> {
        self.control.insert(ControlFlags::DISPLAY_ON);
        self.set_display_control(self.control)
    }

    pub fn off(&mut self) -> GpioResult<()> {
        self.control.remove(ControlFlags::DISPLAY_ON);
        self.set_display_control(self.control)
    }

    /// Shows or hides the underline cursor.
    pub fn cursor(&mut self, enable: bool) -> GpioResult<()> {
        self.control.set(ControlFlags::CURSOR_ON, enable);
        self.set_display_control(self.control)
    }

    /// Turns blinking of the cursor position on or off.
    pub fn blink(&mut self, enable: bool) -> GpioResult<()> {
        self.control.set(ControlFlags::BLINK_ON, enable);
        self.set_display_control(self.control)
    }

    /// Shifts the whole display one position to the left. Not a persistent mode.
    pub fn scroll_left(&mut self) -> GpioResult<()> {
        self.cursor_shift(true, CursorDirection::Left)
    }

    /// Shifts the whole display one position to the right. Not a persistent mode.
    pub fn scroll_right(&mut self) -> GpioResult<()> {
        self.cursor_shift(true, CursorDirection::Right)
    }

    pub fn left_to_right(&mut self) -> GpioResult<()> {
        self.entry.insert(EntryFlags::ENTRY_LEFT);
        self.set_entry_mode(self.entry)
    }

    pub fn right_to_left(&mut self) -> GpioResult<()> {
        self.entry.remove(EntryFlags::ENTRY_LEFT);
        self.set_entry_mode(self.entry)
    }

    /// Shifts the display on every write, so text grows to the left of the cursor.
    pub fn justify_right(&mut self) -> GpioResult<()> {
        self.entry.insert(EntryFlags::ENTRY_SHIFT_INCREMENT);
        self.set_entry_mode(self.entry)
    }

    pub fn justify_left(&mut self) -> GpioResult<()> {
        self.entry.remove(EntryFlags::ENTRY_SHIFT_INCREMENT);
        self.set_entry_mode(self.entry)
    }

    /// Stores a custom glyph in one of the 8 CGRAM slots. Printing the byte `index` afterwards shows
    /// it.
    ///
    /// `index` wraps around, so `8` is slot `0`. Each row of the bitmap uses its 5 lowest bits,
    /// row 0 is the top one. The address is moved back to the start of DDRAM afterwards, so the next
    /// write doesn't overwrite glyph memory.
    pub fn define_glyph(&mut self, index: u8, bitmap: &[u8; 8]) -> GpioResult<()> {
        self.set_cgram_address((index & 0x07) << 3)?;
        for &row in bitmap {
            self.send_data(row)?;
        }
        self.set_ddram_address(0)
    }

    /// Moves the cursor to the given column and row.
    ///
    /// Rows 0 and 1 start at the controller's fixed line addresses `0x00` and `0x40`. Rows 2 and 3
    /// start at `0x10 + columns` and `0x40 + columns`, inside the same 40 character physical lines.
    /// Neither coordinate is checked against the geometry.
    pub fn set_cursor(&mut self, column: u8, row: u8) -> GpioResult<()> {
        debug_assert!(row < 4, "HD44780 has at most 4 rows, got {}", row);
        let line_start = [
            0x00,
            0x40,
            0x10u8.wrapping_add(self.columns),
            0x40u8.wrapping_add(self.columns),
        ];
        let address = line_start[(row & 0x03) as usize].wrapping_add(column);
        self.set_ddram_address(address & 0x7F)
    }

    /// Writes the text at the cursor, one byte per UTF-16 code unit. Nothing wraps to the next row.
    ///
    /// The controller's character ROM is ASCII in its lower half only; the upper half depends on the
    /// ROM variant. Code units above `0xFF` are truncated to their lowest byte, so characters outside
    /// the BMP take two bytes, one per surrogate.
    pub fn print(&mut self, text: &str) -> GpioResult<()> {
        for unit in text.encode_utf16() {
            if unit > 0xFF {
                warn!("Code unit {:#06x} doesn't fit in a byte, truncating", unit);
            }
            self.send_data(unit as u8)?;
        }
        Ok(())
    }
}

impl<P: PinIo> HD44780Driver for GpioHD44780Driver<P> {
    fn send_command(&mut self, command: u8) -> GpioResult<()> {
        self.send(command, false)
    }

    fn send_data(&mut self, data: u8) -> GpioResult<()> {
        self.send(data, true)
    }

    fn wait(&mut self, duration: Duration) {
        self.io.wait(duration);
    }
}

impl<P: PinIo> fmt::Write for GpioHD44780Driver<P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lcd::hd44780::driver::CLEAR_SETTLE;
    use crate::recording::{BusEvent, ParallelBus, PinEvent, RecordingPinIo, SentByte};
    use std::fmt::Write;

    const BUS: ParallelBus = ParallelBus {
        pin_rs: 3,
        pin_e: 5,
        data_pins: [6, 7, 8, 9],
    };

    // The synchronization nibbles sent by begin()
    const INIT_NIBBLES: usize = 4;

    fn new_driver() -> GpioHD44780Driver<RecordingPinIo> {
        GpioHD44780Driver::new(RecordingPinIo::new().strict(), BUS.pin_rs, BUS.pin_e, BUS.data_pins)
    }

    /// Returns a driver that went through begin() with an empty recording.
    fn begun() -> GpioHD44780Driver<RecordingPinIo> {
        let mut lcd = new_driver();
        lcd.begin(None, None, None).unwrap();
        lcd.io.clear();
        lcd
    }

    fn sent(lcd: &GpioHD44780Driver<RecordingPinIo>) -> Vec<u8> {
        lcd.io.sent_bytes(&BUS, 0).iter().map(|b| b.value).collect()
    }

    fn last_sent(lcd: &GpioHD44780Driver<RecordingPinIo>) -> u8 {
        *sent(lcd).last().unwrap()
    }

    #[test]
    fn new_does_not_touch_pins() {
        let lcd = new_driver();
        assert!(lcd.io.events().is_empty());
        assert_eq!(lcd.columns(), 16);
        assert_eq!(lcd.rows(), 2);
        assert_eq!(lcd.character_size(), CharacterSize::Dots5x8);
    }

    #[test]
    fn begin_configures_all_pins_as_outputs() {
        let mut lcd = new_driver();
        lcd.begin(None, None, None).unwrap();
        for pin in [BUS.pin_rs, BUS.pin_e].into_iter().chain(BUS.data_pins) {
            assert!(lcd.io.is_output(pin), "pin {} not configured", pin);
        }
        let configures = lcd
            .io
            .events()
            .iter()
            .take_while(|e| matches!(e, PinEvent::Configure(_)))
            .count();
        assert_eq!(configures, 6);
    }

    #[test]
    fn begin_synchronizes_before_any_command() {
        let mut lcd = new_driver();
        lcd.begin(None, None, None).unwrap();

        let events = lcd.io.bus_events(&BUS);
        assert_eq!(events[0], BusEvent::Wait(POWER_ON_DELAY));

        let sync = &events[1..9];
        assert_eq!(
            sync,
            &[
                BusEvent::Nibble { value: 0x3, rs: false },
                BusEvent::Wait(Duration::from_millis(5)),
                BusEvent::Nibble { value: 0x3, rs: false },
                BusEvent::Wait(Duration::from_millis(5)),
                BusEvent::Nibble { value: 0x3, rs: false },
                BusEvent::Wait(Duration::from_millis(1)),
                BusEvent::Nibble { value: 0x2, rs: false },
                BusEvent::Wait(COMMAND_SETTLE),
            ]
        );
    }

    #[test]
    fn begin_sends_default_registers_then_clears() {
        let mut lcd = new_driver();
        lcd.begin(None, None, None).unwrap();

        let bytes = lcd.io.sent_bytes(&BUS, INIT_NIBBLES);
        let values: Vec<u8> = bytes.iter().map(|b| b.value).collect();
        // 4-bit, 2 lines, 5x8; display on; left to right; clear
        assert_eq!(values, vec![0x28, 0x0C, 0x06, 0x01]);
        assert!(bytes.iter().all(|b| !b.rs));

        assert_eq!(lcd.control_flags(), ControlFlags::DISPLAY_ON);
        assert_eq!(lcd.entry_flags(), EntryFlags::ENTRY_LEFT);
        assert_eq!(lcd.function_flags(), FunctionFlags::TWO_LINES);
    }

    #[test]
    fn function_set_never_selects_8bit_bus() {
        assert_eq!(FunctionFlags::all().bits() & 0x10, 0);

        let mut lcd = new_driver();
        lcd.begin(Some(20), Some(4), Some(CharacterSize::Dots5x10)).unwrap();
        let function_set = lcd.io.sent_bytes(&BUS, INIT_NIBBLES)[0].value;
        assert_eq!(function_set, 0x2C);
    }

    #[test]
    fn begin_applies_geometry_and_font() {
        let mut lcd = new_driver();
        lcd.begin(Some(20), Some(1), Some(CharacterSize::Dots5x10)).unwrap();

        assert_eq!(lcd.columns(), 20);
        assert_eq!(lcd.rows(), 1);
        let bytes = lcd.io.sent_bytes(&BUS, INIT_NIBBLES);
        assert_eq!(bytes[0].value, 0x24);
    }

    #[test]
    fn begin_four_rows_uses_two_line_mode() {
        let mut lcd = new_driver();
        lcd.begin(Some(20), Some(4), None).unwrap();
        assert_eq!(lcd.io.sent_bytes(&BUS, INIT_NIBBLES)[0].value, 0x28);
    }

    #[test]
    fn cursor_and_blink_preserve_each_other() {
        let mut lcd = begun();

        lcd.cursor(true).unwrap();
        assert_eq!(last_sent(&lcd), 0x0E);
        lcd.blink(true).unwrap();
        assert_eq!(last_sent(&lcd), 0x0F);
        lcd.cursor(false).unwrap();
        assert_eq!(last_sent(&lcd), 0x0D);
        lcd.blink(false).unwrap();
        assert_eq!(last_sent(&lcd), 0x0C);
    }

    #[test]
    fn control_byte_tracks_latest_toggles_in_any_order() {
        let sequences: [&[(bool, bool)]; 3] = [
            // (is_cursor, enable)
            &[(false, true), (true, true), (false, false)],
            &[(true, true), (true, false), (false, true), (true, true)],
            &[(false, false), (true, false), (false, true)],
        ];

        for sequence in sequences {
            let mut lcd = begun();
            let mut cursor = false;
            let mut blink = false;
            for &(is_cursor, enable) in sequence {
                if is_cursor {
                    lcd.cursor(enable).unwrap();
                    cursor = enable;
                } else {
                    lcd.blink(enable).unwrap();
                    blink = enable;
                }
                let byte = last_sent(&lcd);
                assert_eq!(byte & 0xF8, 0x08);
                assert_eq!(byte & 0x04, 0x04, "display turned off");
                assert_eq!(byte & 0x02 != 0, cursor);
                assert_eq!(byte & 0x01 != 0, blink);
            }
        }
    }

    #[test]
    fn redundant_toggles_send_the_same_byte() {
        let mut lcd = begun();
        lcd.cursor(true).unwrap();
        lcd.cursor(true).unwrap();
        assert_eq!(sent(&lcd), vec![0x0E, 0x0E]);
    }

    #[test]
    fn off_and_on_keep_cursor_and_blink() {
        let mut lcd = begun();
        lcd.cursor(true).unwrap();
        lcd.blink(true).unwrap();
        lcd.off().unwrap();
        assert_eq!(last_sent(&lcd), 0x0B);
        lcd.on().unwrap();
        assert_eq!(last_sent(&lcd), 0x0F);
    }

    #[test]
    fn entry_mode_toggles_preserve_each_other() {
        let mut lcd = begun();

        lcd.justify_right().unwrap();
        assert_eq!(last_sent(&lcd), 0x07);
        lcd.right_to_left().unwrap();
        assert_eq!(last_sent(&lcd), 0x05);
        lcd.justify_left().unwrap();
        assert_eq!(last_sent(&lcd), 0x04);
        lcd.left_to_right().unwrap();
        assert_eq!(last_sent(&lcd), 0x06);
    }

    #[test]
    fn scrolling_is_stateless() {
        let mut lcd = begun();
        lcd.cursor(true).unwrap();
        lcd.scroll_right().unwrap();
        lcd.scroll_left().unwrap();
        assert_eq!(sent(&lcd), vec![0x0E, 0x1C, 0x18]);

        assert_eq!(lcd.control_flags(), ControlFlags::DISPLAY_ON | ControlFlags::CURSOR_ON);
        assert_eq!(lcd.entry_flags(), EntryFlags::ENTRY_LEFT);
    }

    #[test]
    fn define_glyph_writes_cgram_then_returns_to_ddram() {
        let heart = [
            0b00000, 0b01010, 0b11111, 0b11111, 0b11111, 0b01110, 0b00100, 0b00000,
        ];
        let mut lcd = begun();
        lcd.define_glyph(3, &heart).unwrap();

        let bytes = lcd.io.sent_bytes(&BUS, 0);
        assert_eq!(bytes.len(), 10);
        assert_eq!((bytes[0].value, bytes[0].rs), (0x40 | 24, false));
        for (i, row) in heart.iter().enumerate() {
            assert_eq!((bytes[i + 1].value, bytes[i + 1].rs), (*row, true));
        }
        assert_eq!((bytes[9].value, bytes[9].rs), (0x80, false));
    }

    #[test]
    fn define_glyph_index_wraps() {
        let mut lcd = begun();
        lcd.define_glyph(11, &[0; 8]).unwrap();
        assert_eq!(sent(&lcd)[0], 0x40 | (3 << 3));
    }

    #[test]
    fn set_cursor_uses_line_table() {
        let mut lcd = begun();
        lcd.set_cursor(0, 0).unwrap();
        lcd.set_cursor(0, 1).unwrap();
        lcd.set_cursor(5, 2).unwrap();
        lcd.set_cursor(3, 3).unwrap();
        assert_eq!(sent(&lcd), vec![0x80, 0xC0, 0x80 | (0x10 + 16 + 5), 0x80 | (0x40 + 16 + 3)]);
    }

    #[test]
    fn set_cursor_follows_columns() {
        let mut lcd = new_driver();
        lcd.begin(Some(20), Some(4), None).unwrap();
        lcd.io.clear();

        lcd.set_cursor(0, 2).unwrap();
        lcd.set_cursor(1, 3).unwrap();
        assert_eq!(sent(&lcd), vec![0x80 | 0x24, 0x80 | 0x55]);
    }

    #[test]
    fn clear_and_home_wait_longer_than_commands() {
        let mut lcd = begun();
        lcd.clear().unwrap();
        lcd.home().unwrap();
        lcd.cursor(true).unwrap();

        let bytes = lcd.io.sent_bytes(&BUS, 0);
        assert_eq!(bytes[0].value, 0x01);
        assert_eq!(bytes[1].value, 0x02);
        let ordinary = bytes[2].wait_after;
        assert_eq!(ordinary, COMMAND_SETTLE);
        for b in &bytes[..2] {
            assert!(b.wait_after >= CLEAR_SETTLE);
            assert!(b.wait_after > ordinary);
        }
    }

    #[test]
    fn print_sends_data_bytes() {
        let mut lcd = begun();
        lcd.print("Hi").unwrap();
        assert_eq!(
            lcd.io.sent_bytes(&BUS, 0),
            vec![
                SentByte { value: b'H', rs: true, wait_after: COMMAND_SETTLE },
                SentByte { value: b'i', rs: true, wait_after: COMMAND_SETTLE },
            ]
        );
    }

    #[test]
    fn print_truncates_wide_characters() {
        let mut lcd = begun();
        lcd.print("\u{263A}é").unwrap();
        assert_eq!(sent(&lcd), vec![0x3A, 0xE9]);
    }

    #[test]
    fn print_sends_both_surrogates_outside_bmp() {
        let mut lcd = begun();
        // U+1F600 is D83D DE00 in UTF-16
        lcd.print("\u{1F600}").unwrap();
        assert_eq!(sent(&lcd), vec![0x3D, 0x00]);
    }

    #[test]
    fn nibbles_go_high_first_lsb_on_first_pin() {
        let mut lcd = begun();
        lcd.write_byte(0xA5).unwrap();
        let nibbles: Vec<BusEvent> = lcd
            .io
            .bus_events(&BUS)
            .into_iter()
            .filter(|e| matches!(e, BusEvent::Nibble { .. }))
            .collect();
        assert_eq!(
            nibbles,
            vec![
                BusEvent::Nibble { value: 0xA, rs: true },
                BusEvent::Nibble { value: 0x5, rs: true },
            ]
        );
        // 0x5 = 0101, so D4 and D6 are high
        assert_eq!(lcd.io.level(BUS.data_pins[0]), Some(true));
        assert_eq!(lcd.io.level(BUS.data_pins[1]), Some(false));
        assert_eq!(lcd.io.level(BUS.data_pins[2]), Some(true));
        assert_eq!(lcd.io.level(BUS.data_pins[3]), Some(false));
    }

    #[test]
    fn enable_is_pulsed_low_high_low() {
        let mut lcd = begun();
        lcd.command(0x0C).unwrap();

        let e_writes: Vec<bool> = lcd
            .io
            .events()
            .iter()
            .filter_map(|e| match e {
                PinEvent::Write(pin, level) if *pin == BUS.pin_e => Some(*level),
                _ => None,
            })
            .collect();
        assert_eq!(e_writes, vec![false, true, false, false, true, false]);
    }

    #[test]
    fn formatted_text_is_printed() {
        let mut lcd = begun();
        write!(lcd, "{}:{:02}", 7, 5).unwrap();
        assert_eq!(sent(&lcd), b"7:05".to_vec());
    }

    #[test]
    fn release_returns_the_io() {
        let mut lcd = begun();
        lcd.write_byte(b'x').unwrap();
        let io = lcd.release();
        assert!(!io.events().is_empty());
    }
}
