//! In-memory [PinIo] that records every call instead of touching hardware.
//!
//! Useful for testing code that drives a display: the recorded pin activity can be decoded back
//! into the nibbles latched by a 4-bit parallel bus with [RecordingPinIo::bus_events], and into
//! whole bytes with [RecordingPinIo::sent_bytes].
use crate::{GpioError, GpioResult, PinIo};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// A single call made on a [RecordingPinIo].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PinEvent {
    Configure(usize),
    Write(usize, bool),
    Wait(Duration),
}

/// Pin wiring of a 4-bit parallel bus, used to decode the recorded activity.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ParallelBus {
    pub pin_rs: usize,
    pub pin_e: usize,
    /// D4..D7, LSb first.
    pub data_pins: [usize; 4],
}

/// What the controller saw on the bus.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BusEvent {
    /// A nibble latched on the falling edge of the enable line.
    Nibble { value: u8, rs: bool },
    /// A delay while the enable line was low.
    Wait(Duration),
}

/// A full byte reassembled from two consecutive nibbles, high nibble first.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SentByte {
    pub value: u8,
    pub rs: bool,
    /// Total time waited after the low nibble, before the next nibble.
    pub wait_after: Duration,
}

#[derive(Debug, Default)]
pub struct RecordingPinIo {
    events: Vec<PinEvent>,
    outputs: HashSet<usize>,
    levels: HashMap<usize, bool>,
    strict: bool,
}

impl RecordingPinIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes writes to pins that weren't configured as outputs fail with
    /// [GpioError::InvalidArgument], like the hardware backends do.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn events(&self) -> &[PinEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_output(&self, pin: usize) -> bool {
        self.outputs.contains(&pin)
    }

    /// Gets the last level written to the pin, if any.
    pub fn level(&self, pin: usize) -> Option<bool> {
        self.levels.get(&pin).copied()
    }

    /// Decodes the recorded activity into the nibbles latched by the bus and the waits between them.
    ///
    /// Waits while the enable line is high (pulse width) aren't reported.
    pub fn bus_events(&self, bus: &ParallelBus) -> Vec<BusEvent> {
        let mut levels: HashMap<usize, bool> = HashMap::new();
        let mut result = Vec::new();

        for event in &self.events {
            match *event {
                PinEvent::Configure(_) => {}
                PinEvent::Write(pin, level) => {
                    let previous = levels.insert(pin, level).unwrap_or(false);
                    if pin == bus.pin_e && previous && !level {
                        let mut value = 0u8;
                        for (i, data_pin) in bus.data_pins.iter().enumerate() {
                            if levels.get(data_pin).copied().unwrap_or(false) {
                                value |= 1 << i;
                            }
                        }
                        let rs = levels.get(&bus.pin_rs).copied().unwrap_or(false);
                        result.push(BusEvent::Nibble { value, rs });
                    }
                }
                PinEvent::Wait(duration) => {
                    if !levels.get(&bus.pin_e).copied().unwrap_or(false) {
                        result.push(BusEvent::Wait(duration));
                    }
                }
            }
        }

        result
    }

    /// Reassembles bytes from the latched nibbles, skipping the first `skip_nibbles` ones
    /// (for example the single nibbles of an initialization sequence).
    pub fn sent_bytes(&self, bus: &ParallelBus, skip_nibbles: usize) -> Vec<SentByte> {
        let mut result: Vec<SentByte> = Vec::new();
        let mut high: Option<(u8, bool)> = None;
        let mut seen = 0;

        for event in self.bus_events(bus) {
            match event {
                BusEvent::Nibble { value, rs } => {
                    seen += 1;
                    if seen <= skip_nibbles {
                        continue;
                    }
                    match high.take() {
                        None => high = Some((value, rs)),
                        Some((high_value, high_rs)) => {
                            debug_assert_eq!(high_rs, rs, "RS changed between nibbles");
                            result.push(SentByte {
                                value: (high_value << 4) | value,
                                rs,
                                wait_after: Duration::ZERO,
                            });
                        }
                    }
                }
                BusEvent::Wait(duration) => {
                    if high.is_none() {
                        if let Some(last) = result.last_mut() {
                            last.wait_after += duration;
                        }
                    }
                }
            }
        }

        result
    }
}

impl PinIo for RecordingPinIo {
    fn configure_output(&mut self, pin: usize) -> GpioResult<()> {
        self.outputs.insert(pin);
        self.events.push(PinEvent::Configure(pin));
        Ok(())
    }

    fn write(&mut self, pin: usize, level: bool) -> GpioResult<()> {
        if self.strict && !self.outputs.contains(&pin) {
            return Err(GpioError::InvalidArgument);
        }
        self.levels.insert(pin, level);
        self.events.push(PinEvent::Write(pin, level));
        Ok(())
    }

    fn wait(&mut self, duration: Duration) {
        self.events.push(PinEvent::Wait(duration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUS: ParallelBus = ParallelBus {
        pin_rs: 1,
        pin_e: 2,
        data_pins: [10, 11, 12, 13],
    };

    fn latch(io: &mut RecordingPinIo, nibble: u8) {
        for (i, pin) in BUS.data_pins.iter().enumerate() {
            io.write(*pin, nibble & (1 << i) != 0).unwrap();
        }
        io.write(BUS.pin_e, true).unwrap();
        io.wait(Duration::from_micros(1));
        io.write(BUS.pin_e, false).unwrap();
    }

    #[test]
    fn records_calls_in_order() {
        let mut io = RecordingPinIo::new();
        io.configure_output(3).unwrap();
        io.write(3, true).unwrap();
        io.wait(Duration::from_millis(2));

        assert_eq!(
            io.events(),
            &[
                PinEvent::Configure(3),
                PinEvent::Write(3, true),
                PinEvent::Wait(Duration::from_millis(2)),
            ]
        );
        assert!(io.is_output(3));
        assert_eq!(io.level(3), Some(true));
        assert_eq!(io.level(4), None);
    }

    #[test]
    fn strict_rejects_unconfigured_pins() {
        let mut io = RecordingPinIo::new().strict();
        assert_eq!(io.write(5, true), Err(GpioError::InvalidArgument));
        io.configure_output(5).unwrap();
        assert_eq!(io.write(5, true), Ok(()));
    }

    #[test]
    fn decodes_nibbles_on_falling_edge() {
        let mut io = RecordingPinIo::new();
        io.write(BUS.pin_rs, true).unwrap();
        latch(&mut io, 0x4);
        latch(&mut io, 0x8);
        io.wait(Duration::from_micros(100));

        assert_eq!(
            io.bus_events(&BUS),
            vec![
                BusEvent::Nibble { value: 0x4, rs: true },
                BusEvent::Nibble { value: 0x8, rs: true },
                BusEvent::Wait(Duration::from_micros(100)),
            ]
        );

        let bytes = io.sent_bytes(&BUS, 0);
        assert_eq!(
            bytes,
            vec![SentByte {
                value: 0x48,
                rs: true,
                wait_after: Duration::from_micros(100),
            }]
        );
    }

    #[test]
    fn skips_leading_nibbles() {
        let mut io = RecordingPinIo::new();
        latch(&mut io, 0x3);
        io.wait(Duration::from_millis(5));
        latch(&mut io, 0x2);
        latch(&mut io, 0x8);

        let bytes = io.sent_bytes(&BUS, 1);
        assert_eq!(bytes.len(), 1);
        assert_eq!(bytes[0].value, 0x28);
        assert!(!bytes[0].rs);
    }
}
