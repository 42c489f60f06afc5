//! [PinIo] implementation on top of the Linux GPIO character device, using the gpiod library.
use crate::{GpioError, GpioResult, PinIo};
use log::debug;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::path::Path;

/// GpiodPinIo drives GPIO lines of a single gpiochip through the gpiod library.
///
/// Every line is requested as an output the first time it's configured, and the request is kept
/// alive for as long as this value lives.
pub struct GpiodPinIo {
    chip: gpiod::Chip,
    lines: HashMap<usize, gpiod::Lines<gpiod::Output>>,
}

impl GpiodPinIo {
    pub fn new(chip: gpiod::Chip) -> Self {
        Self {
            chip,
            lines: HashMap::new(),
        }
    }

    /// Opens the chip at the given path, e.g. `/dev/gpiochip0`.
    pub fn open(path: &Path) -> GpioResult<Self> {
        let chip = gpiod::Chip::new(path)?;
        Ok(Self::new(chip))
    }

    /// Gets the amount of GPIO lines available on the chip.
    pub fn count(&self) -> usize {
        self.chip.num_lines() as usize
    }
}

impl Debug for GpiodPinIo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GpiodPinIo({})", self.chip.name())
    }
}

impl PinIo for GpiodPinIo {
    fn configure_output(&mut self, pin: usize) -> GpioResult<()> {
        if pin >= self.count() {
            return Err(GpioError::InvalidArgument);
        }

        if self.lines.contains_key(&pin) {
            return Ok(());
        }

        debug!("Requesting line {} of {:?} as output", pin, self);
        let line = self.chip.request_lines(
            gpiod::Options::output([pin as u32]).consumer(env!("CARGO_PKG_NAME")),
        )?;
        self.lines.insert(pin, line);
        Ok(())
    }

    fn write(&mut self, pin: usize, level: bool) -> GpioResult<()> {
        let line = self.lines.get(&pin).ok_or(GpioError::InvalidArgument)?;
        line.set_values([level])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_chip_fails_with_io_error() {
        let result = GpiodPinIo::open(Path::new("/nonexistent/gpiochip99"));
        assert!(matches!(result, Err(GpioError::Io(_))));
    }
}
