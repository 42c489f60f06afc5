pub mod gpiod;
pub mod lcd;
pub mod raw;
pub mod recording;

use std::fmt::Debug;
use std::thread::sleep;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum GpioError {
    #[error("pin already in use")]
    AlreadyInUse,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("the feature is not supported on this backend")]
    NotSupported,
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("error: {0}")]
    Other(String),
}

impl From<std::io::Error> for GpioError {
    fn from(err: std::io::Error) -> Self {
        GpioError::Io(err.kind())
    }
}

pub type GpioResult<T> = Result<T, GpioError>;

/// Pin I/O capability consumed by the display drivers.
///
/// Pins are identified by their GPIO line number on the backing chip. Implementations decide how
/// a number maps to hardware; see [gpiod::GpiodPinIo] and [raw::RawPinIo] for the Linux backends and
/// [recording::RecordingPinIo] for an in-memory one used in tests.
pub trait PinIo: Debug {
    /// Configures the pin as an output. Calling it again for the same pin must be a no-op.
    fn configure_output(&mut self, pin: usize) -> GpioResult<()>;

    /// Drives the pin to the given logic level. The level must be on the wire when this returns.
    fn write(&mut self, pin: usize, level: bool) -> GpioResult<()>;

    /// Blocks for **at least** the given duration.
    ///
    /// Display protocols without a busy flag rely on this being a lower bound, never shorter.
    fn wait(&mut self, duration: Duration) {
        sleep(duration);
    }
}

impl<T: PinIo + ?Sized> PinIo for &mut T {
    fn configure_output(&mut self, pin: usize) -> GpioResult<()> {
        (**self).configure_output(pin)
    }

    fn write(&mut self, pin: usize, level: bool) -> GpioResult<()> {
        (**self).write(pin, level)
    }

    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration)
    }
}

impl<T: PinIo + ?Sized> PinIo for Box<T> {
    fn configure_output(&mut self, pin: usize) -> GpioResult<()> {
        (**self).configure_output(pin)
    }

    fn write(&mut self, pin: usize, level: bool) -> GpioResult<()> {
        (**self).write(pin, level)
    }

    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration)
    }
}
