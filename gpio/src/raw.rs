//! [PinIo] implementation writing the BCM283x GPIO registers directly through a memory map.
use crate::{GpioError, GpioResult, PinIo};
use bitvec::vec::BitVec;
use log::debug;
use memmap2::{MmapOptions, MmapRaw};
use std::fmt::{Debug, Formatter};
use std::fs::OpenOptions;

pub struct RawPinIo {
    mmap: MmapRaw,
    configured: BitVec,
}

impl RawPinIo {
    // 0x7e200000 on the bus, 0x3F200000 for the ARM on BCM2836/7
    const GPIO_BASE: u64 = 0x3F200000;

    const PIN_COUNT: usize = 58;

    const FUNCTION_INPUT: u32 = 0b000;
    const FUNCTION_OUTPUT: u32 = 0b001;

    fn create(path: &str, offset: u64) -> GpioResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)?;

        let mmap = MmapOptions::new()
            .offset(offset)
            .len(4096)
            .map_raw(&file)?;

        debug!("Mapped GPIO registers from {} at offset {:#x}", path, offset);

        Ok(RawPinIo {
            mmap,
            configured: BitVec::repeat(false, Self::PIN_COUNT),
        })
    }

    /// Maps the GPIO block through `/dev/gpiomem`, which exposes only the GPIO registers and
    /// doesn't require root.
    pub fn new_gpiomem() -> GpioResult<Self> {
        Self::create("/dev/gpiomem", 0)
    }

    /// Maps the GPIO block through `/dev/mem`. Requires root.
    pub fn new_mem() -> GpioResult<Self> {
        Self::create("/dev/mem", Self::GPIO_BASE)
    }

    fn register(&self, word: usize) -> *mut u32 {
        let base = self.mmap.as_mut_ptr() as *mut u32;
        unsafe { base.add(word) }
    }

    fn set_pin_function(&self, pin_index: usize, function: u32) {
        // GPFSELn register
        let register_ptr = self.register(pin_index / 10);
        let shift = (pin_index % 10) * 3;

        let mut register_value = unsafe { register_ptr.read_volatile() };
        register_value &= !(0b111 << shift); // Clear the bits for this pin
        register_value |= function << shift;
        unsafe { register_ptr.write_volatile(register_value) };
    }

    fn set_pin_level(&self, pin_index: usize, high: bool) {
        // GPSETn/GPCLRn register
        let register_ptr = self.register(if high { 0x1c / 4 } else { 0x28 / 4 } + pin_index / 32);
        let shift = pin_index % 32;

        unsafe { register_ptr.write_volatile(1 << shift) };
    }
}

impl Debug for RawPinIo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RawPinIo({:?})", self.mmap.as_ptr().addr())
    }
}

impl PinIo for RawPinIo {
    fn configure_output(&mut self, pin: usize) -> GpioResult<()> {
        if pin >= Self::PIN_COUNT {
            return Err(GpioError::InvalidArgument);
        }

        if self.configured[pin] {
            return Ok(());
        }

        self.set_pin_function(pin, Self::FUNCTION_OUTPUT);
        self.configured.set(pin, true);
        Ok(())
    }

    fn write(&mut self, pin: usize, level: bool) -> GpioResult<()> {
        if pin >= Self::PIN_COUNT || !self.configured[pin] {
            return Err(GpioError::InvalidArgument);
        }

        self.set_pin_level(pin, level);
        Ok(())
    }
}

impl Drop for RawPinIo {
    fn drop(&mut self) {
        // Leave every pin we touched as a floating input
        for pin in self.configured.iter_ones() {
            self.set_pin_level(pin, false);
            self.set_pin_function(pin, Self::FUNCTION_INPUT);
        }
        if self.configured.any() {
            debug!("Released {} GPIO pins back to input", self.configured.count_ones());
        }
    }
}
