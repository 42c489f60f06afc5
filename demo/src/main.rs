mod config;

use std::path::Path;
use std::thread::sleep;
use std::time::Duration;
use charlcd_gpio::PinIo;
use charlcd_gpio::gpiod::GpiodPinIo;
use charlcd_gpio::lcd::hd44780::driver::GpioHD44780Driver;
use charlcd_gpio::raw::RawPinIo;
use dotenv::dotenv;
use log::{debug, info};
use crate::config::{Backend, DemoConfig};

const HEART: [u8; 8] = [
    0b00000, 0b01010, 0b11111, 0b11111, 0b11111, 0b01110, 0b00100, 0b00000,
];

const SMILEY: [u8; 8] = [
    0b00000, 0b00000, 0b01010, 0b00000, 0b00000, 0b10001, 0b01110, 0b00000,
];

fn run<P: PinIo>(lcd: &mut GpioHD44780Driver<P>) -> eyre::Result<()> {
    info!("Hello");
    lcd.print("Hello, world!")?;
    sleep(Duration::from_secs(3));

    info!("Two lines");
    lcd.clear()?;
    lcd.set_cursor(0, 0)?;
    lcd.print("The first line.")?;
    lcd.set_cursor(0, 1)?;
    lcd.print("The second line.")?;
    sleep(Duration::from_secs(3));

    info!("Scrolling");
    for _ in 0..lcd.columns() {
        lcd.scroll_right()?;
        sleep(Duration::from_millis(300));
    }
    for _ in 0..lcd.columns() {
        lcd.scroll_left()?;
        sleep(Duration::from_millis(300));
    }
    sleep(Duration::from_secs(3));

    info!("Cursor and blink");
    lcd.clear()?;
    lcd.cursor(true)?;
    sleep(Duration::from_secs(2));
    lcd.cursor(false)?;
    sleep(Duration::from_secs(2));
    lcd.blink(true)?;
    sleep(Duration::from_secs(2));
    lcd.blink(false)?;
    sleep(Duration::from_secs(3));

    info!("Custom glyphs");
    lcd.clear()?;
    lcd.define_glyph(0, &HEART)?;
    lcd.define_glyph(1, &SMILEY)?;
    for i in 0..8 {
        lcd.write_byte(i % 2)?;
    }

    Ok(())
}

fn main() -> eyre::Result<()> {
    // Initialize environment and logger
    dotenv().ok();
    pretty_env_logger::init();

    info!("charlcd demo starting...");

    let config = DemoConfig::load()?;
    info!(
        "LCD {}x{} @ RS: {}, E: {}, Data: {:?}",
        config.columns, config.rows, config.pin_rs, config.pin_e, config.pins_data
    );

    debug!("Initializing {:?} GPIO backend...", config.backend);
    let io: Box<dyn PinIo> = match config.backend {
        Backend::Gpiod => Box::new(GpiodPinIo::open(Path::new(&config.chip))?),
        Backend::Raw => Box::new(RawPinIo::new_gpiomem()?),
    };
    debug!("{:?} initialized.", io);

    let mut lcd = GpioHD44780Driver::new(io, config.pin_rs, config.pin_e, config.pins_data);
    lcd.begin(
        Some(config.columns),
        Some(config.rows),
        Some(config.character_size()),
    )?;

    run(&mut lcd)?;

    info!("Done");
    Ok(())
}
