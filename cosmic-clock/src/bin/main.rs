#![no_std]
#![no_main]

use cosmic_clock::{LedcPwm, BUILD_TIME};
use cosmic_clock_lib::{CosmicClock, DeviceConfig, Event};
use esp_backtrace as _;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Input, Pull};
use esp_hal::i2c::master::I2c;
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::riscv::asm::wfi;
use esp_hal::{i2c, prelude::*};
use esp_println::println;
use log::{error, info, warn};

const PWM_FREQUENCY_KHZ: u32 = 1;

#[entry]
fn main() -> ! {
    let peripherals = esp_hal::init({
        let mut config = esp_hal::Config::default();
        config.cpu_clock = CpuClock::max();
        config
    });

    esp_println::logger::init_logger_from_env();

    let mut console = |e: &Event| println!("{}", e);

    let scl = peripherals.GPIO2;
    let sda = peripherals.GPIO3;
    let i2c = I2c::new(
        peripherals.I2C0,
        i2c::master::Config {
            ..Default::default()
        },
    )
    .with_scl(scl)
    .with_sda(sda);
    let mut rtc = mcp794xx::Mcp794xx::new_mcp7940n(i2c);

    if let Err(e) = rtc.enable().and_then(|_| rtc.enable_backup_battery_power()) {
        error!("RTC did not respond: {:?}", e);
        console(&Event::ClockUnavailable);
        halt();
    }

    let button = Input::new(peripherals.GPIO4, Pull::Up);

    let mut ledc = Ledc::new(peripherals.LEDC);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);
    let mut lstimer0 = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    if let Err(e) = lstimer0.configure(timer::config::Config {
        duty: timer::config::Duty::Duty8Bit,
        clock_source: timer::LSClockSource::APBClk,
        frequency: PWM_FREQUENCY_KHZ.kHz(),
    }) {
        error!("LEDC timer setup failed: {:?}", e);
        halt();
    }
    let mut channel0 = ledc.channel(channel::Number::Channel0, peripherals.GPIO6);
    if let Err(e) = channel0.configure(channel::config::Config {
        timer: &lstimer0,
        duty_pct: 100,
        pin_config: channel::config::PinConfig::PushPull,
    }) {
        error!("LEDC channel setup failed: {:?}", e);
        halt();
    }

    let config = DeviceConfig::DEFAULT;
    info!(
        "Location {}, {}; daily calculation at {}",
        config.fix.latitude, config.fix.longitude, config.trigger_at
    );
    let mut device = CosmicClock::new(rtc, button, LedcPwm(channel0), Delay::new(), config);

    if device.start(&BUILD_TIME, &mut console).is_err() {
        halt();
    }

    loop {
        if let Err(e) = device.poll(&mut console) {
            warn!("{}", e);
        }
    }
}

/// Nothing works without the clock, stop here for good.
fn halt() -> ! {
    loop {
        wfi();
    }
}
