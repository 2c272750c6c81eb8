//! One-LED clock on a Raspberry Pi Pico.
//!
//! The timer alarm fires at the period of an 8-bit timer overflowing at
//! 14.7456 MHz / 1024 and advances the clock. Pressing or releasing the
//! button on GPIO15 wakes the idle loop, which shows HH:MM:SS on the MAX7219
//! chain and blinks hours and minutes on the onboard LED. GPIO14 stays high
//! while the LED is blinking.

#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_halt as _;
use rtic::app;

mod font;
mod matrix;
mod sleep;

use oneled_clock::{
    BlinkTiming, Blinker, ClockConfig, DisplayController, TickAccumulator, TickConfig, TimeOfDay,
    TimerConfig, WakeFlag,
};

/// Timer the tick plan is derived from.
const TIMER: TimerConfig = TimerConfig::NERDKIT;

const CONFIG: ClockConfig = ClockConfig {
    start: match TimeOfDay::new(22, 1, 30) {
        Ok(t) => t,
        Err(_) => panic!("start time out of range"),
    },
    // TickConfig::NERDKIT_EMPIRICAL for boards tuned against a reference clock
    tick: match TickConfig::from_timer(&TIMER) {
        Ok(plan) => plan,
        Err(_) => panic!("timer period has no usable tick plan"),
    },
    blink: BlinkTiming {
        short_ms: 255,
        long_ms: 500,
        digit_gap_ms: 255,
        group_gap_ms: 1000,
    },
};

static WAKE: WakeFlag = WakeFlag::new();

#[app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use super::*;
    use crate::matrix::{MatrixSurface, DEVICES};
    use crate::sleep::CortexSleep;
    use cortex_m::delay::Delay;
    use max7219::MAX7219;
    use rp_pico::hal::{
        clocks::{init_clocks_and_plls, Clock},
        fugit::{MicrosDurationU64, RateExtU32},
        gpio::{bank0::Gpio14, bank0::Gpio15, bank0::Gpio25, FunctionSio, Interrupt, Pin, PullDown, PullUp, SioInput, SioOutput},
        sio::Sio,
        spi::Spi,
        timer::{Alarm, Alarm0, Instant, Timer},
        watchdog::Watchdog,
    };

    type Spi0 = Spi<rp_pico::hal::spi::Enabled, rp_pico::hal::pac::SPI0, (
        Pin<rp_pico::hal::gpio::bank0::Gpio19, rp_pico::hal::gpio::FunctionSpi, rp_pico::hal::gpio::PullDown>,
        Pin<rp_pico::hal::gpio::bank0::Gpio16, rp_pico::hal::gpio::FunctionSpi, rp_pico::hal::gpio::PullDown>,
        Pin<rp_pico::hal::gpio::bank0::Gpio18, rp_pico::hal::gpio::FunctionSpi, rp_pico::hal::gpio::PullDown>
    )>;
    type CsPin = Pin<rp_pico::hal::gpio::bank0::Gpio17, FunctionSio<SioOutput>, PullDown>;
    type Surface = MatrixSurface<max7219::connectors::SpiConnectorSW<Spi0, CsPin>>;

    type LedPin = Pin<Gpio25, FunctionSio<SioOutput>, PullDown>;
    type IndicatorPin = Pin<Gpio14, FunctionSio<SioOutput>, PullDown>;
    type ButtonPin = Pin<Gpio15, FunctionSio<SioInput>, PullUp>;
    type Controller = DisplayController<'static, Surface, LedPin, Delay, IndicatorPin>;

    #[shared]
    struct Shared {
        clock: TickAccumulator,
    }

    #[local]
    struct Local {
        controller: Controller,
        power: CortexSleep,
        alarm: Alarm0,
        epoch: Instant,
        button: ButtonPin,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let core = ctx.core;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let mut alarm = timer.alarm_0().unwrap();
        let epoch = timer.get_counter();
        alarm
            .schedule_at(epoch + MicrosDurationU64::micros(TIMER.deadline_us(1)))
            .unwrap();
        alarm.enable_interrupt();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let led = pins.led.into_push_pull_output();
        let indicator = pins.gpio14.into_push_pull_output();
        let button = pins.gpio15.into_pull_up_input();

        // Press and release both wake the core
        button.set_interrupt_enabled(Interrupt::EdgeLow, true);
        button.set_interrupt_enabled(Interrupt::EdgeHigh, true);

        let mosi = pins.gpio19.into_function::<rp_pico::hal::gpio::FunctionSpi>();
        let sck = pins.gpio18.into_function::<rp_pico::hal::gpio::FunctionSpi>();
        let miso = pins.gpio16.into_function::<rp_pico::hal::gpio::FunctionSpi>();
        let cs = pins.gpio17.into_push_pull_output();

        let spi = Spi::<_, _, _, 8>::new(pac.SPI0, (mosi, miso, sck));
        let spi = spi.init(
            &mut pac.RESETS,
            clocks.peripheral_clock.freq(),
            2_000_000u32.Hz(),
            &embedded_hal::spi::MODE_0,
        );

        let display = MAX7219::from_spi_cs(DEVICES, spi, cs).unwrap();
        let surface = MatrixSurface::new(display).unwrap();

        let delay = Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());
        let blinker = Blinker::with_indicator(led, delay, indicator, CONFIG.blink);
        let controller = DisplayController::new(surface, blinker, &WAKE);

        defmt::info!(
            "start {} ms, tick {} ms (+{} every {}), alarm {} us",
            CONFIG.start.as_millis(),
            CONFIG.tick.increment_ms,
            CONFIG.tick.correction_ms,
            CONFIG.tick.ticks_per_correction,
            TIMER.period_us()
        );

        (
            Shared {
                clock: TickAccumulator::starting_at(CONFIG.tick, CONFIG.start),
            },
            Local {
                controller,
                power: CortexSleep::new(core.SCB),
                alarm,
                epoch,
                button,
            },
            init::Monotonics(),
        )
    }

    // Hardware Task: timer alarm, one tick per period
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [clock], local = [alarm, epoch, fired: u64 = 0])]
    fn timer_tick(mut ctx: timer_tick::Context) {
        ctx.local.alarm.clear_interrupt();
        *ctx.local.fired += 1;

        let next = *ctx.local.epoch + MicrosDurationU64::micros(TIMER.deadline_us(*ctx.local.fired + 1));
        if ctx.local.alarm.schedule_at(next).is_err() {
            defmt::error!("alarm re-arm failed at tick {=u64}", *ctx.local.fired);
        }

        ctx.shared.clock.lock(|c| c.tick());
    }

    // Hardware Task: button edge, either direction
    #[task(binds = IO_IRQ_BANK0, priority = 1, local = [button])]
    fn button_edge(ctx: button_edge::Context) {
        ctx.local.button.clear_interrupt(Interrupt::EdgeLow);
        ctx.local.button.clear_interrupt(Interrupt::EdgeHigh);
        WAKE.raise();
    }

    #[idle(shared = [clock], local = [controller, power])]
    fn idle(mut ctx: idle::Context) -> ! {
        let controller = ctx.local.controller;
        let power = ctx.local.power;

        loop {
            match controller.run_once(power, || ctx.shared.clock.lock(|c| c.snapshot())) {
                Ok(Some(time)) => defmt::debug!("told the time: {}", time),
                Ok(None) => {}
                Err(e) => defmt::warn!("readout failed: {}", defmt::Debug2Format(&e)),
            }
        }
    }
}
