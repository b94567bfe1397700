#![no_std]
#![no_main]

extern crate panic_halt;
use lazy_static::lazy_static;

use core::cell::RefCell;
use cortex_m::{interrupt::Mutex, peripheral::NVIC};
use cortex_m_rt::entry;
use cortex_m_semihosting::hprintln;
use embedded_hal::digital::v2::InputPin;
use embedded_hal::serial::Read;
use stm32f1xx_hal::{
    pac::{self, interrupt, Interrupt, TIM2, TIM3, USART1},
    prelude::*,
    pwm::{Pwm, C1},
    serial::{self, Rx, Serial},
    timer::{self, CountDownTimer, Tim3NoRemap, Timer},
};

use ltc_sync::{consts, Config, LineOutput, QuarterFrameTransmitter, Signal, Synchronizer};

lazy_static! {
    static ref SYNC: Mutex<RefCell<Option<Synchronizer>>> = Mutex::new(RefCell::new(None));
    static ref MUTEX_TICK: Mutex<RefCell<Option<CountDownTimer<TIM2>>>> =
        Mutex::new(RefCell::new(None));
    static ref MUTEX_LINE: Mutex<RefCell<Option<LineOutput<Pwm<TIM3, C1>>>>> =
        Mutex::new(RefCell::new(None));
    static ref MUTEX_RX: Mutex<RefCell<Option<Rx<USART1>>>> = Mutex::new(RefCell::new(None));
}

/// A push button to ground, reporting one signal per press.
struct Button<P> {
    pin: P,
    was_pressed: bool,
    signal: Signal,
}

impl<P: InputPin> Button<P> {
    fn new(pin: P, signal: Signal) -> Self {
        Button {
            pin,
            was_pressed: false,
            signal,
        }
    }

    fn poll(&mut self) -> Option<Signal> {
        let pressed = self.pin.is_low().unwrap_or(false);
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        if edge {
            Some(self.signal)
        } else {
            None
        }
    }
}

#[entry]
fn main() -> ! {
    let stm_perip = pac::Peripherals::take().unwrap();
    let mut cortex_perip = cortex_m::Peripherals::take().unwrap();

    let mut flash = stm_perip.FLASH.constrain();
    let mut rcc = stm_perip.RCC.constrain();
    let clocks = rcc
        .cfgr
        .use_hse(8.mhz())
        .sysclk(consts::SYSCLK_MHZ.mhz())
        .pclk1(consts::PCLK1_MHZ.mhz())
        .freeze(&mut flash.acr);
    let mut afio = stm_perip.AFIO.constrain(&mut rcc.apb2);
    let mut gpioa = stm_perip.GPIOA.split(&mut rcc.apb2);
    let mut gpiob = stm_perip.GPIOB.split(&mut rcc.apb2);

    let config = Config::default();
    hprintln!(
        "LTC at {} fps, bit clock {} Hz",
        config.frame_rate.fps(),
        config.frame_rate.bit_rate_hz()
    )
    .unwrap();

    // PA6 is TIM3 channel 1, filtered externally into the line output.
    let line_pin = gpioa.pa6.into_alternate_push_pull(&mut gpioa.crl);
    let pwm = Timer::tim3(stm_perip.TIM3, &clocks, &mut rcc.apb1).pwm::<Tim3NoRemap, _, _, _>(
        line_pin,
        &mut afio.mapr,
        consts::PWM_CARRIER_KHZ.khz(),
    );
    let line = LineOutput::new(pwm);

    // USART1 on PA9/PA10 is the MIDI port.
    let tx_pin = gpioa.pa9.into_alternate_push_pull(&mut gpioa.crh);
    let rx_pin = gpioa.pa10;
    let mut midi = Serial::usart1(
        stm_perip.USART1,
        (tx_pin, rx_pin),
        &mut afio.mapr,
        serial::Config::default().baudrate(consts::MIDI_BAUD.bps()),
        clocks,
        &mut rcc.apb2,
    );
    midi.listen(serial::Event::Rxne);
    let (tx, rx) = midi.split();
    let mut transmitter = QuarterFrameTransmitter::new(tx, config.frame_rate);

    let mut start_button = Button::new(
        gpiob.pb12.into_pull_up_input(&mut gpiob.crh),
        Signal::Start,
    );
    let mut stop_button = Button::new(gpiob.pb13.into_pull_up_input(&mut gpiob.crh), Signal::Stop);
    let mut pause_button = Button::new(
        gpiob.pb14.into_pull_up_input(&mut gpiob.crh),
        Signal::TogglePause,
    );

    // TIM2 fires once per bit cell.
    let mut tick = Timer::tim2(stm_perip.TIM2, &clocks, &mut rcc.apb1)
        .start_count_down(config.frame_rate.bit_rate_hz().hz());
    tick.listen(timer::Event::Update);

    cortex_m::interrupt::free(|cs| {
        SYNC.borrow(cs).replace(Some(Synchronizer::new(config)));
        MUTEX_LINE.borrow(cs).replace(Some(line));
        MUTEX_RX.borrow(cs).replace(Some(rx));
        MUTEX_TICK.borrow(cs).replace(Some(tick));
    });

    // The bit clock outranks the MIDI input so a burst of bytes can't stretch a cell.
    let nvic = &mut cortex_perip.NVIC;
    unsafe {
        nvic.set_priority(Interrupt::TIM2, 0x10);
        nvic.set_priority(Interrupt::USART1, 0x20);
        NVIC::unmask(Interrupt::TIM2);
        NVIC::unmask(Interrupt::USART1);
    }
    NVIC::unpend(Interrupt::TIM2);

    loop {
        let pressed = [start_button.poll(), stop_button.poll(), pause_button.poll()];
        for signal in pressed.iter().flatten() {
            let state = cortex_m::interrupt::free(|cs| {
                SYNC.borrow(cs)
                    .borrow_mut()
                    .as_mut()
                    .map(|sync| sync.signal(*signal))
            });
            if let Some(state) = state {
                hprintln!("{:?}: transport {:?}", signal, state).unwrap();
            }
        }

        let frame = cortex_m::interrupt::free(|cs| {
            SYNC.borrow(cs)
                .borrow_mut()
                .as_mut()
                .and_then(|sync| sync.take_completed_frame())
        });
        // Sent outside the critical section; the bit clock keeps running while we block.
        if let Some(frame) = frame {
            if transmitter.transmit(&frame).is_err() {
                hprintln!("dropped quarter frames for {}", frame).unwrap();
            }
        }
    }
}

#[interrupt]
fn TIM2() {
    cortex_m::interrupt::free(|cs| {
        if let Some(tick) = MUTEX_TICK.borrow(cs).borrow_mut().as_mut() {
            tick.clear_update_interrupt_flag();
        }

        let level = match SYNC.borrow(cs).borrow_mut().as_mut() {
            Some(sync) => sync.on_tick(),
            None => return,
        };
        if let Some(line) = MUTEX_LINE.borrow(cs).borrow_mut().as_mut() {
            line.write(level);
        }
    });
}

#[interrupt]
fn USART1() {
    cortex_m::interrupt::free(|cs| {
        let mut rx = MUTEX_RX.borrow(cs).borrow_mut();
        let mut sync = SYNC.borrow(cs).borrow_mut();
        let (rx, sync) = match (rx.as_mut(), sync.as_mut()) {
            (Some(rx), Some(sync)) => (rx, sync),
            _ => return,
        };

        // Drain everything the peripheral holds. A framing or overrun error drops the byte.
        loop {
            match rx.read() {
                Ok(byte) => sync.on_byte(byte),
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(_)) => break,
            }
        }
    });
}
