/*
 *  button.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  Debounced push-button latch shared between the edge interrupt
 *  and the display loop
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Contact bounce window
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

const NEVER: u64 = u64::MAX;

/// Press flag plus last accepted edge time.
///
/// `last_press_ms` is only written by the edge handler. `pressed` is raised by
/// the edge handler and cleared by the display loop through
/// [`take_press`](Self::take_press). Nothing else may touch either field, and
/// nothing slower than an atomic store runs on the interrupt side.
#[derive(Debug)]
pub struct ButtonLatch {
    pressed: AtomicBool,
    last_press_ms: AtomicU64,
    debounce_ms: u64,
    origin: Instant,
}

impl ButtonLatch {
    pub fn new(debounce: Duration) -> Self {
        Self {
            pressed: AtomicBool::new(false),
            last_press_ms: AtomicU64::new(NEVER),
            debounce_ms: debounce.as_millis() as u64,
            origin: Instant::now(),
        }
    }

    /// Record a falling edge now. Returns whether it was accepted.
    pub fn on_edge(&self) -> bool {
        self.on_edge_at(self.origin.elapsed().as_millis() as u64)
    }

    /// Record a falling edge at `now_ms` (milliseconds since the latch was
    /// created). Edges inside the debounce window of the last accepted edge
    /// are bounce and get dropped.
    pub fn on_edge_at(&self, now_ms: u64) -> bool {
        let last = self.last_press_ms.load(Ordering::Acquire);
        if last != NEVER && now_ms.saturating_sub(last) < self.debounce_ms {
            return false;
        }
        self.last_press_ms.store(now_ms, Ordering::Release);
        self.pressed.store(true, Ordering::Release);
        true
    }

    /// Read and clear the press flag. Display loop only.
    pub fn take_press(&self) -> bool {
        self.pressed.swap(false, Ordering::AcqRel)
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Acquire)
    }
}

impl Default for ButtonLatch {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(feature = "gpio-button")]
pub use gpio::ButtonInput;

#[cfg(feature = "gpio-button")]
mod gpio {
    use super::ButtonLatch;
    use crate::display::error::DisplayError;
    use log::info;
    use rppal::gpio::{Gpio, InputPin, Trigger};
    use std::sync::Arc;

    /// Falling-edge button on a BCM GPIO pin with the internal pull-up.
    ///
    /// The interrupt stays registered for as long as this value lives.
    pub struct ButtonInput {
        _pin: InputPin,
        bcm: u8,
    }

    impl ButtonInput {
        pub fn attach(bcm: u8, latch: Arc<ButtonLatch>) -> Result<Self, DisplayError> {
            let gpio = Gpio::new().map_err(|e| DisplayError::GpioError(e.to_string()))?;
            let mut pin = gpio
                .get(bcm)
                .map_err(|e| DisplayError::GpioError(format!("GPIO{}: {}", bcm, e)))?
                .into_input_pullup();

            // interrupt context: flag and timestamp only, no logging or bus I/O
            pin.set_async_interrupt(Trigger::FallingEdge, move |_level| {
                latch.on_edge();
            })
            .map_err(|e| DisplayError::GpioError(format!("GPIO{} interrupt: {}", bcm, e)))?;

            info!("Button armed on GPIO{} (falling edge, pull-up)", bcm);
            Ok(Self { _pin: pin, bcm })
        }

        pub fn pin(&self) -> u8 {
            self.bcm
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_first_edge_is_accepted() {
        let latch = ButtonLatch::default();
        assert!(!latch.is_pressed());
        assert!(latch.on_edge_at(0));
        assert!(latch.take_press());
    }

    #[test]
    fn test_bounce_inside_window_collapses() {
        let latch = ButtonLatch::default();
        assert!(latch.on_edge_at(1_000));
        assert!(!latch.on_edge_at(1_010));
        assert!(!latch.on_edge_at(1_249));
        assert!(latch.take_press());
        assert!(!latch.take_press());
    }

    #[test]
    fn test_edges_at_window_apart_both_count() {
        let latch = ButtonLatch::default();
        assert!(latch.on_edge_at(1_000));
        assert!(latch.take_press());
        assert!(latch.on_edge_at(1_250));
        assert!(latch.take_press());
        assert!(latch.on_edge_at(1_800));
        assert!(latch.take_press());
    }

    #[test]
    fn test_rejected_edge_does_not_move_window() {
        let latch = ButtonLatch::default();
        assert!(latch.on_edge_at(0));
        assert!(!latch.on_edge_at(200));
        // measured from the accepted edge at 0, not the bounce at 200
        assert!(latch.on_edge_at(260));
    }

    #[test]
    fn test_storm_yields_single_press() {
        let latch = ButtonLatch::default();
        let accepted = (0..100u64).filter(|i| latch.on_edge_at(5_000 + i * 2)).count();
        assert_eq!(accepted, 1);
        assert!(latch.take_press());
        assert!(!latch.is_pressed());
    }

    #[test]
    fn test_custom_window() {
        let latch = ButtonLatch::new(Duration::from_millis(50));
        assert!(latch.on_edge_at(0));
        assert!(latch.on_edge_at(50));
        assert!(!latch.on_edge_at(99));
    }

    #[test]
    fn test_edge_from_other_thread_visible_to_loop() {
        let latch = Arc::new(ButtonLatch::default());
        let isr = Arc::clone(&latch);
        thread::spawn(move || {
            isr.on_edge();
        })
        .join()
        .unwrap();
        assert!(latch.take_press());
    }
}
