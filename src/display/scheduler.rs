/*
 *  display/scheduler.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  View rotation: advances on a timer or a button press, fetching a
 *  fresh record each time
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

use embedded_hal::delay::DelayNs;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::button::ButtonLatch;
use crate::display::renderer::ViewRenderer;
use crate::display::traits::CharacterDisplay;
use crate::display::views::View;
use crate::port_data::DataProvider;
use crate::record::DisplayRecord;

/// Loop cadence for the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerTiming {
    /// Advance on our own after this long without one
    pub auto_advance: Duration,

    /// Sleep between ticks
    pub poll: Duration,
}

impl Default for SchedulerTiming {
    fn default() -> Self {
        Self {
            auto_advance: Duration::from_millis(5000),
            poll: Duration::from_millis(50),
        }
    }
}

/// Why a tick advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceCause {
    Button,
    Timer,
}

/// Round-robin over [`View::ALL`].
///
/// The only state is the index of the next view to show. There is no skip
/// or jump: every advance shows the next view in order and wraps after the
/// last.
pub struct ViewScheduler<L, D, P> {
    renderer: ViewRenderer<L, D>,
    provider: P,
    timing: SchedulerTiming,
    current: usize,
    last_advance: Instant,
}

impl<L, D, P> ViewScheduler<L, D, P>
where
    L: CharacterDisplay,
    D: DelayNs,
    P: DataProvider,
{
    pub fn new(renderer: ViewRenderer<L, D>, provider: P, timing: SchedulerTiming) -> Self {
        Self {
            renderer,
            provider,
            timing,
            current: 0,
            last_advance: Instant::now(),
        }
    }

    /// Index of the view the next advance will render
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_view(&self) -> View {
        View::from_index(self.current)
    }

    pub fn renderer(&self) -> &ViewRenderer<L, D> {
        &self.renderer
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Render the current view with `record`, then step to the next one.
    /// Returns the view that was rendered.
    pub fn advance(&mut self, record: &DisplayRecord) -> View {
        let view = View::from_index(self.current);
        self.renderer.render_view(view, record);
        self.current = (self.current + 1) % View::COUNT;
        view
    }

    /// Bring the panel up and show the first view straight away.
    ///
    /// `now` is taken as the moment that first render finished, so the first
    /// view gets a full auto-advance interval after it.
    pub fn start_at(&mut self, now: Instant) -> View {
        let view = self.show_first();
        self.last_advance = now;
        view
    }

    /// [`start_at`](Self::start_at) with the clock read once the render is done
    pub fn start(&mut self) -> View {
        let view = self.show_first();
        self.last_advance = Instant::now();
        view
    }

    fn show_first(&mut self) -> View {
        self.renderer.lcd_mut().init();
        let record = self.provider.fetch();
        let view = self.advance(&record);
        log_advance(&record, view, None);
        view
    }

    /// One pass of the loop at time `now`.
    ///
    /// Advances when the auto-advance interval has run out or the button was
    /// pressed. The timer restarts from `now`, before the render, so a view
    /// that scrolls for longer than the interval is followed immediately by
    /// the next one.
    pub fn tick_at(&mut self, now: Instant, button: &ButtonLatch) -> Option<View> {
        let auto_due = now.saturating_duration_since(self.last_advance) >= self.timing.auto_advance;
        let pressed = button.take_press();
        if !(pressed || auto_due) {
            return None;
        }

        let cause = if pressed { AdvanceCause::Button } else { AdvanceCause::Timer };
        self.last_advance = now;
        let record = self.provider.fetch();
        let view = self.advance(&record);
        log_advance(&record, view, Some(cause));
        Some(view)
    }

    /// Run until `stop` is raised, then blank the panel.
    ///
    /// Renders block this thread; a press that lands mid-render is picked up
    /// by the first tick after it returns.
    pub fn run(&mut self, button: &ButtonLatch, stop: &AtomicBool) {
        info!(
            "Rotating {} views every {:?} (or on button)",
            View::COUNT,
            self.timing.auto_advance
        );
        self.start();

        while !stop.load(Ordering::Acquire) {
            self.tick_at(Instant::now(), button);
            thread::sleep(self.timing.poll);
        }

        info!("Display loop stopping");
        self.renderer.clear();
    }
}

fn log_advance(record: &DisplayRecord, view: View, cause: Option<AdvanceCause>) {
    info!("Advanced at {} [{}] -> {}", record.timestamp, record.data_source, view);
    if let Some(cause) = cause {
        debug!("advance cause: {:?}", cause);
    }
}
