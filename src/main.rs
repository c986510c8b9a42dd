/*
 *  main.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  Wires configuration, weather feed, button and panel together and
 *  runs the display loop until a termination signal
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

use anyhow::Context;
use env_logger::Env;
use linux_embedded_hal::Delay;
use log::{error, info, warn};
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tokio::task::JoinHandle;

use tokio::signal::unix::{signal, SignalKind};

use portlcd::config::{self, Config};
use portlcd::display::{self, CharacterDisplay, MockLcd, ViewRenderer, ViewScheduler};
use portlcd::weather::OpenMeteo;
use portlcd::{ButtonLatch, PortDataProvider};

#[cfg(feature = "gpio-button")]
use portlcd::button::ButtonInput;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
/// Once one is caught it is logged and the function returns, allowing for
/// graceful shutdown.
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

/// Emulated button: every line on stdin is a falling edge
fn spawn_stdin_button(latch: Arc<ButtonLatch>) -> std::io::Result<()> {
    thread::Builder::new()
        .name("stdin-button".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                if line.is_err() {
                    break;
                }
                if !latch.on_edge() {
                    info!("Button bounce ignored");
                }
            }
        })?;
    info!("Emulated button: press Enter to advance");
    Ok(())
}

/// Move the panel into a scheduler on the blocking pool and start rotating
fn spawn_display_loop<L>(
    mut lcd: L,
    provider: PortDataProvider,
    cfg: &Config,
    latch: Arc<ButtonLatch>,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()>
where
    L: CharacterDisplay + 'static,
{
    lcd.set_backlight(cfg.lcd.backlight);
    let renderer = ViewRenderer::new(lcd, Delay, cfg.scroll_timing());
    let mut scheduler = ViewScheduler::new(renderer, provider, cfg.scheduler_timing());
    tokio::task::spawn_blocking(move || scheduler.run(&latch, &stop))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load().context("loading configuration")?;

    // Initialize the logger with the configured level
    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level.as_str()))
        .format_timestamp_secs()
        .init();

    info!("This {} watches the Maas", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let (weather_task, weather_rx) = if cfg.weather.enabled {
        let client = OpenMeteo::new(cfg.weather.latitude, cfg.weather.longitude)
            .context("building weather client")?;
        info!(
            "Weather feed for {:.2},{:.2} every {}s",
            cfg.weather.latitude, cfg.weather.longitude, cfg.weather.refresh_secs
        );
        let (handle, rx) = client.start_polling(cfg.weather_refresh());
        (Some(handle), Some(rx))
    } else {
        info!("Weather feed disabled, showing simulated conditions");
        (None, None)
    };
    let provider = PortDataProvider::new(weather_rx);

    let latch = Arc::new(ButtonLatch::new(cfg.debounce()));
    let stop = Arc::new(AtomicBool::new(false));

    // the interrupt stays armed while this lives
    #[cfg(feature = "gpio-button")]
    let mut _button_input: Option<ButtonInput> = None;

    let mut display_task = if cfg.emulated {
        info!("Emulation mode enabled - panel is logged, no hardware touched");
        spawn_stdin_button(Arc::clone(&latch)).context("starting stdin button")?;
        let lcd = MockLcd::new().with_echo(true);
        spawn_display_loop(lcd, provider, &cfg, Arc::clone(&latch), Arc::clone(&stop))
    } else {
        let lcd = display::open_i2c(&cfg.lcd.bus, cfg.lcd.address).context("opening LCD")?;

        #[cfg(feature = "gpio-button")]
        {
            _button_input = Some(
                ButtonInput::attach(cfg.button.pin, Arc::clone(&latch)).context("arming button")?,
            );
        }
        #[cfg(not(feature = "gpio-button"))]
        warn!("Built without gpio-button, views advance on the timer only");

        spawn_display_loop(lcd, provider, &cfg, Arc::clone(&latch), Arc::clone(&stop))
    };

    let finished = tokio::select! {
        res = signal_handler() => {
            if let Err(e) = res {
                error!("Signal handler failed: {}", e);
            }
            None
        }
        res = &mut display_task => {
            warn!("Display loop ended unexpectedly");
            Some(res)
        }
    };

    stop.store(true, Ordering::Release);
    let res = match finished {
        Some(res) => res,
        None => display_task.await,
    };
    if let Err(e) = res {
        error!("Display loop failed: {}", e);
    }

    if let Some(handle) = weather_task {
        handle.abort();
    }
    info!("Shutdown complete");
    Ok(())
}
