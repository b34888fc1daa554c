//! Harbour - simulated chart navigation lights in the terminal
//!
//! Loads a light list, arms every light on one shared baseline and busy-polls
//! them until interrupted.

mod config;
mod strip;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use buoy_sequencer::{LightRegistry, RngSource, StdClock, TimeSource};
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing::info;

use config::{Args, HarbourConfig};
use strip::TerminalStrip;

/// Longest sequence a light may have.
const MAX_DURATIONS: usize = 32;
/// Most lights the registry holds.
const MAX_LIGHTS: usize = 64;

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!("harbour={}", args.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => HarbourConfig::from_file(path)?,
        None => HarbourConfig::builtin()?,
    };
    let settle = Duration::from_millis(args.settle_ms.unwrap_or(config.settle_ms));

    let mut registry = LightRegistry::<_, MAX_DURATIONS, MAX_LIGHTS>::new();
    let mut strip = TerminalStrip::new(!args.no_strip);
    for light in &config.lights {
        let timer = light.to_timer::<MAX_DURATIONS>()?;
        info!(
            light = %light.name,
            pixel = light.pixel,
            durations = ?timer.sequence().durations(),
            "initialising light"
        );
        strip.label(timer.pixel(), timer.name());
        registry
            .register(timer)
            .with_context(|| format!("cannot register light '{}'", light.name))?;
    }

    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGINT, Arc::clone(&stop))?;
    signal_hook::flag::register(SIGTERM, Arc::clone(&stop))?;

    let clock = StdClock;
    let mut rng = RngSource::new(rand::thread_rng());

    // Give every light the same baseline, slightly in the future
    let baseline = clock.now() + settle;
    registry.arm_all(baseline, &mut rng);
    info!(lights = registry.len(), settle_ms = settle.as_millis() as u64, "lights armed");

    let pace = Duration::from_micros(args.pace_us);
    let passes = registry.run(&clock, &mut rng, &mut strip, || {
        if !pace.is_zero() {
            std::thread::sleep(pace);
        }
        !stop.load(Ordering::Relaxed)
    });

    strip.finish();
    info!(passes, "stopped");
    Ok(())
}
