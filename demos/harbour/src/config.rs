//! Configuration: CLI arguments and the TOML light list

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use buoy_sequencer::{ChartColour, Characteristic, CYAN, LightTimer, PURPLE, PixelId, Srgb};
use clap::Parser;
use serde::Deserialize;
use tracing::warn;

/// Built-in light list, used when no `--config` is given.
const BUILTIN_CONFIG: &str = include_str!("../harbour.toml");

fn default_settle_ms() -> u64 {
    100
}

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "harbour")]
#[command(about = "Simulate chart navigation lights in the terminal")]
#[command(version)]
pub struct Args {
    /// TOML file listing the lights (defaults to the built-in Oban harbour set)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Delay between arming and the synchronised start, overrides the file
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Sleep between polling passes in microseconds (0 = busy-poll)
    #[arg(long, default_value = "0")]
    pub pace_us: u64,

    /// Do not draw the light strip, only log
    #[arg(long)]
    pub no_strip: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// The light list.
#[derive(Debug, Deserialize)]
pub struct HarbourConfig {
    /// Milliseconds between startup and the common baseline.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(rename = "light", default)]
    pub lights: Vec<LightEntry>,
}

/// One light in the configuration file.
#[derive(Debug, Deserialize)]
pub struct LightEntry {
    pub name: String,
    pub pixel: usize,
    #[serde(default)]
    pub colour: Option<ColourSpec>,
    /// On/off durations in seconds, starting with on.
    #[serde(default)]
    pub sequence: Option<Vec<f32>>,
    /// Chart notation, e.g. `Fl(2) WRG 6s`.
    #[serde(default)]
    pub characteristic: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub initial_delay: f32,
    /// Seconds, applied as plus or minus this amount.
    #[serde(default)]
    pub jitter: f32,
}

/// A colour given by name, chart letter or RGB triple.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ColourSpec {
    Named(String),
    Rgb([u8; 3]),
}

impl ColourSpec {
    pub fn to_srgb(&self) -> Result<Srgb> {
        match self {
            ColourSpec::Rgb([r, g, b]) => Ok(Srgb::new(*r, *g, *b).into_format()),
            ColourSpec::Named(name) => {
                if let Some(colour) = ChartColour::from_abbreviation(name) {
                    return Ok(colour.srgb());
                }
                match name.to_ascii_lowercase().as_str() {
                    "white" => Ok(ChartColour::White.srgb()),
                    "red" => Ok(ChartColour::Red.srgb()),
                    "green" => Ok(ChartColour::Green.srgb()),
                    "yellow" => Ok(ChartColour::Yellow.srgb()),
                    "blue" => Ok(ChartColour::Blue.srgb()),
                    "cyan" => Ok(CYAN),
                    "purple" => Ok(PURPLE),
                    _ => bail!("unknown colour '{}'", name),
                }
            }
        }
    }
}

impl HarbourConfig {
    /// Load config from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("failed to load config file {}", path.display()))
    }

    /// Parse config from TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse TOML")
    }

    /// The built-in Oban harbour lights
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_CONFIG)
    }
}

impl LightEntry {
    /// Builds the timer for this light. The timer borrows the name.
    pub fn to_timer<const N: usize>(&self) -> Result<LightTimer<'_, Instant, N>> {
        let seconds = |field: &str, value: f32| {
            Duration::try_from_secs_f32(value)
                .map_err(|_| anyhow!("{} of '{}' must be a non-negative number", field, self.name))
        };

        let builder = LightTimer::builder(&self.name, PixelId(self.pixel))
            .initial_delay(seconds("initial_delay", self.initial_delay)?)
            .jitter(seconds("jitter", self.jitter)?);

        let (builder, chart_colour) = match (&self.sequence, &self.characteristic) {
            (Some(durations), None) => {
                // Negative or NaN entries become zero so the sequence check
                // reports them by index.
                let durations: Vec<Duration> = durations
                    .iter()
                    .map(|secs| Duration::try_from_secs_f32(*secs).unwrap_or(Duration::ZERO))
                    .collect();
                (builder.sequence(&durations), None)
            }
            (None, Some(text)) => {
                let characteristic = Characteristic::parse(text)
                    .with_context(|| format!("light '{}': bad characteristic '{}'", self.name, text))?;
                let sequence = characteristic
                    .to_sequence()
                    .with_context(|| format!("light '{}': cannot expand '{}'", self.name, text))?;
                (builder.flash_sequence(sequence), characteristic.primary_color())
            }
            (Some(_), Some(_)) => {
                bail!("light '{}' has both a sequence and a characteristic", self.name)
            }
            (None, None) => bail!("light '{}' needs a sequence or a characteristic", self.name),
        };

        let builder = match (&self.colour, chart_colour) {
            (Some(spec), _) => builder.color(
                spec.to_srgb()
                    .with_context(|| format!("light '{}'", self.name))?,
            ),
            (None, Some(colour)) => builder.color(colour),
            (None, None) => builder,
        };

        let timer = builder
            .build()
            .with_context(|| format!("light '{}' has an invalid sequence", self.name))?;

        let shortest = timer.sequence().durations().iter().min().copied();
        if let Some(shortest) = shortest {
            if timer.jitter() >= shortest {
                warn!(
                    light = %self.name,
                    "jitter of {:?} is not below the shortest duration {:?}; intervals will be clamped",
                    timer.jitter(),
                    shortest
                );
            }
        }

        Ok(timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buoy_sequencer::{InvalidSequence, RED, YELLOW};

    #[test]
    fn builtin_config_loads_all_lights() {
        let config = HarbourConfig::builtin().unwrap();
        assert_eq!(config.settle_ms, 100);
        assert_eq!(config.lights.len(), 9);

        for light in &config.lights {
            light.to_timer::<16>().unwrap();
        }
    }

    #[test]
    fn characteristic_supplies_default_colour() {
        let config = HarbourConfig::from_toml(
            r#"
            [[light]]
            name = "Heather Port"
            pixel = 0
            characteristic = "Fl R 2.5s"
            "#,
        )
        .unwrap();

        let timer = config.lights[0].to_timer::<4>().unwrap();
        assert_eq!(timer.color(), RED);
        assert_eq!(
            timer.sequence().durations(),
            &[Duration::from_millis(500), Duration::from_millis(2000)]
        );
    }

    #[test]
    fn explicit_colour_overrides_characteristic() {
        let config = HarbourConfig::from_toml(
            r#"
            [[light]]
            name = "Yellow"
            pixel = 1
            colour = "yellow"
            characteristic = "Fl R 5s"
            "#,
        )
        .unwrap();

        let timer = config.lights[0].to_timer::<4>().unwrap();
        assert_eq!(timer.color(), YELLOW);
    }

    #[test]
    fn rgb_triple_is_accepted() {
        let colour = ColourSpec::Rgb([255, 0, 255]).to_srgb().unwrap();
        assert_eq!(colour, Srgb::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn negative_duration_is_reported_by_index() {
        let config = HarbourConfig::from_toml(
            r#"
            [[light]]
            name = "broken"
            pixel = 0
            sequence = [1.0, -0.5]
            "#,
        )
        .unwrap();

        let err = config.lights[0].to_timer::<4>().unwrap_err();
        assert_eq!(
            err.downcast_ref::<InvalidSequence>(),
            Some(&InvalidSequence::NonPositiveDuration { index: 1 })
        );
    }

    #[test]
    fn light_needs_exactly_one_pattern() {
        let config = HarbourConfig::from_toml(
            r#"
            [[light]]
            name = "blank"
            pixel = 0
            "#,
        )
        .unwrap();

        assert!(config.lights[0].to_timer::<4>().is_err());
    }

    #[test]
    fn unknown_colour_is_rejected() {
        assert!(ColourSpec::Named("mauve".into()).to_srgb().is_err());
    }
}
