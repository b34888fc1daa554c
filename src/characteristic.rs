//! Nautical chart light characteristics.
//!
//! Parses the abbreviated notation printed next to lights on charts, such as
//! `Fl(2) WRG 6s` or `Q(6)+LFl 15s`, and expands it into a [`FlashSequence`]
//! whose cycle matches the stated period.
//!
//! Supported classes: `Fl` flashing, `LFl` long flashing, `Q`/`QF` quick,
//! `VQ` very quick, `UQ` ultra quick, `Iso` isophase and `Oc` occulting.
//! Groups are written `(n)` after the class, phases are joined with `+`,
//! colours are the chart letters `W R G Y Bu`, and the period ends in `s`.
//! Class names and the period suffix are case-insensitive.

use crate::colors::ChartColour;
use crate::sequence::FlashSequence;
use crate::time::TimeDuration;
use crate::types::InvalidSequence;
use core::fmt;
use core::str::FromStr;
use heapless::Vec;
use palette::Srgb;
use winnow::ascii::{Caseless, dec_uint, float, space0, space1};
use winnow::combinator::{alt, delimited, opt, preceded, terminated};
use winnow::ModalResult;
use winnow::prelude::*;
use winnow::token::literal;

/// Maximum number of `+`-joined phases.
pub const MAX_PHASES: usize = 4;
/// Maximum number of colour letters.
pub const MAX_COLOURS: usize = 4;

/// Light class of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightClass {
    /// `Fl`: short flashes, 0.5s on.
    Flash,
    /// `LFl`: long flashes, 2s on.
    LongFlash,
    /// `Q`: 60 flashes per minute.
    Quick,
    /// `VQ`: 120 flashes per minute.
    VeryQuick,
    /// `UQ`: 240 flashes per minute.
    UltraQuick,
    /// `Iso`: equal light and dark.
    Isophase,
    /// `Oc`: light longer than dark, interrupted by eclipses.
    Occulting,
}

impl LightClass {
    /// Chart abbreviation.
    pub fn abbreviation(self) -> &'static str {
        match self {
            LightClass::Flash => "Fl",
            LightClass::LongFlash => "LFl",
            LightClass::Quick => "Q",
            LightClass::VeryQuick => "VQ",
            LightClass::UltraQuick => "UQ",
            LightClass::Isophase => "Iso",
            LightClass::Occulting => "Oc",
        }
    }

    /// (on, eclipse) in milliseconds for one flash within a group.
    fn flash_timing_ms(self) -> Option<(u32, u32)> {
        match self {
            LightClass::Flash => Some((500, 500)),
            LightClass::LongFlash => Some((2_000, 1_000)),
            LightClass::Quick => Some((500, 500)),
            LightClass::VeryQuick => Some((250, 250)),
            LightClass::UltraQuick => Some((125, 125)),
            LightClass::Isophase | LightClass::Occulting => None,
        }
    }

    fn is_continuous_quick(self) -> bool {
        matches!(
            self,
            LightClass::Quick | LightClass::VeryQuick | LightClass::UltraQuick
        )
    }
}

/// One class with its group count, e.g. `Fl(2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase {
    pub class: LightClass,
    /// Group count as written; `None` when no `(n)` was given.
    pub group: Option<u8>,
}

impl Phase {
    /// Number of flashes (or eclipses, for `Oc`) per cycle.
    pub fn count(&self) -> u8 {
        self.group.unwrap_or(1)
    }
}

/// Errors from parsing or expanding a characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CharacteristicError {
    /// The text does not follow the notation.
    Syntax {
        /// Byte offset where parsing stopped.
        offset: usize,
    },
    /// More than [`MAX_PHASES`] phases or [`MAX_COLOURS`] colours.
    TooManyParts,
    /// A group count of zero.
    EmptyGroup,
    /// The period is zero or not a number.
    InvalidPeriod,
    /// The class needs a period to define its cycle.
    MissingPeriod,
    /// The flashes do not fit in the stated period.
    PeriodTooShort {
        /// Shortest period that fits, in milliseconds.
        required_ms: u32,
        /// Stated period, in milliseconds.
        period_ms: u32,
    },
    /// `Iso` and `Oc` cannot be combined with other phases, and `Iso` takes
    /// no group.
    UnsupportedCombination,
    /// The expanded sequence did not fit the target capacity.
    Sequence(InvalidSequence),
}

impl fmt::Display for CharacteristicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacteristicError::Syntax { offset } => {
                write!(f, "invalid characteristic at byte {}", offset)
            }
            CharacteristicError::TooManyParts => {
                write!(
                    f,
                    "at most {} phases and {} colours are supported",
                    MAX_PHASES, MAX_COLOURS
                )
            }
            CharacteristicError::EmptyGroup => write!(f, "group count must be at least 1"),
            CharacteristicError::InvalidPeriod => write!(f, "period must be a positive number"),
            CharacteristicError::MissingPeriod => write!(f, "characteristic needs a period"),
            CharacteristicError::PeriodTooShort {
                required_ms,
                period_ms,
            } => {
                write!(
                    f,
                    "period of {}ms is shorter than the {}ms the flashes need",
                    period_ms, required_ms
                )
            }
            CharacteristicError::UnsupportedCombination => {
                write!(f, "Iso and Oc must stand alone and Iso takes no group")
            }
            CharacteristicError::Sequence(err) => write!(f, "sequence error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CharacteristicError {}

impl From<InvalidSequence> for CharacteristicError {
    fn from(err: InvalidSequence) -> Self {
        CharacteristicError::Sequence(err)
    }
}

/// A parsed light characteristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characteristic {
    phases: Vec<Phase, MAX_PHASES>,
    colours: Vec<ChartColour, MAX_COLOURS>,
    period_ms: Option<u32>,
}

impl Characteristic {
    /// Parses chart notation, e.g. `"Fl(2) WRG 6s"`.
    pub fn parse(text: &str) -> Result<Self, CharacteristicError> {
        let raw = characteristic
            .parse(text.trim())
            .map_err(|err| CharacteristicError::Syntax {
                offset: err.offset(),
            })?;

        if raw.phase_count > MAX_PHASES || raw.colour_count > MAX_COLOURS {
            return Err(CharacteristicError::TooManyParts);
        }
        if raw.phases.iter().any(|p| p.group == Some(0)) {
            return Err(CharacteristicError::EmptyGroup);
        }

        let period_ms = match raw.period_secs {
            Some(secs) if secs > 0.0 => Some((secs * 1_000.0 + 0.5) as u32),
            Some(_) => return Err(CharacteristicError::InvalidPeriod),
            None => None,
        };

        let parsed = Self {
            phases: raw.phases,
            colours: raw.colours,
            period_ms,
        };
        parsed.check_combination()?;
        Ok(parsed)
    }

    fn check_combination(&self) -> Result<(), CharacteristicError> {
        let standalone_only = self.phases.iter().any(|p| {
            matches!(p.class, LightClass::Isophase | LightClass::Occulting)
        });
        if standalone_only && self.phases.len() > 1 {
            return Err(CharacteristicError::UnsupportedCombination);
        }
        if self
            .phases
            .iter()
            .any(|p| p.class == LightClass::Isophase && p.group.is_some())
        {
            return Err(CharacteristicError::UnsupportedCombination);
        }
        Ok(())
    }

    /// Returns the phases in order.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Returns the colour letters in order.
    pub fn colours(&self) -> &[ChartColour] {
        &self.colours
    }

    /// Returns the display colour of the first colour letter, if any.
    pub fn primary_color(&self) -> Option<Srgb> {
        self.colours.first().map(|c| c.srgb())
    }

    /// Returns the stated period in milliseconds.
    pub fn period_ms(&self) -> Option<u32> {
        self.period_ms
    }

    /// Expands the characteristic into on/off durations.
    ///
    /// Flashing classes pad their final eclipse so one cycle lasts exactly the
    /// stated period. Without a period only a lone ungrouped quick class is
    /// accepted, as a continuous on/off pair.
    pub fn to_sequence<D: TimeDuration, const N: usize>(
        &self,
    ) -> Result<FlashSequence<D, N>, CharacteristicError> {
        let first = self.phases[0];
        match first.class {
            LightClass::Isophase => self.isophase(),
            LightClass::Occulting => self.occulting(first.count()),
            _ => self.flashing(),
        }
    }

    fn require_period(&self) -> Result<u32, CharacteristicError> {
        self.period_ms.ok_or(CharacteristicError::MissingPeriod)
    }

    fn isophase<D: TimeDuration, const N: usize>(
        &self,
    ) -> Result<FlashSequence<D, N>, CharacteristicError> {
        let period = self.require_period()?;
        if period < 2 {
            return Err(CharacteristicError::PeriodTooShort {
                required_ms: 2,
                period_ms: period,
            });
        }
        let on = period / 2;
        Ok(FlashSequence::builder()
            .on(ms::<D>(on))
            .off(ms::<D>(period - on))
            .build()?)
    }

    fn occulting<D: TimeDuration, const N: usize>(
        &self,
        eclipses: u8,
    ) -> Result<FlashSequence<D, N>, CharacteristicError> {
        let period = self.require_period()?;
        let eclipse: u32 = if eclipses == 1 { 1_000 } else { 500 };

        // Eclipses and the short lights between them; the long light fills the rest.
        let dark_and_short = (2 * u32::from(eclipses) - 1) * eclipse;
        if period <= dark_and_short {
            return Err(CharacteristicError::PeriodTooShort {
                required_ms: dark_and_short + 1,
                period_ms: period,
            });
        }

        let builder = FlashSequence::builder()
            .on(ms::<D>(period - dark_and_short))
            .off(ms::<D>(eclipse));
        Ok(builder
            .flashes(usize::from(eclipses) - 1, ms::<D>(eclipse), ms::<D>(eclipse))
            .build()?)
    }

    fn flashing<D: TimeDuration, const N: usize>(
        &self,
    ) -> Result<FlashSequence<D, N>, CharacteristicError> {
        let timings = || {
            self.phases.iter().flat_map(|phase| {
                let timing = phase.class.flash_timing_ms();
                (0..phase.count()).filter_map(move |_| timing)
            })
        };

        let required: u32 = timings().map(|(on, off)| on + off).sum();
        let flash_count = timings().count();

        let final_eclipse = match self.period_ms {
            Some(period) if period >= required => {
                let (_, last_off) = timings().last().unwrap_or((0, 0));
                period - (required - last_off)
            }
            Some(period) => {
                return Err(CharacteristicError::PeriodTooShort {
                    required_ms: required,
                    period_ms: period,
                });
            }
            None if self.phases.len() == 1
                && self.phases[0].group.is_none()
                && self.phases[0].class.is_continuous_quick() =>
            {
                timings().last().map(|(_, off)| off).unwrap_or(0)
            }
            None => return Err(CharacteristicError::MissingPeriod),
        };

        let mut builder = FlashSequence::builder();
        for (index, (on, off)) in timings().enumerate() {
            let off = if index + 1 == flash_count {
                final_eclipse
            } else {
                off
            };
            builder = builder.on(ms::<D>(on)).off(ms::<D>(off));
        }
        Ok(builder.build()?)
    }
}

impl FromStr for Characteristic {
    type Err = CharacteristicError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Characteristic::parse(text)
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, phase) in self.phases.iter().enumerate() {
            if index > 0 {
                write!(f, "+")?;
            }
            write!(f, "{}", phase.class.abbreviation())?;
            if let Some(group) = phase.group {
                write!(f, "({})", group)?;
            }
        }
        if !self.colours.is_empty() {
            write!(f, " ")?;
            for colour in &self.colours {
                write!(f, "{}", colour.abbreviation())?;
            }
        }
        if let Some(period) = self.period_ms {
            write!(f, " {}s", period as f32 / 1_000.0)?;
        }
        Ok(())
    }
}

fn ms<D: TimeDuration>(millis: u32) -> D {
    D::from_millis(u64::from(millis))
}

struct RawCharacteristic {
    phases: Vec<Phase, MAX_PHASES>,
    phase_count: usize,
    colours: Vec<ChartColour, MAX_COLOURS>,
    colour_count: usize,
    period_secs: Option<f32>,
}

fn characteristic(input: &mut &str) -> ModalResult<RawCharacteristic> {
    let mut phases = Vec::new();
    let mut phase_count = 0;
    loop {
        let next = phase.parse_next(input)?;
        // Overflow is reported after parsing so the error is not a syntax error.
        let _ = phases.push(next);
        phase_count += 1;
        if opt(plus).parse_next(input)?.is_none() {
            break;
        }
    }

    let mut colours = Vec::new();
    let mut colour_count = 0;
    if let Some(first) = opt(preceded(space1, colour)).parse_next(input)? {
        let _ = colours.push(first);
        colour_count += 1;
        while let Some(next) = opt(colour).parse_next(input)? {
            let _ = colours.push(next);
            colour_count += 1;
        }
    }

    let period_secs = opt(preceded(space1, period)).parse_next(input)?;

    Ok(RawCharacteristic {
        phases,
        phase_count,
        colours,
        colour_count,
        period_secs,
    })
}

fn phase(input: &mut &str) -> ModalResult<Phase> {
    (class, opt(group))
        .map(|(class, group)| Phase { class, group })
        .parse_next(input)
}

fn class(input: &mut &str) -> ModalResult<LightClass> {
    alt((
        literal(Caseless("LFl")).value(LightClass::LongFlash),
        literal(Caseless("Fl")).value(LightClass::Flash),
        literal(Caseless("VQ")).value(LightClass::VeryQuick),
        literal(Caseless("UQ")).value(LightClass::UltraQuick),
        literal(Caseless("QF")).value(LightClass::Quick),
        literal(Caseless("Q")).value(LightClass::Quick),
        literal(Caseless("Iso")).value(LightClass::Isophase),
        literal(Caseless("Oc")).value(LightClass::Occulting),
    ))
    .parse_next(input)
}

fn group(input: &mut &str) -> ModalResult<u8> {
    delimited('(', dec_uint, ')').parse_next(input)
}

fn plus(input: &mut &str) -> ModalResult<char> {
    delimited(space0, '+', space0).parse_next(input)
}

fn colour(input: &mut &str) -> ModalResult<ChartColour> {
    alt((
        "Bu".value(ChartColour::Blue),
        'W'.value(ChartColour::White),
        'R'.value(ChartColour::Red),
        'G'.value(ChartColour::Green),
        'Y'.value(ChartColour::Yellow),
    ))
    .parse_next(input)
}

fn period(input: &mut &str) -> ModalResult<f32> {
    terminated(float, literal(Caseless("s"))).parse_next(input)
}
