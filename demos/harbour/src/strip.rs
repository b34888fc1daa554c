//! Terminal rendering of the light elements

use std::io::Write;

use buoy_sequencer::{COLOR_OFF, LightOutput, PixelId, Srgb};
use tracing::debug;

/// A row of pixels drawn on one terminal line.
///
/// Every command is logged; the row is redrawn in place when drawing is
/// enabled. Write errors are ignored since the sink cannot fail.
pub struct TerminalStrip<'a> {
    pixels: Vec<Srgb>,
    names: Vec<Option<&'a str>>,
    draw: bool,
}

impl<'a> TerminalStrip<'a> {
    pub fn new(draw: bool) -> Self {
        Self {
            pixels: Vec::new(),
            names: Vec::new(),
            draw,
        }
    }

    /// Records which light drives `pixel`, for log output.
    pub fn label(&mut self, pixel: PixelId, name: &'a str) {
        self.ensure(pixel);
        self.names[pixel.0] = Some(name);
    }

    fn ensure(&mut self, pixel: PixelId) {
        if pixel.0 >= self.pixels.len() {
            self.pixels.resize(pixel.0 + 1, COLOR_OFF);
            self.names.resize(pixel.0 + 1, None);
        }
    }

    fn render(&self) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\r");
        for color in &self.pixels {
            let rgb: Srgb<u8> = color.into_format();
            let glyph = if *color == COLOR_OFF { '○' } else { '●' };
            let _ = write!(
                out,
                "\x1b[38;2;{};{};{}m{}\x1b[0m ",
                rgb.red, rgb.green, rgb.blue, glyph
            );
        }
        let _ = out.flush();
    }

    /// Moves the cursor off the strip line.
    pub fn finish(&self) {
        if self.draw {
            println!();
        }
    }
}

impl LightOutput for TerminalStrip<'_> {
    fn set_pixel(&mut self, pixel: PixelId, color: Srgb) {
        self.ensure(pixel);
        self.pixels[pixel.0] = color;

        let name = self.names[pixel.0].unwrap_or("unnamed");
        if color == COLOR_OFF {
            debug!(pixel = pixel.0, light = name, "turning off");
        } else {
            debug!(pixel = pixel.0, light = name, "turning on");
        }

        if self.draw {
            self.render();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buoy_sequencer::GREEN;

    #[test]
    fn pixels_grow_on_demand() {
        let mut strip = TerminalStrip::new(false);
        strip.set_pixel(PixelId(4), GREEN);

        assert_eq!(strip.pixels.len(), 5);
        assert_eq!(strip.pixels[4], GREEN);
        assert_eq!(strip.pixels[0], COLOR_OFF);
    }

    #[test]
    fn labels_follow_pixels() {
        let mut strip = TerminalStrip::new(false);
        strip.label(PixelId(2), "Dunollie Light Red");

        assert_eq!(strip.names[2], Some("Dunollie Light Red"));
        assert_eq!(strip.names[0], None);
    }
}
