use anyhow::{anyhow, Result};
use colored::{ColoredString, Colorize};

use crate::app_config::ThemeConfig;
use crate::diff::{DiffTag, RenderInstruction};
use crate::render::Renderer;

type Rgb = (u8, u8, u8);

/// Parse a `#RRGGBB` colour
pub fn parse_hex_color(value: &str) -> Result<Rgb> {
    let hex = value
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6 && hex.is_ascii())
        .ok_or_else(|| anyhow!("Invalid colour '{}', expected #RRGGBB", value))?;

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|e| anyhow!("Invalid colour '{}': {}", value, e))
    };

    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Terminal output with 24-bit background colours.
///
/// Colouring follows the `colored` crate's global switch, so piping the
/// output to a file yields plain prefixed text unless colours are forced.
#[derive(Debug)]
pub struct AnsiRenderer {
    removed: Rgb,
    added: Rgb,
    removed_highlight: Rgb,
    added_highlight: Rgb,
    foreground: Rgb,
    buffer: String,
}

impl AnsiRenderer {
    pub fn new(theme: &ThemeConfig) -> Result<Self> {
        Ok(Self {
            removed: parse_hex_color(&theme.removed)?,
            added: parse_hex_color(&theme.added)?,
            removed_highlight: parse_hex_color(&theme.removed_highlight)?,
            added_highlight: parse_hex_color(&theme.added_highlight)?,
            foreground: parse_hex_color(&theme.foreground)?,
            buffer: String::new(),
        })
    }

    fn paint(&self, text: &str, background: Rgb, bold: bool) -> ColoredString {
        let (fr, fg, fb) = self.foreground;
        let (br, bg, bb) = background;
        let painted = text.truecolor(fr, fg, fb).on_truecolor(br, bg, bb);
        if bold {
            painted.bold()
        } else {
            painted
        }
    }
}

impl Renderer for AnsiRenderer {
    fn render(&mut self, instruction: &RenderInstruction) {
        let (background, highlight) = match instruction.tag {
            DiffTag::Unchanged => {
                self.buffer.push_str(instruction.prefix());
                self.buffer.push_str(&instruction.line);
                self.buffer.push('\n');
                return;
            }
            DiffTag::Removed => (self.removed, self.removed_highlight),
            DiffTag::Added => (self.added, self.added_highlight),
        };

        let mut line = self.paint(instruction.prefix(), background, false).to_string();
        for (text, highlighted) in instruction.segments() {
            if text.is_empty() {
                continue;
            }
            let painted = if highlighted {
                self.paint(text, highlight, true)
            } else {
                self.paint(text, background, false)
            };
            line.push_str(&painted.to_string());
        }

        self.buffer.push_str(&line);
        self.buffer.push('\n');
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}
