//! Hex color validation and picker/text-field mirroring

use regex::Regex;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color pattern is valid"));

/// Check for exactly `#` followed by six hex digits
pub fn is_valid_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Parse `#RRGGBB` into its components
pub fn parse_rgb(value: &str) -> Option<[u8; 3]> {
    if !is_valid_hex_color(value) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&value[i..i + 2], 16).ok();
    Some([channel(1)?, channel(3)?, channel(5)?])
}

/// Format components as lowercase `#rrggbb`
pub fn format_rgb(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// A color picker paired with a hex text field
///
/// Picker changes always overwrite the text. Text changes reach the picker
/// only once they form a valid `#RRGGBB` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorField {
    rgb: [u8; 3],
    hex_text: String,
}

impl ColorField {
    /// Start from a hex value; invalid input falls back to black
    pub fn new(initial: &str) -> Self {
        let rgb = parse_rgb(initial).unwrap_or([0, 0, 0]);
        Self {
            rgb,
            hex_text: initial.to_string(),
        }
    }

    /// Picker moved
    pub fn on_picker_input(&mut self, rgb: [u8; 3]) {
        self.rgb = rgb;
        self.hex_text = format_rgb(rgb);
    }

    /// Hex text edited; returns whether the picker was updated
    pub fn on_hex_input(&mut self, text: impl Into<String>) -> bool {
        self.hex_text = text.into();
        match parse_rgb(&self.hex_text) {
            Some(rgb) => {
                self.rgb = rgb;
                true
            }
            None => false,
        }
    }

    /// The picker's value, which is what forms submit
    pub fn value(&self) -> String {
        format_rgb(self.rgb)
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    pub fn hex_text(&self) -> &str {
        &self.hex_text
    }

    pub fn hex_text_mut(&mut self) -> &mut String {
        &mut self.hex_text
    }

    /// Re-sync the picker after the text was edited in place
    pub fn commit_hex_text(&mut self) -> bool {
        let text = self.hex_text.clone();
        self.on_hex_input(text)
    }
}
