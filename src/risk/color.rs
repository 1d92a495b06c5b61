use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque 8-bit color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	pub const fn with_alpha(self, a: f64) -> Rgba {
		Rgba { rgb: self, a }
	}

	/// `#rrggbb`, lowercase.
	pub fn to_hex(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

/// Color with opacity, rendered as a CSS `rgba()` string.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
	pub rgb: Rgb,
	pub a: f64,
}

impl fmt::Display for Rgba {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"rgba({}, {}, {}, {})",
			self.rgb.r, self.rgb.g, self.rgb.b, self.a
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_is_zero_padded() {
		assert_eq!(Rgb::new(220, 38, 38).to_hex(), "#dc2626");
		assert_eq!(Rgb::new(0, 5, 10).to_hex(), "#00050a");
	}

	#[test]
	fn rgba_css() {
		assert_eq!(
			Rgb::new(239, 68, 68).with_alpha(0.4).to_string(),
			"rgba(239, 68, 68, 0.4)"
		);
	}
}
