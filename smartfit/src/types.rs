//! Decoded results of the prediction service
//!
//! These are the normalized shapes every screen consumes. Raw JSON never
//! leaves the mapper; see [`crate::mapper`].

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Substituted for any string field the server left out
pub const NOT_AVAILABLE: &str = "Not Available";

/// Substituted for a product without an ASIN
pub const MISSING_ASIN: &str = "N/A";

/// Color palette, resolved once at the decoding boundary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PaletteShape {
    /// Both swatch rows were delivered; order is left-to-right render order
    Structured {
        dark_colors: Vec<String>,
        light_colors: Vec<String>,
    },
    /// Field absent or not in the structured form
    #[default]
    Empty,
}

impl PaletteShape {
    pub fn dark_colors(&self) -> &[String] {
        match self {
            Self::Structured { dark_colors, .. } => dark_colors,
            Self::Empty => &[],
        }
    }

    pub fn light_colors(&self) -> &[String] {
        match self {
            Self::Structured { light_colors, .. } => light_colors,
            Self::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dark_colors().is_empty() && self.light_colors().is_empty()
    }
}

/// A single outfit suggestion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutfitRecommendation {
    pub item: String,
    pub description: String,
}

/// A purchasable product matched to a recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub asin: String,
    pub title: String,
    pub description: String,
    pub delivery_info: String,
    pub sales_volume: String,
    pub is_prime: bool,
    pub picture_url: String,
    pub detail_url: String,
    /// `None` means no price data, never zero
    pub price: Option<String>,
}

impl Product {
    /// External purchase page, if the server sent a usable one
    pub fn purchase_url(&self) -> Option<&str> {
        let url = self.detail_url.trim();
        if url.is_empty() || url == NOT_AVAILABLE {
            None
        } else {
            Some(url)
        }
    }
}

/// Everything the service returns for one scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRecommendationResult {
    pub seasonal_color_label: String,
    pub seasonal_description: String,
    pub seasonal_probability: f64,
    pub skin_tone_label: String,
    pub skin_tone_hex: String,
    pub skin_tone_probability: f64,
    /// Opaque, server-assigned
    pub timestamp: String,
    pub clothing_type: String,
    pub color_palette: PaletteShape,
    pub outfit_recommendations: Vec<OutfitRecommendation>,
    pub amazon_products: Vec<Product>,
}

impl StyleRecommendationResult {
    /// Skin tone swatch color, white when the hex is unusable
    pub fn skin_tone_color(&self) -> HexColor {
        self.skin_tone_hex.parse().unwrap_or(HexColor::WHITE)
    }
}

/// A stored prediction, as listed on the history screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionHistoryEntry {
    /// Server-assigned, unique per user
    pub prediction_key: String,
    pub user_uid: String,
    #[serde(flatten)]
    pub result: StyleRecommendationResult,
}

/// `#RRGGBB` color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const WHITE: HexColor = HexColor {
        r: 0xFF,
        g: 0xFF,
        b: 0xFF,
    };
}

/// Error returned when a string is not `#RRGGBB`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidHexColor(pub String);

impl fmt::Display for InvalidHexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color '{}'", self.0)
    }
}

impl std::error::Error for InvalidHexColor {}

impl FromStr for HexColor {
    type Err = InvalidHexColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidHexColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| InvalidHexColor(s.to_string()))
        };
        Ok(HexColor {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
