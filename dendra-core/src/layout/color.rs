//! HSL colors and the cluster palette policy.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// A color in HSL space. Hue is in degrees, saturation and lightness in
/// percent.
///
/// # Examples
/// ```
/// use dendra_core::Color;
///
/// let color: Color = "hsl(140, 65%, 50%)".parse().expect("valid css");
/// assert_eq!(color.css(), "hsl(140, 65%, 50%)");
/// assert_eq!(color.css_with_alpha(0.08), "hsla(140, 65%, 50%, 0.08)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Color {
    hue: f64,
    saturation: f64,
    lightness: f64,
}

impl Color {
    /// Creates a color from its HSL components.
    #[must_use]
    pub const fn hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Hue in degrees.
    #[rustfmt::skip]
    #[must_use]
    pub const fn hue(&self) -> f64 { self.hue }

    /// Saturation in percent.
    #[rustfmt::skip]
    #[must_use]
    pub const fn saturation(&self) -> f64 { self.saturation }

    /// Lightness in percent.
    #[rustfmt::skip]
    #[must_use]
    pub const fn lightness(&self) -> f64 { self.lightness }

    /// CSS `hsl()` notation.
    #[must_use]
    pub fn css(&self) -> String {
        self.to_string()
    }

    /// CSS `hsla()` notation with the given opacity.
    #[must_use]
    pub fn css_with_alpha(&self, alpha: f64) -> String {
        format!(
            "hsla({}, {}%, {}%, {alpha})",
            self.hue, self.saturation, self.lightness
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Error returned when a string is not CSS `hsl()` notation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("`{input}` is not an hsl() color")]
pub struct ParseColorError {
    input: String,
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError {
            input: s.to_owned(),
        };
        let body = s
            .trim()
            .strip_prefix("hsl(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;
        let mut parts = body.split(',').map(str::trim);
        let mut component = |percent: bool| -> Result<f64, ParseColorError> {
            let raw = parts.next().ok_or_else(err)?;
            let raw = if percent {
                raw.strip_suffix('%').ok_or_else(err)?
            } else {
                raw.strip_suffix("deg").unwrap_or(raw)
            };
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(err)
        };
        let hue = component(false)?;
        let saturation = component(true)?;
        let lightness = component(true)?;
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self::hsl(hue, saturation, lightness))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.css()
    }
}

/// Color assigned to cluster `index` out of `total` when the palette has run
/// out: hues are spread evenly around the wheel while saturation and
/// lightness alternate so neighbours stay distinguishable.
#[must_use]
pub fn generated_color(index: usize, total: usize) -> Color {
    let hue = index as f64 * 360.0 / total.max(1) as f64;
    let saturation = 65.0 + (index % 3) as f64 * 5.0;
    let lightness = 50.0 + (index % 2) as f64 * 5.0;
    Color::hsl(hue, saturation, lightness)
}

/// Color for a point that belongs to no cluster, spread over all points.
#[must_use]
pub fn point_color(index: usize, total: usize) -> Color {
    generated_color(index, total)
}

/// Ordered list of preferred cluster colors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Palette {
    entries: Vec<Color>,
}

impl Palette {
    /// Creates a palette from its entries in priority order.
    #[must_use]
    pub const fn new(entries: Vec<Color>) -> Self {
        Self { entries }
    }

    /// Palette entries.
    #[must_use]
    pub fn entries(&self) -> &[Color] {
        &self.entries
    }

    /// Color for cluster `index` out of `total` clusters: the palette entry if
    /// there is one, otherwise a generated color.
    #[must_use]
    pub fn color_for(&self, index: usize, total: usize) -> Color {
        self.entries
            .get(index)
            .copied()
            .unwrap_or_else(|| generated_color(index, total))
    }
}

impl FromIterator<Color> for Palette {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
