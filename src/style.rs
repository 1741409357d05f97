//! Visual vocabulary shared by the façade and the renderer: colors, dash
//! patterns, markers, hatches, font variants and text alignment.
//!
//! Every type parses from the short codes callers are used to (`"--"`,
//! `"o"`, `"//"`, `"dodgerblue"`, `"#1f77b4"`), so styles can come straight
//! from JSON or the command line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ExhibitError, Result};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Named colors accepted by [`Rgba::from_str`].
const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("navy", (0, 0, 128)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
    ("dimgray", (105, 105, 105)),
    ("silver", (192, 192, 192)),
    ("dodgerblue", (30, 144, 255)),
    ("steelblue", (70, 130, 180)),
    ("skyblue", (135, 206, 235)),
    ("lightblue", (173, 216, 230)),
    ("darkblue", (0, 0, 139)),
    ("orange", (255, 165, 0)),
    ("darkorange", (255, 140, 0)),
    ("gold", (255, 215, 0)),
    ("yellow", (255, 255, 0)),
    ("purple", (128, 0, 128)),
    ("maroon", (128, 0, 0)),
    ("darkred", (139, 0, 0)),
    ("darkgreen", (0, 100, 0)),
    ("forestgreen", (34, 139, 34)),
    ("teal", (0, 128, 128)),
    ("brown", (165, 42, 42)),
    ("tan", (210, 180, 140)),
];

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const DODGER_BLUE: Rgba = Rgba::rgb(30, 144, 255);

    /// Same color with opacity `alpha` in [0, 1] multiplied in.
    pub fn with_alpha(self, alpha: f64) -> Self {
        let a = (f64::from(self.a) * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Opacity in [0, 1].
    pub fn alpha(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

impl FromStr for Rgba {
    type Err = ExhibitError;

    /// `#RRGGBB`, `#RRGGBBAA` or a CSS-style color name.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        if let Some(hex) = key.strip_prefix('#') {
            let byte = |i: usize| {
                hex.get(i..i + 2)
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| ExhibitError::InvalidArgument(format!("bad hex color `{s}`")))
            };
            return match hex.len() {
                6 => Ok(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
                8 => Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
                _ => Err(ExhibitError::InvalidArgument(format!("bad hex color `{s}`"))),
            };
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|&(_, (r, g, b))| Rgba::rgb(r, g, b))
            .ok_or_else(|| ExhibitError::InvalidArgument(format!("unknown color `{s}`")))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ExhibitError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_hex()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Line dash pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
}

impl LineDash {
    /// On/off segment lengths, in multiples of the line width; `None` for solid lines.
    pub fn pattern(&self) -> Option<&'static [f64]> {
        match self {
            LineDash::Solid => None,
            LineDash::Dash => Some(&[3.7, 1.6]),
            LineDash::Dot => Some(&[1.0, 1.65]),
            LineDash::DashDot => Some(&[6.4, 1.6, 1.0, 1.6]),
        }
    }
}

impl FromStr for LineDash {
    type Err = ExhibitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "-" | "solid" => Ok(LineDash::Solid),
            "--" | "dash" | "dashed" => Ok(LineDash::Dash),
            ":" | "dot" | "dotted" => Ok(LineDash::Dot),
            "-." | "dashdot" => Ok(LineDash::DashDot),
            _ => Err(ExhibitError::InvalidArgument(format!("unknown line style `{s}`"))),
        }
    }
}

/// Marker shape for data points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Cross,
    X,
}

impl FromStr for MarkerShape {
    type Err = ExhibitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "o" | "circle" => Ok(MarkerShape::Circle),
            "s" | "square" => Ok(MarkerShape::Square),
            "^" | "triangle" => Ok(MarkerShape::Triangle),
            "D" | "d" | "diamond" => Ok(MarkerShape::Diamond),
            "+" | "cross" => Ok(MarkerShape::Cross),
            "x" | "X" => Ok(MarkerShape::X),
            _ => Err(ExhibitError::InvalidArgument(format!("unknown marker `{s}`"))),
        }
    }
}

/// Direction of hatch strokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HatchKind {
    /// `/`
    Forward,
    /// `\`
    Back,
    /// `-`
    Horizontal,
    /// `|`
    Vertical,
    /// `+`
    Grid,
    /// `x`
    Diagonal,
}

/// Hatch fill; repeating the code (`"//"`) doubles the density.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hatch {
    pub kind: HatchKind,
    pub density: u32,
}

impl Hatch {
    /// Parse a hatch code. The empty string means no hatch.
    pub fn parse(s: &str) -> Result<Option<Hatch>> {
        let s = s.trim();
        let Some(first) = s.chars().next() else {
            return Ok(None);
        };
        if s.chars().any(|c| c != first) {
            return Err(ExhibitError::InvalidArgument(format!(
                "mixed hatch codes are not supported: `{s}`"
            )));
        }
        let kind = match first {
            '/' => HatchKind::Forward,
            '\\' => HatchKind::Back,
            '-' => HatchKind::Horizontal,
            '|' => HatchKind::Vertical,
            '+' => HatchKind::Grid,
            'x' | 'X' => HatchKind::Diagonal,
            _ => {
                return Err(ExhibitError::InvalidArgument(format!("unknown hatch `{s}`")));
            }
        };
        Ok(Some(Hatch {
            kind,
            density: s.chars().count() as u32,
        }))
    }

    /// Stroke directions as unit vectors (x right, y up).
    pub fn directions(&self) -> &'static [(f64, f64)] {
        const D: f64 = std::f64::consts::FRAC_1_SQRT_2;
        match self.kind {
            HatchKind::Forward => &[(D, D)],
            HatchKind::Back => &[(D, -D)],
            HatchKind::Horizontal => &[(1.0, 0.0)],
            HatchKind::Vertical => &[(0.0, 1.0)],
            HatchKind::Grid => &[(1.0, 0.0), (0.0, 1.0)],
            HatchKind::Diagonal => &[(D, D), (D, -D)],
        }
    }
}

/// The four text faces an exhibit carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontVariant {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    pub const ALL: [FontVariant; 4] = [
        FontVariant::Normal,
        FontVariant::Bold,
        FontVariant::Italic,
        FontVariant::BoldItalic,
    ];
}

impl FromStr for FontVariant {
    type Err = ExhibitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "normal" => Ok(FontVariant::Normal),
            "bold" => Ok(FontVariant::Bold),
            "italic" => Ok(FontVariant::Italic),
            "bold_italic" | "bolditalic" => Ok(FontVariant::BoldItalic),
            _ => Err(ExhibitError::InvalidArgument(format!("unknown font style `{s}`"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for HAlign {
    type Err = ExhibitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(HAlign::Left),
            "center" | "centre" => Ok(HAlign::Center),
            "right" => Ok(HAlign::Right),
            _ => Err(ExhibitError::InvalidArgument(format!("unknown alignment `{s}`"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    #[default]
    Bottom,
    Center,
    Top,
}

impl FromStr for VAlign {
    type Err = ExhibitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bottom" => Ok(VAlign::Bottom),
            "center" | "centre" => Ok(VAlign::Center),
            "top" => Ok(VAlign::Top),
            _ => Err(ExhibitError::InvalidArgument(format!("unknown alignment `{s}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_parse_by_name_and_hex() {
        assert_eq!("dodgerblue".parse::<Rgba>().unwrap(), Rgba::DODGER_BLUE);
        assert_eq!("#1E90FF".parse::<Rgba>().unwrap(), Rgba::DODGER_BLUE);
        assert_eq!("#00000080".parse::<Rgba>().unwrap().a, 0x80);
        assert!("#12".parse::<Rgba>().is_err());
        assert!("chartreuse-ish".parse::<Rgba>().is_err());
    }

    #[test]
    fn hatch_density_counts_repeats() {
        let h = Hatch::parse("//").unwrap().unwrap();
        assert_eq!(h.kind, HatchKind::Forward);
        assert_eq!(h.density, 2);
        assert_eq!(Hatch::parse("").unwrap(), None);
        assert!(Hatch::parse("/x").is_err());
    }
}
