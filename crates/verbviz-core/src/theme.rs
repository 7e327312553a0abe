//! Light/dark palettes for the interactive graph view.
//!
//! Every lookup is a total function: unknown declaration kinds resolve to the palette default.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::DeclKind;
use crate::{Error, Result};

pub const HANDLE_COLOR: &str = "#6366f1";
pub const HANDLE_COLOR_SELECTED: &str = "#fb7185";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(Error::UnsupportedTheme {
                theme: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub group: &'static str,
    pub verb: &'static str,
    pub data: &'static str,
    pub config: &'static str,
    pub database: &'static str,
    pub enumeration: &'static str,
    pub secret: &'static str,
    pub subscription: &'static str,
    pub topic: &'static str,
    pub type_alias: &'static str,
    pub default: &'static str,
}

pub const LIGHT: Palette = Palette {
    group: "#e2e8f0",
    verb: "#818cf8",
    data: "#34d399",
    config: "#facc15",
    database: "#60a5fa",
    enumeration: "#a78bfa",
    secret: "#f87171",
    subscription: "#fb923c",
    topic: "#2dd4bf",
    type_alias: "#94a3b8",
    default: "#cbd5e1",
};

pub const DARK: Palette = Palette {
    group: "#1e293b",
    verb: "#4f46e5",
    data: "#059669",
    config: "#ca8a04",
    database: "#2563eb",
    enumeration: "#7c3aed",
    secret: "#dc2626",
    subscription: "#ea580c",
    topic: "#0d9488",
    type_alias: "#475569",
    default: "#334155",
};

pub fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Light => &LIGHT,
        Theme::Dark => &DARK,
    }
}

impl Palette {
    pub fn fill(&self, kind: DeclKind) -> &'static str {
        match kind {
            DeclKind::Verb => self.verb,
            DeclKind::Data => self.data,
            DeclKind::Config => self.config,
            DeclKind::Database => self.database,
            DeclKind::Enum => self.enumeration,
            DeclKind::Secret => self.secret,
            DeclKind::Subscription => self.subscription,
            DeclKind::Topic => self.topic,
            DeclKind::TypeAlias => self.type_alias,
            DeclKind::Unknown => self.default,
        }
    }
}

pub fn fill_color(kind: DeclKind, theme: Theme) -> &'static str {
    palette(theme).fill(kind)
}

pub fn handle_color(selected: bool) -> &'static str {
    if selected {
        HANDLE_COLOR_SELECTED
    } else {
        HANDLE_COLOR
    }
}

pub fn edge_color(selected: bool) -> &'static str {
    handle_color(selected)
}

/// Fill darkened (light theme) or lightened (dark theme) by 15% lightness.
pub fn border_color(kind: DeclKind, theme: Theme) -> String {
    let fill = fill_color(kind, theme);
    let delta = match theme {
        Theme::Light => -15.0,
        Theme::Dark => 15.0,
    };
    adjust_lightness(fill, delta).unwrap_or_else(|| fill.to_string())
}

/// Shifts the HSL lightness of a `#rrggbb` colour by `l_delta` percentage points.
pub fn adjust_lightness(hex: &str, l_delta: f64) -> Option<String> {
    let (hue, saturation, lightness) = rgb_to_hsl(parse_hex(hex)?);
    let lightness = (lightness + l_delta / 100.0).clamp(0.0, 1.0);
    Some(to_hex(hsl_to_rgb(hue, saturation, lightness)))
}

/// Channels in `0.0..=1.0`. Only the six-digit form the palettes use is accepted.
fn parse_hex(text: &str) -> Option<[f64; 3]> {
    let digits = text.trim().strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let packed = u32::from_str_radix(digits, 16).ok()?;
    Some([16, 8, 0].map(|shift| f64::from((packed >> shift) & 0xff) / 255.0))
}

fn to_hex(rgb: [f64; 3]) -> String {
    rgb.iter().fold(String::from("#"), |mut out, channel| {
        let byte = (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        out.push_str(&format!("{byte:02x}"));
        out
    })
}

/// Hue in degrees, saturation and lightness in `0.0..=1.0`.
fn rgb_to_hsl([r, g, b]: [f64; 3]) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;
    let lightness = (max + min) / 2.0;
    if chroma == 0.0 {
        return (0.0, 0.0, lightness);
    }

    let saturation = chroma / (1.0 - (2.0 * lightness - 1.0).abs());
    let sector = if max == r {
        ((g - b) / chroma).rem_euclid(6.0)
    } else if max == g {
        (b - r) / chroma + 2.0
    } else {
        (r - g) / chroma + 4.0
    };
    (sector * 60.0, saturation, lightness)
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> [f64; 3] {
    let a = saturation * lightness.min(1.0 - lightness);
    [0.0, 8.0, 4.0].map(|n| {
        let k = (n + hue / 30.0) % 12.0;
        lightness - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
    })
}
