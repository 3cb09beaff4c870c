//! Color specifications (color, xcolor packages)
//!
//! Resolves the color arguments of `\color`, `\textcolor`, `\colorbox`,
//! `\fcolorbox`, `\definecolor`, `\cellcolor` and `\rowcolor` into RGBA values.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// Build from a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Color::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Linear mix: `pct` percent of `self`, the rest of `other` (xcolor `a!pct!b`)
    pub fn mix(self, other: Color, pct: f64) -> Color {
        let t = (pct / 100.0).clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f64 * t + b as f64 * (1.0 - t)).round() as u8;
        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: channel(self.a, other.a),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

lazy_static! {
    /// Named colors from the xcolor base set and dvipsnames
    pub static ref NAMED_COLORS: HashMap<&'static str, Color> = {
        let mut m = HashMap::new();

        // Base colors
        m.insert("black", Color::from_hex(0x000000));
        m.insert("white", Color::from_hex(0xFFFFFF));
        m.insert("red", Color::from_hex(0xFF0000));
        m.insert("green", Color::from_hex(0x00FF00));
        m.insert("blue", Color::from_hex(0x0000FF));
        m.insert("yellow", Color::from_hex(0xFFFF00));
        m.insert("cyan", Color::from_hex(0x00FFFF));
        m.insert("magenta", Color::from_hex(0xFF00FF));
        m.insert("orange", Color::from_hex(0xFF8000));
        m.insert("purple", Color::from_hex(0xBF0040));
        m.insert("pink", Color::from_hex(0xFFBFBF));
        m.insert("brown", Color::from_hex(0xBF8040));
        m.insert("gray", Color::from_hex(0x808080));
        m.insert("grey", Color::from_hex(0x808080));
        m.insert("darkgray", Color::from_hex(0x404040));
        m.insert("lightgray", Color::from_hex(0xBFBFBF));
        m.insert("lime", Color::from_hex(0xBFFF00));
        m.insert("olive", Color::from_hex(0x808000));
        m.insert("teal", Color::from_hex(0x008080));
        m.insert("violet", Color::from_hex(0x800080));

        // dvipsnames
        m.insert("Apricot", Color::from_hex(0xFBB982));
        m.insert("Aquamarine", Color::from_hex(0x00B5BE));
        m.insert("Bittersweet", Color::from_hex(0xC04F17));
        m.insert("BlueViolet", Color::from_hex(0x473992));
        m.insert("BrickRed", Color::from_hex(0xB6321C));
        m.insert("BurntOrange", Color::from_hex(0xF7921D));
        m.insert("CadetBlue", Color::from_hex(0x74729A));
        m.insert("CarnationPink", Color::from_hex(0xF282B4));
        m.insert("Cerulean", Color::from_hex(0x00A2E3));
        m.insert("CornflowerBlue", Color::from_hex(0x41B0E4));
        m.insert("Dandelion", Color::from_hex(0xFDBC42));
        m.insert("DarkOrchid", Color::from_hex(0xA4538A));
        m.insert("Emerald", Color::from_hex(0x00A99D));
        m.insert("ForestGreen", Color::from_hex(0x009B55));
        m.insert("Goldenrod", Color::from_hex(0xFFDF42));
        m.insert("JungleGreen", Color::from_hex(0x00A99A));
        m.insert("Lavender", Color::from_hex(0xF49EC4));
        m.insert("LimeGreen", Color::from_hex(0x8DC73E));
        m.insert("Mahogany", Color::from_hex(0xA9341F));
        m.insert("Maroon", Color::from_hex(0xAF3235));
        m.insert("MidnightBlue", Color::from_hex(0x006795));
        m.insert("NavyBlue", Color::from_hex(0x006EB8));
        m.insert("OliveGreen", Color::from_hex(0x3C8031));
        m.insert("OrangeRed", Color::from_hex(0xED135A));
        m.insert("Orchid", Color::from_hex(0xAF72B0));
        m.insert("Peach", Color::from_hex(0xF7965A));
        m.insert("Plum", Color::from_hex(0x92268F));
        m.insert("RoyalBlue", Color::from_hex(0x0071BC));
        m.insert("Salmon", Color::from_hex(0xF69289));
        m.insert("SeaGreen", Color::from_hex(0x3FBC9D));
        m.insert("SkyBlue", Color::from_hex(0x46C5DD));
        m.insert("Tan", Color::from_hex(0xDA9D76));
        m.insert("TealBlue", Color::from_hex(0x00AEB3));
        m.insert("Turquoise", Color::from_hex(0x00B4CE));
        m.insert("VioletRed", Color::from_hex(0xEF58A0));
        m.insert("WildStrawberry", Color::from_hex(0xEE2967));
        m.insert("YellowGreen", Color::from_hex(0x98CC70));
        m.insert("YellowOrange", Color::from_hex(0xFAA21A));

        m
    };

    /// Six (or three) hex digits, optional leading '#'
    static ref HEX_RE: Regex = Regex::new(r"^#?([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").unwrap();

    /// Comma separated numeric components
    static ref COMPONENTS_RE: Regex = Regex::new(r"^\s*-?[0-9.]+\s*(,\s*-?[0-9.]+\s*)*$").unwrap();
}

fn components(spec: &str) -> Option<Vec<f64>> {
    if !COMPONENTS_RE.is_match(spec) {
        return None;
    }
    spec.split(',').map(|p| p.trim().parse::<f64>().ok()).collect()
}

fn unit(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Parse a color specification, optionally in an explicit color model.
///
/// `lookup` resolves names that are not in [`NAMED_COLORS`], e.g. colors
/// introduced by `\definecolor` during the current parse.
pub fn parse_color_with(
    spec: &str,
    model: Option<&str>,
    lookup: &dyn Fn(&str) -> Option<Color>,
) -> Option<Color> {
    let spec = spec.trim();

    match model.map(str::trim) {
        Some("RGB") => {
            let parts = components(spec)?;
            if parts.len() == 3 {
                let c = |v: f64| v.clamp(0.0, 255.0).round() as u8;
                return Some(Color::rgb(c(parts[0]), c(parts[1]), c(parts[2])));
            }
            return None;
        }
        Some("rgb") => {
            let parts = components(spec)?;
            if parts.len() == 3 {
                return Some(Color::rgb(unit(parts[0]), unit(parts[1]), unit(parts[2])));
            }
            return None;
        }
        Some("HTML") => return parse_hex(spec),
        Some("gray") => {
            let v = unit(spec.parse::<f64>().ok()?);
            return Some(Color::rgb(v, v, v));
        }
        Some("cmyk") => {
            let parts = components(spec)?;
            if parts.len() == 4 {
                let k = 1.0 - parts[3].clamp(0.0, 1.0);
                return Some(Color::rgb(
                    unit((1.0 - parts[0].clamp(0.0, 1.0)) * k),
                    unit((1.0 - parts[1].clamp(0.0, 1.0)) * k),
                    unit((1.0 - parts[2].clamp(0.0, 1.0)) * k),
                ));
            }
            return None;
        }
        Some(_) | None => {}
    }

    // xcolor mixing syntax: color1!percent!color2
    if spec.contains('!') {
        let parts: Vec<&str> = spec.split('!').collect();
        let first = parse_color_with(parts[0], None, lookup)?;
        let pct: f64 = parts.get(1).and_then(|p| p.trim().parse().ok()).unwrap_or(50.0);
        let second = match parts.get(2) {
            Some(name) => parse_color_with(name, None, lookup)?,
            None => Color::WHITE,
        };
        return Some(first.mix(second, pct));
    }

    if let Some(color) = NAMED_COLORS.get(spec) {
        return Some(*color);
    }
    if let Some(color) = lookup(spec) {
        return Some(color);
    }
    if let Some(color) = parse_hex(spec) {
        return Some(color);
    }

    let lower = spec.to_lowercase();
    NAMED_COLORS.get(lower.as_str()).copied()
}

/// Parse a color specification with no user-defined names in scope
pub fn parse_color(spec: &str, model: Option<&str>) -> Option<Color> {
    parse_color_with(spec, model, &|_| None)
}

fn parse_hex(spec: &str) -> Option<Color> {
    let caps = HEX_RE.captures(spec.trim())?;
    let hex = &caps[1];
    let expanded: String = if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex.to_string()
    };
    u32::from_str_radix(&expanded, 16).ok().map(Color::from_hex)
}
