use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn lerp(self, other: Rgb8, t: f64) -> Rgb8 {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb8::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl From<Rgb8> for image::Rgb<u8> {
    fn from(c: Rgb8) -> Self {
        image::Rgb([c.r, c.g, c.b])
    }
}

impl From<Rgb8> for image::Rgba<u8> {
    fn from(c: Rgb8) -> Self {
        image::Rgba([c.r, c.g, c.b, 255])
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// 常用的 CSS 顏色名稱
const NAMED_COLORS: &[(&str, Rgb8)] = &[
    ("black", Rgb8::new(0, 0, 0)),
    ("white", Rgb8::new(255, 255, 255)),
    ("red", Rgb8::new(255, 0, 0)),
    ("lime", Rgb8::new(0, 255, 0)),
    ("green", Rgb8::new(0, 128, 0)),
    ("blue", Rgb8::new(0, 0, 255)),
    ("yellow", Rgb8::new(255, 255, 0)),
    ("cyan", Rgb8::new(0, 255, 255)),
    ("aqua", Rgb8::new(0, 255, 255)),
    ("magenta", Rgb8::new(255, 0, 255)),
    ("fuchsia", Rgb8::new(255, 0, 255)),
    ("gray", Rgb8::new(128, 128, 128)),
    ("grey", Rgb8::new(128, 128, 128)),
    ("darkgray", Rgb8::new(169, 169, 169)),
    ("darkgrey", Rgb8::new(169, 169, 169)),
    ("lightgray", Rgb8::new(211, 211, 211)),
    ("lightgrey", Rgb8::new(211, 211, 211)),
    ("silver", Rgb8::new(192, 192, 192)),
    ("maroon", Rgb8::new(128, 0, 0)),
    ("olive", Rgb8::new(128, 128, 0)),
    ("navy", Rgb8::new(0, 0, 128)),
    ("purple", Rgb8::new(128, 0, 128)),
    ("teal", Rgb8::new(0, 128, 128)),
    ("orange", Rgb8::new(255, 165, 0)),
    ("brown", Rgb8::new(165, 42, 42)),
    ("pink", Rgb8::new(255, 192, 203)),
    ("gold", Rgb8::new(255, 215, 0)),
    ("beige", Rgb8::new(245, 245, 220)),
    ("ivory", Rgb8::new(255, 255, 240)),
    ("indigo", Rgb8::new(75, 0, 130)),
    ("violet", Rgb8::new(238, 130, 238)),
    ("crimson", Rgb8::new(220, 20, 60)),
    ("coral", Rgb8::new(255, 127, 80)),
    ("salmon", Rgb8::new(250, 128, 114)),
    ("khaki", Rgb8::new(240, 230, 140)),
    ("tan", Rgb8::new(210, 180, 140)),
    ("chocolate", Rgb8::new(210, 105, 30)),
    ("darkblue", Rgb8::new(0, 0, 139)),
    ("darkgreen", Rgb8::new(0, 100, 0)),
    ("darkred", Rgb8::new(139, 0, 0)),
    ("skyblue", Rgb8::new(135, 206, 235)),
    ("steelblue", Rgb8::new(70, 130, 180)),
    ("slategray", Rgb8::new(112, 128, 144)),
    ("whitesmoke", Rgb8::new(245, 245, 245)),
];

impl FromStr for Rgb8 {
    type Err = String;

    /// Accepts a color name, `#rgb`, `#rrggbb` or `rgb(r, g, b)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }

        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_function(args);
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, c)| *c)
            .ok_or_else(|| format!("unknown color \"{s}\""))
    }
}

fn parse_hex(s: &str) -> Result<Rgb8, String> {
    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be #RGB or #RRGGBB".to_owned());
    }

    match s.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, ch) in s.chars().enumerate() {
                let v = hex_byte(&ch.to_string())?;
                out[i] = v * 17;
            }
            Ok(Rgb8::new(out[0], out[1], out[2]))
        }
        6 => Ok(Rgb8::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        _ => Err("hex color must be #RGB or #RRGGBB".to_owned()),
    }
}

fn parse_rgb_function(args: &str) -> Result<Rgb8, String> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err("rgb() takes exactly three components".to_owned());
    }
    let mut out = [0u8; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse::<u8>()
            .map_err(|_| format!("invalid rgb component \"{part}\""))?;
    }
    Ok(Rgb8::new(out[0], out[1], out[2]))
}

impl Serialize for Rgb8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
