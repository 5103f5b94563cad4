use crate::domain::color::Rgb8;
use std::fmt;
use std::str::FromStr;

const fn c(hex: u32) -> Rgb8 {
    Rgb8::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

// 每組色表以等距取樣點表示，中間以線性內插
const VIRIDIS: &[Rgb8] = &[
    c(0x440154), c(0x482878), c(0x3e4989), c(0x31688e), c(0x26828e),
    c(0x1f9e89), c(0x35b779), c(0x6ece58), c(0xb5de2b), c(0xfde725),
];
const PLASMA: &[Rgb8] = &[
    c(0x0d0887), c(0x46039f), c(0x7201a8), c(0x9c179e), c(0xbd3786),
    c(0xd8576b), c(0xed7953), c(0xfb9f3a), c(0xfdca26), c(0xf0f921),
];
const INFERNO: &[Rgb8] = &[
    c(0x000004), c(0x1b0c41), c(0x4a0c6b), c(0x781c6d), c(0xa52c60),
    c(0xcf4446), c(0xed6925), c(0xfb9b06), c(0xf7d13d), c(0xfcffa4),
];
const MAGMA: &[Rgb8] = &[
    c(0x000004), c(0x180f3d), c(0x440f76), c(0x721f81), c(0x9e2f7f),
    c(0xcd4071), c(0xf1605d), c(0xfd9668), c(0xfeca8d), c(0xfcfdbf),
];
const CIVIDIS: &[Rgb8] = &[
    c(0x00224e), c(0x123570), c(0x3b496c), c(0x575d6d), c(0x707173),
    c(0x8a8779), c(0xa69d75), c(0xc4b56c), c(0xe4cf5b), c(0xfee838),
];
const GREYS: &[Rgb8] = &[c(0xffffff), c(0xd9d9d9), c(0x969696), c(0x525252), c(0x000000)];
const BLUES: &[Rgb8] = &[c(0xf7fbff), c(0xc6dbef), c(0x6baed6), c(0x2171b5), c(0x08306b)];
const GREENS: &[Rgb8] = &[c(0xf7fcf5), c(0xc7e9c0), c(0x74c476), c(0x238b45), c(0x00441b)];
const REDS: &[Rgb8] = &[c(0xfff5f0), c(0xfcbba1), c(0xfb6a4a), c(0xcb181d), c(0x67000d)];
const ORANGES: &[Rgb8] = &[c(0xfff5eb), c(0xfdd0a2), c(0xfd8d3c), c(0xd94801), c(0x7f2704)];
const PURPLES: &[Rgb8] = &[c(0xfcfbfd), c(0xdadaeb), c(0x9e9ac8), c(0x6a51a3), c(0x3f007d)];

const PALETTES: &[(&str, &[Rgb8])] = &[
    ("viridis", VIRIDIS),
    ("plasma", PLASMA),
    ("inferno", INFERNO),
    ("magma", MAGMA),
    ("cividis", CIVIDIS),
    ("Greys", GREYS),
    ("Blues", BLUES),
    ("Greens", GREENS),
    ("Reds", REDS),
    ("Oranges", ORANGES),
    ("Purples", PURPLES),
];

/// A named sequential palette, sampled on `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colormap {
    name: &'static str,
    stops: &'static [Rgb8],
    reversed: bool,
}

impl Colormap {
    pub fn names() -> impl Iterator<Item = &'static str> {
        PALETTES.iter().map(|(name, _)| *name)
    }

    pub fn sample(&self, t: f64) -> Rgb8 {
        let t = (if self.reversed { 1.0 - t } else { t }).clamp(0.0, 1.0);
        let last = self.stops.len() - 1;
        let pos = t * last as f64;
        let lo = (pos.floor() as usize).min(last);
        let hi = (lo + 1).min(last);
        self.stops[lo].lerp(self.stops[hi], pos - lo as f64)
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self {
            name: "viridis",
            stops: VIRIDIS,
            reversed: false,
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reversed {
            write!(f, "{}_r", self.name)
        } else {
            f.write_str(self.name)
        }
    }
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (base, reversed) = match trimmed.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (trimmed, false),
        };

        PALETTES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(base))
            .map(|&(name, stops)| Colormap {
                name,
                stops,
                reversed,
            })
            .ok_or_else(|| {
                format!(
                    "unknown colormap \"{}\" (available: {})",
                    trimmed,
                    Colormap::names().collect::<Vec<_>>().join(", ")
                )
            })
    }
}
