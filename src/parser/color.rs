//! Fill colors and their packed sRGB form.

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use super::objects::{get, get_dict, resolve};

/// A color as set by the color operators.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    Gray(f64),
    Rgb(f64, f64, f64),
    Cmyk(f64, f64, f64, f64),
    /// Tint of a separation colorant, 1.0 is full ink
    Tint(f64),
}

impl Default for Color {
    fn default() -> Self {
        Color::Gray(0.0)
    }
}

impl Color {
    /// Components in [0, 1] as red, green, blue.
    pub fn to_rgb(&self) -> (f64, f64, f64) {
        match *self {
            Color::Gray(g) => (g, g, g),
            Color::Rgb(r, g, b) => (r, g, b),
            Color::Cmyk(c, m, y, k) => ((1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k)),
            Color::Tint(t) => (1.0 - t, 1.0 - t, 1.0 - t),
        }
    }

    /// Pack as `0xRRGGBB`.
    pub fn packed(&self) -> u32 {
        let (r, g, b) = self.to_rgb();
        (channel(r) << 16) | (channel(g) << 8) | channel(b)
    }
}

fn channel(value: f64) -> u32 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u32
}

/// The color space selected by `cs`, deciding how `sc`/`scn` operands read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    #[default]
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
    Separation,
    /// Pattern, Indexed and anything unrecognised: read by operand count
    Other,
}

impl ColorSpace {
    /// Resolve a `cs` operand, looking named spaces up in `resources`.
    pub fn resolve(doc: &LopdfDocument, resources: Option<&Dictionary>, name: &[u8]) -> Self {
        if let Some(space) = Self::from_family(name) {
            return space;
        }
        resources
            .and_then(|r| get_dict(doc, r, b"ColorSpace"))
            .and_then(|spaces| get(doc, spaces, name))
            .map(|obj| Self::from_object(doc, obj))
            .unwrap_or(ColorSpace::Other)
    }

    fn from_object(doc: &LopdfDocument, obj: &Object) -> Self {
        match obj {
            Object::Name(n) => Self::from_family(n).unwrap_or(ColorSpace::Other),
            Object::Array(items) => {
                let family = items.first().and_then(|o| o.as_name().ok()).unwrap_or_default();
                match family {
                    b"ICCBased" => {
                        let components = items
                            .get(1)
                            .map(|o| resolve(doc, o))
                            .and_then(|o| match o {
                                Object::Stream(s) => s.dict.get(b"N").ok().and_then(|n| n.as_i64().ok()),
                                _ => None,
                            });
                        match components {
                            Some(1) => ColorSpace::DeviceGray,
                            Some(3) => ColorSpace::DeviceRgb,
                            Some(4) => ColorSpace::DeviceCmyk,
                            _ => ColorSpace::Other,
                        }
                    }
                    other => Self::from_family(other).unwrap_or(ColorSpace::Other),
                }
            }
            _ => ColorSpace::Other,
        }
    }

    fn from_family(name: &[u8]) -> Option<Self> {
        match name {
            b"DeviceGray" | b"G" | b"CalGray" => Some(ColorSpace::DeviceGray),
            b"DeviceRGB" | b"RGB" | b"CalRGB" => Some(ColorSpace::DeviceRgb),
            b"DeviceCMYK" | b"CMYK" => Some(ColorSpace::DeviceCmyk),
            b"Separation" | b"DeviceN" => Some(ColorSpace::Separation),
            b"Pattern" | b"Indexed" | b"I" => Some(ColorSpace::Other),
            _ => None,
        }
    }

    /// Initial color after selecting this space.
    pub fn initial_color(&self) -> Color {
        match self {
            ColorSpace::DeviceCmyk => Color::Cmyk(0.0, 0.0, 0.0, 1.0),
            ColorSpace::Separation => Color::Tint(1.0),
            _ => Color::Gray(0.0),
        }
    }

    /// Interpret `sc`/`scn` operands. `None` leaves the current color alone.
    pub fn color(&self, components: &[f64]) -> Option<Color> {
        match (self, components) {
            (ColorSpace::DeviceGray, [g, ..]) => Some(Color::Gray(*g)),
            (ColorSpace::DeviceRgb, [r, g, b, ..]) => Some(Color::Rgb(*r, *g, *b)),
            (ColorSpace::DeviceCmyk, [c, m, y, k, ..]) => Some(Color::Cmyk(*c, *m, *y, *k)),
            (ColorSpace::Separation, [t, ..]) => Some(Color::Tint(*t)),
            (_, [g]) => Some(Color::Gray(*g)),
            (_, [r, g, b]) => Some(Color::Rgb(*r, *g, *b)),
            (_, [c, m, y, k]) => Some(Color::Cmyk(*c, *m, *y, *k)),
            _ => None,
        }
    }
}
