use crate::id::Variant;
use plotters::style::RGBColor;

// default color cycle used when a chart supplies no explicit palette
const DEFAULT_CYCLE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

pub struct PlotFmt;

impl PlotFmt {
    pub fn variant_name(variant: Variant) -> &'static str {
        match variant {
            Variant::Controller => "controller",
            Variant::Checkpoint => "checkpoint",
        }
    }

    /// Composes a legend label, e.g. `checkpoint, 2 failures`.
    pub fn label(variant: Variant, facet: Option<(u64, &str)>) -> String {
        match facet {
            Some((value, noun)) => {
                format!("{}, {} {}", Self::variant_name(variant), value, noun)
            }
            None => String::from(Self::variant_name(variant)),
        }
    }

    /// Retrieves the color for the series drawn at `index` when the chart
    /// has no explicit palette. The cycle is fixed, so the same chart
    /// definition always renders with the same colors.
    pub fn default_color(index: usize) -> RGBColor {
        DEFAULT_CYCLE[index % DEFAULT_CYCLE.len()]
    }

    /// Resolves a palette entry: either one of the color names the shipped
    /// charts use or a `#rrggbb` literal.
    pub fn color(name: &str) -> RGBColor {
        match name {
            "blue" => RGBColor(0x00, 0x00, 0xff),
            "darkblue" => RGBColor(0x00, 0x00, 0x8b),
            "lightgreen" => RGBColor(0x90, 0xee, 0x90),
            "darkgreen" => RGBColor(0x00, 0x64, 0x00),
            "violet" => RGBColor(0xee, 0x82, 0xee),
            "darkviolet" => RGBColor(0x94, 0x00, 0xd3),
            "teal" => RGBColor(0x00, 0x80, 0x80),
            "gold" => RGBColor(0xff, 0xd7, 0x00),
            "goldenrod" => RGBColor(0xda, 0xa5, 0x20),
            "red" => RGBColor(0xff, 0x00, 0x00),
            "darkred" => RGBColor(0x8b, 0x00, 0x00),
            name => Self::hex_color(name),
        }
    }

    fn hex_color(name: &str) -> RGBColor {
        let hex = match name.strip_prefix('#') {
            Some(hex) if hex.len() == 6 && hex.is_ascii() => hex,
            _ => panic!("PlotFmt::color: color {} not supported!", name),
        };
        let channel = |range| {
            u8::from_str_radix(&hex[range], 16).unwrap_or_else(|_| {
                panic!("PlotFmt::color: color {} not supported!", name)
            })
        };
        RGBColor(channel(0..2), channel(2..4), channel(4..6))
    }
}
