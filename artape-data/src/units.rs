//! Distances and length units.
//!
//! All world distances are in meters. The distance report lists the same
//! distance in meters, feet, inches and centimeters, one per line, each with
//! exactly one decimal digit.

use glam::Vec3;
use std::fmt;

pub const FEET_PER_METER: f32 = 3.28084;
pub const INCHES_PER_METER: f32 = 39.3701;
pub const CENTIMETERS_PER_METER: f32 = 100.0;

/// Report text used when either endpoint is missing.
pub const EMPTY_REPORT: &str = "0";

/// Units shown in the distance report, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Meters,
    Feet,
    Inches,
    Centimeters,
}

impl LengthUnit {
    /// Report order.
    pub fn all() -> &'static [LengthUnit] {
        &[
            LengthUnit::Meters,
            LengthUnit::Feet,
            LengthUnit::Inches,
            LengthUnit::Centimeters,
        ]
    }

    /// Suffix printed after the value.
    pub fn label(self) -> &'static str {
        match self {
            LengthUnit::Meters => "meters",
            LengthUnit::Feet => "feet",
            LengthUnit::Inches => "inch",
            LengthUnit::Centimeters => "cm",
        }
    }

    /// Convert a length in meters into this unit.
    pub fn from_meters(self, meters: f32) -> f32 {
        match self {
            LengthUnit::Meters => meters,
            LengthUnit::Feet => to_feet(meters),
            LengthUnit::Inches => to_inches(meters),
            LengthUnit::Centimeters => to_centimeters(meters),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Euclidean distance between two world points, in meters.
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

pub fn to_feet(meters: f32) -> f32 {
    meters * FEET_PER_METER
}

pub fn to_inches(meters: f32) -> f32 {
    meters * INCHES_PER_METER
}

pub fn to_centimeters(meters: f32) -> f32 {
    meters * CENTIMETERS_PER_METER
}

/// Inverse of [`to_feet`].
pub fn feet_to_meters(feet: f32) -> f32 {
    feet / FEET_PER_METER
}

/// Format a value with one decimal digit followed by the unit label.
pub fn format(value: f32, unit: LengthUnit) -> String {
    format!("{:.1} {}", value, unit.label())
}

/// Multi-line distance report between two optional endpoints.
///
/// Returns [`EMPTY_REPORT`] when either endpoint is absent.
pub fn distance_report(a: Option<Vec3>, b: Option<Vec3>) -> String {
    let (Some(a), Some(b)) = (a, b) else {
        return EMPTY_REPORT.to_string();
    };
    let meters = distance(a, b);
    LengthUnit::all()
        .iter()
        .map(|unit| format(unit.from_meters(meters), *unit))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_three_axes() {
        let d = distance(Vec3::ZERO, Vec3::new(0.3, 0.4, 1.2));
        assert!((d - 1.3).abs() < 1e-5);
    }

    #[test]
    fn test_distance_symmetry_and_zero() {
        let a = Vec3::new(1.5, -2.0, 0.25);
        let b = Vec3::new(-0.5, 3.0, 4.0);
        assert_eq!(distance(a, b), distance(b, a));
        assert!(distance(a, b) > 0.0);
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn test_feet_round_trip() {
        for x in [0.001_f32, 0.5, 1.0, 3.7, 120.0] {
            let back = to_feet(feet_to_meters(x));
            assert!(((back - x) / x).abs() < 1e-4, "round trip failed for {x}");
        }
    }

    #[test]
    fn test_format_one_decimal() {
        assert_eq!(format(1.0, LengthUnit::Meters), "1.0 meters");
        assert_eq!(format(39.3701, LengthUnit::Inches), "39.4 inch");
        assert_eq!(format(0.0, LengthUnit::Centimeters), "0.0 cm");
    }

    #[test]
    fn test_report_one_meter() {
        let report = distance_report(Some(Vec3::ZERO), Some(Vec3::X));
        assert_eq!(report, "1.0 meters\n3.3 feet\n39.4 inch\n100.0 cm");
    }

    #[test]
    fn test_report_five_centimeters() {
        let report = distance_report(Some(Vec3::ZERO), Some(Vec3::new(0.05, 0.0, 0.0)));
        assert_eq!(report, "0.1 meters\n0.2 feet\n2.0 inch\n5.0 cm");
    }

    #[test]
    fn test_report_first_line_three_axes() {
        let report = distance_report(Some(Vec3::ZERO), Some(Vec3::new(0.3, 0.4, 1.2)));
        assert_eq!(report.lines().next(), Some("1.3 meters"));
        assert_eq!(report.lines().count(), 4);
    }

    #[test]
    fn test_report_missing_endpoint() {
        assert_eq!(distance_report(None, Some(Vec3::ONE)), "0");
        assert_eq!(distance_report(Some(Vec3::ONE), None), "0");
        assert_eq!(distance_report(None, None), "0");
    }
}
