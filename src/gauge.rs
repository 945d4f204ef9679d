use serde::Serialize;
use std::f64::consts::PI;

pub const GAUGE_RADIUS: f64 = 52.0;

/// Stroke parameters for the circular score indicator.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Gauge {
    pub circumference: f64,
    pub dash_offset: f64,
}

impl Gauge {
    pub fn circumference() -> f64 {
        2.0 * PI * GAUGE_RADIUS
    }

    /// The visible arc is `percent` of the full ring; the offset hides the rest.
    pub fn render(percent: f64) -> Self {
        let circumference = Self::circumference();
        Self {
            circumference,
            dash_offset: circumference * (1.0 - percent / 100.0),
        }
    }
}
