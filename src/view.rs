use serde::{Deserialize, Serialize};

use crate::model::{RawInputs, MAX_STUDY_HOURS};

pub const DEFAULT_HOURS: f64 = 10.0;
pub const DEFAULT_ATTENDANCE: f64 = 90.0;
pub const DEFAULT_PREVIOUS: f64 = 75.0;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Hours,
    Attendance,
    Previous,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Hours, Field::Attendance, Field::Previous];

    pub fn default_value(self) -> f64 {
        match self {
            Field::Hours => DEFAULT_HOURS,
            Field::Attendance => DEFAULT_ATTENDANCE,
            Field::Previous => DEFAULT_PREVIOUS,
        }
    }

    /// Slider upper bound. The numeric field accepts anything; the predictor clamps.
    pub fn max(self) -> f64 {
        match self {
            Field::Hours => MAX_STUDY_HOURS,
            Field::Attendance | Field::Previous => 100.0,
        }
    }
}

/// Which of the two redundant widgets an edit came from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Range,
    Number,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq, Default)]
pub struct InputControl {
    pub value: String,
}

impl InputControl {
    fn set(&mut self, value: &str) {
        self.value.clear();
        self.value.push_str(value);
    }
}

/// A slider bound to a numeric field. An edit on one side is copied verbatim
/// to the other; the copy is a plain assignment and raises no edit of its own.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct InputPair {
    pub range: InputControl,
    pub number: InputControl,
}

impl InputPair {
    pub fn new(initial: &str) -> Self {
        let mut pair = Self {
            range: InputControl::default(),
            number: InputControl::default(),
        };
        pair.set_both(initial);
        pair
    }

    pub fn input(&mut self, side: Side, value: &str) {
        let (source, mirror) = match side {
            Side::Range => (&mut self.range, &mut self.number),
            Side::Number => (&mut self.number, &mut self.range),
        };
        source.set(value);
        mirror.set(&source.value);
    }

    pub fn set_both(&mut self, value: &str) {
        self.range.set(value);
        self.number.set(value);
    }

    /// The numeric field is authoritative. Blank, malformed or non-finite text reads as 0.
    pub fn read(&self) -> f64 {
        let text = self.number.value.trim();
        if text.is_empty() {
            return 0.0;
        }
        text.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct InputPanel {
    pub hours: InputPair,
    pub attendance: InputPair,
    pub previous: InputPair,
}

impl Default for InputPanel {
    fn default() -> Self {
        let mut panel = Self {
            hours: InputPair::new(""),
            attendance: InputPair::new(""),
            previous: InputPair::new(""),
        };
        panel.reset();
        panel
    }
}

impl InputPanel {
    pub fn pair(&self, field: Field) -> &InputPair {
        match field {
            Field::Hours => &self.hours,
            Field::Attendance => &self.attendance,
            Field::Previous => &self.previous,
        }
    }

    pub fn pair_mut(&mut self, field: Field) -> &mut InputPair {
        match field {
            Field::Hours => &mut self.hours,
            Field::Attendance => &mut self.attendance,
            Field::Previous => &mut self.previous,
        }
    }

    pub fn reset(&mut self) {
        for field in Field::ALL {
            self.pair_mut(field).set_both(&field.default_value().to_string());
        }
    }

    pub fn read(&self) -> RawInputs {
        RawInputs::new(self.hours.read(), self.attendance.read(), self.previous.read())
    }
}
