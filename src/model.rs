use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_STUDY_HOURS: f64 = 60.0;
pub const EXCELLENT_THRESHOLD: u8 = 85;
pub const PASS_THRESHOLD: u8 = 55;

/// Bounds `value` into `[min, max]`. NaN reads as zero before clamping so a
/// malformed field saturates instead of poisoning the score.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    let value = if value.is_nan() { 0.0 } else { value };
    value.max(min).min(max)
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RawInputs {
    pub hours: f64,
    pub attendance: f64,
    pub previous: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct NormalizedInputs {
    pub hours: f64,
    pub attendance: f64,
    pub previous: f64,
}

impl RawInputs {
    pub fn new(hours: f64, attendance: f64, previous: f64) -> Self {
        Self { hours, attendance, previous }
    }

    pub fn normalize(&self) -> NormalizedInputs {
        NormalizedInputs {
            hours: clamp(self.hours, 0.0, MAX_STUDY_HOURS),
            attendance: clamp(self.attendance, 0.0, 100.0) / 100.0,
            previous: clamp(self.previous, 0.0, 100.0) / 100.0,
        }
    }
}

/// Predicted grade, always an integer in `0..=100`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl TryFrom<u8> for Score {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        if value <= 100 {
            Ok(Score(value))
        } else {
            Err(format!("score {value} is outside 0..=100"))
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> u8 {
        score.0
    }
}

impl Score {
    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_excellent(self) -> bool {
        self.0 >= EXCELLENT_THRESHOLD
    }

    pub fn is_pass(self) -> bool {
        self.0 >= PASS_THRESHOLD
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

pub fn predict_grade(hours: f64, attendance_pct: f64, previous_pct: f64) -> Score {
    predict(&RawInputs::new(hours, attendance_pct, previous_pct))
}

pub fn predict(inputs: &RawInputs) -> Score {
    let n = inputs.normalize();

    // Diminishing returns on study time
    let hours_effect = (n.hours / 20.0).tanh();
    let attendance_boost = 0.8 + 0.4 * n.attendance;

    let baseline = 0.55 * n.previous + 0.35 * hours_effect + 0.10 * n.attendance.sqrt();
    let predicted = baseline * attendance_boost;

    // Fractional powers are only defined for a non-negative base.
    let predicted = predicted.max(0.0).powf(0.95);

    let percent = clamp(predicted * 100.0, 0.0, 100.0).round();
    Score(percent as u8)
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Good,
    Warn,
    Bad,
}

impl Tier {
    pub fn css_class(self) -> &'static str {
        match self {
            Tier::Good => "badge--good",
            Tier::Warn => "badge--warn",
            Tier::Bad => "badge--bad",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Excellent,
    Strong,
    Fair,
    #[serde(rename = "Needs Focus")]
    NeedsFocus,
    #[serde(rename = "At Risk")]
    AtRisk,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Excellent => "Excellent",
            Label::Strong => "Strong",
            Label::Fair => "Fair",
            Label::NeedsFocus => "Needs Focus",
            Label::AtRisk => "At Risk",
        }
    }

    pub fn tier(self) -> Tier {
        match self {
            Label::Excellent | Label::Strong => Tier::Good,
            Label::Fair | Label::NeedsFocus => Tier::Warn,
            Label::AtRisk => Tier::Bad,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub label: Label,
    pub tier: Tier,
}

pub fn classify(score: Score) -> Grade {
    let label = match score.value() {
        85..=u8::MAX => Label::Excellent,
        70..=84 => Label::Strong,
        55..=69 => Label::Fair,
        40..=54 => Label::NeedsFocus,
        _ => Label::AtRisk,
    };

    Grade { label, tier: label.tier() }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StudentRecord {
    pub name: String,
    pub hours: f64,
    pub attendance: f64,
    pub previous: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StudentPrediction {
    pub name: String,
    pub hours: f64,
    pub attendance: f64,
    pub previous: f64,
    pub score: Score,
    pub label: Label,
    pub tier: Tier,
    pub recommendation: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total_students: usize,
    pub average_score: f64,
    pub good_count: usize,
    pub warn_count: usize,
    pub bad_count: usize,
    pub pass_count: usize,
    pub pass_rate: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchPredictResponse {
    pub predictions: Vec<StudentPrediction>,
    pub summary: BatchSummary,
}

fn recommend(record: &StudentRecord, score: Score, tier: Tier) -> String {
    match tier {
        Tier::Good => {
            if score.is_excellent() {
                "Maintain current study habits".to_string()
            } else {
                "Push for consistency to reach Excellent".to_string()
            }
        }
        Tier::Warn | Tier::Bad => {
            if record.hours < 10.0 {
                "Increase weekly study hours".to_string()
            } else if record.attendance < 80.0 {
                "Improve class attendance".to_string()
            } else {
                "Review fundamentals with a tutor".to_string()
            }
        }
    }
}

pub fn predict_record(record: StudentRecord) -> StudentPrediction {
    let score = predict_grade(record.hours, record.attendance, record.previous);
    let grade = classify(score);
    let recommendation = recommend(&record, score, grade.tier);

    StudentPrediction {
        name: record.name,
        hours: record.hours,
        attendance: record.attendance,
        previous: record.previous,
        score,
        label: grade.label,
        tier: grade.tier,
        recommendation,
    }
}

pub fn batch_predict(students: Vec<StudentRecord>) -> BatchPredictResponse {
    let predictions: Vec<StudentPrediction> = students.into_iter().map(predict_record).collect();

    let mut summary = BatchSummary {
        total_students: predictions.len(),
        ..BatchSummary::default()
    };
    let mut total_score = 0u32;

    for prediction in &predictions {
        total_score += u32::from(prediction.score.value());
        match prediction.tier {
            Tier::Good => summary.good_count += 1,
            Tier::Warn => summary.warn_count += 1,
            Tier::Bad => summary.bad_count += 1,
        }
        if prediction.score.is_pass() {
            summary.pass_count += 1;
        }
    }

    if summary.total_students > 0 {
        let total = summary.total_students as f64;
        summary.average_score = f64::from(total_score) / total;
        summary.pass_rate = summary.pass_count as f64 / total;
    }

    BatchPredictResponse { predictions, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_of(value: u8) -> Score {
        Score(value)
    }

    #[test]
    fn clamp_saturates_and_zeroes_nan() {
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(f64::NAN, 0.0, 10.0), 0.0);
        assert_eq!(clamp(f64::NAN, 5.0, 10.0), 5.0);
    }

    #[test]
    fn known_inputs_produce_expected_scores() {
        assert_eq!(predict_grade(10.0, 90.0, 75.0).value(), 79);
        assert_eq!(predict_grade(60.0, 100.0, 100.0).value(), 100);
        assert_eq!(predict_grade(0.0, 0.0, 0.0).value(), 0);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        assert_eq!(
            predict_grade(-10.0, 150.0, 200.0),
            predict_grade(0.0, 100.0, 100.0)
        );
        assert_eq!(
            predict_grade(f64::NAN, f64::NAN, f64::NAN),
            predict_grade(0.0, 0.0, 0.0)
        );
        assert_eq!(
            predict_grade(f64::INFINITY, 100.0, 100.0),
            predict_grade(60.0, 100.0, 100.0)
        );
    }

    #[test]
    fn score_stays_in_range_across_grid() {
        for h in (0..=60).step_by(5) {
            for a in (0..=100).step_by(10) {
                for p in (0..=100).step_by(10) {
                    let first = predict_grade(h as f64, a as f64, p as f64);
                    let second = predict_grade(h as f64, a as f64, p as f64);
                    assert!(first.value() <= 100);
                    assert_eq!(first, second);
                }
            }
        }
    }

    #[test]
    fn previous_score_and_hours_are_monotonic() {
        for a in (0..=100).step_by(20) {
            for h in (0..=60).step_by(10) {
                let mut last = predict_grade(h as f64, a as f64, 0.0);
                for p in 1..=100 {
                    let next = predict_grade(h as f64, a as f64, p as f64);
                    assert!(next >= last, "previous {p} lowered score");
                    last = next;
                }
            }
            for p in (0..=100).step_by(20) {
                let mut last = predict_grade(0.0, a as f64, p as f64);
                for h in 1..=60 {
                    let next = predict_grade(h as f64, a as f64, p as f64);
                    assert!(next >= last, "hours {h} lowered score");
                    last = next;
                }
            }
        }
    }

    #[test]
    fn classifier_bands_are_closed_below() {
        assert_eq!(classify(score_of(100)).label, Label::Excellent);
        assert_eq!(classify(score_of(85)).label, Label::Excellent);
        assert_eq!(classify(score_of(84)).label, Label::Strong);
        assert_eq!(classify(score_of(70)).label, Label::Strong);
        assert_eq!(classify(score_of(69)).label, Label::Fair);
        assert_eq!(classify(score_of(55)).label, Label::Fair);
        assert_eq!(classify(score_of(54)).label, Label::NeedsFocus);
        assert_eq!(classify(score_of(40)).label, Label::NeedsFocus);
        assert_eq!(classify(score_of(39)).label, Label::AtRisk);
        assert_eq!(classify(score_of(0)).label, Label::AtRisk);
    }

    #[test]
    fn tiers_follow_labels() {
        assert_eq!(classify(score_of(90)).tier, Tier::Good);
        assert_eq!(classify(score_of(72)).tier, Tier::Good);
        assert_eq!(classify(score_of(60)).tier, Tier::Warn);
        assert_eq!(classify(score_of(45)).tier, Tier::Warn);
        assert_eq!(classify(score_of(10)).tier, Tier::Bad);
        assert_eq!(Tier::Warn.css_class(), "badge--warn");
    }

    #[test]
    fn labels_serialize_as_display_text() {
        let json = serde_json::to_string(&Label::NeedsFocus).unwrap();
        assert_eq!(json, "\"Needs Focus\"");
        assert_eq!(serde_json::to_string(&Tier::Bad).unwrap(), "\"bad\"");
        assert_eq!(serde_json::to_string(&score_of(42)).unwrap(), "42");
        assert_eq!(serde_json::from_str::<Score>("85").unwrap(), score_of(85));
        assert!(serde_json::from_str::<Score>("101").is_err());
    }

    #[test]
    fn batch_summary_counts_tiers() {
        let students = vec![
            StudentRecord { name: "Amina".to_string(), hours: 60.0, attendance: 100.0, previous: 100.0 },
            StudentRecord { name: "Brian".to_string(), hours: 10.0, attendance: 90.0, previous: 75.0 },
            StudentRecord { name: "Chebet".to_string(), hours: 0.0, attendance: 0.0, previous: 0.0 },
        ];

        let result = batch_predict(students);
        assert_eq!(result.summary.total_students, 3);
        assert_eq!(result.summary.good_count, 2);
        assert_eq!(result.summary.bad_count, 1);
        assert_eq!(result.summary.pass_count, 2);
        assert!((result.summary.average_score - (100.0 + 79.0) / 3.0).abs() < 1e-9);
        assert_eq!(result.predictions[0].recommendation, "Maintain current study habits");
        assert_eq!(result.predictions[1].recommendation, "Push for consistency to reach Excellent");
        assert_eq!(result.predictions[2].recommendation, "Increase weekly study hours");
    }

    #[test]
    fn empty_batch_reports_zeros() {
        let result = batch_predict(Vec::new());
        assert!(result.predictions.is_empty());
        assert_eq!(result.summary, BatchSummary::default());
    }
}
