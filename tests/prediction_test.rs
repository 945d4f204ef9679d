use std::path::PathBuf;

use grade_predictor::data::load_students;
use grade_predictor::{batch_predict, classify, predict_grade, Label, Score, Tier};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

#[test]
fn reset_defaults_predict_strong() {
    let score = predict_grade(10.0, 90.0, 75.0);
    assert_eq!(score.value(), 79);
    assert_eq!(classify(score).label, Label::Strong);
}

#[test]
fn perfect_inputs_cross_celebration_threshold() {
    let score = predict_grade(60.0, 100.0, 100.0);
    assert!(score.is_excellent());
    assert_eq!(classify(score).tier, Tier::Good);
}

#[test]
fn classifier_boundaries() {
    let label = |v: u8| classify(Score::try_from(v).unwrap()).label;
    assert_eq!(label(85), Label::Excellent);
    assert_eq!(label(84), Label::Strong);
    assert_eq!(label(70), Label::Strong);
    assert_eq!(label(69), Label::Fair);
    assert_eq!(label(0), Label::AtRisk);
    assert!(Score::try_from(101).is_err());
}

#[test]
fn sample_roster_scores_every_student() {
    let students = load_students(&fixture("students.csv")).unwrap();
    assert_eq!(students.len(), 5);

    let result = batch_predict(students);
    assert_eq!(result.summary.total_students, 5);
    assert_eq!(
        result.summary.good_count + result.summary.warn_count + result.summary.bad_count,
        5
    );

    let david = result
        .predictions
        .iter()
        .find(|p| p.name == "David Brown")
        .unwrap();
    assert_eq!(david.score, predict_grade(10.0, 90.0, 75.0));
    assert!(result.predictions.iter().all(|p| p.score.value() <= 100));
}
