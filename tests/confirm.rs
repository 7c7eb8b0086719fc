use kira_biotriage::cascade::confirm::{AgeMargin, HIGH_RISK_MULTIPLIER};
use kira_biotriage::cascade::{Confirmer, Decision, StageId};
use kira_biotriage::model::{Condition, PatientDescriptor};

#[test]
fn age_margins_follow_buckets() {
    let c = Confirmer::new();
    assert_eq!(c.age_margin(10), AgeMargin { glucose: 10.0, lactate: 0.3 });
    assert_eq!(c.age_margin(25), AgeMargin { glucose: 5.0, lactate: 0.2 });
    assert_eq!(c.age_margin(45), AgeMargin::NEUTRAL);
    assert_eq!(c.age_margin(70), AgeMargin { glucose: -5.0, lactate: -0.2 });
    assert_eq!(c.age_margin(90), AgeMargin { glucose: -10.0, lactate: -0.3 });
    assert_eq!(c.age_margin(130), AgeMargin::NEUTRAL);
}

#[test]
fn adjusted_bounds_for_child() {
    let c = Confirmer::new();
    let b = c.adjusted_bounds(&PatientDescriptor::healthy("p", 10, true));
    assert!((b.hypo - 75.0).abs() < 1e-12);
    assert!((b.hyper - 330.0).abs() < 1e-12);
    assert!((b.lactate - 3.3).abs() < 1e-12);
}

#[test]
fn risk_multiplier_takes_highest_weight() {
    let p = PatientDescriptor::new(
        "p",
        50,
        true,
        vec![Condition::Type2Diabetes, Condition::HeartDisease],
    );
    assert!((Confirmer::risk_multiplier(&p) - 1.4).abs() < 1e-12);
    assert!((Confirmer::risk_multiplier(&PatientDescriptor::healthy("p", 50, true)) - 1.0).abs() < 1e-12);

    let unknown = PatientDescriptor::new("p", 50, true, vec![Condition::from_tag("gout")]);
    assert!((Confirmer::risk_multiplier(&unknown) - 1.0).abs() < 1e-12);
}

#[test]
fn unanimous_votes_are_danger() {
    let c = Confirmer::new();
    let p = PatientDescriptor::healthy("p", 45, true);
    assert_eq!(c.votes(&p, 50.0, 1.0, 5.0, 5.0).danger_count(), 3);
    let v = c.confirm(&p, 50.0, 1.0, 5.0, 5.0);
    assert_eq!(v.stage, StageId::Confirmation);
    assert_eq!(v.decision, Decision::Danger);
    assert!((v.confidence - 0.98).abs() < 1e-12);
}

#[test]
fn two_votes_need_high_risk() {
    let c = Confirmer::new();
    let healthy = PatientDescriptor::healthy("p", 45, true);
    assert_eq!(c.votes(&healthy, 62.0, 1.0, 5.0, 5.0).danger_count(), 2);
    let v = c.confirm(&healthy, 62.0, 1.0, 5.0, 5.0);
    assert_eq!(v.decision, Decision::ExpertReviewRequired);
    assert!((v.confidence - 0.6).abs() < 1e-12);

    let diabetic = PatientDescriptor::new("p", 45, true, vec![Condition::Type1Diabetes]);
    assert!(Confirmer::risk_multiplier(&diabetic) >= HIGH_RISK_MULTIPLIER);
    let v = c.confirm(&diabetic, 62.0, 1.0, 5.0, 5.0);
    assert_eq!(v.decision, Decision::Danger);
    assert!((v.confidence - 0.95).abs() < 1e-12);
}

#[test]
fn single_vote_goes_to_review() {
    let c = Confirmer::new();
    let p = PatientDescriptor::healthy("p", 45, true);
    let votes = c.votes(&p, 66.0, 1.0, 10.0, 5.0);
    assert!(!votes.absolute);
    assert!(!votes.risk_score);
    assert!(votes.uncertainty);
    assert_eq!(
        c.confirm(&p, 66.0, 1.0, 10.0, 5.0).decision,
        Decision::ExpertReviewRequired
    );
}

#[test]
fn no_votes_is_normal() {
    let c = Confirmer::new();
    let p = PatientDescriptor::new("p", 50, true, vec![Condition::Hypertension]);
    let v = c.confirm(&p, 100.0, 1.0, 5.0, 5.0);
    assert_eq!(v.decision, Decision::Normal);
    assert!((v.confidence - 0.92).abs() < 1e-12);
}

#[test]
fn danger_only_with_enough_votes() {
    let c = Confirmer::new();
    let patients = [
        PatientDescriptor::healthy("a", 20, true),
        PatientDescriptor::new("b", 65, false, vec![Condition::KidneyDisease]),
        PatientDescriptor::new("c", 85, true, vec![Condition::Obesity]),
    ];
    for p in &patients {
        for g in [40.0, 63.0, 68.0, 100.0, 310.0, 345.0, 420.0] {
            for l in [1.0, 2.9, 3.4, 6.0] {
                let votes = c.votes(p, g, l, 8.0, 8.0).danger_count();
                let risk = Confirmer::risk_multiplier(p);
                let v = c.confirm(p, g, l, 8.0, 8.0);
                if v.decision == Decision::Danger {
                    assert!(votes == 3 || (votes == 2 && risk >= HIGH_RISK_MULTIPLIER));
                }
            }
        }
    }
}
