use kira_biotriage::cascade::review::{CombinedRiskRule, ExerciseLactateRule};
use kira_biotriage::cascade::{
    ClinicalRule, Confirmer, Decision, ExpertReview, RuleVote, StageId,
};
use kira_biotriage::model::{Condition, PatientDescriptor};

fn review(patient: &PatientDescriptor, glucose: f64, lactate: f64) -> kira_biotriage::cascade::StageVerdict {
    let confirmation = Confirmer::new().confirm(patient, glucose, lactate, 5.0, 5.0);
    ExpertReview::new().review(patient, glucose, lactate, &confirmation)
}

#[test]
fn diabetic_low_glucose_overrides_normal_confirmation() {
    let p = PatientDescriptor::new("d", 50, true, vec![Condition::Type2Diabetes]);
    let confirmation = Confirmer::new().confirm(&p, 88.0, 1.0, 5.0, 5.0);
    assert_eq!(confirmation.decision, Decision::Normal);

    let v = ExpertReview::new().review(&p, 88.0, 1.0, &confirmation);
    assert_eq!(v.stage, StageId::ExpertReview);
    assert_eq!(v.decision, Decision::Danger);
    assert!((v.confidence - 0.98).abs() < 1e-12);
    assert!(
        v.reasons
            .contains(&"diabetic patient with glucose < 90 mg/dL".to_string())
    );
}

#[test]
fn prediabetes_is_not_diabetic() {
    let p = PatientDescriptor::new("d", 30, true, vec![Condition::Prediabetes]);
    let v = review(&p, 88.0, 1.0);
    assert!(
        !v.reasons
            .contains(&"diabetic patient with glucose < 90 mg/dL".to_string())
    );
}

#[test]
fn young_healthy_lactate_reads_as_exercise() {
    let p = PatientDescriptor::healthy("e", 25, false);
    let v = review(&p, 100.0, 3.6);
    assert_eq!(v.decision, Decision::Normal);
    assert!((v.confidence - 0.90).abs() < 1e-12);
}

#[test]
fn danger_rule_beats_exercise_hint() {
    let p = PatientDescriptor::healthy("e", 25, false);
    let v = review(&p, 100.0, 4.0);
    assert_eq!(v.decision, Decision::Danger);
    assert_eq!(v.reasons, vec!["elevated lactate (4.00 mmol/L)".to_string()]);
}

#[test]
fn unresolved_defaults_to_danger() {
    let p = PatientDescriptor::healthy("u", 45, true);
    let v = review(&p, 100.0, 3.2);
    assert_eq!(v.decision, Decision::Danger);
    assert!((v.confidence - 0.75).abs() < 1e-12);
    assert_eq!(v.reasons, vec!["borderline case, no rule applicable".to_string()]);
}

#[test]
fn elderly_hyperglycemia() {
    let p = PatientDescriptor::healthy("s", 72, false);
    let v = review(&p, 290.0, 1.0);
    assert_eq!(v.decision, Decision::Danger);
    assert!(
        v.reasons
            .contains(&"senior (60+) with glucose > 280 mg/dL".to_string())
    );
}

struct AlwaysNormal;

impl ClinicalRule for AlwaysNormal {
    fn name(&self) -> &'static str {
        "always_normal"
    }

    fn evaluate(&self, _patient: &PatientDescriptor, _glucose: f64, _lactate: f64) -> RuleVote {
        RuleVote::Normal("custom".to_string())
    }
}

#[test]
fn rules_can_be_appended() {
    let base = ExpertReview::new();
    assert_eq!(
        base.rule_names(),
        vec![
            "diabetic_hypo",
            "elderly_hyper",
            "exercise_lactate",
            "combined_risk"
        ]
    );

    let custom = ExpertReview::empty().with_rule(Box::new(AlwaysNormal));
    let p = PatientDescriptor::healthy("c", 45, true);
    let confirmation = Confirmer::new().confirm(&p, 100.0, 3.2, 5.0, 5.0);
    let v = custom.review(&p, 100.0, 3.2, &confirmation);
    assert_eq!(v.decision, Decision::Normal);
    assert_eq!(v.reasons, vec!["custom".to_string()]);
}

#[test]
fn review_is_always_conclusive() {
    let reviewer = ExpertReview::new();
    for age in [5, 30, 58, 75] {
        for g in [50.0, 80.0, 150.0, 300.0] {
            for l in [1.0, 3.3, 4.5] {
                let p = PatientDescriptor::healthy("x", age, true);
                let c = Confirmer::new().confirm(&p, g, l, 5.0, 5.0);
                assert!(reviewer.review(&p, g, l, &c).decision.is_conclusive());
            }
        }
    }
}

#[test]
fn exercise_bounds_are_open() {
    let rule = ExerciseLactateRule;
    let young = PatientDescriptor::healthy("e", 25, false);
    assert_eq!(rule.evaluate(&young, 100.0, 3.0), RuleVote::NotApplicable);
    assert_eq!(rule.evaluate(&young, 100.0, 5.0), RuleVote::NotApplicable);
    assert!(matches!(rule.evaluate(&young, 100.0, 4.9), RuleVote::Normal(_)));

    let forty = PatientDescriptor::healthy("e", 40, false);
    assert_eq!(rule.evaluate(&forty, 100.0, 3.6), RuleVote::NotApplicable);
    let thirty_nine = PatientDescriptor::healthy("e", 39, false);
    assert!(matches!(rule.evaluate(&thirty_nine, 100.0, 3.6), RuleVote::Normal(_)));
}

#[test]
fn exercise_needs_no_conditions() {
    let rule = ExerciseLactateRule;
    let p = PatientDescriptor::new(
        "e",
        25,
        false,
        vec![Condition::None, Condition::Hypertension],
    );
    assert_eq!(p.conditions().len(), 2);
    assert_eq!(rule.evaluate(&p, 100.0, 3.6), RuleVote::NotApplicable);
    assert_ne!(review(&p, 100.0, 3.6).decision, Decision::Normal);
}

#[test]
fn two_risk_factors_are_danger() {
    let p = PatientDescriptor::healthy("m", 58, false);
    assert_eq!(
        CombinedRiskRule.evaluate(&p, 100.0, 3.6),
        RuleVote::Danger("multiple risk factors (2)".to_string())
    );
    let v = review(&p, 100.0, 3.6);
    assert_eq!(v.decision, Decision::Danger);
    assert_eq!(v.reasons, vec!["multiple risk factors (2)".to_string()]);

    // Age alone is one factor.
    assert_eq!(CombinedRiskRule.evaluate(&p, 100.0, 1.0), RuleVote::NotApplicable);
}
