use std::fmt;

pub const TRUE_HYPO_GLUCOSE: f64 = 70.0;
pub const TRUE_HYPER_GLUCOSE: f64 = 400.0;
pub const TRUE_LACTATE: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    None,
    Type1Diabetes,
    Type2Diabetes,
    Prediabetes,
    Hypertension,
    HeartDisease,
    KidneyDisease,
    LiverDisease,
    Obesity,
    Hyperlipidemia,
    Other(String),
}

impl Condition {
    pub fn from_tag(tag: &str) -> Self {
        let norm = tag.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match norm.as_str() {
            "" | "none" => Self::None,
            "type1_diabetes" | "t1d" => Self::Type1Diabetes,
            "type2_diabetes" | "t2d" => Self::Type2Diabetes,
            "prediabetes" => Self::Prediabetes,
            "hypertension" => Self::Hypertension,
            "heart_disease" => Self::HeartDisease,
            "kidney_disease" => Self::KidneyDisease,
            "liver_disease" => Self::LiverDisease,
            "obesity" => Self::Obesity,
            "hyperlipidemia" => Self::Hyperlipidemia,
            _ => Self::Other(norm),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Type1Diabetes => "type1_diabetes",
            Self::Type2Diabetes => "type2_diabetes",
            Self::Prediabetes => "prediabetes",
            Self::Hypertension => "hypertension",
            Self::HeartDisease => "heart_disease",
            Self::KidneyDisease => "kidney_disease",
            Self::LiverDisease => "liver_disease",
            Self::Obesity => "obesity",
            Self::Hyperlipidemia => "hyperlipidemia",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    // Prediabetes is tracked separately and does not count here.
    pub fn is_diabetic(&self) -> bool {
        matches!(self, Self::Type1Diabetes | Self::Type2Diabetes)
    }

    pub fn is_recognised(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Patient attributes visible to the classifier. Never carries true biomarker
/// values; those live in [`GroundTruth`].
#[derive(Debug, Clone, PartialEq)]
pub struct PatientDescriptor {
    pub id: String,
    pub age: u32,
    pub fasting: bool,
    conditions: Vec<Condition>,
}

impl PatientDescriptor {
    pub fn new(id: impl Into<String>, age: u32, fasting: bool, conditions: Vec<Condition>) -> Self {
        let mut set: Vec<Condition> = Vec::with_capacity(conditions.len().max(1));
        for c in conditions {
            if !set.contains(&c) {
                set.push(c);
            }
        }
        if set.is_empty() {
            set.push(Condition::None);
        }
        Self {
            id: id.into(),
            age,
            fasting,
            conditions: set,
        }
    }

    pub fn healthy(id: impl Into<String>, age: u32, fasting: bool) -> Self {
        Self::new(id, age, fasting, vec![Condition::None])
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn has_risk_conditions(&self) -> bool {
        self.conditions.iter().any(|c| !c.is_none())
    }

    pub fn is_diabetic(&self) -> bool {
        self.conditions.iter().any(Condition::is_diabetic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomarkerReading {
    pub glucose: f64,
    pub lactate: f64,
    pub unc_glucose: f64,
    pub unc_lactate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundTruth {
    pub glucose: f64,
    pub lactate: f64,
}

impl GroundTruth {
    pub fn is_danger(&self) -> bool {
        self.glucose < TRUE_HYPO_GLUCOSE
            || self.glucose > TRUE_HYPER_GLUCOSE
            || self.lactate > TRUE_LACTATE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub patient: PatientDescriptor,
    pub reading: BiomarkerReading,
    pub truth: GroundTruth,
}
