use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::io::open_maybe_gz;
use crate::model::{BiomarkerReading, Condition, GroundTruth, PatientDescriptor, PatientRecord};

pub const COLUMNS: [&str; 10] = [
    "patient_id",
    "age",
    "fasting",
    "conditions",
    "glucose",
    "lactate",
    "unc_glucose",
    "unc_lactate",
    "true_glucose",
    "true_lactate",
];

#[derive(Debug, Default)]
pub struct RecordSet {
    pub records: Vec<PatientRecord>,
    pub warnings: Vec<String>,
}

pub fn read_records(path: &Path) -> Result<RecordSet> {
    let mut reader = open_maybe_gz(path)
        .with_context(|| format!("failed to open records {}", path.display()))?;
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_records_tsv(&content, &path.display().to_string())
}

pub fn parse_records_tsv(content: &str, source: &str) -> Result<RecordSet> {
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'));

    let (_, header) = lines
        .next()
        .ok_or_else(|| anyhow::anyhow!("{}: missing header line", source))?;
    let header: Vec<&str> = header.split('\t').map(str::trim).collect();
    let mut col = [0usize; 10];
    for (slot, name) in col.iter_mut().zip(COLUMNS.iter()) {
        *slot = header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow::anyhow!("{}: missing column '{}'", source, name))?;
    }

    let mut set = RecordSet::default();
    for (idx, line) in lines {
        let line_no = idx + 1;
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < header.len() {
            bail!(
                "{}:{} expected {} columns, got {}",
                source,
                line_no,
                header.len(),
                parts.len()
            );
        }
        let field = |i: usize| parts[col[i]].trim();
        let num = |i: usize| -> Result<f64> {
            let v = field(i).parse::<f64>().with_context(|| {
                format!(
                    "{}:{} invalid {} '{}'",
                    source,
                    line_no,
                    COLUMNS[i],
                    field(i)
                )
            })?;
            if !v.is_finite() {
                bail!("{}:{} non-finite {} '{}'", source, line_no, COLUMNS[i], field(i));
            }
            Ok(v)
        };

        let id = field(0);
        if id.is_empty() {
            bail!("{}:{} empty patient_id", source, line_no);
        }
        let age: u32 = field(1)
            .parse()
            .with_context(|| format!("{}:{} invalid age '{}'", source, line_no, field(1)))?;
        let fasting = parse_flag(field(2))
            .ok_or_else(|| anyhow::anyhow!("{}:{} invalid fasting '{}'", source, line_no, field(2)))?;

        let mut conditions = Vec::new();
        for tag in field(3).split(';').map(str::trim).filter(|t| !t.is_empty()) {
            let cond = Condition::from_tag(tag);
            if !cond.is_recognised() {
                set.warnings.push(format!(
                    "{}:{} unrecognised condition '{}' (weight 1.0)",
                    source, line_no, cond
                ));
            }
            conditions.push(cond);
        }

        set.records.push(PatientRecord {
            patient: PatientDescriptor::new(id, age, fasting, conditions),
            reading: BiomarkerReading {
                glucose: num(4)?,
                lactate: num(5)?,
                unc_glucose: num(6)?,
                unc_lactate: num(7)?,
            },
            truth: GroundTruth {
                glucose: num(8)?,
                lactate: num(9)?,
            },
        });
    }

    Ok(set)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
