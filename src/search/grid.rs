use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::thresholds::{FIELD_NAMES, ThresholdConfiguration};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchGrid {
    pub candidates: [Vec<f64>; 7],
}

impl SearchGrid {
    pub fn new(candidates: [Vec<f64>; 7]) -> Self {
        Self { candidates }
    }

    pub fn single(config: &ThresholdConfiguration) -> Self {
        Self::new(config.values().map(|v| vec![v]))
    }

    pub fn len(&self) -> usize {
        self.candidates
            .iter()
            .fold(1usize, |acc, c| acc.saturating_mul(c.len()))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mixed-radix decode with the last field varying fastest.
    pub fn configuration(&self, index: usize) -> Option<ThresholdConfiguration> {
        if index >= self.len() {
            return None;
        }
        let mut rest = index;
        let mut values = [0.0f64; 7];
        for field in (0..7).rev() {
            let list = &self.candidates[field];
            values[field] = list[rest % list.len()];
            rest /= list.len();
        }
        Some(ThresholdConfiguration::from_values(values))
    }

    pub fn iter(&self) -> impl Iterator<Item = ThresholdConfiguration> + '_ {
        (0..self.len()).filter_map(move |i| self.configuration(i))
    }

    pub fn overlay(mut self, fields: Vec<(usize, Vec<f64>)>) -> Self {
        for (idx, values) in fields {
            self.candidates[idx] = values;
        }
        self
    }
}

pub fn load_builtin() -> Result<SearchGrid> {
    let content = include_str!("../../assets/grids/default_v1.tsv");
    let fields = parse_grid_tsv(content, "built-in v1")?;
    let mut candidates: [Option<Vec<f64>>; 7] = Default::default();
    for (idx, values) in fields {
        candidates[idx] = Some(values);
    }
    let mut out: [Vec<f64>; 7] = Default::default();
    for (idx, slot) in candidates.into_iter().enumerate() {
        out[idx] = match slot {
            Some(values) => values,
            None => bail!("built-in grid missing field '{}'", FIELD_NAMES[idx]),
        };
    }
    Ok(SearchGrid::new(out))
}

pub fn load_grid_tsv(path: &Path) -> Result<Vec<(usize, Vec<f64>)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read grid TSV {}", path.display()))?;
    parse_grid_tsv(&content, &path.display().to_string())
}

pub fn load_with_overlay(path: Option<&Path>) -> Result<SearchGrid> {
    let grid = load_builtin()?;
    match path {
        Some(p) => Ok(grid.overlay(load_grid_tsv(p)?)),
        None => Ok(grid),
    }
}

fn parse_grid_tsv(content: &str, source: &str) -> Result<Vec<(usize, Vec<f64>)>> {
    let mut out: Vec<(usize, Vec<f64>)> = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').collect();
        if parts.len() != 2 {
            bail!("{}:{} malformed TSV (expected 2 columns)", source, line_no);
        }
        let name = parts[0].trim();
        let field = ThresholdConfiguration::field_index(name)
            .ok_or_else(|| anyhow::anyhow!("{}:{} unknown field '{}'", source, line_no, name))?;
        if out.iter().any(|(f, _)| *f == field) {
            bail!("{}:{} duplicate field '{}'", source, line_no, name);
        }

        let mut values = Vec::new();
        for raw in parts[1].split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let v: f64 = raw.parse().with_context(|| {
                format!("{}:{} invalid value '{}' for '{}'", source, line_no, raw, name)
            })?;
            if !v.is_finite() {
                bail!("{}:{} non-finite value for '{}'", source, line_no, name);
            }
            values.push(v);
        }
        if values.is_empty() {
            bail!("{}:{} empty candidate list for '{}'", source, line_no, name);
        }
        out.push((field, values));
    }
    Ok(out)
}
