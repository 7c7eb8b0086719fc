use std::path::PathBuf;

use crate::cascade::CascadeOutcome;
use crate::metrics::CascadeStats;
use crate::model::PatientRecord;
use crate::schema::v1::BioTriageV1;
use crate::search::{MetricDelta, SearchResult};

pub const DEFAULT_MIN_SENSITIVITY: f64 = 0.95;
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone)]
pub struct InputMeta {
    pub records: Option<u64>,
    pub fasting: Option<u64>,
    pub with_conditions: Option<u64>,
    pub true_danger: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub tsv_path: PathBuf,
    pub search_tsv_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub min_sensitivity: f64,
    pub grid_size: usize,
    pub baseline: SearchResult,
    pub reference: SearchResult,
    pub ranked: Vec<SearchResult>,
    pub deltas: Vec<MetricDelta>,
}

impl SearchOutcome {
    pub fn best(&self) -> Option<&SearchResult> {
        self.ranked.first()
    }
}

#[derive(Debug)]
pub struct Ctx {
    pub input: PathBuf,
    pub write_json: bool,
    pub write_tsv: bool,
    pub threads: usize,
    pub grid_path: Option<PathBuf>,
    pub min_sensitivity: f64,
    pub top_n: usize,
    pub records: Vec<PatientRecord>,
    pub outcomes: Vec<CascadeOutcome>,
    pub cascade_stats: Option<CascadeStats>,
    pub search: Option<SearchOutcome>,
    pub warnings: Vec<String>,
    pub input_meta: InputMeta,
    pub output: OutputPaths,
    pub report: BioTriageV1,
}

impl Ctx {
    pub fn new(
        input: PathBuf,
        out_dir: PathBuf,
        write_json: bool,
        write_tsv: bool,
        tool_version: &str,
    ) -> Self {
        let json_path = out_dir.join("biotriage.json");
        let tsv_path = out_dir.join("biotriage.tsv");
        let search_tsv_path = out_dir.join("biotriage_search.tsv");
        Self {
            input,
            write_json,
            write_tsv,
            threads: 0,
            grid_path: None,
            min_sensitivity: DEFAULT_MIN_SENSITIVITY,
            top_n: DEFAULT_TOP_N,
            records: Vec::new(),
            outcomes: Vec::new(),
            cascade_stats: None,
            search: None,
            warnings: Vec::new(),
            input_meta: InputMeta {
                records: None,
                fasting: None,
                with_conditions: None,
                true_danger: None,
            },
            output: OutputPaths {
                out_dir,
                json_path,
                tsv_path,
                search_tsv_path,
            },
            report: BioTriageV1::empty(tool_version),
        }
    }
}
