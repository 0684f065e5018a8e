//! Pre-flight estimates shown before a job is submitted.
//!
//! These are rough client-side figures. The backend computes its own
//! `estimated_cost_usd` once the job runs.

use serde::Serialize;

use crate::types::LlmProvider;

/// Per-company LLM cost for any real provider.
pub const LLM_UNIT_COST_USD: f64 = 0.018;

/// Per-company cost of exporting a generated document.
pub const DOCS_UNIT_COST_USD: f64 = 0.002;

/// Results returned by one search API request.
pub const RESULTS_PER_SEARCH_REQUEST: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    pub result_count: u32,
    pub search_quota: u32,
    pub cost_usd: f64,
}

impl CostEstimate {
    pub fn new(limit: u32, provider: LlmProvider, docs_output: bool) -> Self {
        Self {
            result_count: limit,
            search_quota: search_quota(limit),
            cost_usd: estimated_cost_usd(limit, provider, docs_output),
        }
    }

    /// Cost rounded to three decimals, e.g. `0.400`.
    pub fn cost_display(&self) -> String {
        format!("{:.3}", self.cost_usd)
    }
}

pub fn search_quota(limit: u32) -> u32 {
    limit.div_ceil(RESULTS_PER_SEARCH_REQUEST)
}

pub fn estimated_cost_usd(limit: u32, provider: LlmProvider, docs_output: bool) -> f64 {
    let llm_unit = match provider {
        LlmProvider::Mock => 0.0,
        LlmProvider::Openai | LlmProvider::Anthropic => LLM_UNIT_COST_USD,
    };
    let docs_unit = if docs_output { DOCS_UNIT_COST_USD } else { 0.0 };
    f64::from(limit) * (llm_unit + docs_unit)
}

/// Rounded completion percentage. A job with no companies reports 0.
pub fn progress_percent(processed: u32, total: u32) -> u32 {
    let ratio = f64::from(processed) / f64::from(total.max(1));
    (ratio * 100.0).round() as u32
}
