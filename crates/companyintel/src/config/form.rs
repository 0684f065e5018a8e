//! The job-creation form and its conversion into a [`CreateJobRequest`].
//!
//! Fields hold what a user types, so multi-line inputs stay raw text until
//! [`JobForm::to_request`] parses them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::estimate::CostEstimate;
use crate::parse::{parse_manual_companies, parse_search_queries};
use crate::types::{
    CrawlingConfig, CreateJobRequest, LlmConfig, LlmProvider, OutputMode, OutputRequest,
    SearchConfig,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobForm {
    pub name: String,
    /// One query per line.
    pub search_queries: String,
    pub limit: u32,
    pub locale: String,
    /// `company_name,company_url` per line.
    pub manual_companies: String,

    pub output_mode: OutputMode,
    pub spreadsheet_id: String,
    pub worksheet: String,
    pub docs_output: bool,
    pub docs_folder_id: String,
    pub csv_path: String,

    pub llm_provider: LlmProvider,
    pub llm_model: String,
    pub temperature: f64,

    pub max_pages_per_site: u32,
    pub obey_robots: bool,
    pub rate_limit_sec: f64,
    pub request_timeout_sec: u32,
}

impl Default for JobForm {
    fn default() -> Self {
        Self {
            name: "CompanyIntel Batch".to_string(),
            search_queries: "渋谷 IT 受託開発\n神奈川 製造 DX 企業".to_string(),
            limit: 20,
            locale: "ja-JP".to_string(),
            manual_companies: String::new(),
            output_mode: OutputMode::Csv,
            spreadsheet_id: String::new(),
            worksheet: "companies".to_string(),
            docs_output: true,
            docs_folder_id: String::new(),
            csv_path: "./output/companyintel_output.csv".to_string(),
            llm_provider: LlmProvider::Mock,
            llm_model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_pages_per_site: 5,
            obey_robots: true,
            rate_limit_sec: 2.0,
            request_timeout_sec: 15,
        }
    }
}

impl JobForm {
    /// Loads a form from a YAML file. Missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let form: JobForm = serde_yaml::from_str(content)?;
        form.validate()?;
        Ok(form)
    }

    /// Checks the ranges the form inputs allow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, message: String) -> Result<(), ConfigError> {
            Err(ConfigError::Validation { field, message })
        }

        if self.name.trim().is_empty() {
            return invalid("name", "must not be empty".to_string());
        }
        if !(1..=200).contains(&self.limit) {
            return invalid("limit", format!("{} is outside 1..=200", self.limit));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return invalid(
                "temperature",
                format!("{} is outside 0.0..=1.0", self.temperature),
            );
        }
        if !(1..=20).contains(&self.max_pages_per_site) {
            return invalid(
                "max_pages_per_site",
                format!("{} is outside 1..=20", self.max_pages_per_site),
            );
        }
        if !(0.0..=30.0).contains(&self.rate_limit_sec) {
            return invalid(
                "rate_limit_sec",
                format!("{} is outside 0.0..=30.0", self.rate_limit_sec),
            );
        }
        if !(3..=120).contains(&self.request_timeout_sec) {
            return invalid(
                "request_timeout_sec",
                format!("{} is outside 3..=120", self.request_timeout_sec),
            );
        }
        if self.output_mode == OutputMode::GoogleSheets && self.spreadsheet_id.trim().is_empty() {
            return invalid(
                "spreadsheet_id",
                "required when output_mode is google_sheets".to_string(),
            );
        }
        if parse_search_queries(&self.search_queries).is_empty()
            && parse_manual_companies(&self.manual_companies).is_empty()
        {
            return invalid(
                "search_queries",
                "provide at least one search query or manual company".to_string(),
            );
        }

        Ok(())
    }

    pub fn estimate(&self) -> CostEstimate {
        CostEstimate::new(self.limit, self.llm_provider, self.docs_output)
    }

    /// Builds the creation payload. Always asks the backend to run the job
    /// asynchronously.
    pub fn to_request(&self) -> CreateJobRequest {
        let spreadsheet_id = match self.output_mode {
            OutputMode::GoogleSheets => Some(self.spreadsheet_id.clone()),
            OutputMode::Csv => None,
        };
        let docs_folder_id = if self.docs_folder_id.is_empty() {
            None
        } else {
            Some(self.docs_folder_id.clone())
        };

        CreateJobRequest {
            name: self.name.clone(),
            search: SearchConfig {
                search_queries: parse_search_queries(&self.search_queries),
                limit: self.limit,
                locale: self.locale.clone(),
                manual_companies: parse_manual_companies(&self.manual_companies),
            },
            output: OutputRequest {
                mode: self.output_mode,
                spreadsheet_id,
                worksheet: self.worksheet.clone(),
                docs_output: self.docs_output,
                docs_folder_id,
                csv_path: self.csv_path.clone(),
            },
            llm: LlmConfig {
                provider: self.llm_provider,
                model: self.llm_model.clone(),
                temperature: self.temperature,
            },
            crawling: CrawlingConfig {
                max_pages_per_site: self.max_pages_per_site,
                obey_robots: self.obey_robots,
                rate_limit_sec: self.rate_limit_sec,
                request_timeout_sec: self.request_timeout_sec,
            },
            run_async: true,
        }
    }
}
