//! Run configuration: generation volumes, churn thresholds, analysis limits.
//!
//! Loaded from JSON files under the data/ directory. Tests use
//! `FleetConfig::default_test()` instead.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub num_accounts: usize,
    pub num_service_points: usize,
    pub users_per_account: usize,
    pub num_asset_tags: usize,
    pub num_transactions: usize,
    /// Candidates tried per unique value before giving up.
    #[serde(default = "default_max_code_attempts")]
    pub max_code_attempts: usize,
}

fn default_max_code_attempts() -> usize {
    64
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_accounts: 1000,
            num_service_points: 50,
            users_per_account: 3,
            num_asset_tags: 5000,
            num_transactions: 100_000,
            max_code_attempts: default_max_code_attempts(),
        }
    }
}

/// Churn rule thresholds. The JSON keys are the named options of the
/// churn configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChurnParams {
    /// Churned by time when days since last purchase exceed this.
    #[serde(rename = "dias_sin_compra")]
    pub days_without_purchase: i64,
    /// Churned by amount when the average amount is below this.
    #[serde(rename = "monto_minimo")]
    pub min_avg_amount: f64,
    /// Churned by frequency when the transaction count is below this.
    #[serde(rename = "frecuencia_minima")]
    pub min_transactions: i64,
}

impl Default for ChurnParams {
    fn default() -> Self {
        Self {
            days_without_purchase: 10,
            min_avg_amount: 225_000.0,
            min_transactions: 85,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub top_products: usize,
    pub top_accounts: usize,
    pub histogram_bins: usize,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_products: 10,
            top_accounts: 20,
            histogram_bins: 50,
            chart_width: 1200,
            chart_height: 600,
        }
    }
}

/// Human-readable descriptions: table name → column name → description.
/// Printed for reference only; never alters queries or charts.
pub type ColumnDescriptions = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    pub generator: GeneratorConfig,
    pub churn: ChurnParams,
    pub analysis: AnalysisConfig,
}

impl FleetConfig {
    /// Load from the data/ directory.
    /// In tests, use FleetConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let generator: GeneratorConfig =
            read_json(&format!("{data_dir}/generator/volumes.json"))?;
        let churn: ChurnParams = read_json(&format!("{data_dir}/churn/churn_params.json"))?;
        let analysis: AnalysisConfig =
            read_json(&format!("{data_dir}/analysis/analysis_config.json"))?;

        Ok(Self {
            generator,
            churn,
            analysis,
        })
    }

    /// Config with small hard-coded volumes for use in tests.
    pub fn default_test() -> Self {
        Self {
            generator: GeneratorConfig {
                seed: 42,
                num_accounts: 10,
                num_service_points: 5,
                users_per_account: 3,
                num_asset_tags: 40,
                num_transactions: 200,
                max_code_attempts: default_max_code_attempts(),
            },
            churn: ChurnParams::default(),
            analysis: AnalysisConfig {
                chart_width: 640,
                chart_height: 480,
                ..AnalysisConfig::default()
            },
        }
    }
}

/// Load the column-description file if the data directory has one.
pub fn load_column_descriptions(data_dir: &str) -> anyhow::Result<Option<ColumnDescriptions>> {
    let path = format!("{data_dir}/schema/column_descriptions.json");
    if !Path::new(&path).exists() {
        return Ok(None);
    }
    read_json(&path).map(Some)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    serde_json::from_str(&content).map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))
}
