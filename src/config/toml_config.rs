use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub report: Option<ReportConfig>,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Franchise whose leaderboard is printed.
    pub franchise: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// `compact` or `json`
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub franchises: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub branches: Vec<BranchSeed>,
    #[serde(default)]
    pub stock: Vec<StockSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchSeed {
    pub franchise: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSeed {
    pub franchise: String,
    pub branch: String,
    pub product: String,
    pub stock: i32,
}

const LOG_FORMATS: [&str; 2] = ["compact", "json"];

impl CatalogConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| CatalogError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${CATALOG_FRANCHISE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| CatalogError::config(format!("invalid placeholder pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(report) = &self.report {
            validate_non_empty_string("report.franchise", &report.franchise)?;
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if !LOG_FORMATS.contains(&format) {
                return Err(CatalogError::config(format!(
                    "logging.format: unsupported format '{}'. Valid formats: {}",
                    format,
                    LOG_FORMATS.join(", ")
                )));
            }
        }

        for name in &self.seed.franchises {
            validate_non_empty_string("seed.franchises", name)?;
        }
        for name in &self.seed.products {
            validate_non_empty_string("seed.products", name)?;
        }
        for branch in &self.seed.branches {
            validate_non_empty_string("seed.branches.franchise", &branch.franchise)?;
            validate_non_empty_string("seed.branches.name", &branch.name)?;
        }
        for entry in &self.seed.stock {
            validate_non_empty_string("seed.stock.franchise", &entry.franchise)?;
            validate_non_empty_string("seed.stock.branch", &entry.branch)?;
            validate_non_empty_string("seed.stock.product", &entry.product)?;
            validate_range("seed.stock.stock", entry.stock, 0, i32::MAX)?;
        }

        Ok(())
    }

    pub fn report_franchise(&self) -> Option<&str> {
        self.report.as_ref().map(|r| r.franchise.as_str())
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .is_some_and(|format| format == "json")
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }
}

impl Validate for CatalogConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
