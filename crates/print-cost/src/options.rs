use crate::constants::DEFAULT_REFERENCE_CURRENCY;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Engine-wide costing configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct EngineOptions {
    /// Currency every cost in the result is expressed in
    pub reference_currency: String,

    /// Non-printable gripper/edge margin on each side of the print sheet (mm)
    pub print_edge_margin_mm: f64,

    /// Trim margin on each side of the stock sheet before cutting (mm)
    pub stock_edge_margin_mm: f64,

    /// Quote with last-known rates when a currency is missing from the table
    pub allow_fallback_rates: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            reference_currency: DEFAULT_REFERENCE_CURRENCY.to_string(),
            print_edge_margin_mm: 0.0,
            stock_edge_margin_mm: 0.0,
            allow_fallback_rates: true,
        }
    }
}

impl EngineOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| CostError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CostError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.reference_currency.trim().is_empty() {
            return Err(CostError::Config(
                "Reference currency must not be empty".to_string(),
            ));
        }

        for (name, value) in [
            ("Print edge margin", self.print_edge_margin_mm),
            ("Stock edge margin", self.stock_edge_margin_mm),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CostError::Config(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
