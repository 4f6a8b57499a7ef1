use crate::units::Size;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CostError {
    #[error("Invalid dimension for {context}: {width} x {height} (both sides must be positive)")]
    InvalidDimension {
        context: String,
        width: f64,
        height: f64,
    },
    #[error("{stage}: {piece} ({piece_size}) does not fit {container} ({container_size}) in either orientation")]
    NoFit {
        stage: Stage,
        piece: String,
        piece_size: Size,
        container: String,
        container_size: Size,
    },
    #[error("Unsupported currency {currency} ({context}): no exchange rate available")]
    UnsupportedCurrency { currency: String, context: String },
    #[error("Extra '{extra}' declares unknown pricing type '{pricing_type}'")]
    InvalidPricingConfiguration { extra: String, pricing_type: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CostError>;

/// Production stage a sheet count or cost belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Stage {
    /// Non-booklet job: every item comes off the same print sheets
    Flat,
    /// Booklet cover (one folded sheet per booklet)
    Cover,
    /// Booklet inner pages
    Inner,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Flat => write!(f, "flat job"),
            Stage::Cover => write!(f, "booklet cover"),
            Stage::Inner => write!(f, "booklet inner pages"),
        }
    }
}
