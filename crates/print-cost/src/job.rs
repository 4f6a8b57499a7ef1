use crate::constants::{DEFAULT_ITEM_MARGIN_MM, MAX_BOOKLET_PAGES, MAX_QUANTITY};
use crate::types::*;
use crate::units::{Dimension, Size};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

#[cfg(feature = "serde")]
fn default_multiplier() -> f64 {
    1.0
}

/// Bleed/trim margins around each final item, in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ItemMargins {
    pub top_mm: f64,
    pub right_mm: f64,
    pub bottom_mm: f64,
    pub left_mm: f64,
}

impl Default for ItemMargins {
    fn default() -> Self {
        Self::uniform(DEFAULT_ITEM_MARGIN_MM)
    }
}

impl ItemMargins {
    /// Create uniform margins on all sides
    pub fn uniform(margin_mm: f64) -> Self {
        Self {
            top_mm: margin_mm,
            right_mm: margin_mm,
            bottom_mm: margin_mm,
            left_mm: margin_mm,
        }
    }

    /// Grow `size` by these margins
    pub fn around(&self, size: Size) -> Size {
        Size::new(
            size.width_mm + self.left_mm + self.right_mm,
            size.height_mm + self.top_mm + self.bottom_mm,
        )
    }

    fn validate(&self) -> Result<()> {
        for value in [self.top_mm, self.right_mm, self.bottom_mm, self.left_mm] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CostError::Config(format!(
                    "Item margins must be non-negative, got {}",
                    value
                )));
            }
        }
        Ok(())
    }
}

/// Booklet-only part of a job
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BookletDetails {
    /// Pages per booklet, cover included
    pub total_pages: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cover_setup_required: bool,
}

/// Edge measured by length-priced extras
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LengthEdge {
    Long,
    Short,
    Perimeter,
}

/// An extra variant chosen for a job
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ExtraSelection {
    pub extra_id: u32,
    pub variant_id: u32,
    /// Apply to both sides; follows the job's double-sided flag when absent
    #[cfg_attr(feature = "serde", serde(default))]
    pub double_sided: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub edge: Option<LengthEdge>,
}

impl ExtraSelection {
    pub fn new(extra_id: u32, variant_id: u32) -> Self {
        Self {
            extra_id,
            variant_id,
            double_sided: None,
            edge: None,
        }
    }
}

/// The job to be quoted
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PrintJob {
    #[cfg_attr(feature = "serde", serde(default))]
    pub product_name: String,
    /// Final trimmed size of one item (one page for booklets)
    pub final_size: Dimension,
    #[cfg_attr(feature = "serde", serde(default))]
    pub margins: ItemMargins,
    /// Items for flat jobs, booklets for booklet jobs
    pub quantity: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub double_sided: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub setup_required: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub booklet: Option<BookletDetails>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extras: Vec<ExtraSelection>,
    /// Customer price multiplier applied to the raw total
    #[cfg_attr(feature = "serde", serde(default = "default_multiplier"))]
    pub price_multiplier: f64,
}

impl PrintJob {
    /// A single-sided flat job with default margins, setup required
    pub fn flat(final_size: Dimension, quantity: u64) -> Self {
        Self {
            product_name: String::new(),
            final_size,
            margins: ItemMargins::default(),
            quantity,
            double_sided: false,
            setup_required: true,
            booklet: None,
            extras: Vec::new(),
            price_multiplier: 1.0,
        }
    }

    /// A booklet job of `quantity` booklets with `total_pages` pages each
    pub fn booklet(final_size: Dimension, quantity: u64, total_pages: u64) -> Self {
        Self {
            booklet: Some(BookletDetails {
                total_pages,
                cover_setup_required: true,
            }),
            double_sided: true,
            ..Self::flat(final_size, quantity)
        }
    }

    pub fn is_booklet(&self) -> bool {
        self.booklet.is_some()
    }

    /// Validate the job before costing
    pub fn validate(&self) -> Result<()> {
        if self.quantity == 0 {
            return Err(CostError::Config("Quantity must be at least 1".to_string()));
        }
        if self.quantity > MAX_QUANTITY {
            return Err(CostError::Config(format!(
                "Quantity must not exceed {}, got {}",
                MAX_QUANTITY, self.quantity
            )));
        }
        if let Some(booklet) = self.booklet.filter(|b| b.total_pages > MAX_BOOKLET_PAGES) {
            return Err(CostError::Config(format!(
                "Booklets may have at most {} pages, got {}",
                MAX_BOOKLET_PAGES, booklet.total_pages
            )));
        }
        if !(self.price_multiplier.is_finite() && self.price_multiplier > 0.0) {
            return Err(CostError::Config(format!(
                "Price multiplier must be positive, got {}",
                self.price_multiplier
            )));
        }
        self.margins.validate()
    }
}

/// Catalog entries picked for one production stage, by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PressSelection {
    pub paper_type_id: u32,
    pub stock_sheet_id: u32,
    pub machine_id: u32,
    pub print_sheet_id: u32,
}

/// A job plus the presses it should be produced on
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct QuoteRequest {
    pub job: PrintJob,
    /// Flat job press, or booklet cover press
    pub press: PressSelection,
    /// Booklet inner press; the cover press is reused when absent
    #[cfg_attr(feature = "serde", serde(default))]
    pub inner_press: Option<PressSelection>,
}

impl QuoteRequest {
    /// Load a quote request from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| CostError::Config(format!("Failed to parse quote request: {}", e)))
    }
}
