//! Catalog snapshots supplied by the persistence layer
//!
//! These records mirror the JSON the catalog service stores (camelCase keys,
//! prices in their own currencies, sizes in their own units). The engine only
//! reads them; see `normalize` for the conversion into engine terms.

use crate::job::{ExtraSelection, LengthEdge, PressSelection, QuoteRequest};
use crate::types::*;
use crate::units::{Dimension, LengthUnit};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
fn default_currency() -> String {
    crate::constants::DEFAULT_CATALOG_CURRENCY.to_string()
}

/// A raw sheet size a paper type can be bought in
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StockSheetSize {
    pub id: u32,
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit: LengthUnit,
}

impl StockSheetSize {
    pub fn dimension(&self) -> Dimension {
        Dimension::new(self.width, self.height, self.unit)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PaperType {
    pub id: u32,
    pub name: String,
    /// Grammage in grams per square meter
    pub gsm: f64,
    pub price_per_ton: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_currency"))]
    pub currency: String,
    pub stock_sheet_sizes: Vec<StockSheetSize>,
}

/// A press format a machine can run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PrintSheetSize {
    pub id: u32,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub click_cost: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_currency"))]
    pub click_cost_currency: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub duplex_support: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit: LengthUnit,
}

impl PrintSheetSize {
    pub fn dimension(&self) -> Dimension {
        Dimension::new(self.width, self.height, self.unit)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Machine {
    pub id: u32,
    pub name: String,
    pub setup_cost: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_currency"))]
    pub setup_cost_currency: String,
    pub print_sheet_sizes: Vec<PrintSheetSize>,
}

/// One priceable option of an extra (e.g. "Matte" vs "Gloss")
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ExtraVariant {
    pub id: u32,
    pub variant_name: String,
    pub price: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_currency"))]
    pub currency: String,
}

/// Which part of a booklet an extra applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BookletScope {
    #[default]
    Both,
    CoverOnly,
    InnerOnly,
}

/// An optional finishing service (lamination, binding, coating)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Extra {
    pub id: u32,
    pub name: String,
    /// Raw pricing type as stored; parsed into `PricingRule` when normalized
    pub pricing_type: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub setup_cost: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_currency"))]
    pub setup_cost_currency: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inside_outside_same: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub supports_double_sided: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub apply_to_print_sheet: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub booklet_application_scope: BookletScope,
    pub variants: Vec<ExtraVariant>,
}

impl Extra {
    pub fn variant(&self, variant_id: u32) -> Result<&ExtraVariant> {
        self.variants
            .iter()
            .find(|v| v.id == variant_id)
            .ok_or_else(|| {
                CostError::Config(format!(
                    "Extra '{}' has no variant {}",
                    self.name, variant_id
                ))
            })
    }
}

// =============================================================================
// Snapshots handed to the engine
// =============================================================================

/// Paper and press chosen for one production stage
#[derive(Debug, Clone, Copy)]
pub struct PressSnapshot<'a> {
    pub paper: &'a PaperType,
    pub stock_sheet: &'a StockSheetSize,
    pub machine: &'a Machine,
    pub print_sheet: &'a PrintSheetSize,
}

impl PressSnapshot<'_> {
    pub fn selection(&self) -> PressSelection {
        PressSelection {
            paper_type_id: self.paper.id,
            stock_sheet_id: self.stock_sheet.id,
            machine_id: self.machine.id,
            print_sheet_id: self.print_sheet.id,
        }
    }
}

/// A selected extra variant with the job's sidedness and edge choices
#[derive(Debug, Clone, Copy)]
pub struct ExtraChoice<'a> {
    pub extra: &'a Extra,
    pub variant: &'a ExtraVariant,
    /// Apply to both sides; `None` follows the job's double-sided flag
    pub double_sided: Option<bool>,
    /// Edge measured for length pricing; `None` uses the default edge
    pub edge: Option<LengthEdge>,
}

/// Everything the engine reads from the catalog for one quote
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    /// Flat job press, or booklet cover press
    pub press: PressSnapshot<'a>,
    /// Booklet inner press; defaults to `press`
    pub inner_press: Option<PressSnapshot<'a>>,
    pub extras: Vec<ExtraChoice<'a>>,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Catalog {
    #[cfg_attr(feature = "serde", serde(default))]
    pub paper_types: Vec<PaperType>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub machines: Vec<Machine>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extras: Vec<Extra>,
}

impl Catalog {
    pub fn paper_type(&self, id: u32) -> Result<&PaperType> {
        self.paper_types
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CostError::Config(format!("Unknown paper type {}", id)))
    }

    pub fn machine(&self, id: u32) -> Result<&Machine> {
        self.machines
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CostError::Config(format!("Unknown machine {}", id)))
    }

    pub fn extra(&self, id: u32) -> Result<&Extra> {
        self.extras
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| CostError::Config(format!("Unknown extra {}", id)))
    }

    /// Look up the catalog entries named by a press selection
    pub fn resolve_press(&self, selection: &PressSelection) -> Result<PressSnapshot<'_>> {
        let paper = self.paper_type(selection.paper_type_id)?;
        let stock_sheet = paper
            .stock_sheet_sizes
            .iter()
            .find(|s| s.id == selection.stock_sheet_id)
            .ok_or_else(|| {
                CostError::Config(format!(
                    "Paper type '{}' has no stock sheet size {}",
                    paper.name, selection.stock_sheet_id
                ))
            })?;

        let machine = self.machine(selection.machine_id)?;
        let print_sheet = machine
            .print_sheet_sizes
            .iter()
            .find(|s| s.id == selection.print_sheet_id)
            .ok_or_else(|| {
                CostError::Config(format!(
                    "Machine '{}' has no print sheet size {}",
                    machine.name, selection.print_sheet_id
                ))
            })?;

        Ok(PressSnapshot {
            paper,
            stock_sheet,
            machine,
            print_sheet,
        })
    }

    pub fn resolve_extras(&self, selections: &[ExtraSelection]) -> Result<Vec<ExtraChoice<'_>>> {
        selections
            .iter()
            .map(|selection| {
                let extra = self.extra(selection.extra_id)?;
                let variant = extra.variant(selection.variant_id)?;
                Ok(ExtraChoice {
                    extra,
                    variant,
                    double_sided: selection.double_sided,
                    edge: selection.edge,
                })
            })
            .collect()
    }

    /// Resolve every catalog reference of a quote request
    pub fn resolve(&self, request: &QuoteRequest) -> Result<Snapshot<'_>> {
        let press = self.resolve_press(&request.press)?;
        let inner_press = request
            .inner_press
            .as_ref()
            .map(|selection| self.resolve_press(selection))
            .transpose()?;
        let extras = self.resolve_extras(&request.job.extras)?;

        Ok(Snapshot {
            press,
            inner_press,
            extras,
        })
    }

    /// Check catalog invariants that the persistence layer does not enforce
    pub fn validate(&self) -> Result<()> {
        for extra in &self.extras {
            if extra.variants.is_empty() {
                return Err(CostError::Config(format!(
                    "Extra '{}' must have at least one variant",
                    extra.name
                )));
            }
        }
        for paper in &self.paper_types {
            if !(paper.gsm.is_finite() && paper.gsm > 0.0) {
                return Err(CostError::Config(format!(
                    "Paper type '{}' has invalid gsm {}",
                    paper.name, paper.gsm
                )));
            }
        }
        Ok(())
    }

    /// Load a catalog snapshot from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let catalog: Self = serde_json::from_slice(&bytes)
            .map_err(|e| CostError::Config(format!("Failed to parse catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }
}
