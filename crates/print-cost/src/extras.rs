//! Finishing extras pricing
//!
//! Each selected extra is priced by its [`PricingRule`]:
//!
//! | rule          | units                                              |
//! |---------------|----------------------------------------------------|
//! | `per_page`    | applicable pages, doubled for two-sided finishing  |
//! | `per_booklet` | booklets ordered (1 for a flat job)                |
//! | `per_length`  | centimeters of print sheet or item edge            |
//! | `per_form`    | print sheets through the press                     |
//!
//! An extra's setup cost is charged once per quote, on the first selection
//! that actually produces units.

use crate::catalog::{BookletScope, Extra};
use crate::constants::MM_PER_CM;
use crate::job::LengthEdge;
use crate::types::*;
use crate::units::Size;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PricingRule {
    PerPage,
    PerBooklet,
    PerLength,
    PerForm,
}

impl PricingRule {
    pub fn as_str(self) -> &'static str {
        match self {
            PricingRule::PerPage => "per_page",
            PricingRule::PerBooklet => "per_booklet",
            PricingRule::PerLength => "per_length",
            PricingRule::PerForm => "per_form",
        }
    }

    /// Parse the raw `pricingType` stored on a catalog extra
    pub fn from_catalog(extra: &Extra) -> Result<Self> {
        match extra.pricing_type.trim().to_ascii_lowercase().as_str() {
            "per_page" => Ok(PricingRule::PerPage),
            "per_booklet" => Ok(PricingRule::PerBooklet),
            "per_length" => Ok(PricingRule::PerLength),
            "per_form" => Ok(PricingRule::PerForm),
            _ => Err(CostError::InvalidPricingConfiguration {
                extra: extra.name.clone(),
                pricing_type: extra.pricing_type.clone(),
            }),
        }
    }
}

impl fmt::Display for PricingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selected extra with prices already in the reference currency
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraPricing {
    pub extra_id: u32,
    pub extra_name: String,
    pub variant_name: String,
    pub rule: PricingRule,
    pub unit_price: f64,
    pub setup_cost: f64,
    pub scope: BookletScope,
    pub apply_to_print_sheet: bool,
    /// Finishing is applied to both sides (support, selection and
    /// inside/outside flag already resolved)
    pub double_sided: bool,
    pub edge: Option<LengthEdge>,
}

/// Pages and sheets one production stage contributes to extras pricing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductionSegment {
    pub stage: Stage,
    /// Pages finished in this stage (items for a flat job)
    pub pages: u64,
    pub print_sheets: u64,
    pub print_sheet: Size,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtrasContext {
    pub quantity: u64,
    pub booklet: bool,
    /// Final trimmed item (a single page for booklets)
    pub item: Size,
    pub segments: Vec<ProductionSegment>,
}

impl ExtrasContext {
    /// Segments an extra with `scope` applies to.
    ///
    /// Flat jobs have no inner pages, so `inner_only` selects nothing there.
    fn applicable(&self, scope: BookletScope) -> impl Iterator<Item = &ProductionSegment> {
        self.segments.iter().filter(move |segment| match (scope, segment.stage) {
            (BookletScope::Both, _) => true,
            (BookletScope::CoverOnly, Stage::Cover | Stage::Flat) => true,
            (BookletScope::InnerOnly, Stage::Inner) => true,
            _ => false,
        })
    }
}

/// Priced line for one selected extra, in the reference currency
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ExtraCost {
    pub extra_id: u32,
    pub extra_name: String,
    pub variant_name: String,
    pub rule: PricingRule,
    /// Pages, booklets, centimeters or forms depending on `rule`
    pub units: f64,
    pub unit_price: f64,
    /// Zero unless this line carried the extra's one-time setup
    pub setup_cost: f64,
    pub cost: f64,
    pub double_sided: bool,
}

/// Price every selection, charging each extra's setup at most once
pub fn price_extras(context: &ExtrasContext, extras: &[ExtraPricing]) -> Vec<ExtraCost> {
    let mut setup_charged = HashSet::new();

    extras
        .iter()
        .map(|extra| {
            let units = match extra.rule {
                PricingRule::PerPage => per_page_units(context, extra),
                PricingRule::PerBooklet => per_booklet_units(context, extra),
                PricingRule::PerLength => per_length_units(context, extra),
                PricingRule::PerForm => per_form_units(context, extra),
            };

            let setup_cost = if units > 0.0 && setup_charged.insert(extra.extra_id) {
                extra.setup_cost
            } else {
                0.0
            };
            let cost = setup_cost + units * extra.unit_price;

            log::debug!(
                "Extra '{}' ({}): {} {} -> {:.2}",
                extra.extra_name,
                extra.variant_name,
                units,
                extra.rule,
                cost
            );

            ExtraCost {
                extra_id: extra.extra_id,
                extra_name: extra.extra_name.clone(),
                variant_name: extra.variant_name.clone(),
                rule: extra.rule,
                units,
                unit_price: extra.unit_price,
                setup_cost,
                cost,
                double_sided: extra.double_sided,
            }
        })
        .collect()
}

fn per_page_units(context: &ExtrasContext, extra: &ExtraPricing) -> f64 {
    let pages = context
        .applicable(extra.scope)
        .fold(0u64, |total, s| total.saturating_add(s.pages));
    let sides = if extra.double_sided { 2 } else { 1 };
    pages.saturating_mul(sides) as f64
}

fn per_booklet_units(context: &ExtrasContext, extra: &ExtraPricing) -> f64 {
    if context.applicable(extra.scope).next().is_none() {
        return 0.0;
    }
    if context.booklet {
        context.quantity as f64
    } else {
        1.0
    }
}

fn per_length_units(context: &ExtrasContext, extra: &ExtraPricing) -> f64 {
    if extra.apply_to_print_sheet {
        let edge = extra.edge.unwrap_or(LengthEdge::Long);
        return context
            .applicable(extra.scope)
            .map(|s| s.print_sheets as f64 * edge_cm(s.print_sheet, edge))
            .sum();
    }

    if context.applicable(extra.scope).next().is_none() {
        return 0.0;
    }
    let item_edge_cm = match extra.edge {
        Some(edge) => edge_cm(context.item, edge),
        // Spine of a booklet page
        None if context.booklet => context.item.height_mm / MM_PER_CM,
        None => edge_cm(context.item, LengthEdge::Long),
    };
    context.quantity as f64 * item_edge_cm
}

fn per_form_units(context: &ExtrasContext, extra: &ExtraPricing) -> f64 {
    context
        .applicable(extra.scope)
        .fold(0u64, |total, s| total.saturating_add(s.print_sheets)) as f64
}

/// Length of `edge` of `size`, in centimeters
pub fn edge_cm(size: Size, edge: LengthEdge) -> f64 {
    let mm = match edge {
        LengthEdge::Long => size.long_edge_mm(),
        LengthEdge::Short => size.short_edge_mm(),
        LengthEdge::Perimeter => size.perimeter_mm(),
    };
    mm / MM_PER_CM
}
