//! Single normalization pass from catalog terms into engine terms
//!
//! Everything downstream of [`Normalizer`] works in millimeters and in the
//! reference currency; currencies and units never leak past this module.

use crate::catalog::{ExtraChoice, PressSnapshot};
use crate::currency::{RateSource, RateTable, currency_code};
use crate::extras::{ExtraPricing, PricingRule};
use crate::imposition::PressGeometry;
use crate::options::EngineOptions;
use crate::types::*;

/// A currency converted with a last-known rate instead of a live one
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CurrencyNote {
    pub currency: String,
    /// Rate used, in reference units per unit of `currency`
    pub rate: f64,
    /// First amount converted with this rate
    pub context: String,
}

/// Press snapshot with sizes in millimeters and prices in reference currency
#[derive(Debug, Clone)]
pub(crate) struct NormalizedPress {
    pub geometry: PressGeometry,
    pub paper_name: String,
    pub machine_name: String,
    pub gsm: f64,
    pub price_per_ton: f64,
    pub setup_cost: f64,
    pub click_cost: f64,
    pub duplex_support: bool,
}

pub(crate) struct CurrencySummary {
    pub approximate: bool,
    pub notes: Vec<CurrencyNote>,
}

pub(crate) struct Normalizer {
    rates: RateTable,
    allow_fallback: bool,
    notes: Vec<CurrencyNote>,
    approximate: bool,
}

impl Normalizer {
    pub fn new(rates: &RateTable, options: &EngineOptions) -> Result<Self> {
        let rates = rates.rebase(&options.reference_currency, options.allow_fallback_rates)?;
        Ok(Self {
            rates,
            allow_fallback: options.allow_fallback_rates,
            notes: Vec::new(),
            approximate: false,
        })
    }

    pub fn reference_currency(&self) -> &str {
        &self.rates.base_currency
    }

    /// Convert one catalog amount to the reference currency.
    ///
    /// Snapshots may bypass `Catalog::validate`, so negative or non-finite
    /// amounts are rejected here.
    pub fn money(&mut self, amount: f64, currency: &str, context: &str) -> Result<f64> {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(CostError::Config(format!(
                "{} must be a non-negative amount, got {}",
                context, amount
            )));
        }

        // Nothing to convert, so an unknown currency on a zero price is harmless
        if amount == 0.0 {
            return Ok(0.0);
        }

        let conversion = self
            .rates
            .convert(amount, currency, self.allow_fallback)
            .map_err(|e| match e {
                CostError::UnsupportedCurrency { currency, .. } => CostError::UnsupportedCurrency {
                    currency,
                    context: context.to_string(),
                },
                other => other,
            })?;

        if conversion.source == RateSource::LastKnown {
            self.approximate = true;
            let code = currency_code(currency);
            if !self.notes.iter().any(|n| n.currency == code) {
                log::warn!(
                    "No live {} rate, using last-known rate {} for {}",
                    code,
                    conversion.rate,
                    context
                );
                self.notes.push(CurrencyNote {
                    currency: code,
                    rate: conversion.rate,
                    context: context.to_string(),
                });
            }
        }

        Ok(conversion.amount)
    }

    pub fn press(&mut self, press: &PressSnapshot<'_>) -> Result<NormalizedPress> {
        if !(press.paper.gsm.is_finite() && press.paper.gsm > 0.0) {
            return Err(CostError::Config(format!(
                "Paper type '{}' has invalid gsm {}",
                press.paper.name, press.paper.gsm
            )));
        }

        let print_name = &press.print_sheet.name;
        let stock_name = &press.stock_sheet.name;

        let geometry = PressGeometry {
            print_sheet_name: print_name.clone(),
            print_sheet: press
                .print_sheet
                .dimension()
                .to_size(&format!("print sheet '{}'", print_name))?,
            stock_sheet_name: stock_name.clone(),
            stock_sheet: press
                .stock_sheet
                .dimension()
                .to_size(&format!("stock sheet '{}'", stock_name))?,
        };

        let price_per_ton = self.money(
            press.paper.price_per_ton,
            &press.paper.currency,
            &format!("paper '{}' price per ton", press.paper.name),
        )?;
        let setup_cost = self.money(
            press.machine.setup_cost,
            &press.machine.setup_cost_currency,
            &format!("machine '{}' setup cost", press.machine.name),
        )?;
        let click_cost = self.money(
            press.print_sheet.click_cost,
            &press.print_sheet.click_cost_currency,
            &format!("print sheet '{}' click cost", print_name),
        )?;

        Ok(NormalizedPress {
            geometry,
            paper_name: press.paper.name.clone(),
            machine_name: press.machine.name.clone(),
            gsm: press.paper.gsm,
            price_per_ton,
            setup_cost,
            click_cost,
            duplex_support: press.print_sheet.duplex_support,
        })
    }

    /// Normalize one selected extra. `job_double_sided` is used when the
    /// selection does not say which sides it covers.
    pub fn extra(&mut self, choice: &ExtraChoice<'_>, job_double_sided: bool) -> Result<ExtraPricing> {
        let extra = choice.extra;
        let variant = choice.variant;
        let rule = PricingRule::from_catalog(extra)?;

        let setup_cost = self.money(
            extra.setup_cost,
            &extra.setup_cost_currency,
            &format!("extra '{}' setup cost", extra.name),
        )?;
        let unit_price = self.money(
            variant.price,
            &variant.currency,
            &format!("extra '{}' variant '{}' price", extra.name, variant.variant_name),
        )?;

        let double_sided = extra.supports_double_sided
            && choice.double_sided.unwrap_or(job_double_sided)
            && !extra.inside_outside_same;

        Ok(ExtraPricing {
            extra_id: extra.id,
            extra_name: extra.name.clone(),
            variant_name: variant.variant_name.clone(),
            rule,
            unit_price,
            setup_cost,
            scope: extra.booklet_application_scope,
            apply_to_print_sheet: extra.apply_to_print_sheet,
            double_sided,
            edge: choice.edge,
        })
    }

    pub fn finish(self) -> CurrencySummary {
        CurrencySummary {
            approximate: self.approximate || self.rates.fallback,
            notes: self.notes,
        }
    }
}
