//! Shared constants for print job costing
//!
//! This module centralizes magic numbers used throughout the geometry,
//! booklet and pricing calculations.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Millimeters per centimeter
pub const MM_PER_CM: f64 = 10.0;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Millimeters per PostScript point (1 inch = 72 points)
pub const MM_PER_POINT: f64 = MM_PER_INCH / 72.0; // ≈ 0.352778

/// Square millimeters per square meter
pub const MM2_PER_M2: f64 = 1_000_000.0;

/// Grams per kilogram
pub const GRAMS_PER_KG: f64 = 1000.0;

/// Kilograms per metric ton (paper is priced per ton)
pub const KG_PER_TON: f64 = 1000.0;

/// Tolerance absorbing floating-point error when counting whole copies,
/// so a 148.5 mm piece still fits twice into 297 mm.
pub const FIT_EPSILON_MM: f64 = 1e-9;

// =============================================================================
// Booklets
// =============================================================================

/// Pages yielded by one folded print sheet (front and back of two leaves)
pub const PAGES_PER_FOLDED_SHEET: u64 = 4;

/// Every booklet gets exactly one cover sheet
pub const COVER_SHEETS_PER_BOOKLET: u64 = 1;

/// Pages carried by the cover sheet
pub const COVER_PAGES_PER_BOOKLET: u64 = PAGES_PER_FOLDED_SHEET * COVER_SHEETS_PER_BOOKLET;

// =============================================================================
// Jobs
// =============================================================================

/// Largest quantity a single quote accepts
pub const MAX_QUANTITY: u64 = 1_000_000_000;

/// Largest booklet page count a single quote accepts
pub const MAX_BOOKLET_PAGES: u64 = 10_000;

/// Default bleed/trim margin around each final item (mm)
pub const DEFAULT_ITEM_MARGIN_MM: f64 = 3.0;

/// Ranked options whose totals differ by less than this are ordered by waste
pub const COST_TIE_TOLERANCE: f64 = 0.01;

// =============================================================================
// Currencies
// =============================================================================

/// Reference currency of the surrounding system
pub const DEFAULT_REFERENCE_CURRENCY: &str = "EUR";

/// Currency assumed for catalog prices that do not state one
pub const DEFAULT_CATALOG_CURRENCY: &str = "USD";

/// Static fallback rates against EUR, used when the live FX feed is down
pub const FALLBACK_RATES_EUR: [(&str, f64); 3] = [("EUR", 1.0), ("USD", 0.95), ("TRY", 0.028)];
