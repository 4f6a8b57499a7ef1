//! Sheet fit calculation
//!
//! Counts how many whole copies of a rectangle fit a container in a simple
//! grid. Both orientations are tried and the better count wins; on equal
//! counts the un-rotated placement is kept so output stays predictable.

use crate::constants::FIT_EPSILON_MM;
use crate::units::Size;

/// Result of fitting a piece into a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fit {
    /// Total copies on the container (`across * down`, saturating)
    pub count: u64,
    /// Copies along the container width
    pub across: u64,
    /// Copies along the container height
    pub down: u64,
    /// Whether the piece was turned 90° to get this count
    pub rotated: bool,
}

impl Fit {
    /// True when not even one copy fits
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

// =============================================================================
// Fitting
// =============================================================================

/// Fit `piece` into `container` after removing `edge_margin_mm` from each
/// side of the container.
///
/// Returns an empty [`Fit`] when the piece does not fit in either
/// orientation; callers turn that into a `NoFit` error with stage context.
pub fn fit_pieces(piece: Size, container: Size, edge_margin_mm: f64) -> Fit {
    let usable = container.inset(edge_margin_mm);

    let upright = grid_fit(piece, usable, false);
    let turned = grid_fit(piece.rotated(), usable, true);

    if turned.count > upright.count {
        turned
    } else {
        upright
    }
}

fn grid_fit(piece: Size, usable: Size, rotated: bool) -> Fit {
    let across = whole_copies(usable.width_mm, piece.width_mm);
    let down = whole_copies(usable.height_mm, piece.height_mm);
    Fit {
        count: across.saturating_mul(down),
        across,
        down,
        rotated,
    }
}

fn whole_copies(available_mm: f64, piece_mm: f64) -> u64 {
    if available_mm <= 0.0 || piece_mm <= 0.0 {
        return 0;
    }
    ((available_mm + FIT_EPSILON_MM) / piece_mm).floor() as u64
}
