#![forbid(unsafe_code)]

//! Grid sizes and per-breakpoint size sets.
//!
//! [`ItemSize`] is the footprint of one item on the 12-column grid at one
//! breakpoint. Height is expressed either as a number of grid rows or as a
//! percentage of the item's own width; when both are present the grid
//! height wins.
//!
//! [`SizeByBreakpoint`] carries the authoritative `xl` size plus optional
//! explicit overrides for the smaller tiers. Unlike a value that inherits
//! from neighbouring tiers, a missing override here means "not computed
//! yet": the sizing engine derives it from `xl` on demand.
//!
//! # Invariants
//!
//! 1. `grid_width` never exceeds [`GRID_COLUMNS`](crate::GRID_COLUMNS).
//! 2. `grid_height`, when present, is positive.
//! 3. `height_as_ratio`, when present, is finite and positive.
//! 4. `xl` is always present.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::GRID_COLUMNS;
use crate::breakpoint::Breakpoint;

/// Footprint of one item on the grid at a single breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSize {
    /// Columns occupied, `0..=12`.
    pub grid_width: u8,
    /// Height in grid rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_height: Option<u32>,
    /// Height as a percentage of the item's width.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_ratio"
    )]
    pub height_as_ratio: Option<f64>,
}

/// Largest magnitude below which every whole `f64` is an exact integer.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Whole ratios are written as integers so `50` survives a load/save cycle.
fn serialize_ratio<S: Serializer>(ratio: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match *ratio {
        Some(value) if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT => {
            serializer.serialize_some(&(value as i64))
        }
        Some(value) => serializer.serialize_some(&value),
        None => serializer.serialize_none(),
    }
}

impl ItemSize {
    /// A size with only a width.
    #[must_use]
    pub const fn width(grid_width: u8) -> Self {
        Self {
            grid_width,
            grid_height: None,
            height_as_ratio: None,
        }
    }

    /// A size with a width and a height in grid rows.
    #[must_use]
    pub const fn with_grid_height(grid_width: u8, grid_height: u32) -> Self {
        Self {
            grid_width,
            grid_height: Some(grid_height),
            height_as_ratio: None,
        }
    }

    /// A size with a width and a ratio height.
    #[must_use]
    pub const fn with_ratio(grid_width: u8, height_as_ratio: f64) -> Self {
        Self {
            grid_width,
            grid_height: None,
            height_as_ratio: Some(height_as_ratio),
        }
    }

    /// Whether the height is driven by a ratio rather than grid rows.
    #[must_use]
    pub fn is_ratio_driven(&self) -> bool {
        self.grid_height.is_none() && self.height_as_ratio.is_some()
    }

    /// Check the size against the grid bounds.
    pub fn validate(&self) -> Result<(), SizeError> {
        if self.grid_width > GRID_COLUMNS {
            return Err(SizeError::WidthOutOfRange {
                grid_width: self.grid_width,
            });
        }
        if self.grid_height == Some(0) {
            return Err(SizeError::ZeroGridHeight);
        }
        if let Some(ratio) = self.height_as_ratio
            && !(ratio.is_finite() && ratio > 0.0)
        {
            return Err(SizeError::InvalidRatio { ratio });
        }
        Ok(())
    }
}

/// Reasons an [`ItemSize`] is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeError {
    /// Width beyond the 12-column budget.
    WidthOutOfRange { grid_width: u8 },
    /// Grid height of zero rows.
    ZeroGridHeight,
    /// Ratio that is NaN, infinite, zero, or negative.
    InvalidRatio { ratio: f64 },
}

impl fmt::Display for SizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WidthOutOfRange { grid_width } => write!(
                f,
                "grid width {grid_width} exceeds the {GRID_COLUMNS}-column budget"
            ),
            Self::ZeroGridHeight => write!(f, "grid height must be positive"),
            Self::InvalidRatio { ratio } => {
                write!(f, "height ratio {ratio} must be finite and positive")
            }
        }
    }
}

impl std::error::Error for SizeError {}

/// Item sizes for every breakpoint.
///
/// `xl` is authoritative. The other tiers hold explicit overrides and are
/// omitted from the serialized form when absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeByBreakpoint {
    pub xl: ItemSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lg: Option<ItemSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md: Option<ItemSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sm: Option<ItemSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xs: Option<ItemSize>,
}

impl SizeByBreakpoint {
    /// Create a size set with only the authoritative `xl` size.
    #[must_use]
    pub const fn new(xl: ItemSize) -> Self {
        Self {
            xl,
            lg: None,
            md: None,
            sm: None,
            xs: None,
        }
    }

    /// Set the size for a breakpoint (builder pattern).
    #[must_use]
    pub fn at(mut self, bp: Breakpoint, size: ItemSize) -> Self {
        self.set(bp, size);
        self
    }

    /// The authoritative `xl` size.
    #[must_use]
    pub const fn primary(&self) -> &ItemSize {
        &self.xl
    }

    /// Mutable access to the authoritative `xl` size.
    pub fn primary_mut(&mut self) -> &mut ItemSize {
        &mut self.xl
    }

    /// Size at `bp`, if present. `xl` is always present.
    #[must_use]
    pub fn get(&self, bp: Breakpoint) -> Option<&ItemSize> {
        match bp {
            Breakpoint::Xl => Some(&self.xl),
            Breakpoint::Lg => self.lg.as_ref(),
            Breakpoint::Md => self.md.as_ref(),
            Breakpoint::Sm => self.sm.as_ref(),
            Breakpoint::Xs => self.xs.as_ref(),
        }
    }

    pub fn get_mut(&mut self, bp: Breakpoint) -> Option<&mut ItemSize> {
        match bp {
            Breakpoint::Xl => Some(&mut self.xl),
            Breakpoint::Lg => self.lg.as_mut(),
            Breakpoint::Md => self.md.as_mut(),
            Breakpoint::Sm => self.sm.as_mut(),
            Breakpoint::Xs => self.xs.as_mut(),
        }
    }

    /// Set the size for a breakpoint.
    pub fn set(&mut self, bp: Breakpoint, size: ItemSize) {
        match bp {
            Breakpoint::Xl => self.xl = size,
            Breakpoint::Lg => self.lg = Some(size),
            Breakpoint::Md => self.md = Some(size),
            Breakpoint::Sm => self.sm = Some(size),
            Breakpoint::Xs => self.xs = Some(size),
        }
    }

    /// Drop the override for a breakpoint.
    ///
    /// Clearing `Xl` is a no-op.
    pub fn clear(&mut self, bp: Breakpoint) {
        match bp {
            Breakpoint::Xl => {}
            Breakpoint::Lg => self.lg = None,
            Breakpoint::Md => self.md = None,
            Breakpoint::Sm => self.sm = None,
            Breakpoint::Xs => self.xs = None,
        }
    }

    /// Whether `bp` has a size stored.
    #[must_use]
    pub fn has_explicit(&self, bp: Breakpoint) -> bool {
        self.get(bp).is_some()
    }

    /// All stored sizes in ascending breakpoint order.
    pub fn explicit_values(&self) -> impl Iterator<Item = (Breakpoint, &ItemSize)> {
        Breakpoint::ALL
            .into_iter()
            .filter_map(move |bp| self.get(bp).map(|size| (bp, size)))
    }

    /// Validate every stored size.
    pub fn validate(&self) -> Result<(), (Breakpoint, SizeError)> {
        for (bp, size) in self.explicit_values() {
            size.validate().map_err(|err| (bp, err))?;
        }
        Ok(())
    }
}

impl From<ItemSize> for SizeByBreakpoint {
    fn from(xl: ItemSize) -> Self {
        Self::new(xl)
    }
}

impl fmt::Display for SizeByBreakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sizes(")?;
        let mut first = true;
        for (bp, size) in self.explicit_values() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{bp}={}", size.grid_width)?;
            if let Some(h) = size.grid_height {
                write!(f, "x{h}")?;
            } else if let Some(r) = size.height_as_ratio {
                write!(f, "@{r}%")?;
            }
            first = false;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn validate_accepts_full_width() {
        assert_eq!(ItemSize::with_ratio(12, 50.0).validate(), Ok(()));
        assert_eq!(ItemSize::width(0).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert_eq!(
            ItemSize::width(13).validate(),
            Err(SizeError::WidthOutOfRange { grid_width: 13 })
        );
        assert_eq!(
            ItemSize::with_grid_height(4, 0).validate(),
            Err(SizeError::ZeroGridHeight)
        );
        assert!(matches!(
            ItemSize::with_ratio(4, f64::NAN).validate(),
            Err(SizeError::InvalidRatio { .. })
        ));
        assert!(matches!(
            ItemSize::with_ratio(4, -1.0).validate(),
            Err(SizeError::InvalidRatio { .. })
        ));
    }

    #[test]
    fn grid_height_takes_precedence_over_ratio() {
        let size = ItemSize {
            grid_width: 6,
            grid_height: Some(10),
            height_as_ratio: Some(50.0),
        };
        assert!(!size.is_ratio_driven());
        assert!(ItemSize::with_ratio(6, 50.0).is_ratio_driven());
    }

    #[test]
    fn xl_is_always_present() {
        let mut sizes = SizeByBreakpoint::new(ItemSize::width(6));
        sizes.clear(Breakpoint::Xl);
        assert!(sizes.has_explicit(Breakpoint::Xl));
        assert!(!sizes.has_explicit(Breakpoint::Md));
        assert_eq!(sizes.primary().grid_width, 6);
    }

    #[test]
    fn set_and_clear_override() {
        let mut sizes = SizeByBreakpoint::new(ItemSize::width(6));
        sizes.set(Breakpoint::Sm, ItemSize::width(12));
        assert_eq!(sizes.get(Breakpoint::Sm), Some(&ItemSize::width(12)));
        sizes.clear(Breakpoint::Sm);
        assert_eq!(sizes.get(Breakpoint::Sm), None);
    }

    #[test]
    fn explicit_values_are_ascending() {
        let sizes = SizeByBreakpoint::new(ItemSize::width(2))
            .at(Breakpoint::Xs, ItemSize::width(12))
            .at(Breakpoint::Md, ItemSize::width(4));
        let order: Vec<_> = sizes.explicit_values().map(|(bp, _)| bp).collect();
        assert_eq!(order, vec![Breakpoint::Xs, Breakpoint::Md, Breakpoint::Xl]);
    }

    #[test]
    fn serde_omits_absent_tiers_and_heights() {
        let sizes = SizeByBreakpoint::new(ItemSize::with_ratio(6, 50.0))
            .at(Breakpoint::Md, ItemSize::with_grid_height(12, 10));
        let value = serde_json::to_value(sizes).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "xl": { "gridWidth": 6, "heightAsRatio": 50 },
                "md": { "gridWidth": 12, "gridHeight": 10 }
            })
        );
        let back: SizeByBreakpoint = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, sizes);
    }

    #[test]
    fn whole_ratio_round_trips_as_integer() {
        let stored = serde_json::json!({ "gridWidth": 6, "heightAsRatio": 50 });
        let size: ItemSize = serde_json::from_value(stored.clone()).expect("deserialize");
        assert_eq!(size, ItemSize::with_ratio(6, 50.0));
        assert_eq!(serde_json::to_value(size).expect("serialize"), stored);
        assert_eq!(
            serde_json::to_string(&ItemSize::with_ratio(6, 50.0)).expect("serialize"),
            r#"{"gridWidth":6,"heightAsRatio":50}"#
        );
    }

    #[test]
    fn fractional_ratio_keeps_its_fraction() {
        let stored = serde_json::json!({ "gridWidth": 4, "heightAsRatio": 37.5 });
        let size: ItemSize = serde_json::from_value(stored.clone()).expect("deserialize");
        assert_eq!(size.height_as_ratio, Some(37.5));
        assert_eq!(serde_json::to_value(size).expect("serialize"), stored);
    }

    #[test]
    fn validate_reports_offending_breakpoint() {
        let sizes = SizeByBreakpoint::new(ItemSize::width(6))
            .at(Breakpoint::Lg, ItemSize::with_grid_height(6, 0));
        assert_eq!(
            sizes.validate(),
            Err((Breakpoint::Lg, SizeError::ZeroGridHeight))
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn width_validity_matches_column_budget(width in 0u8..=32) {
            let ok = ItemSize::width(width).validate().is_ok();
            prop_assert_eq!(ok, width <= GRID_COLUMNS);
        }
    }
}
