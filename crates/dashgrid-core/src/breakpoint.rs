#![forbid(unsafe_code)]

//! Responsive screen classes.
//!
//! A dashboard computes item geometry independently for each of five fixed
//! [`Breakpoint`]s. `Xl` is the primary tier: sizes are authored there and
//! every other tier is derived from it unless explicitly overridden.
//!
//! [`ScreenThresholds`] maps a viewport width in pixels to the breakpoint a
//! renderer should use. The current breakpoint is always passed explicitly
//! into sizing calls; nothing in this crate keeps it as ambient state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Responsive screen class.
///
/// Ordered from narrowest to widest.
///
/// | Breakpoint | Default min viewport width |
/// |-----------|----------------------------|
/// | `Xs`      | 0 px                       |
/// | `Sm`      | 576 px                     |
/// | `Md`      | 768 px                     |
/// | `Lg`      | 992 px                     |
/// | `Xl`      | 1200 px                    |
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Extra small: phones, the narrowest tier.
    Xs,
    /// Small.
    Sm,
    /// Medium.
    Md,
    /// Large.
    Lg,
    /// Extra large: the primary tier where sizes are authored.
    Xl,
}

impl Breakpoint {
    /// All breakpoints in ascending order.
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
    ];

    /// Tier whose size is authoritative.
    pub const PRIMARY: Breakpoint = Breakpoint::Xl;

    /// Narrowest tier. Ratio heights are capped here.
    pub const NARROWEST: Breakpoint = Breakpoint::Xs;

    /// Ordinal index (0 = `Xs` .. 4 = `Xl`).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Breakpoint::Xs => 0,
            Breakpoint::Sm => 1,
            Breakpoint::Md => 2,
            Breakpoint::Lg => 3,
            Breakpoint::Xl => 4,
        }
    }

    /// Short label, matching the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown breakpoint label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBreakpoint(pub String);

impl fmt::Display for UnknownBreakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown breakpoint label {:?}", self.0)
    }
}

impl std::error::Error for UnknownBreakpoint {}

impl FromStr for Breakpoint {
    type Err = UnknownBreakpoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Breakpoint::ALL
            .into_iter()
            .find(|bp| bp.label() == s)
            .ok_or_else(|| UnknownBreakpoint(s.to_owned()))
    }
}

/// Viewport thresholds for breakpoint classification.
///
/// Each field is the minimum viewport width (in pixels) for that breakpoint.
/// `Xs` implicitly starts at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenThresholds {
    /// Minimum width for `Sm`.
    pub sm: u32,
    /// Minimum width for `Md`.
    pub md: u32,
    /// Minimum width for `Lg`.
    pub lg: u32,
    /// Minimum width for `Xl`.
    pub xl: u32,
}

impl ScreenThresholds {
    /// Default thresholds: 576 / 768 / 992 / 1200 px.
    pub const DEFAULT: Self = Self {
        sm: 576,
        md: 768,
        lg: 992,
        xl: 1200,
    };

    /// Create thresholds, sanitized to be monotonically non-decreasing.
    #[must_use]
    pub const fn new(sm: u32, md: u32, lg: u32, xl: u32) -> Self {
        let md = if md < sm { sm } else { md };
        let lg = if lg < md { md } else { lg };
        let xl = if xl < lg { lg } else { xl };
        Self { sm, md, lg, xl }
    }

    /// Whether the thresholds are monotonically non-decreasing.
    #[must_use]
    pub const fn is_monotonic(self) -> bool {
        self.sm <= self.md && self.md <= self.lg && self.lg <= self.xl
    }

    /// Classify a viewport width into a breakpoint.
    #[inline]
    #[must_use]
    pub const fn classify_width(self, width: u32) -> Breakpoint {
        if width >= self.xl {
            Breakpoint::Xl
        } else if width >= self.lg {
            Breakpoint::Lg
        } else if width >= self.md {
            Breakpoint::Md
        } else if width >= self.sm {
            Breakpoint::Sm
        } else {
            Breakpoint::Xs
        }
    }

    /// Minimum viewport width for a breakpoint.
    #[must_use]
    pub const fn threshold(self, bp: Breakpoint) -> u32 {
        match bp {
            Breakpoint::Xs => 0,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
            Breakpoint::Xl => self.xl,
        }
    }
}

impl Default for ScreenThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}
