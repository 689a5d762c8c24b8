#![forbid(unsafe_code)]

//! Core: responsive breakpoints and grid size primitives.
//!
//! # Role in dashgrid
//! `dashgrid-core` owns the geometry vocabulary shared by every layer that
//! talks about dashboard layouts. It knows nothing about sections, items, or
//! undo history; `dashgrid-layout` builds the tree on top of these types.
//!
//! # Primary responsibilities
//! - **Breakpoint**: the five fixed screen classes and viewport
//!   classification via [`ScreenThresholds`].
//! - **ItemSize**: one breakpoint's width in grid columns plus an optional
//!   height (grid rows or a ratio of the width).
//! - **SizeByBreakpoint**: the authored `xl` size plus explicit per-tier
//!   overrides.

pub mod breakpoint;
pub mod size;

pub use breakpoint::{Breakpoint, ScreenThresholds};
pub use size::{ItemSize, SizeByBreakpoint, SizeError};

/// Number of grid columns available in one rendered row.
pub const GRID_COLUMNS: u8 = 12;

/// Pixel height of one grid row, used when an item height is authored in rows.
pub const GRID_ROW_HEIGHT_PX: u32 = 20;
