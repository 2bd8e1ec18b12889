//! # statsheet - Deterministic Statistics Panels for Incremental Games
//!
//! A render engine for the statistics tab of an incremental game:
//! - **Catalog-driven** panels (each aggregate is an ordered list of named formulas)
//! - **Canonical totals** (the displayed total is the game's own formula, never
//!   rebuilt from the displayed lines)
//! - **Incremental** rendering (nodes are created once, later renders only rewrite text)
//! - **Big numbers** (values far beyond the `f64` range render without overflow)
//!
//! ## Core Concepts
//!
//! ### Render Pipeline
//!
//! ```text
//! [StatLine] → [StatCategory] → [AggregateSpec] → StatRenderer → [DisplaySurface]
//! ```
//!
//! 1. **Stat lines** compute one factor each from the game state
//! 2. **Categories** order the lines of one aggregate
//! 3. **Aggregate specs** add the canonical total
//! 4. **The renderer** formats every value and writes it into the surface,
//!    creating the panel's nodes on first use
//!
//! Panels that are not catalogs have their own renderers: variable-length
//! breakdowns ([`breakdown`]), fixed readout slots ([`slots`]) and
//! requirement-gated reward lists ([`rewards`]). The
//! [`Dispatcher`] maps the host's visible panel ids to all of them, and the
//! [`stage`] module classifies the player's progression stage.
//!
//! ## Example
//!
//! ```rust
//! use statsheet::*;
//! use statsheet::display::Document;
//!
//! struct Game { campaign_bonus: f64, sun_moon: f64 }
//!
//! let cubes = AggregateSpec::new(
//!     StatCategory::new("wowCubes", vec![
//!         StatLine::new("Campaign", |g: &Game| g.campaign_bonus),
//!         StatLine::new("SunMoon", |g: &Game| g.sun_moon),
//!     ]).unwrap(),
//!     |g: &Game| g.campaign_bonus * g.sun_moon,
//! );
//! let binding = PanelId::CubeMultiplier.default_binding().unwrap();
//!
//! let renderer = StatRenderer::default();
//! let mut doc = Document::new();
//! let game = Game { campaign_bonus: 2.0, sun_moon: 3.0 };
//!
//! let panel = renderer.render_aggregate(&mut doc, &game, &cubes, &binding).unwrap();
//! assert_eq!(panel.texts(), vec!["2.00", "3.00", "6.000"]);
//! assert_eq!(doc.text("statCMNT"), Some("6.000"));
//! ```
//!
//! ## Modules
//!
//! - [`stat_line`] - Stat lines, formulas and categories
//! - [`aggregate`] - Aggregate specifications and combinators
//! - [`render`] - Aggregate panel renderer
//! - [`breakdown`] - Variable-length and staged breakdowns
//! - [`slots`] - Fixed-slot readout panels
//! - [`rewards`] - Requirement-gated reward rows
//! - [`stage`] - Progression stage classification
//! - [`panel`] - The closed set of panel ids
//! - [`dispatch`] - Panel dispatch table
//! - [`display`] - Display surface trait and in-memory document
//! - [`format`] - Number formatting
//! - [`numeric`] - Float and big-number values
//! - [`label`] - Stat labels and translations
//! - [`snapshot`] - Loosely typed state provider
//! - [`config`] - Render configuration
//! - [`rendered`] - Render reports
//! - [`error`] - Error types

pub mod aggregate;
pub mod breakdown;
pub mod config;
pub mod dispatch;
pub mod display;
pub mod error;
pub mod format;
pub mod label;
pub mod numeric;
pub mod panel;
pub mod render;
pub mod rendered;
pub mod rewards;
pub mod slots;
pub mod snapshot;
pub mod stage;
pub mod stat_line;

// Re-export main types for convenience
pub use aggregate::{AggregateSpec, Combinator};
pub use config::RenderConfig;
pub use dispatch::Dispatcher;
pub use display::{DisplaySurface, Document};
pub use error::StatsError;
pub use label::{LabelCatalog, StatLabel};
pub use numeric::{BigNumber, StatNumber};
pub use panel::PanelId;
pub use render::{PanelBinding, StatRenderer};
pub use rendered::RenderedPanel;
pub use rewards::{RewardBinding, RewardTrack};
pub use snapshot::StateSnapshot;
pub use stage::{StageClassifier, StageLadder};
pub use stat_line::{StatCategory, StatLine};
