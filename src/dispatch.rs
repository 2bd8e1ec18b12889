//! Panel dispatch.
//!
//! The host tells the engine which panels are visible by string id and the
//! [`Dispatcher`] renders each of them. The mapping from panel to render
//! sections is a table built once at startup; dispatching never changes it.

use crate::aggregate::AggregateSpec;
use crate::breakdown::{Breakdown, BreakdownBinding, DescriptorTable, StagedBinding, StagedBreakdown};
use crate::display::DisplaySurface;
use crate::error::StatsError;
use crate::panel::PanelId;
use crate::render::{PanelBinding, StatRenderer};
use crate::slots::SlotLine;
use std::collections::HashMap;

/// One render step of a panel.
pub type Section<S> = Box<dyn Fn(&StatRenderer, &mut dyn DisplaySurface, &S) -> Result<(), StatsError>>;

/// Renders panels by id.
///
/// A panel may have several sections (the offering multiplier panel has two
/// aggregates sharing one root); they run in registration order.
///
/// # Examples
///
/// ```rust
/// use statsheet::*;
/// use statsheet::display::Document;
///
/// struct Game { quarks: f64 }
///
/// let mut dispatcher = Dispatcher::new(StatRenderer::default());
/// let quark_binding = PanelId::GlobalQuarkMultiplier.default_binding().unwrap();
/// dispatcher.register_aggregate(
///     PanelId::GlobalQuarkMultiplier,
///     quark_binding,
///     AggregateSpec::new(
///         StatCategory::new("quarks", vec![StatLine::new("Base", |g: &Game| g.quarks)]).unwrap(),
///         |g: &Game| g.quarks,
///     ),
/// );
///
/// let mut doc = Document::new();
/// let game = Game { quarks: 1.5 };
/// let rendered = dispatcher
///     .dispatch_active(&mut doc, &["globalQuarkMultiplierStats", "someOtherTab"], &game)
///     .unwrap();
///
/// assert_eq!(rendered, 1);
/// assert_eq!(doc.text("sGQMNBase"), Some("1.50"));
/// ```
pub struct Dispatcher<S> {
    renderer: StatRenderer,
    sections: HashMap<PanelId, Vec<Section<S>>>,
}

impl<S: 'static> Dispatcher<S> {
    pub fn new(renderer: StatRenderer) -> Self {
        Self {
            renderer,
            sections: HashMap::new(),
        }
    }

    pub fn renderer(&self) -> &StatRenderer {
        &self.renderer
    }

    /// Append a custom section to a panel.
    pub fn register<F>(&mut self, panel: PanelId, section: F)
    where
        F: Fn(&StatRenderer, &mut dyn DisplaySurface, &S) -> Result<(), StatsError> + 'static,
    {
        self.sections.entry(panel).or_default().push(Box::new(section));
    }

    pub fn register_aggregate(&mut self, panel: PanelId, binding: PanelBinding, spec: AggregateSpec<S>) {
        self.register(panel, move |renderer, surface, state| {
            renderer.render_aggregate(surface, state, &spec, &binding).map(|_| ())
        });
    }

    /// Register a breakdown whose factors are computed from the state.
    pub fn register_breakdown<F>(
        &mut self,
        panel: PanelId,
        binding: BreakdownBinding,
        descriptors: DescriptorTable,
        compute: F,
    ) where
        F: Fn(&S) -> Breakdown + 'static,
    {
        self.register(panel, move |renderer, surface, state| {
            renderer
                .render_breakdown(surface, &binding, &compute(state), &descriptors)
                .map(|_| ())
        });
    }

    pub fn register_staged<F>(&mut self, panel: PanelId, binding: StagedBinding, compute: F)
    where
        F: Fn(&S) -> StagedBreakdown + 'static,
    {
        self.register(panel, move |renderer, surface, state| {
            renderer.render_staged(surface, &binding, &compute(state)).map(|_| ())
        });
    }

    /// Register slots rendered under the panel's own root.
    pub fn register_slots(&mut self, panel: PanelId, slots: Vec<SlotLine<S>>) {
        self.register(panel, move |renderer, surface, state| {
            renderer
                .render_slots(surface, panel.as_str(), &slots, state)
                .map(|_| ())
        });
    }

    /// Number of sections registered for `panel`.
    pub fn section_count(&self, panel: PanelId) -> usize {
        self.sections.get(&panel).map_or(0, Vec::len)
    }

    /// Render every section of `panel`.
    ///
    /// Returns `false` without touching the surface when nothing is
    /// registered for the panel.
    pub fn dispatch(&self, surface: &mut dyn DisplaySurface, panel: PanelId, state: &S) -> Result<bool, StatsError> {
        let Some(sections) = self.sections.get(&panel) else {
            log::debug!("no sections registered for {panel}");
            return Ok(false);
        };
        for section in sections {
            section(&self.renderer, surface, state)?;
        }
        Ok(true)
    }

    /// Dispatch by string id. Unknown ids are ignored.
    pub fn dispatch_named(&self, surface: &mut dyn DisplaySurface, id: &str, state: &S) -> Result<bool, StatsError> {
        match id.parse::<PanelId>() {
            Ok(panel) => self.dispatch(surface, panel, state),
            Err(err) => {
                log::debug!("ignoring dispatch: {err}");
                Ok(false)
            }
        }
    }

    /// Dispatch each active id in order, returning how many panels rendered.
    pub fn dispatch_active(
        &self,
        surface: &mut dyn DisplaySurface,
        ids: &[&str],
        state: &S,
    ) -> Result<usize, StatsError> {
        let mut rendered = 0;
        for id in ids {
            if self.dispatch_named(surface, id, state)? {
                rendered += 1;
            }
        }
        Ok(rendered)
    }
}
