//! Aggregate panel renderer.
//!
//! Provides the `StatRenderer` type, the entry point for writing stat
//! catalogs into a display surface. Rendering is incremental:
//!
//! 1. The first render of a panel creates one row per line plus a total
//!    row, tagging each line row with the panel's marker class
//! 2. Every render (the first included) evaluates each formula in catalog
//!    order and rewrites the value text of the cached nodes
//! 3. The canonical total is evaluated once and written to the total row
//!
//! Whether a panel was already built is decided by looking for its marker
//! class on the surface, not by a flag held here, so the renderer itself is
//! stateless and can be shared by every panel.

use crate::aggregate::AggregateSpec;
use crate::config::RenderConfig;
use crate::display::{DisplaySurface, ElementSpec};
use crate::error::StatsError;
use crate::format::{NumberFormatter, StandardFormatter};
use crate::label::{LabelCatalog, LabelLookup};
use crate::rendered::RenderedPanel;
use crate::stat_line::StatLine;
use std::collections::HashSet;

/// Where an aggregate panel lives and how its node ids are derived.
///
/// For a line labelled `L` the row id is `prefix + L` and its value node is
/// `prefix + "N" + L`. The total row is `prefix + "T"` with value node
/// `prefix + "NT"`.
///
/// # Examples
///
/// ```rust
/// use statsheet::PanelBinding;
///
/// let binding = PanelBinding::new("globalCubeMultiplierStats", "statGCM", "GlobalCubeStat");
/// assert_eq!(binding.line_id("Beta"), "statGCMBeta");
/// assert_eq!(binding.value_id("Beta"), "statGCMNBeta");
/// assert_eq!(binding.total_id(), "statGCMT");
/// assert_eq!(binding.total_value_id(), "statGCMNT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PanelBinding {
    /// Id of the container the rows are appended to.
    pub root: String,
    /// Unique per panel section; every node id starts with it.
    pub prefix: String,
    /// Class that marks the section's line rows as already created.
    pub marker: String,
}

impl PanelBinding {
    pub fn new(root: impl Into<String>, prefix: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
            marker: marker.into(),
        }
    }

    pub fn line_id(&self, label: &str) -> String {
        format!("{}{}", self.prefix, label)
    }

    pub fn value_id(&self, label: &str) -> String {
        format!("{}N{}", self.prefix, label)
    }

    pub fn total_id(&self) -> String {
        format!("{}T", self.prefix)
    }

    pub fn total_value_id(&self) -> String {
        format!("{}NT", self.prefix)
    }
}

/// Writes stat panels into a [`DisplaySurface`].
///
/// The renderer owns its formatting and label collaborators but holds no
/// per-panel state; the node cache lives in the surface.
///
/// # Examples
///
/// ```rust
/// use statsheet::*;
/// use statsheet::display::Document;
///
/// struct Game { campaign: f64 }
///
/// let spec = AggregateSpec::new(
///     StatCategory::new("cubes", vec![
///         StatLine::new("Campaign", |g: &Game| g.campaign),
///         StatLine::new("SunMoon", |_: &Game| 3.0),
///     ]).unwrap(),
///     |g: &Game| g.campaign * 3.0,
/// );
/// let binding = PanelBinding::new("cubeStats", "statC", "CubeStat");
///
/// let renderer = StatRenderer::default();
/// let mut doc = Document::new();
/// let game = Game { campaign: 2.0 };
///
/// let first = renderer.render_aggregate(&mut doc, &game, &spec, &binding).unwrap();
/// assert_eq!(first.texts(), vec!["2.00", "3.00", "6.000"]);
/// assert_eq!(first.created_nodes, 6);
///
/// let second = renderer.render_aggregate(&mut doc, &game, &spec, &binding).unwrap();
/// assert_eq!(second.texts(), first.texts());
/// assert_eq!(second.created_nodes, 0);
/// ```
pub struct StatRenderer {
    config: RenderConfig,
    formatter: Box<dyn NumberFormatter>,
    labels: Box<dyn LabelLookup>,
}

impl StatRenderer {
    /// Create a renderer with the standard formatter and no translations.
    pub fn new(config: RenderConfig) -> Self {
        let formatter = StandardFormatter::new(config.format);
        Self {
            config,
            formatter: Box::new(formatter),
            labels: Box::new(LabelCatalog::empty()),
        }
    }

    pub fn with_formatter(mut self, formatter: impl NumberFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn with_labels(mut self, labels: impl LabelLookup + 'static) -> Self {
        self.labels = Box::new(labels);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn formatter(&self) -> &dyn NumberFormatter {
        self.formatter.as_ref()
    }

    /// Render one aggregate section.
    ///
    /// Creates the section's nodes if no node on the surface carries the
    /// binding's marker class, then rewrites every line value and the
    /// total.
    ///
    /// # Errors
    ///
    /// * [`StatsError::MissingNode`] if a value node is absent although the
    ///   marker says the section was built
    /// * [`StatsError::DuplicateNode`] if the section's ids collide with
    ///   existing nodes or with each other; nothing is created in that case
    pub fn render_aggregate<S>(
        &self,
        surface: &mut dyn DisplaySurface,
        state: &S,
        spec: &AggregateSpec<S>,
        binding: &PanelBinding,
    ) -> Result<RenderedPanel, StatsError> {
        surface.ensure(&binding.root);

        let mut panel = RenderedPanel::new(&binding.root, &binding.prefix);
        if surface.count_with_class(&binding.marker) == 0 {
            panel.created_nodes = self.create_aggregate_nodes(surface, spec, binding)?;
        }

        for line in spec.category() {
            let value = line.evaluate(state);
            let precision = line.precision().unwrap_or(self.config.default_precision);
            let text = self.formatter.format(&value, precision, true);
            let node_id = binding.value_id(line.label().as_str());
            self.write(surface, &node_id, &text)?;
            panel.add_line(line.label().as_str(), node_id, value, text);
        }

        let total = spec.canonical_total(state);
        let text = self.formatter.format(&total, self.config.total_precision, true);
        let node_id = binding.total_value_id();
        self.write(surface, &node_id, &text)?;
        panel.set_total(spec.total_label(), node_id, total, text);

        Ok(panel)
    }

    fn create_aggregate_nodes<S>(
        &self,
        surface: &mut dyn DisplaySurface,
        spec: &AggregateSpec<S>,
        binding: &PanelBinding,
    ) -> Result<usize, StatsError> {
        log::debug!(
            "creating {} stat rows for {} ({})",
            spec.category().len(),
            binding.root,
            binding.prefix
        );

        self.check_free_ids(surface, spec, binding)?;

        let mut created = 0;
        for line in spec.category() {
            created += self.create_line_row(surface, binding, line)?;
        }

        let row_id = binding.total_id();
        let row = ElementSpec::new(&row_id, &self.config.line_tag)
            .with_class(&self.config.line_class)
            .with_class(&self.config.total_class)
            .with_text(self.translate(&binding.root, spec.total_label()));
        surface.create_child(&binding.root, row)?;
        surface.create_child(&row_id, self.value_node(binding.total_value_id()))?;

        Ok(created + 2)
    }

    /// Reject the section before creating anything if one of its ids is
    /// taken, either on the surface or by another node of the same section
    /// (a line labelled `T` lands on the total row).
    fn check_free_ids<S>(
        &self,
        surface: &dyn DisplaySurface,
        spec: &AggregateSpec<S>,
        binding: &PanelBinding,
    ) -> Result<(), StatsError> {
        let mut seen = HashSet::new();
        let line_ids = spec.category().iter().flat_map(|line| {
            let label = line.label().as_str();
            [binding.line_id(label), binding.value_id(label)]
        });
        for id in line_ids.chain([binding.total_id(), binding.total_value_id()]) {
            if surface.contains(&id) || !seen.insert(id.clone()) {
                log::error!("cannot build {}: node id {id} is already taken", binding.root);
                return Err(StatsError::DuplicateNode(id));
            }
        }
        Ok(())
    }

    fn create_line_row<S>(
        &self,
        surface: &mut dyn DisplaySurface,
        binding: &PanelBinding,
        line: &StatLine<S>,
    ) -> Result<usize, StatsError> {
        let label = line.label().as_str();
        let row_id = binding.line_id(label);
        let row = ElementSpec::new(&row_id, &self.config.line_tag)
            .with_class(&self.config.line_class)
            .with_class(&binding.marker)
            .with_color(line.color().unwrap_or(&self.config.default_color))
            .with_text(self.translate(&binding.root, label));

        surface.create_child(&binding.root, row)?;
        surface.create_child(&row_id, self.value_node(binding.value_id(label)))?;
        Ok(2)
    }

    pub(crate) fn value_node(&self, id: String) -> ElementSpec {
        ElementSpec::new(id, &self.config.value_tag).with_class(&self.config.number_class)
    }

    pub(crate) fn translate(&self, root: &str, label: &str) -> String {
        self.lookup(&self.config.label_key(root, label))
    }

    pub(crate) fn lookup(&self, key: &str) -> String {
        self.labels.translate(key)
    }

    /// Write text into a node that must already exist.
    pub(crate) fn write(
        &self,
        surface: &mut dyn DisplaySurface,
        node_id: &str,
        text: &str,
    ) -> Result<(), StatsError> {
        log::trace!("{node_id} <- {text}");
        surface.set_text(node_id, text).map_err(|err| {
            log::error!("stat render aborted: {err}");
            err
        })
    }
}

impl Default for StatRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Document;
    use crate::numeric::{BigNumber, StatNumber};
    use crate::stat_line::StatCategory;

    struct Game {
        campaign: f64,
        obtainium_exponent: i64,
    }

    fn game() -> Game {
        Game {
            campaign: 2.0,
            obtainium_exponent: 2,
        }
    }

    fn two_line_spec() -> AggregateSpec<Game> {
        let category = StatCategory::new(
            "cubes",
            vec![
                StatLine::new("Campaign", |g: &Game| g.campaign),
                StatLine::new("SunMoon", |_: &Game| 3.0).with_color("gold"),
            ],
        )
        .unwrap();
        AggregateSpec::new(category, |g: &Game| g.campaign * 3.0)
    }

    fn binding() -> PanelBinding {
        PanelBinding::new("cubeMultiplierStats", "statCM", "WowCubeStat")
    }

    #[test]
    fn test_first_render_builds_rows() {
        let renderer = StatRenderer::default();
        let mut doc = Document::new();

        let panel = renderer
            .render_aggregate(&mut doc, &game(), &two_line_spec(), &binding())
            .unwrap();

        assert_eq!(panel.created_nodes, 6);
        assert_eq!(doc.count_with_class("WowCubeStat"), 2);
        assert_eq!(doc.count_with_class("statTotal"), 1);

        let rows: Vec<&str> = doc.children("cubeMultiplierStats").iter().map(|e| e.id()).collect();
        assert_eq!(rows, vec!["statCMCampaign", "statCMSunMoon", "statCMT"]);

        assert_eq!(doc.text("statCMNCampaign"), Some("2.00"));
        assert_eq!(doc.text("statCMNSunMoon"), Some("3.00"));
        assert_eq!(doc.text("statCMNT"), Some("6.000"));
    }

    #[test]
    fn test_row_colors_and_labels() {
        let mut labels = LabelCatalog::empty();
        labels.insert("statistics.cubeMultiplierStats.Campaign", "Campaign Bonus:");
        let renderer = StatRenderer::default().with_labels(labels);
        let mut doc = Document::new();

        renderer
            .render_aggregate(&mut doc, &game(), &two_line_spec(), &binding())
            .unwrap();

        let campaign = doc.element("statCMCampaign").unwrap();
        assert_eq!(campaign.text(), "Campaign Bonus:");
        assert_eq!(campaign.color(), Some("white"));
        assert_eq!(campaign.tag(), "p");

        let sun_moon = doc.element("statCMSunMoon").unwrap();
        assert_eq!(sun_moon.text(), "statistics.cubeMultiplierStats.SunMoon");
        assert_eq!(sun_moon.color(), Some("gold"));

        assert_eq!(
            doc.text("statCMT"),
            Some("statistics.cubeMultiplierStats.Total")
        );
        assert!(doc.element("statCMNT").unwrap().has_class("statNumber"));
    }

    #[test]
    fn test_rerender_updates_text_only() {
        let renderer = StatRenderer::default();
        let spec = two_line_spec();
        let mut doc = Document::new();
        let mut state = game();

        renderer.render_aggregate(&mut doc, &state, &spec, &binding()).unwrap();
        let nodes = doc.node_count();

        state.campaign = 4.0;
        let panel = renderer.render_aggregate(&mut doc, &state, &spec, &binding()).unwrap();

        assert_eq!(panel.created_nodes, 0);
        assert_eq!(doc.node_count(), nodes);
        assert_eq!(doc.text("statCMNCampaign"), Some("4.00"));
        assert_eq!(doc.text("statCMNT"), Some("12.000"));
    }

    #[test]
    fn test_line_precision_overrides_default() {
        let category = StatCategory::new(
            "gq",
            vec![StatLine::new("Campaign", |_: &Game| 1.23456).with_precision(4)],
        )
        .unwrap();
        let spec = AggregateSpec::new(category, |_: &Game| 1.0);
        let renderer = StatRenderer::default();
        let mut doc = Document::new();

        let panel = renderer
            .render_aggregate(&mut doc, &game(), &spec, &PanelBinding::new("gq", "sGQ", "GQStat"))
            .unwrap();
        assert_eq!(panel.line_text("Campaign"), Some("1.2346"));
    }

    #[test]
    fn test_big_values_render() {
        let category = StatCategory::new(
            "obtainium",
            vec![StatLine::new("Base", |g: &Game| BigNumber::pow10(g.obtainium_exponent * 400))],
        )
        .unwrap();
        let spec = AggregateSpec::new(category, |g: &Game| {
            StatNumber::from(BigNumber::pow10(g.obtainium_exponent * 400)) * StatNumber::from(2.0)
        });
        let renderer = StatRenderer::default();
        let mut doc = Document::new();

        let panel = renderer
            .render_aggregate(&mut doc, &game(), &spec, &PanelBinding::new("obt", "statObt", "ObtainiumStat"))
            .unwrap();
        assert_eq!(panel.line_text("Base"), Some("1.00e800"));
        assert_eq!(panel.total.unwrap().text, "2.000e800");
    }

    #[test]
    fn test_missing_node_after_marker_fails() {
        let renderer = StatRenderer::default();
        let mut doc = Document::new();
        doc.ensure("cubeMultiplierStats");
        // marker present but the section's value nodes were never created
        doc.create_child(
            "cubeMultiplierStats",
            ElementSpec::new("stray", "p").with_class("WowCubeStat"),
        )
        .unwrap();

        let err = renderer
            .render_aggregate(&mut doc, &game(), &two_line_spec(), &binding())
            .unwrap_err();
        assert_eq!(err, StatsError::MissingNode(String::from("statCMNCampaign")));
    }

    #[test]
    fn test_prefix_collision_fails() {
        let renderer = StatRenderer::default();
        let mut doc = Document::new();
        let spec = two_line_spec();

        renderer.render_aggregate(&mut doc, &game(), &spec, &binding()).unwrap();

        let clash = PanelBinding::new("cubeMultiplierStats", "statCM", "OtherMarker");
        let err = renderer.render_aggregate(&mut doc, &game(), &spec, &clash).unwrap_err();
        assert_eq!(err, StatsError::DuplicateNode(String::from("statCMCampaign")));
    }

    #[test]
    fn test_clashing_label_creates_nothing() {
        let category = StatCategory::new(
            "cubes",
            vec![
                StatLine::new("A", |_: &Game| 1.0),
                StatLine::new("T", |_: &Game| 2.0),
            ],
        )
        .unwrap();
        let spec = AggregateSpec::new(category, |_: &Game| 2.0);
        let renderer = StatRenderer::default();
        let mut doc = Document::new();

        for _ in 0..2 {
            let err = renderer
                .render_aggregate(&mut doc, &game(), &spec, &binding())
                .unwrap_err();
            assert_eq!(err, StatsError::DuplicateNode(String::from("statCMT")));
            assert_eq!(doc.count_with_class("WowCubeStat"), 0);
            assert_eq!(doc.node_count(), 1);
        }
    }

    #[test]
    fn test_label_hitting_total_value_id_is_rejected() {
        let category = StatCategory::new("cubes", vec![StatLine::new("NT", |_: &Game| 1.0)]).unwrap();
        let spec = AggregateSpec::new(category, |_: &Game| 1.0);
        let mut doc = Document::new();

        let err = StatRenderer::default()
            .render_aggregate(&mut doc, &game(), &spec, &binding())
            .unwrap_err();
        assert_eq!(err, StatsError::DuplicateNode(String::from("statCMNT")));
        assert!(doc.children("cubeMultiplierStats").is_empty());
    }

    #[test]
    fn test_two_sections_share_a_root() {
        let renderer = StatRenderer::default();
        let mut doc = Document::new();
        let first = two_line_spec();
        let second = AggregateSpec::new(
            StatCategory::new("time", vec![StatLine::new("TimeMultiplier", |_: &Game| 1.5)]).unwrap(),
            |_: &Game| 1.5,
        )
        .with_total_label("Total2");

        renderer
            .render_aggregate(&mut doc, &game(), &first, &PanelBinding::new("off", "statOff", "OfferingStat"))
            .unwrap();
        let panel = renderer
            .render_aggregate(&mut doc, &game(), &second, &PanelBinding::new("off", "statOff2", "OfferingStat2"))
            .unwrap();

        assert_eq!(panel.created_nodes, 4);
        assert_eq!(doc.children("off").len(), 5);
        assert_eq!(doc.text("statOff2T"), Some("statistics.off.Total2"));
    }
}
