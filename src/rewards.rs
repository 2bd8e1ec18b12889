//! Requirement-gated reward lists.
//!
//! A reward track pairs one progress value (the challenge 15 exponent) with
//! rewards that unlock at fixed requirements. Each reward has a row that is
//! created once and stays hidden until the progress reaches its
//! requirement. A separate node names the lowest requirement not reached
//! yet, or says that everything is unlocked.
//!
//! Rendering only reads the state. Side effects of unlocking a reward
//! belong to the host.

use crate::display::{DisplaySurface, ElementSpec};
use crate::error::StatsError;
use crate::numeric::StatNumber;
use crate::render::StatRenderer;
use crate::rendered::RenderedPanel;
use crate::stat_line::StatFormula;
use std::collections::HashSet;
use std::fmt;

const AMOUNT_PLACEHOLDER: &str = "{{amount}}";
const EXPONENT_PLACEHOLDER: &str = "{{exponent}}";
const PERCENT_PRECISION: u8 = 2;

enum RewardAmount<S> {
    /// A multiplier, shown as a percent increase.
    Multiplier(Box<dyn StatFormula<S>>),
    Unlock,
}

/// One reward of a track.
///
/// # Examples
///
/// ```rust
/// use statsheet::rewards::Reward;
///
/// struct Game { exponent: f64 }
///
/// let cubes = Reward::multiplier("cube1", 750.0, |g: &Game| 1.0 + g.exponent / 10_000.0);
/// let hepteract = Reward::<Game>::unlock("challengeHepteractUnlocked", 1e3).with_color("pink");
///
/// assert!(cubes.is_unlocked(750.0));
/// assert!(!hepteract.is_unlocked(999.0));
/// ```
pub struct Reward<S> {
    key: String,
    requirement: f64,
    color: Option<String>,
    amount: RewardAmount<S>,
}

impl<S> Reward<S> {
    pub fn multiplier<F, N>(key: impl Into<String>, requirement: f64, value: F) -> Self
    where
        F: Fn(&S) -> N + 'static,
        N: Into<StatNumber>,
    {
        Self {
            key: key.into(),
            requirement,
            color: None,
            amount: RewardAmount::Multiplier(Box::new(value)),
        }
    }

    /// A reward with nothing to quantify; its row shows the label only.
    pub fn unlock(key: impl Into<String>, requirement: f64) -> Self {
        Self {
            key: key.into(),
            requirement,
            color: None,
            amount: RewardAmount::Unlock,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn requirement(&self) -> f64 {
        self.requirement
    }

    pub fn is_unlocked(&self, progress: f64) -> bool {
        progress >= self.requirement
    }
}

impl<S> fmt::Debug for Reward<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reward")
            .field("key", &self.key)
            .field("requirement", &self.requirement)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

/// A progress value and the rewards it unlocks.
pub struct RewardTrack<S> {
    progress: Box<dyn Fn(&S) -> f64>,
    rewards: Vec<Reward<S>>,
}

impl<S> RewardTrack<S> {
    pub fn new<F>(progress: F, rewards: Vec<Reward<S>>) -> Self
    where
        F: Fn(&S) -> f64 + 'static,
    {
        Self {
            progress: Box::new(progress),
            rewards,
        }
    }

    pub fn rewards(&self) -> &[Reward<S>] {
        &self.rewards
    }

    pub fn progress(&self, state: &S) -> f64 {
        (self.progress)(state)
    }

    /// The lowest requirement above the current progress.
    pub fn next_requirement(&self, state: &S) -> Option<f64> {
        let progress = self.progress(state);
        self.rewards
            .iter()
            .filter(|reward| !reward.is_unlocked(progress))
            .map(Reward::requirement)
            .reduce(f64::min)
    }
}

/// Node ids and label keys of a reward track.
///
/// Reward `k` lives in row `prefix + k`. Label keys are
/// `label_namespace + "." + k`, plus `nextReward` and `allUnlocked` for the
/// next-reward node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RewardBinding {
    pub root: String,
    pub prefix: String,
    pub next_id: String,
    /// Class carried by every reward row.
    pub marker: String,
    pub label_namespace: String,
}

impl RewardBinding {
    pub fn new(
        root: impl Into<String>,
        prefix: impl Into<String>,
        next_id: impl Into<String>,
        marker: impl Into<String>,
        label_namespace: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
            next_id: next_id.into(),
            marker: marker.into(),
            label_namespace: label_namespace.into(),
        }
    }

    /// The challenge 15 exponent rewards.
    pub fn challenge15() -> Self {
        Self::new(
            "c15Rewards",
            "c15Reward",
            "c15NextReward",
            "challengePortion",
            "wowCubes.platonicUpgrades.c15Rewards",
        )
    }

    pub fn row_id(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub fn label_key(&self, key: &str) -> String {
        format!("{}.{}", self.label_namespace, key)
    }
}

/// Substitute `value` for `placeholder`, or append it when the text has no
/// placeholder.
fn interpolate(text: &str, placeholder: &str, value: &str) -> String {
    if text.contains(placeholder) {
        text.replace(placeholder, value)
    } else {
        format!("{text} {value}")
    }
}

impl StatRenderer {
    /// Render a reward track.
    ///
    /// Rows are created on the first render, all hidden. Every render then
    /// shows the rows whose requirement is met and writes their text, hides
    /// the others and rewrites the next-reward node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statsheet::StatRenderer;
    /// use statsheet::display::Document;
    /// use statsheet::rewards::{Reward, RewardBinding, RewardTrack};
    ///
    /// struct Game { exponent: f64 }
    ///
    /// let track = RewardTrack::new(
    ///     |g: &Game| g.exponent,
    ///     vec![
    ///         Reward::multiplier("cube1", 750.0, |_: &Game| 1.5),
    ///         Reward::unlock("challengeHepteractUnlocked", 1000.0),
    ///     ],
    /// );
    /// let binding = RewardBinding::challenge15();
    /// let mut doc = Document::new();
    ///
    /// StatRenderer::default()
    ///     .render_rewards(&mut doc, &binding, &track, &Game { exponent: 800.0 })
    ///     .unwrap();
    ///
    /// assert!(doc.element("c15Rewardcube1").unwrap().is_visible());
    /// assert!(!doc.element("c15RewardchallengeHepteractUnlocked").unwrap().is_visible());
    /// ```
    ///
    /// # Errors
    ///
    /// [`StatsError::DuplicateNode`] when a reward row id is already taken
    /// on the first render. Nothing is created in that case.
    pub fn render_rewards<S>(
        &self,
        surface: &mut dyn DisplaySurface,
        binding: &RewardBinding,
        track: &RewardTrack<S>,
        state: &S,
    ) -> Result<RenderedPanel, StatsError> {
        surface.ensure(&binding.root);
        let mut panel = RenderedPanel::new(&binding.root, &binding.prefix);

        if surface.count_with_class(&binding.marker) == 0 {
            panel.created_nodes = self.create_reward_rows(surface, binding, track)?;
        }
        if !surface.contains(&binding.next_id) {
            surface.create_child(&binding.root, ElementSpec::new(&binding.next_id, &self.config().line_tag))?;
            panel.created_nodes += 1;
        }

        let progress = track.progress(state);
        for reward in track.rewards() {
            let row_id = binding.row_id(&reward.key);
            let unlocked = reward.is_unlocked(progress);
            surface.set_visible(&row_id, unlocked)?;
            if !unlocked {
                continue;
            }

            let label = self.lookup(&binding.label_key(&reward.key));
            let (value, text) = match &reward.amount {
                RewardAmount::Multiplier(formula) => {
                    let value = formula.evaluate(state);
                    let percent = StatNumber::from((value.to_f64() - 1.0) * 100.0);
                    let amount = format!("+{}%", self.formatter().format(&percent, PERCENT_PRECISION, true));
                    (Some(value), interpolate(&label, AMOUNT_PLACEHOLDER, &amount))
                }
                RewardAmount::Unlock => (None, label),
            };
            self.write(surface, &row_id, &text)?;
            panel.add_line(reward.key.clone(), row_id, value, text);
        }

        let next = track.next_requirement(state);
        let text = match next {
            Some(requirement) => {
                let exponent = self.formatter().format(&StatNumber::from(requirement), 0, true);
                let label = self.lookup(&binding.label_key("nextReward"));
                interpolate(&label, EXPONENT_PLACEHOLDER, &exponent)
            }
            None => self.lookup(&binding.label_key("allUnlocked")),
        };
        self.write(surface, &binding.next_id, &text)?;
        panel.add_line("nextReward", binding.next_id.clone(), next.map(StatNumber::from), text);

        Ok(panel)
    }

    fn create_reward_rows<S>(
        &self,
        surface: &mut dyn DisplaySurface,
        binding: &RewardBinding,
        track: &RewardTrack<S>,
    ) -> Result<usize, StatsError> {
        let mut seen = HashSet::new();
        for reward in track.rewards() {
            let row_id = binding.row_id(&reward.key);
            if surface.contains(&row_id) || !seen.insert(row_id.clone()) {
                log::error!("cannot build {}: node id {row_id} is already taken", binding.root);
                return Err(StatsError::DuplicateNode(row_id));
            }
        }

        log::debug!("creating {} reward rows for {}", track.rewards().len(), binding.root);
        for reward in track.rewards() {
            let mut row = ElementSpec::new(binding.row_id(&reward.key), &self.config().line_tag)
                .with_class(&binding.marker);
            if let Some(color) = &reward.color {
                row = row.with_color(color);
            }
            surface.create_child(&binding.root, row)?;
            surface.set_visible(&binding.row_id(&reward.key), false)?;
        }
        Ok(track.rewards().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Document;
    use crate::label::LabelCatalog;

    struct Game {
        exponent: f64,
    }

    fn track() -> RewardTrack<Game> {
        RewardTrack::new(
            |g: &Game| g.exponent,
            vec![
                Reward::multiplier("cube1", 750.0, |g: &Game| 1.0 + g.exponent / 1000.0),
                Reward::unlock("challengeHepteractUnlocked", 1000.0).with_color("pink"),
                Reward::multiplier("ascensions", 1500.0, |_: &Game| 1.25),
            ],
        )
    }

    fn labels() -> LabelCatalog {
        let mut labels = LabelCatalog::empty();
        labels.insert("wowCubes.platonicUpgrades.c15Rewards.cube1", "Cube gain {{amount}}");
        labels.insert(
            "wowCubes.platonicUpgrades.c15Rewards.challengeHepteractUnlocked",
            "Hepteract of Challenge unlocked",
        );
        labels.insert(
            "wowCubes.platonicUpgrades.c15Rewards.nextReward",
            "Next reward at exponent {{exponent}}",
        );
        labels.insert("wowCubes.platonicUpgrades.c15Rewards.allUnlocked", "All rewards unlocked");
        labels
    }

    #[test]
    fn test_rows_hidden_until_requirement_met() {
        let renderer = StatRenderer::default().with_labels(labels());
        let binding = RewardBinding::challenge15();
        let mut doc = Document::new();

        let panel = renderer
            .render_rewards(&mut doc, &binding, &track(), &Game { exponent: 800.0 })
            .unwrap();

        assert_eq!(panel.created_nodes, 4);
        assert_eq!(panel.lines.len(), 2);
        assert!(doc.element("c15Rewardcube1").unwrap().is_visible());
        assert_eq!(doc.text("c15Rewardcube1"), Some("Cube gain +80.00%"));

        let hepteract = doc.element("c15RewardchallengeHepteractUnlocked").unwrap();
        assert!(!hepteract.is_visible());
        assert_eq!(hepteract.color(), Some("pink"));
        assert_eq!(hepteract.text(), "");

        assert_eq!(doc.text("c15NextReward"), Some("Next reward at exponent 1000"));
    }

    #[test]
    fn test_progress_reveals_rows_without_new_nodes() {
        let renderer = StatRenderer::default().with_labels(labels());
        let binding = RewardBinding::challenge15();
        let track = track();
        let mut doc = Document::new();

        renderer
            .render_rewards(&mut doc, &binding, &track, &Game { exponent: 0.0 })
            .unwrap();
        let nodes = doc.node_count();

        let panel = renderer
            .render_rewards(&mut doc, &binding, &track, &Game { exponent: 2000.0 })
            .unwrap();

        assert_eq!(panel.created_nodes, 0);
        assert_eq!(doc.node_count(), nodes);
        assert!(doc.element("c15Rewardascensions").unwrap().is_visible());
        assert_eq!(
            doc.text("c15RewardchallengeHepteractUnlocked"),
            Some("Hepteract of Challenge unlocked")
        );
        // no placeholder in the key's text, so the amount is appended
        assert_eq!(
            doc.text("c15Rewardascensions"),
            Some("wowCubes.platonicUpgrades.c15Rewards.ascensions +25.00%")
        );
        assert_eq!(doc.text("c15NextReward"), Some("All rewards unlocked"));
        assert_eq!(track.next_requirement(&Game { exponent: 2000.0 }), None);
    }

    #[test]
    fn test_next_requirement_is_lowest_missing() {
        let track = track();
        assert_eq!(track.next_requirement(&Game { exponent: 0.0 }), Some(750.0));
        assert_eq!(track.next_requirement(&Game { exponent: 1200.0 }), Some(1500.0));
    }

    #[test]
    fn test_duplicate_reward_keys_create_nothing() {
        let track = RewardTrack::new(
            |g: &Game| g.exponent,
            vec![Reward::unlock("a", 1.0), Reward::unlock("a", 2.0)],
        );
        let mut doc = Document::new();

        let err = StatRenderer::default()
            .render_rewards(&mut doc, &RewardBinding::challenge15(), &track, &Game { exponent: 0.0 })
            .unwrap_err();

        assert_eq!(err, StatsError::DuplicateNode(String::from("c15Rewarda")));
        assert_eq!(doc.node_count(), 1);
    }
}
