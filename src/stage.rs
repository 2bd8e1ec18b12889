//! Progression stage classification.
//!
//! The game is divided into an ordered ladder of milestones. Each stage has
//! a tier (which reset layer it belongs to), an unlocked flag and a reset
//! flag saying whether the layer's reset has been reached. The current
//! stage is the first one, above a caller-chosen tier floor, that is either
//! not yet unlocked or whose reset layer has not been reached.
//!
//! [`StageLadder`] is the evaluated ladder; [`StageClassifier`] holds the
//! rules that produce a ladder from a game state.

use crate::error::StatsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One evaluated milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub index: usize,
    pub tier: u8,
    pub name: String,
    pub unlocked: bool,
    pub is_reset_boundary: bool,
}

impl Stage {
    pub fn new(index: usize, tier: u8, name: impl Into<String>, unlocked: bool, is_reset_boundary: bool) -> Self {
        Self {
            index,
            tier,
            name: name.into(),
            unlocked,
            is_reset_boundary,
        }
    }

    /// Whether this stage is where the player currently is, ignoring
    /// stages at or below `skip_tier`.
    fn is_current(&self, skip_tier: u8) -> bool {
        self.tier > skip_tier && (!self.is_reset_boundary || !self.unlocked)
    }
}

/// A validated, ordered list of stages.
///
/// # Examples
///
/// ```rust
/// use statsheet::stage::{Stage, StageLadder};
///
/// let ladder = StageLadder::new(vec![
///     Stage::new(0, 0, "start", true, true),
///     Stage::new(1, 1, "start-prestige", false, true),
/// ]).unwrap();
///
/// assert_eq!(ladder.classify(0), "start-prestige");
/// assert_eq!(ladder.classify(9), "start");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageLadder {
    stages: Vec<Stage>,
}

impl StageLadder {
    /// Build a ladder.
    ///
    /// # Errors
    ///
    /// [`StatsError::InvalidLadder`] if the ladder is empty, the indices
    /// are not `0, 1, 2, ...` or a tier decreases.
    pub fn new(stages: Vec<Stage>) -> Result<Self, StatsError> {
        if stages.is_empty() {
            return Err(StatsError::InvalidLadder(String::from("ladder has no stages")));
        }

        for (position, stage) in stages.iter().enumerate() {
            if stage.index != position {
                return Err(StatsError::InvalidLadder(format!(
                    "stage {} has index {}, expected {}",
                    stage.name, stage.index, position
                )));
            }
        }

        for pair in stages.windows(2) {
            if pair[1].tier < pair[0].tier {
                return Err(StatsError::InvalidLadder(format!(
                    "tier drops from {} to {} at stage {}",
                    pair[0].tier, pair[1].tier, pair[1].name
                )));
            }
        }

        Ok(Self { stages })
    }

    /// Name of the current stage.
    ///
    /// Falls back to the first stage's name when every stage above
    /// `skip_tier` is unlocked and reset.
    pub fn classify(&self, skip_tier: u8) -> &str {
        self.current(skip_tier).name.as_str()
    }

    /// The current stage itself.
    pub fn current(&self, skip_tier: u8) -> &Stage {
        self.stages
            .iter()
            .find(|stage| stage.is_current(skip_tier))
            .unwrap_or(&self.stages[0])
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl<'de> Deserialize<'de> for StageLadder {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            stages: Vec<Stage>,
        }
        let raw = Raw::deserialize(deserializer)?;
        StageLadder::new(raw.stages).map_err(serde::de::Error::custom)
    }
}

type Predicate<S> = Box<dyn Fn(&S) -> bool>;

/// How one stage is evaluated against the game state.
pub struct StageRule<S> {
    tier: u8,
    name: String,
    unlocked: Predicate<S>,
    reset: Predicate<S>,
}

impl<S> StageRule<S> {
    pub fn new<U, R>(tier: u8, name: impl Into<String>, unlocked: U, reset: R) -> Self
    where
        U: Fn(&S) -> bool + 'static,
        R: Fn(&S) -> bool + 'static,
    {
        Self {
            tier,
            name: name.into(),
            unlocked: Box::new(unlocked),
            reset: Box::new(reset),
        }
    }

    pub fn tier(&self) -> u8 {
        self.tier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, index: usize, state: &S) -> Stage {
        Stage::new(index, self.tier, self.name.clone(), (self.unlocked)(state), (self.reset)(state))
    }
}

impl<S> fmt::Debug for StageRule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageRule")
            .field("tier", &self.tier)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Tier and name of every stage of the standard progression, in order.
pub const STANDARD_STAGES: [(u8, &str); 25] = [
    (1, "start"),
    (1, "start-prestige"),
    (2, "prestige-transcend"),
    (3, "transcend-reincarnate"),
    (4, "reincarnate-ant"),
    (4, "ant-sacrifice"),
    (4, "sacrifice-ascension"),
    (5, "ascension-challenge10"),
    (5, "challenge10-challenge11"),
    (5, "challenge11-challenge12"),
    (5, "challenge12-challenge13"),
    (5, "challenge13-challenge14"),
    (5, "challenge14-w5x10max"),
    (5, "w5x10max-alpha"),
    (5, "alpha-p2x1x10"),
    (5, "p2x1x10-p3x1"),
    (5, "p3x1-beta"),
    (5, "beta-1e15-expo"),
    (5, "1e15-expo-omega"),
    (5, "omega-singularity"),
    (6, "singularity-exalt1x1"),
    (6, "exalt1x1-onemind"),
    (6, "onemind-end"),
    (6, "end-pen"),
    (6, "pen"),
];

/// Produces the current stage name from a game state.
///
/// The ladder is rebuilt from the rules on every call; nothing is cached.
///
/// # Examples
///
/// ```rust
/// use statsheet::stage::{StageClassifier, StageRule};
///
/// struct Game { prestiged: bool, singularities: u32 }
///
/// let classifier = StageClassifier::new(
///     vec![
///         StageRule::new(1, "start", |_: &Game| true, |_: &Game| true),
///         StageRule::new(1, "start-prestige", |g: &Game| g.prestiged, |g: &Game| g.prestiged),
///     ],
///     |g: &Game| g.singularities > 0,
/// );
///
/// let game = Game { prestiged: false, singularities: 0 };
/// assert_eq!(classifier.classify(&game, None).unwrap(), "start-prestige");
/// ```
pub struct StageClassifier<S> {
    rules: Vec<StageRule<S>>,
    in_singularity: Predicate<S>,
}

impl<S> StageClassifier<S> {
    /// Tier floor used once the player has entered a singularity.
    pub const SINGULARITY_SKIP_TIER: u8 = 5;

    pub fn new<P>(rules: Vec<StageRule<S>>, in_singularity: P) -> Self
    where
        P: Fn(&S) -> bool + 'static,
    {
        Self {
            rules,
            in_singularity: Box::new(in_singularity),
        }
    }

    /// Build the standard progression from per-index predicates.
    ///
    /// `unlocked(state, i)` and `reset(state, i)` are asked about stage `i`
    /// of [`STANDARD_STAGES`].
    pub fn standard<U, R, P>(unlocked: U, reset: R, in_singularity: P) -> Self
    where
        U: Fn(&S, usize) -> bool + Clone + 'static,
        R: Fn(&S, usize) -> bool + Clone + 'static,
        P: Fn(&S) -> bool + 'static,
    {
        let rules = STANDARD_STAGES
            .iter()
            .enumerate()
            .map(|(i, &(tier, name))| {
                let unlocked = unlocked.clone();
                let reset = reset.clone();
                StageRule {
                    tier,
                    name: name.to_string(),
                    unlocked: Box::new(move |state: &S| unlocked(state, i)),
                    reset: Box::new(move |state: &S| reset(state, i)),
                }
            })
            .collect();
        Self::new(rules, in_singularity)
    }

    /// Evaluate every rule into a ladder.
    pub fn ladder(&self, state: &S) -> Result<StageLadder, StatsError> {
        StageLadder::new(
            self.rules
                .iter()
                .enumerate()
                .map(|(index, rule)| rule.evaluate(index, state))
                .collect(),
        )
    }

    /// The skip tier used when the caller does not pass one.
    pub fn default_skip_tier(&self, state: &S) -> u8 {
        if (self.in_singularity)(state) {
            Self::SINGULARITY_SKIP_TIER
        } else {
            0
        }
    }

    /// Name of the current stage.
    pub fn classify(&self, state: &S, skip_tier: Option<u8>) -> Result<String, StatsError> {
        let skip_tier = skip_tier.unwrap_or_else(|| self.default_skip_tier(state));
        Ok(self.ladder(state)?.classify(skip_tier).to_string())
    }

    pub fn rules(&self) -> &[StageRule<S>] {
        &self.rules
    }
}

impl<S> fmt::Debug for StageClassifier<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageClassifier")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
