//! The closed set of statistics panels.
//!
//! Every panel the statistics tab can show has a [`PanelId`] with a stable
//! string id, which is what the host uses to say which panels are visible.
//! Panels that follow one of the standard layouts also know their default
//! node bindings.

use crate::breakdown::{BreakdownBinding, FactorNotation, StagedBinding, TotalFormat};
use crate::error::StatsError;
use crate::render::PanelBinding;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One statistics panel.
///
/// # Examples
///
/// ```rust
/// use statsheet::PanelId;
///
/// let panel: PanelId = "cubeMultiplierStats".parse().unwrap();
/// assert_eq!(panel, PanelId::CubeMultiplier);
/// assert_eq!(panel.to_string(), "cubeMultiplierStats");
///
/// let binding = panel.default_binding().unwrap();
/// assert_eq!(binding.prefix, "statCM");
/// assert_eq!(binding.marker, "WowCubeStat");
///
/// assert!("notAPanel".parse::<PanelId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelId {
    Misc,
    Accelerator,
    Multiplier,
    BaseOffering,
    OfferingMultiplier,
    BaseObtainium,
    ObtainiumIgnoreDrCap,
    ObtainiumMultiplier,
    GlobalCubeMultiplier,
    AntSacrificeMult,
    GlobalQuarkMultiplier,
    GlobalSpeedMultiplier,
    CubeMultiplier,
    TesseractMultiplier,
    HypercubeMultiplier,
    PlatonicMultiplier,
    HepteractMultiplier,
    PowderMultiplier,
    OcteractMultiplier,
    AscensionSpeedMultiplier,
    GoldenQuarkMultiplier,
    AddCode,
    AmbrosiaLuck,
    AmbrosiaGeneration,
}

/// Which renderer a panel's default layout uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelLayout {
    /// Independent readouts, see [`crate::slots`].
    Slots,
    /// A stat catalog with a canonical total.
    Aggregate,
    /// A variable-length factor list.
    Breakdown,
    /// A breakdown around a diminishing-returns step.
    Staged,
}

impl PanelId {
    /// Every panel in tab order.
    pub const ALL: [PanelId; 24] = [
        PanelId::Misc,
        PanelId::Accelerator,
        PanelId::Multiplier,
        PanelId::BaseOffering,
        PanelId::OfferingMultiplier,
        PanelId::BaseObtainium,
        PanelId::ObtainiumIgnoreDrCap,
        PanelId::ObtainiumMultiplier,
        PanelId::GlobalCubeMultiplier,
        PanelId::AntSacrificeMult,
        PanelId::GlobalQuarkMultiplier,
        PanelId::GlobalSpeedMultiplier,
        PanelId::CubeMultiplier,
        PanelId::TesseractMultiplier,
        PanelId::HypercubeMultiplier,
        PanelId::PlatonicMultiplier,
        PanelId::HepteractMultiplier,
        PanelId::PowderMultiplier,
        PanelId::OcteractMultiplier,
        PanelId::AscensionSpeedMultiplier,
        PanelId::GoldenQuarkMultiplier,
        PanelId::AddCode,
        PanelId::AmbrosiaLuck,
        PanelId::AmbrosiaGeneration,
    ];

    /// The panel's string id, also the id of its root node.
    pub fn as_str(self) -> &'static str {
        match self {
            PanelId::Misc => "miscStats",
            PanelId::Accelerator => "acceleratorStats",
            PanelId::Multiplier => "multiplierStats",
            PanelId::BaseOffering => "baseOfferingStats",
            PanelId::OfferingMultiplier => "offeringMultiplierStats",
            PanelId::BaseObtainium => "baseObtainiumStats",
            PanelId::ObtainiumIgnoreDrCap => "obtainiumIgnoreDRCapStats",
            PanelId::ObtainiumMultiplier => "obtainiumMultiplierStats",
            PanelId::GlobalCubeMultiplier => "globalCubeMultiplierStats",
            PanelId::AntSacrificeMult => "antSacrificeMultStats",
            PanelId::GlobalQuarkMultiplier => "globalQuarkMultiplierStats",
            PanelId::GlobalSpeedMultiplier => "globalSpeedMultiplierStats",
            PanelId::CubeMultiplier => "cubeMultiplierStats",
            PanelId::TesseractMultiplier => "tesseractMultiplierStats",
            PanelId::HypercubeMultiplier => "hypercubeMultiplierStats",
            PanelId::PlatonicMultiplier => "platonicMultiplierStats",
            PanelId::HepteractMultiplier => "hepteractMultiplierStats",
            PanelId::PowderMultiplier => "powderMultiplierStats",
            PanelId::OcteractMultiplier => "octeractMultiplierStats",
            PanelId::AscensionSpeedMultiplier => "ascensionSpeedMultiplierStats",
            PanelId::GoldenQuarkMultiplier => "goldenQuarkMultiplierStats",
            PanelId::AddCode => "addCodeStats",
            PanelId::AmbrosiaLuck => "ambrosiaLuckStats",
            PanelId::AmbrosiaGeneration => "ambrosiaGenerationStats",
        }
    }

    pub fn layout(self) -> PanelLayout {
        match self {
            PanelId::Misc | PanelId::Accelerator | PanelId::Multiplier => PanelLayout::Slots,
            PanelId::GlobalSpeedMultiplier => PanelLayout::Staged,
            PanelId::PowderMultiplier
            | PanelId::AscensionSpeedMultiplier
            | PanelId::GoldenQuarkMultiplier
            | PanelId::AddCode
            | PanelId::AmbrosiaLuck
            | PanelId::AmbrosiaGeneration => PanelLayout::Breakdown,
            _ => PanelLayout::Aggregate,
        }
    }

    /// Binding of the panel's main aggregate section.
    pub fn default_binding(self) -> Option<PanelBinding> {
        let (prefix, marker) = match self {
            PanelId::GlobalCubeMultiplier => ("statGCM", "GlobalCubeStat"),
            PanelId::CubeMultiplier => ("statCM", "WowCubeStat"),
            PanelId::TesseractMultiplier => ("statTeM", "TesseractStat"),
            PanelId::HypercubeMultiplier => ("statHyM", "HypercubeStat"),
            PanelId::PlatonicMultiplier => ("statPlM", "PlatonicStat"),
            PanelId::HepteractMultiplier => ("statHeM", "HepteractCubeStat"),
            PanelId::OcteractMultiplier => ("statOcM", "OcteractCubeStat"),
            PanelId::BaseOffering => ("statOffB", "OfferingBaseStat"),
            PanelId::OfferingMultiplier => ("statOff", "OfferingStat"),
            PanelId::BaseObtainium => ("statObtB", "ObtainiumBaseStat"),
            PanelId::ObtainiumIgnoreDrCap => ("statObtDR", "ObtainiumDRStat"),
            PanelId::ObtainiumMultiplier => ("statObt", "ObtainiumStat"),
            PanelId::AntSacrificeMult => ("statASM", "AntSacrificeStat"),
            PanelId::GlobalQuarkMultiplier => ("sGQM", "quarkStats"),
            _ => return None,
        };
        Some(PanelBinding::new(self.as_str(), prefix, marker))
    }

    /// Binding of the second aggregate section sharing the panel's root.
    ///
    /// Its total row is conventionally labelled `Total2`.
    pub fn secondary_binding(self) -> Option<PanelBinding> {
        let (prefix, marker) = match self {
            PanelId::OfferingMultiplier => ("statOff2", "OfferingStat2"),
            PanelId::ObtainiumMultiplier => ("statObt2", "ObtainiumStat2"),
            _ => return None,
        };
        Some(PanelBinding::new(self.as_str(), prefix, marker))
    }

    /// Binding of the panel's factor breakdown.
    ///
    /// The add-code panel writes its first row in seconds and the remaining
    /// rows as multipliers, so its descriptor table should give row 1
    /// [`FactorNotation::Plain`] with a `" sec"` suffix. Readouts outside
    /// the factor list (`s+next`, `sALuckMult`) are slot sections on the
    /// same root.
    pub fn breakdown_binding(self) -> Option<BreakdownBinding> {
        let plain = TotalFormat::new().with_notation(FactorNotation::Plain);
        let (rows, values, notation, total) = match self {
            PanelId::PowderMultiplier => ("statPoM", "sPoM", FactorNotation::Multiplier, TotalFormat::new()),
            PanelId::AscensionSpeedMultiplier => ("statASM", "sASM", FactorNotation::Multiplier, TotalFormat::new()),
            PanelId::GoldenQuarkMultiplier => ("statGQMS", "sGQMS", FactorNotation::Multiplier, TotalFormat::new()),
            PanelId::AddCode => (
                "stat+time",
                "s+time",
                FactorNotation::Multiplier,
                plain.with_precision(1).with_suffix(" sec"),
            ),
            PanelId::AmbrosiaLuck => (
                "statALuckM",
                "sALuckM",
                FactorNotation::Additive,
                plain.with_precision(0).with_prefix("\u{2618} "),
            ),
            PanelId::AmbrosiaGeneration => (
                "statAGenM",
                "sAGenM",
                FactorNotation::Multiplier,
                plain.abbreviated(),
            ),
            _ => return None,
        };
        Some(
            BreakdownBinding::new(self.as_str(), rows, values)
                .with_notation(notation)
                .with_total(total),
        )
    }

    pub fn staged_binding(self) -> Option<StagedBinding> {
        match self {
            PanelId::GlobalSpeedMultiplier => Some(StagedBinding::new(self.as_str(), "sGSM")),
            _ => None,
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelId {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelId::ALL
            .into_iter()
            .find(|panel| panel.as_str() == s)
            .ok_or_else(|| StatsError::UnknownPanel(s.to_string()))
    }
}

impl Serialize for PanelId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PanelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        id.parse().map_err(serde::de::Error::custom)
    }
}
