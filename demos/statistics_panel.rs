//! Renders a few statistics panels from a JSON snapshot and prints them.
//!
//! Run with `RUST_LOG=debug` to see node creation and skipped panels.

use statsheet::breakdown::{Breakdown, Descriptor, DescriptorTable};
use statsheet::display::{Document, Element};
use statsheet::rewards::Reward;
use statsheet::slots::SlotLine;
use statsheet::stage::StageClassifier;
use statsheet::*;
use std::rc::Rc;

const SAVE: &str = r#"{
    "campaign": 2.5,
    "sunMoon": 1.16,
    "obtainiumExponent": 420,
    "reincarnationMs": 5432100,
    "unlockedStages": 8,
    "c15Exponent": 900,
    "singularityCount": 0
}"#;

fn cube_panel() -> Result<AggregateSpec<StateSnapshot>, StatsError> {
    let category = StatCategory::new(
        "wowCubes",
        vec![
            StatLine::new("Campaign", |s: &StateSnapshot| s.number("campaign")),
            StatLine::new("SunMoon", |s: &StateSnapshot| s.number("sunMoon")).with_color("gold"),
        ],
    )?;
    Ok(AggregateSpec::new(category, |s: &StateSnapshot| {
        s.number("campaign") * s.number("sunMoon")
    }))
}

fn obtainium_panel() -> Result<AggregateSpec<StateSnapshot>, StatsError> {
    let category = StatCategory::new(
        "obtainium",
        vec![StatLine::new("Base", |s: &StateSnapshot| {
            BigNumber::pow10(s.get("obtainiumExponent").unwrap_or(0))
        })],
    )?;
    Ok(AggregateSpec::new(category, |s: &StateSnapshot| {
        BigNumber::pow10(s.get("obtainiumExponent").unwrap_or(0))
    }))
}

fn stages() -> StageClassifier<StateSnapshot> {
    let unlocked = |s: &StateSnapshot, i: usize| i <= s.get::<usize>("unlockedStages").unwrap_or(0);
    StageClassifier::standard(unlocked, unlocked, |s: &StateSnapshot| s.flag("singularityCount"))
}

fn build() -> Result<Dispatcher<StateSnapshot>, StatsError> {
    let mut dispatcher = Dispatcher::new(StatRenderer::default());

    for (panel, spec) in [
        (PanelId::CubeMultiplier, cube_panel()?),
        (PanelId::ObtainiumMultiplier, obtainium_panel()?),
    ] {
        if let Some(binding) = panel.default_binding() {
            dispatcher.register_aggregate(panel, binding, spec);
        }
    }

    if let Some(binding) = PanelId::AscensionSpeedMultiplier.breakdown_binding() {
        dispatcher.register_breakdown(
            PanelId::AscensionSpeedMultiplier,
            binding,
            DescriptorTable::from_descriptors(vec![
                Descriptor::new(2, "Base"),
                Descriptor::new(2, "Chronometer"),
                Descriptor::new(3, "Campaign"),
            ]),
            |s: &StateSnapshot| {
                let campaign = s.number("campaign").to_f64();
                Breakdown::from_values(&[1.0, 1.12, campaign], 1.12 * campaign)
            },
        );
    }

    let classifier = Rc::new(stages());
    dispatcher.register_slots(
        PanelId::Misc,
        vec![
            SlotLine::duration("sMisc1", |s: &StateSnapshot| s.number("reincarnationMs").to_f64()),
            SlotLine::text("sMisc16", move |s: &StateSnapshot| {
                classifier.classify(s, Some(0)).unwrap_or_default()
            }),
        ],
    );

    Ok(dispatcher)
}

fn c15_rewards() -> RewardTrack<StateSnapshot> {
    RewardTrack::new(
        |s: &StateSnapshot| s.number("c15Exponent").to_f64(),
        vec![
            Reward::multiplier("cube1", 750.0, |s: &StateSnapshot| {
                1.0 + s.number("c15Exponent").to_f64() / 1000.0
            }),
            Reward::unlock("challengeHepteractUnlocked", 1000.0),
        ],
    )
}

fn print_tree(doc: &Document, element: &Element, depth: usize) {
    let hidden = if element.is_visible() { "" } else { " (hidden)" };
    println!(
        "{:indent$}{} [{}] {}{hidden}",
        "",
        element.id(),
        element.tag(),
        element.text(),
        indent = depth * 2
    );
    for child in doc.children(element.id()) {
        print_tree(doc, child, depth + 1);
    }
}

fn main() -> Result<(), StatsError> {
    env_logger::init();

    let snapshot = StateSnapshot::from_json_str(SAVE)?;
    let dispatcher = build()?;
    let mut doc = Document::new();

    let visible = [
        "miscStats",
        "cubeMultiplierStats",
        "obtainiumMultiplierStats",
        "ascensionSpeedMultiplierStats",
        "talismanStats",
    ];
    let rendered = dispatcher.dispatch_active(&mut doc, &visible, &snapshot)?;
    println!("rendered {rendered} panels");

    dispatcher
        .renderer()
        .render_rewards(&mut doc, &RewardBinding::challenge15(), &c15_rewards(), &snapshot)?;

    for id in visible.into_iter().chain(["c15Rewards"]) {
        if let Some(root) = doc.element(id) {
            print_tree(&doc, root, 0);
        }
    }
    Ok(())
}
