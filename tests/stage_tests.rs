use statsheet::display::Document;
use statsheet::slots::SlotLine;
use statsheet::stage::{Stage, StageRule, STANDARD_STAGES};
use statsheet::*;

struct Player {
    prestige: bool,
    transcend: bool,
    singularity_count: u32,
}

fn early_classifier() -> StageClassifier<Player> {
    StageClassifier::new(
        vec![
            StageRule::new(1, "start", |_: &Player| true, |_: &Player| true),
            StageRule::new(1, "start-prestige", |p: &Player| p.prestige, |p: &Player| p.prestige),
            StageRule::new(2, "prestige-transcend", |p: &Player| p.transcend, |p: &Player| p.transcend),
        ],
        |p: &Player| p.singularity_count > 0,
    )
}

#[test]
fn test_two_stage_ladder() {
    let ladder = StageLadder::new(vec![
        Stage::new(0, 0, "unlocked-reset", true, true),
        Stage::new(1, 1, "locked-reset", false, true),
    ])
    .unwrap();

    assert_eq!(ladder.classify(0), "locked-reset");
    assert_eq!(ladder.classify(1), "unlocked-reset");
}

#[test]
fn test_progression_moves_forward() {
    let classifier = early_classifier();
    let mut player = Player {
        prestige: false,
        transcend: false,
        singularity_count: 0,
    };

    assert_eq!(classifier.classify(&player, None).unwrap(), "start-prestige");
    player.prestige = true;
    assert_eq!(classifier.classify(&player, None).unwrap(), "prestige-transcend");
    player.transcend = true;
    assert_eq!(classifier.classify(&player, None).unwrap(), "start");
}

#[test]
fn test_singularity_skips_early_tiers() {
    let classifier = early_classifier();
    let player = Player {
        prestige: false,
        transcend: false,
        singularity_count: 2,
    };

    // every early tier sits at or below the singularity floor
    assert_eq!(classifier.classify(&player, None).unwrap(), "start");
    assert_eq!(classifier.classify(&player, Some(0)).unwrap(), "start-prestige");
}

#[test]
fn test_standard_table_tiers_never_drop() {
    assert_eq!(STANDARD_STAGES.len(), 25);
    assert!(STANDARD_STAGES.windows(2).all(|pair| pair[0].0 <= pair[1].0));
    assert_eq!(STANDARD_STAGES[0].1, "start");
}

/// The stage label rendered as the last slot of the miscellaneous panel.
#[test]
fn test_stage_in_misc_panel() {
    let classifier = std::rc::Rc::new(early_classifier());
    let stage = classifier.clone();
    let slots = vec![
        SlotLine::number("sMisc1", |p: &Player| p.singularity_count),
        SlotLine::text("sMisc16", move |p: &Player| {
            stage.classify(p, Some(0)).unwrap_or_default()
        }),
    ];

    let renderer = StatRenderer::default();
    let mut doc = Document::new();
    let mut player = Player {
        prestige: true,
        transcend: false,
        singularity_count: 0,
    };

    renderer.render_slots(&mut doc, "miscStats", &slots, &player).unwrap();
    assert_eq!(doc.text("sMisc16"), Some("prestige-transcend"));

    player.transcend = true;
    renderer.render_slots(&mut doc, "miscStats", &slots, &player).unwrap();
    assert_eq!(doc.text("sMisc16"), Some("start"));
    assert_eq!(doc.text("sMisc1"), Some("0"));
    assert_eq!(classifier.rules().len(), 3);
}
