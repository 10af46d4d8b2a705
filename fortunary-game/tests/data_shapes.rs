use fortunary_game::{
    CatalogError, ChallengeSettings, DiceStream, EventCatalog, EventKind, GameSession,
    ScriptedDice, SessionState,
};
use serde_json::Value;

const EVENTS_JSON: &str = include_str!("../assets/data/events.json");

#[test]
fn bundled_catalog_parses_strictly() {
    let catalog = EventCatalog::from_json(EVENTS_JSON).expect("bundled catalog is valid");
    assert_eq!(catalog.len(), 13);

    let minors = catalog
        .iter()
        .filter(|event| matches!(event.kind, EventKind::Minor { .. }))
        .count();
    let bonuses = catalog.iter().filter(|event| event.kind.is_bonus()).count();
    let majors = catalog.iter().filter(|event| event.kind.is_major()).count();
    assert_eq!((minors, bonuses, majors), (5, 4, 4));

    for event in catalog.iter() {
        assert!(!event.name.is_empty());
        assert!((0..=100).contains(&event.chance), "{} chance", event.name);
    }
    assert!(catalog.iter().any(|event| matches!(
        event.kind,
        EventKind::Major {
            months_loss: Some(1),
            ..
        }
    )));
}

#[test]
fn malformed_catalogs_report_why() {
    assert!(matches!(
        EventCatalog::from_json("{\"events\": 3}"),
        Err(CatalogError::Shape)
    ));
    assert!(matches!(
        EventCatalog::from_json("[{\"name\": \"x\", \"type\": \"minor\""),
        Err(CatalogError::Parse(_))
    ));
    assert!(matches!(
        EventCatalog::from_json(r#"[{"name": "x", "chance": 140, "type": "minor"}]"#),
        Err(CatalogError::OutOfRange { .. })
    ));
    assert!(EventCatalog::from_json_or_empty("not json").is_empty());
}

#[test]
fn session_state_survives_a_json_round_trip() {
    let dice = ScriptedDice::new()
        .with_rolls(DiceStream::Market, [10, 90])
        .with_rolls(DiceStream::Ledger, [0])
        .with_rolls(DiceStream::Lucky, [100]);
    let catalog = EventCatalog::from_json(EVENTS_JSON).unwrap();
    let mut session = GameSession::new(
        "Round Trip",
        ChallengeSettings::from_csv("debt,volatileJob"),
        catalog,
        42,
        dice,
    );
    session.process_turn("save");

    let json = serde_json::to_string(session.state()).unwrap();
    let restored: SessionState = serde_json::from_str(&json).unwrap();
    assert_eq!(&restored, session.state());
    assert_eq!(restored.player().month(), 2);
    assert!(restored.settings().volatile_job);
}

#[test]
fn snapshot_keys_are_camel_case() {
    let dice = ScriptedDice::new().with_rolls(DiceStream::Lucky, [100]);
    let mut session = GameSession::new(
        "Keys",
        ChallengeSettings::default(),
        EventCatalog::empty(),
        3,
        dice,
    );
    session.with_state_mut(|state| state.player_mut().set_balance(-3_000_000));
    let report = session.process_turn("save");

    let value = serde_json::to_value(&report.snapshot).unwrap();
    for key in [
        "marketDescription",
        "gameOver",
        "endingCode",
        "endingTitle",
        "routeLabel",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["endingCode"], Value::from("BANKRUPT"));
    assert_eq!(value["settings"]["sideHustle"], Value::from(false));
    assert_eq!(value["routes"]["save"], Value::from(1));
}

#[test]
fn turn_reports_serialize_their_outcomes() {
    let dice = ScriptedDice::new()
        .with_rolls(DiceStream::Ledger, [0])
        .with_rolls(DiceStream::Action, [3])
        .with_rolls(DiceStream::Lucky, [100]);
    let mut session = GameSession::new(
        "Report",
        ChallengeSettings::default(),
        EventCatalog::empty(),
        8,
        dice,
    );
    let report = session.process_turn("save");
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["status"], Value::from("processed"));
    assert_eq!(value["summary"]["action"], Value::from("save"));
    assert_eq!(value["summary"]["action_outcome"]["outcome"], Value::from("saved"));
    assert_eq!(value["summary"]["action_outcome"]["rate_pct"], Value::from(3));

    let mut ended = GameSession::new(
        "Report",
        ChallengeSettings::default(),
        EventCatalog::empty(),
        8,
        ScriptedDice::new(),
    );
    ended.with_state_mut(|state| state.player_mut().set_balance(-9_000_000));
    ended.process_turn("idle");
    let refused = serde_json::to_value(ended.process_turn("idle")).unwrap();
    assert_eq!(refused["status"], Value::from("already_ended"));
    assert!(refused["summary"].is_null());
}
