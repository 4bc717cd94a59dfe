//! Headless Skirmish Runner
//!
//! Runs a scripted battle against the demo adversary pair and prints a
//! JSON report, for balance tuning and regression checks.

use clap::Parser;
use serde::Serialize;

use gridclash::battle::{
    ActionKind, AdversaryDefinition, BattleState, Command, CombatEvent, ItemKind,
    ManaDefinition, PlayerDefinition, WeightedAction, GAUGE_MAX,
};
use gridclash::core::types::{AdversaryRow, Cell, PlayerId};
use gridclash::core::EngineConfig;
use gridclash::element::Element;

/// Headless Skirmish Runner - scripted battles with a JSON report
#[derive(Parser, Debug)]
#[command(name = "skirmish_runner")]
#[command(about = "Run a scripted battle and output a JSON report")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation ticks per second
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f32,

    /// Maximum simulated seconds before timeout
    #[arg(long, default_value_t = 300.0)]
    max_seconds: f32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every combat event to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct SkirmishReport {
    outcome: String,
    seconds: f32,
    ticks: u64,
    strikes_landed: u64,
    effects_applied: u64,
    player_hp_percent: Vec<f32>,
    adversary_hp_percent: Vec<f32>,
    seed: u64,
}

fn demo_player(name: &str, start: Cell) -> PlayerDefinition {
    PlayerDefinition {
        name: name.into(),
        hp: 400.0,
        attack: 300,
        defense: 150,
        mana: ManaDefinition {
            max: 120.0,
            recover: 2.0,
            efficiency: 80.0,
        },
        speed: 100,
        intellect: 120,
        move_gauge_modifier: 50.0,
        elements: vec![Element::Fire],
        commands: vec![
            Command::Attack {
                name: "cleave".into(),
                power: 120,
                element: Element::Normal,
                charge_delay: 0.0,
                effects: Vec::new(),
            },
            Command::Magic {
                name: "flame_lance".into(),
                power: 140,
                element: Element::Fire,
                mp_percent: 20.0,
                mp_const: 10.0,
                charge_delay: 1.5,
                effects: Vec::new(),
            },
            Command::Defend {
                name: "brace".into(),
                reduce_percent: 50.0,
                reduce_const: 5.0,
                speed_modifier: 50.0,
            },
            Command::Item {
                name: "potion".into(),
                kind: ItemKind::Potion,
            },
        ],
        start,
    }
}

fn demo_serpent() -> AdversaryDefinition {
    AdversaryDefinition {
        name: "serpent".into(),
        hp: 3000.0,
        attack: 300,
        defense: 400,
        mana: ManaDefinition {
            max: 100.0,
            recover: 0.0,
            efficiency: 100.0,
        },
        intellect: 200,
        row: AdversaryRow::Middle,
        hit_cells: vec![0, 1, 2, 3],
        elements: vec![Element::Normal],
        passives: vec![],
        actions: vec![
            WeightedAction {
                kind: ActionKind::TailRush,
                weight: 3.0,
            },
            WeightedAction {
                kind: ActionKind::SnakeDash,
                weight: 1.0,
            },
            WeightedAction {
                kind: ActionKind::Tightening,
                weight: 2.0,
            },
        ],
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = EngineConfig {
        tick_rate: args.tick_rate,
        seed,
        ..EngineConfig::default()
    };
    let dt = config.tick_dt();

    let players = vec![
        demo_player("vanguard", Cell::new(0, 0)),
        demo_player("rearguard", Cell::new(2, 2)),
    ];
    let adversaries = vec![demo_serpent()];

    let mut battle = BattleState::new(&players, &adversaries, config)
        .expect("demo roster is well formed");

    let mut ticks: u64 = 0;
    let mut strikes_landed: u64 = 0;
    let mut effects_applied: u64 = 0;
    let max_ticks = (args.max_seconds * args.tick_rate) as u64;

    while battle.outcome().is_none() && ticks < max_ticks {
        // Scripted policy: swing whenever the gauge is ready
        for index in 0..battle.player_count() {
            let id = PlayerId(index as u32);
            let view = battle.player_state(id).expect("roster index is valid");
            if view.alive && view.gauge >= GAUGE_MAX {
                let _ = battle.submit_player_command(id, 0);
            }
        }

        for event in battle.tick(dt) {
            match &event {
                CombatEvent::StrikeLanded { .. } => strikes_landed += 1,
                CombatEvent::EffectApplied { .. } => effects_applied += 1,
                _ => {}
            }
            if args.verbose {
                eprintln!("[{ticks}] {event:?}");
            }
        }
        ticks += 1;
    }

    let outcome = battle
        .outcome()
        .map(|o| format!("{o:?}"))
        .unwrap_or_else(|| "Timeout".into());

    let player_hp_percent = (0..battle.player_count())
        .map(|i| {
            let view = battle.player_state(PlayerId(i as u32)).unwrap();
            view.left_hp.max(0.0) / view.max_hp
        })
        .collect();
    let adversary_hp_percent = (0..battle.adversary_count())
        .map(|i| {
            let view = battle
                .adversary_state(gridclash::core::types::AdversaryId(i as u32))
                .unwrap();
            view.left_hp.max(0.0) / view.max_hp
        })
        .collect();

    let report = SkirmishReport {
        outcome,
        seconds: battle.elapsed(),
        ticks,
        strikes_landed,
        effects_applied,
        player_hp_percent,
        adversary_hp_percent,
        seed,
    };

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
        }
        "text" => {
            println!("Skirmish Report");
            println!("===============");
            println!("Outcome: {}", report.outcome);
            println!("Simulated: {:.1}s over {} ticks", report.seconds, report.ticks);
            println!("Strikes landed: {}", report.strikes_landed);
            println!("Effects applied: {}", report.effects_applied);
            println!("Seed: {}", report.seed);
        }
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
        }
    }
}
