//! Adversary action catalogue
//!
//! Each action expands into queued attacks on the player field, charges a
//! cooldown, and empties the gauge. Casts pay their mana up front; a cast
//! the adversary cannot afford leaves everything untouched so the behavior
//! layer rolls again on a later tick.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::FIELD_WIDTH;
use crate::battle::effect::{
    BurnState, ChillState, EffectKind, FreezeState, Lifetime, SlipState, StatusEffect,
};
use crate::battle::queue::{QueuedAttack, StrikeKind};
use crate::battle::unit::Adversary;
use crate::core::types::Cell;
use crate::element::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    TailRush,
    SnakeDash,
    Tightening,
    HailPrism,
    IceSword,
    Avalanche,
    Detonation,
    HellFlame,
    Eruption,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::TailRush => "tail_rush",
            ActionKind::SnakeDash => "snake_dash",
            ActionKind::Tightening => "tightening",
            ActionKind::HailPrism => "hail_prism",
            ActionKind::IceSword => "ice_sword",
            ActionKind::Avalanche => "avalanche",
            ActionKind::Detonation => "detonation",
            ActionKind::HellFlame => "hell_flame",
            ActionKind::Eruption => "eruption",
        }
    }
}

/// One entry in an adversary's action table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedAction {
    pub kind: ActionKind,
    pub weight: f64,
}

fn chill() -> StatusEffect {
    StatusEffect::new(
        EffectKind::Chill(ChillState::default()),
        Lifetime::UntilCleared,
    )
}

fn freeze() -> StatusEffect {
    StatusEffect::new(
        EffectKind::Freeze(FreezeState::default()),
        Lifetime::UntilCleared,
    )
}

fn strike(
    kind: ActionKind,
    strike_kind: StrikeKind,
    power: i64,
    element: Element,
    cell: Cell,
    until_display: f32,
    preliminary: f32,
    effects: Vec<StatusEffect>,
) -> QueuedAttack {
    QueuedAttack {
        name: kind.name().into(),
        kind: strike_kind,
        power,
        element,
        cell,
        until_display,
        preliminary,
        revealed: false,
        effects,
    }
}

/// Sweep one full column
fn column_cells(x: u8) -> impl Iterator<Item = Cell> {
    (0..4).map(move |y| Cell::new(x, y))
}

fn tail_rush(adversary: &mut Adversary, rng: &mut ChaCha8Rng) {
    let x = rng.gen_range(0..FIELD_WIDTH);
    for cell in column_cells(x) {
        adversary.queue.push(strike(
            ActionKind::TailRush,
            StrikeKind::Physical,
            150,
            Element::Normal,
            cell,
            0.0,
            5.0,
            Vec::new(),
        ));
    }
    adversary.cooldown += 5.0;
}

/// Zigzag across all sixteen cells with a per-cell stagger
fn snake_dash(adversary: &mut Adversary, _rng: &mut ChaCha8Rng) {
    for y in 0..4u8 {
        let xs: Vec<u8> = if y % 2 == 0 {
            (0..4).collect()
        } else {
            (0..4).rev().collect()
        };
        for (step, x) in xs.into_iter().enumerate() {
            let stagger = step as f32 * 0.05 + f32::from(y) * 0.20;
            adversary.queue.push(strike(
                ActionKind::SnakeDash,
                StrikeKind::Physical,
                75,
                Element::Normal,
                Cell::new(x, y),
                stagger,
                5.0,
                Vec::new(),
            ));
        }
    }
    adversary.cooldown += 5.0;
}

/// Pin one cell; the caught player is locked down and bleeds
fn tightening(adversary: &mut Adversary, rng: &mut ChaCha8Rng) {
    let cell = Cell::new(rng.gen_range(0..4), rng.gen_range(0..4));
    let effects = vec![
        StatusEffect::timed(EffectKind::MoveLock, 10.0),
        StatusEffect::timed(EffectKind::ActLock, 10.0),
        StatusEffect::timed(
            EffectKind::Slip(SlipState {
                until_next: 1.0,
                period: 1.0,
                amount: 10,
            }),
            10.0,
        ),
    ];
    adversary.queue.push(strike(
        ActionKind::Tightening,
        StrikeKind::Physical,
        50,
        Element::Normal,
        cell,
        0.0,
        5.0,
        effects,
    ));
    adversary.cooldown += 5.0;
}

/// Four random cells, no repeats
fn hail_prism(adversary: &mut Adversary, rng: &mut ChaCha8Rng) {
    for index in rand::seq::index::sample(rng, 16, 4) {
        let cell = Cell::new((index % 4) as u8, (index / 4) as u8);
        adversary.queue.push(strike(
            ActionKind::HailPrism,
            StrikeKind::Physical,
            80,
            Element::Ice,
            cell,
            0.0,
            3.0,
            vec![chill()],
        ));
    }
    adversary.cooldown += 3.0;
}

/// Two lane sweeps: columns, rows, or either diagonal
fn ice_sword(adversary: &mut Adversary, rng: &mut ChaCha8Rng) {
    for swing in 0..2u8 {
        let lane = rng.gen_range(0..10u8);
        let cells: Vec<Cell> = match lane {
            0..=3 => (0..4).map(|y| Cell::new(lane, y)).collect(),
            4..=7 => (0..4).map(|x| Cell::new(x, lane - 4)).collect(),
            8 => (0..4).map(|i| Cell::new(i, i)).collect(),
            _ => (0..4).map(|i| Cell::new(3 - i, i)).collect(),
        };
        for cell in cells {
            adversary.queue.push(strike(
                ActionKind::IceSword,
                StrikeKind::Physical,
                75,
                Element::Ice,
                cell,
                f32::from(swing),
                3.0,
                vec![chill()],
            ));
        }
    }
    adversary.cooldown += 5.0;
}

/// Bury the two left columns
fn avalanche(adversary: &mut Adversary, _rng: &mut ChaCha8Rng) {
    for x in 0..2u8 {
        for cell in column_cells(x) {
            adversary.queue.push(strike(
                ActionKind::Avalanche,
                StrikeKind::Physical,
                120,
                Element::Ice,
                cell,
                0.0,
                5.0,
                vec![chill(), freeze()],
            ));
        }
    }
    adversary.cooldown += 5.0;
}

/// Cross-shaped blast around a random center
fn detonation(adversary: &mut Adversary, rng: &mut ChaCha8Rng) {
    let x = rng.gen_range(0..4u8);
    let y = rng.gen_range(0..4u8);
    let mut cells = vec![Cell::new(x, y)];
    if x > 0 {
        cells.push(Cell::new(x - 1, y));
    }
    if x < 3 {
        cells.push(Cell::new(x + 1, y));
    }
    if y > 0 {
        cells.push(Cell::new(x, y - 1));
    }
    if y < 3 {
        cells.push(Cell::new(x, y + 1));
    }
    for cell in cells {
        adversary.queue.push(strike(
            ActionKind::Detonation,
            StrikeKind::Magical,
            150,
            Element::Fire,
            cell,
            0.0,
            5.0,
            Vec::new(),
        ));
    }
    adversary.cooldown += 5.0;
}

/// Burn one of the two right columns
fn hell_flame(adversary: &mut Adversary, rng: &mut ChaCha8Rng) {
    let x = rng.gen_range(0..2u8) + 2;
    for cell in column_cells(x) {
        adversary.queue.push(strike(
            ActionKind::HellFlame,
            StrikeKind::Magical,
            100,
            Element::Fire,
            cell,
            0.0,
            3.0,
            vec![StatusEffect::timed(
                EffectKind::Burn(BurnState::default()),
                10.0,
            )],
        ));
    }
    adversary.cooldown += 3.0;
}

/// Two-by-two eruption anchored short of the far edges
fn eruption(adversary: &mut Adversary, rng: &mut ChaCha8Rng) {
    let x = rng.gen_range(0..3u8);
    let y = rng.gen_range(0..3u8);
    for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        adversary.queue.push(strike(
            ActionKind::Eruption,
            StrikeKind::Magical,
            200,
            Element::Fire,
            Cell::new(x + dx, y + dy),
            0.0,
            5.0,
            Vec::new(),
        ));
    }
    adversary.cooldown += 5.0;
}

fn mana_cost(kind: ActionKind) -> f32 {
    match kind {
        ActionKind::Detonation | ActionKind::HellFlame | ActionKind::Eruption => 50.0,
        _ => 0.0,
    }
}

/// Execute an action, returning false when the adversary cannot pay for it
///
/// An unaffordable cast changes nothing at all: the gauge stays full and no
/// cooldown starts, so the unit tries again next tick.
pub fn perform(adversary: &mut Adversary, kind: ActionKind, rng: &mut ChaCha8Rng) -> bool {
    let cost = mana_cost(kind);
    if adversary.unit.mana.left < cost {
        return false;
    }

    match kind {
        ActionKind::TailRush => tail_rush(adversary, rng),
        ActionKind::SnakeDash => snake_dash(adversary, rng),
        ActionKind::Tightening => tightening(adversary, rng),
        ActionKind::HailPrism => hail_prism(adversary, rng),
        ActionKind::IceSword => ice_sword(adversary, rng),
        ActionKind::Avalanche => avalanche(adversary, rng),
        ActionKind::Detonation => detonation(adversary, rng),
        ActionKind::HellFlame => hell_flame(adversary, rng),
        ActionKind::Eruption => eruption(adversary, rng),
    }

    adversary.unit.mana.spend(cost);
    adversary.unit.reset_gauge();
    true
}
