//! Telegraphed attack queue
//!
//! Every adversary action expands into per-cell queued attacks. Each entry
//! sits hidden for its stagger delay, then telegraphs on its cell while the
//! preliminary window burns down, and resolves the moment that window hits
//! zero. Resolution order within a tick is queue order; removal is batched
//! back-to-front.

use serde::{Deserialize, Serialize};

use crate::battle::effect::StatusEffect;
use crate::core::types::Cell;
use crate::element::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrikeKind {
    Physical,
    Magical,
}

/// One cell of a pending adversary attack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedAttack {
    pub name: String,
    pub kind: StrikeKind,
    pub power: i64,
    pub element: Element,
    pub cell: Cell,
    /// Seconds before the telegraph appears; the preliminary window does
    /// not start burning until this reaches zero
    pub until_display: f32,
    /// Seconds of visible warning before the strike lands
    pub preliminary: f32,
    /// Set on the advance that shows the telegraph, zero-delay entries
    /// included, so the reveal event fires exactly once per entry
    pub revealed: bool,
    /// Effects copied onto every player the strike connects with
    pub effects: Vec<StatusEffect>,
}

impl QueuedAttack {
    /// Whether the telegraph is currently shown
    pub fn visible(&self) -> bool {
        self.revealed
    }
}

/// Outcome of advancing one adversary's queue by a tick
#[derive(Debug, Default)]
pub struct QueueStep {
    /// Cells whose telegraph appeared this tick
    pub revealed: Vec<Cell>,
    /// Attacks whose preliminary window ran out, in queue order
    pub ready: Vec<QueuedAttack>,
}

/// Advance all entries by `dt`, pulling out the ones ready to resolve
pub fn advance(queue: &mut Vec<QueuedAttack>, dt: f32) -> QueueStep {
    let mut step = QueueStep::default();
    let mut done: Vec<usize> = Vec::new();

    for (index, attack) in queue.iter_mut().enumerate() {
        if !attack.revealed {
            if attack.until_display > 0.0 {
                attack.until_display -= dt;
            }
            if attack.until_display <= 0.0 {
                attack.revealed = true;
                step.revealed.push(attack.cell);
            }
        } else {
            attack.preliminary -= dt;
            if attack.preliminary <= 0.0 {
                done.push(index);
            }
        }
    }

    for &index in &done {
        step.ready.push(queue[index].clone());
    }
    done.sort_unstable_by(|a, b| b.cmp(a));
    for index in done {
        queue.remove(index);
    }

    step
}
