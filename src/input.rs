//! Keyboard edges to per-tick input
//!
//! Event handlers only push [`KeyEdge`]s into an [`InputQueue`]. Once per
//! frame the loop drains the queue through [`InputState::snapshot`], which
//! tracks held keys and turns presses into one-shot flags.

use crate::sim::TickInput;

/// Player intents the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    SteerLeft,
    SteerRight,
    Accelerate,
    Brake,
    Restart,
}

impl Intent {
    const COUNT: usize = 5;

    /// Map a DOM `KeyboardEvent.code` to an intent
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Intent::SteerLeft),
            "ArrowRight" | "KeyD" => Some(Intent::SteerRight),
            "ArrowUp" | "KeyW" => Some(Intent::Accelerate),
            "ArrowDown" | "KeyS" => Some(Intent::Brake),
            "Space" => Some(Intent::Restart),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Intent::SteerLeft => 0,
            Intent::SteerRight => 1,
            Intent::Accelerate => 2,
            Intent::Brake => 3,
            Intent::Restart => 4,
        }
    }
}

/// A key going down or up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEdge {
    pub intent: Intent,
    pub pressed: bool,
}

impl KeyEdge {
    pub fn down(intent: Intent) -> Self {
        Self { intent, pressed: true }
    }

    pub fn up(intent: Intent) -> Self {
        Self { intent, pressed: false }
    }
}

/// Edges received since the last snapshot, in arrival order
#[derive(Debug, Default, Clone)]
pub struct InputQueue {
    edges: Vec<KeyEdge>,
}

impl InputQueue {
    pub fn push(&mut self, edge: KeyEdge) {
        self.edges.push(edge);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = KeyEdge> + '_ {
        self.edges.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }
}

/// Held-key tracking between snapshots
#[derive(Debug, Default, Clone)]
pub struct InputState {
    held: [bool; Intent::COUNT],
}

impl InputState {
    pub fn is_held(&self, intent: Intent) -> bool {
        self.held[intent.index()]
    }

    /// Drain `queue` and produce the input for the next tick
    ///
    /// Steering and restart fire once per press; auto-repeat keydowns for a
    /// key that is already held are ignored. Throttle and brake report the
    /// held level after all edges are applied.
    pub fn snapshot(&mut self, queue: &mut InputQueue) -> TickInput {
        let mut input = TickInput::default();

        for edge in queue.drain() {
            let slot = &mut self.held[edge.intent.index()];
            let fresh_press = edge.pressed && !*slot;
            *slot = edge.pressed;

            if fresh_press {
                match edge.intent {
                    Intent::SteerLeft => input.steer_left = true,
                    Intent::SteerRight => input.steer_right = true,
                    Intent::Restart => input.restart = true,
                    Intent::Accelerate | Intent::Brake => {}
                }
            }
        }

        input.accelerate = self.is_held(Intent::Accelerate);
        input.brake = self.is_held(Intent::Brake);
        input
    }

    /// Forget all held keys (e.g. when the window loses focus)
    pub fn release_all(&mut self) {
        self.held = [false; Intent::COUNT];
    }
}
