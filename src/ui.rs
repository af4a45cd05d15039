//! HUD values for the DOM layer
//!
//! The simulation never touches the page; the entry point builds a
//! [`HudSnapshot`] each frame and writes it out.

use crate::sim::GameState;

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudSnapshot {
    pub score: u32,
    /// Speed in HUD units (km/h)
    pub display_speed: u32,
    /// Final score while the game-over panel should be visible
    pub game_over: Option<u32>,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            display_speed: state.display_speed(),
            game_over: state.is_over().then_some(state.score),
        }
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn speed_text(&self) -> String {
        format!("Speed: {} km/h", self.display_speed)
    }

    pub fn final_score_text(&self) -> Option<String> {
        self.game_over.map(|score| format!("Score: {}", score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    #[test]
    fn test_running_snapshot() {
        let mut state = GameState::new(1);
        state.score = 120;
        state.vehicle.speed = 18.46;

        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.score_text(), "Score: 120");
        assert_eq!(hud.speed_text(), "Speed: 184 km/h");
        assert_eq!(hud.game_over, None);
        assert_eq!(hud.final_score_text(), None);
    }

    #[test]
    fn test_game_over_snapshot() {
        let mut state = GameState::new(1);
        state.score = 70;
        state.phase = GamePhase::GameOver;

        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.display_speed, 0);
        assert_eq!(hud.game_over, Some(70));
        assert_eq!(hud.final_score_text().as_deref(), Some("Score: 70"));
    }
}
