use berry_core::input::{PadButton, PadState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Logo screen shown at boot.
    Intro,
    Gameplay,
    Pause,
}

pub struct Game {
    pub state: GameState,
    intro_remaining: f32,
}

impl Game {
    pub fn new(intro_seconds: f32) -> Self {
        let state = if intro_seconds > 0.0 {
            GameState::Intro
        } else {
            GameState::Gameplay
        };
        Self {
            state,
            intro_remaining: intro_seconds.max(0.0),
        }
    }

    /// START toggles between gameplay and pause. Other states ignore it.
    pub fn set_control_data(&mut self, pad: &PadState) {
        if !pad.is_just_pressed(PadButton::Start) {
            return;
        }
        let next = match self.state {
            GameState::Pause => GameState::Gameplay,
            GameState::Gameplay => GameState::Pause,
            other => other,
        };
        if next != self.state {
            log::info!("{}", if next == GameState::Pause { "PAUSED" } else { "RESUMED" });
            self.state = next;
        }
    }

    /// Count down the intro screen; gameplay starts once it runs out.
    pub fn tick(&mut self, frame_time: f32) {
        if self.state != GameState::Intro {
            return;
        }
        self.intro_remaining -= frame_time;
        if self.intro_remaining <= 0.0 {
            self.intro_remaining = 0.0;
            self.state = GameState::Gameplay;
            log::info!("Intro finished, entering gameplay");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state == GameState::Pause
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berry_core::input::PadSnapshot;

    fn press_start(pad: &mut PadState) {
        pad.apply_snapshot(&PadSnapshot::with_buttons(&[PadButton::Start], (0.0, 0.0)));
    }

    fn release_all(pad: &mut PadState) {
        pad.apply_snapshot(&PadSnapshot::default());
    }

    #[test]
    fn start_toggles_pause_and_back() {
        let mut game = Game::new(0.0);
        let mut pad = PadState::new();
        assert_eq!(game.state, GameState::Gameplay);

        press_start(&mut pad);
        game.set_control_data(&pad);
        assert!(game.is_paused());

        release_all(&mut pad);
        game.set_control_data(&pad);
        assert!(game.is_paused());

        press_start(&mut pad);
        game.set_control_data(&pad);
        assert_eq!(game.state, GameState::Gameplay);
    }

    #[test]
    fn holding_start_toggles_once() {
        let mut game = Game::new(0.0);
        let mut pad = PadState::new();
        for _ in 0..10 {
            press_start(&mut pad);
            game.set_control_data(&pad);
        }
        assert!(game.is_paused());
    }

    #[test]
    fn intro_ignores_start_and_times_out() {
        let mut game = Game::new(1.0);
        let mut pad = PadState::new();
        assert_eq!(game.state, GameState::Intro);

        press_start(&mut pad);
        game.set_control_data(&pad);
        assert_eq!(game.state, GameState::Intro);

        game.tick(0.5);
        assert_eq!(game.state, GameState::Intro);
        game.tick(0.5);
        assert_eq!(game.state, GameState::Gameplay);
    }

    #[test]
    fn tick_does_not_leave_pause() {
        let mut game = Game::new(0.0);
        game.state = GameState::Pause;
        game.tick(10.0);
        assert!(game.is_paused());
    }
}
