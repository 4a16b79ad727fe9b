use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreState {
    pub right: u32,
    pub wrong: u32,
}

impl ScoreState {
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.right += 1;
        } else {
            self.wrong += 1;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn answered(&self) -> u32 {
        self.right + self.wrong
    }
}
