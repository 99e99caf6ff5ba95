/// Current run score plus the best score of this process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    score: u32,
    high_score: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Folds the run into the high score and starts over at zero.
    /// Returns the score the run ended with.
    pub fn fold(&mut self) -> u32 {
        let final_score = self.score;
        self.high_score = self.high_score.max(final_score);
        self.score = 0;
        final_score
    }

    pub fn reset_run(&mut self) {
        self.score = 0;
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn high_score_text(&self) -> String {
        format!("Highscore: {}", self.high_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_keeps_the_best() {
        let mut s = ScoreTracker::new();
        s.award(3);
        assert_eq!(s.fold(), 3);
        assert_eq!((s.score(), s.high_score()), (0, 3));

        s.award(1);
        s.fold();
        assert_eq!(s.high_score(), 3);

        s.award(5);
        s.fold();
        assert_eq!(s.high_score(), 5);
    }

    #[test]
    fn texts() {
        let mut s = ScoreTracker::new();
        s.award(2);
        assert_eq!(s.score_text(), "Score: 2");
        s.fold();
        assert_eq!(s.high_score_text(), "Highscore: 2");
    }
}
