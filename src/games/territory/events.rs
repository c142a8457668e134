use super::countdown::CountdownCue;
use super::state::{Owner, TileClaimed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The match clock reached zero
    Timeout,
    /// No empty tile was left
    BoardFull,
}

/// Tiles held by each agent when the match ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalScores {
    pub scores: Vec<(Owner, usize)>,
    /// Best controlled score for this board size, including this match
    pub high_score: u32,
    pub new_high_score: bool,
}

impl FinalScores {
    pub fn score(&self, owner: Owner) -> usize {
        self.scores
            .iter()
            .find(|(o, _)| *o == owner)
            .map(|(_, s)| *s)
            .unwrap_or(0)
    }

    /// Owners sharing the highest tile count.
    pub fn leaders(&self) -> Vec<Owner> {
        let best = self.scores.iter().map(|(_, s)| *s).max().unwrap_or(0);
        self.scores
            .iter()
            .filter(|(_, s)| *s == best)
            .map(|(o, _)| *o)
            .collect()
    }
}

/// Feedback for rendering, audio and UI collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    TileClaimed(TileClaimed),
    /// The owner has no empty tile next to its territory; autonomous agents
    /// switch to pursuit
    OwnerBoxedIn { owner: Owner },
    Countdown(CountdownCue),
    MatchStarted,
    MatchPaused,
    MatchResumed,
    MatchEnded {
        reason: EndReason,
        scores: FinalScores,
    },
}
