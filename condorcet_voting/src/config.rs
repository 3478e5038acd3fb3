// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A ballot, as handed over by the readers.
///
/// The choices are the candidate names, from the most preferred to the least preferred.
/// A ballot is only accepted if it ranks every registered candidate exactly once.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Ballot {
    /// An optional identifier, only used for reporting.
    pub id: Option<String>,
    pub choices: Vec<String>,
}

impl Ballot {
    pub fn new(choices: &[String]) -> Ballot {
        Ballot {
            id: None,
            choices: choices.to_vec(),
        }
    }
}

// ******** Output data structures *********

/// Statistics for one candidate at the end of the election.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateStats {
    pub name: String,
    pub duel_wins: u32,
    /// Only computed for the candidates that were ex aequo on the number of duels won.
    pub borda_score: Option<i64>,
}

/// The outcome of a single duel between two candidates.
///
/// `first` is the candidate that comes first in the registration order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DuelStats {
    pub first: String,
    pub second: String,
    /// Number of ballots in which `first` is preferred to `second`.
    pub first_score: u64,
    /// Number of ballots in which `second` is preferred to `first`.
    pub second_score: u64,
    /// `None` when the duel is a draw under [DuelTieRule::Draw].
    pub winner: Option<String>,
}

/// Flag to indicate how the winner was picked.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TiebreakSituation {
    /// A single candidate won the most duels.
    Clean,
    /// Several candidates won the most duels, the Borda score decided.
    BordaTiebreak,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VotingResult {
    pub winner: String,
    /// All the candidates, from the winner to the last one.
    pub ranking: Vec<String>,
    /// In registration order.
    pub candidate_stats: Vec<CandidateStats>,
    pub duels: Vec<DuelStats>,
    pub tiebreak: TiebreakSituation,
    pub accepted_ballots: u64,
    pub rejected_ballots: u64,
}

/// The reasons for a ballot to be turned down.
///
/// A rejected ballot is skipped, the election carries on with the others.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum BallotError {
    WrongLength { expected: usize, found: usize },
    UnknownCandidate(String),
    DuplicateChoice(String),
}

impl Error for BallotError {}

impl Display for BallotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BallotError::WrongLength { expected, found } => write!(
                f,
                "invalid ballot: expected {} choices, found {}",
                expected, found
            ),
            BallotError::UnknownCandidate(name) => {
                write!(f, "invalid ballot: unknown candidate {:?}", name)
            }
            BallotError::DuplicateChoice(name) => {
                write!(f, "invalid ballot: candidate {:?} ranked more than once", name)
            }
        }
    }
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    EmptyElection,
    EmptyCandidateName,
    DuplicateCandidate(String),
    InvalidBallot(BallotError),
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::EmptyElection => write!(f, "no candidate registered for this election"),
            VotingErrors::EmptyCandidateName => write!(f, "a candidate has an empty name"),
            VotingErrors::DuplicateCandidate(name) => {
                write!(f, "candidate {:?} is registered more than once", name)
            }
            VotingErrors::InvalidBallot(e) => e.fmt(f),
        }
    }
}

impl From<BallotError> for VotingErrors {
    fn from(e: BallotError) -> Self {
        VotingErrors::InvalidBallot(e)
    }
}

// ********* Configuration **********

/// What happens when two candidates are preferred by the same number of ballots.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DuelTieRule {
    /// The second candidate of the pair (in registration order) wins the duel.
    /// Every duel then produces exactly one win.
    FavorSecond,
    /// Nobody wins the duel.
    Draw,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteRules {
    pub duel_tie_rule: DuelTieRule,
}

impl VoteRules {
    pub const DEFAULT_RULES: VoteRules = VoteRules {
        duel_tie_rule: DuelTieRule::FavorSecond,
    };
}

impl Default for VoteRules {
    fn default() -> Self {
        VoteRules::DEFAULT_RULES
    }
}
