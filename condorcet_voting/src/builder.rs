use log::warn;

pub use crate::config::*;
use crate::{tabulate, CandidateLedger};

/// A builder for adding ballots one at a time.
///
/// Every ballot is checked when it is added. A rejected ballot is returned as an error
/// and does not change anything, the following ballots can still be added.
///
/// ```
/// pub use condorcet_voting::builder::Builder;
/// pub use condorcet_voting::VoteRules;
/// # use condorcet_voting::VotingErrors;
///
/// let mut builder = Builder::new(&VoteRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_ballot(&["Bob".to_string(), "Anna".to_string()])?;
/// // Clara is not running, this ballot is skipped.
/// assert!(builder.add_ballot(&["Clara".to_string(), "Anna".to_string()]).is_err());
///
/// let result = builder.run()?;
/// assert_eq!(result.winner, "Bob");
/// assert_eq!(result.rejected_ballots, 1);
///
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: VoteRules,
    pub(crate) _ledger: CandidateLedger,
    pub(crate) _rejected: u64,
}

impl Builder {
    pub fn new(rules: &VoteRules) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _ledger: CandidateLedger::new(&[])?,
            _rejected: 0,
        })
    }

    /// Registers the candidates. The previously added ballots are dropped.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: self._rules,
            _ledger: CandidateLedger::new(cands)?,
            _rejected: 0,
        })
    }

    /// Adds a ballot, from the most preferred candidate to the least preferred one.
    ///
    /// The ballot must rank all the candidates, each of them exactly once.
    pub fn add_ballot(&mut self, choices: &[String]) -> Result<(), BallotError> {
        let res = self._ledger.add_ballot(choices);
        if let Err(e) = &res {
            warn!("add_ballot: rejecting ballot {:?}: {}", choices, e);
            self._rejected += 1;
        }
        res
    }

    pub fn add_ballot_2(&mut self, ballot: &Ballot) -> Result<(), BallotError> {
        self.add_ballot(&ballot.choices)
    }

    pub fn num_ballots(&self) -> usize {
        self._ledger.num_ballots()
    }

    pub fn num_rejected(&self) -> u64 {
        self._rejected
    }

    /// The positions given to this candidate by each accepted ballot, 1 being the most preferred.
    pub fn ranks(&self, candidate: &str) -> Option<Vec<u32>> {
        self._ledger.ranks_of(candidate)
    }

    /// Runs the election with the ballots added so far.
    ///
    /// Running it again without adding ballots gives the same result.
    pub fn run(&self) -> Result<VotingResult, VotingErrors> {
        tabulate(&self._ledger, &self._rules, self._rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ingest_and_run() {
        let mut builder = Builder::new(&VoteRules::DEFAULT_RULES)
            .unwrap()
            .candidates(&names(&["A", "B", "C"]))
            .unwrap();
        builder.add_ballot(&names(&["C", "A", "B"])).unwrap();
        builder.add_ballot_2(&Ballot::new(&names(&["C", "B", "A"]))).unwrap();
        assert_eq!(
            builder.add_ballot(&names(&["C", "B"])),
            Err(BallotError::WrongLength {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(builder.num_ballots(), 2);
        assert_eq!(builder.num_rejected(), 1);
        assert_eq!(builder.ranks("C"), Some(vec![1, 1]));
        assert_eq!(builder.ranks("A"), Some(vec![2, 3]));

        let r1 = builder.run().unwrap();
        let r2 = builder.run().unwrap();
        assert_eq!(r1, r2);
        assert_eq!(r1.winner, "C");
        assert_eq!(r1.accepted_ballots, 2);
        assert_eq!(r1.rejected_ballots, 1);
    }

    #[test]
    fn no_candidates() {
        let builder = Builder::new(&VoteRules::DEFAULT_RULES).unwrap();
        assert_eq!(builder.run(), Err(VotingErrors::EmptyElection));
    }

    #[test]
    fn duplicate_candidates() {
        let res = Builder::new(&VoteRules::DEFAULT_RULES)
            .unwrap()
            .candidates(&names(&["A", "A"]));
        assert!(matches!(res, Err(VotingErrors::DuplicateCandidate(n)) if n == "A"));
    }
}
