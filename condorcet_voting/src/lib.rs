mod config;
use log::{debug, info, warn};

use std::{
    cmp::{Ordering, Reverse},
    collections::{BTreeMap, HashMap, HashSet},
    ops::AddAssign,
};

pub use crate::config::*;

pub mod builder;
pub mod manual;

// **** Private structures ****

// Candidates are identified by their position in the registration order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CandidateId(u32);

impl CandidateId {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

// Position of a candidate in a ballot. 1 is the most preferred.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct Rank(u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
    const ONE: VoteCount = VoteCount(1);
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct BordaScore(i64);

/// Owns the rank sequences of all the candidates.
///
/// Invariant: every candidate has exactly one rank per accepted ballot.
#[derive(Debug, Clone)]
pub(crate) struct CandidateLedger {
    names: Vec<String>,
    ids: HashMap<String, CandidateId>,
    // Indexed by CandidateId
    ranks: Vec<Vec<Rank>>,
    num_ballots: usize,
}

impl CandidateLedger {
    pub(crate) fn new(names: &[String]) -> Result<CandidateLedger, VotingErrors> {
        let mut ids: HashMap<String, CandidateId> = HashMap::new();
        for (idx, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(VotingErrors::EmptyCandidateName);
            }
            if ids.insert(name.clone(), CandidateId(idx as u32)).is_some() {
                return Err(VotingErrors::DuplicateCandidate(name.clone()));
            }
        }
        Ok(CandidateLedger {
            names: names.to_vec(),
            ids,
            ranks: vec![Vec::new(); names.len()],
            num_ballots: 0,
        })
    }

    fn num_candidates(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn num_ballots(&self) -> usize {
        self.num_ballots
    }

    fn name(&self, cid: CandidateId) -> &str {
        self.names[cid.idx()].as_str()
    }

    fn ranks(&self, cid: CandidateId) -> &[Rank] {
        self.ranks[cid.idx()].as_slice()
    }

    pub(crate) fn ranks_of(&self, name: &str) -> Option<Vec<u32>> {
        self.ids
            .get(name)
            .map(|cid| self.ranks(*cid).iter().map(|r| r.0).collect())
    }

    fn add_rank(&mut self, cid: CandidateId, rank: Rank) {
        self.ranks[cid.idx()].push(rank);
    }

    /// Validates the ballot and records one rank for every candidate.
    ///
    /// Nothing is recorded if the ballot is rejected.
    pub(crate) fn add_ballot(&mut self, choices: &[String]) -> Result<(), BallotError> {
        let positions = check_ballot(&self.ids, choices)?;
        for (cid, rank) in positions {
            self.add_rank(cid, rank);
        }
        self.num_ballots += 1;
        debug_assert!(self.ranks.iter().all(|r| r.len() == self.num_ballots));
        Ok(())
    }

    /// Each ballot gives `max_score` points to its first choice, one point less to the second
    /// choice, and so on.
    fn borda_score(&self, cid: CandidateId, max_score: u32) -> BordaScore {
        let max_score = max_score as i64;
        BordaScore(
            self.ranks(cid)
                .iter()
                .map(|r| max_score - (r.0 as i64 - 1))
                .sum(),
        )
    }
}

// Returns the rank of each candidate in this ballot, or the reason why the ballot is not a
// total order over the candidates.
fn check_ballot(
    candidates: &HashMap<String, CandidateId>,
    choices: &[String],
) -> Result<Vec<(CandidateId, Rank)>, BallotError> {
    if choices.len() != candidates.len() {
        return Err(BallotError::WrongLength {
            expected: candidates.len(),
            found: choices.len(),
        });
    }
    let mut seen: HashSet<CandidateId> = HashSet::new();
    let mut res: Vec<(CandidateId, Rank)> = Vec::with_capacity(choices.len());
    for (idx, name) in choices.iter().enumerate() {
        let cid = *candidates
            .get(name)
            .ok_or_else(|| BallotError::UnknownCandidate(name.clone()))?;
        if !seen.insert(cid) {
            return Err(BallotError::DuplicateChoice(name.clone()));
        }
        res.push((cid, Rank(idx as u32 + 1)));
    }
    // Same length, no duplicate and no unknown name: every candidate is ranked exactly once.
    Ok(res)
}

/// Checks that the ballot ranks every candidate exactly once.
pub fn is_valid_ballot(candidates: &[String], ballot: &[String]) -> bool {
    let ids: HashMap<String, CandidateId> = candidates
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), CandidateId(idx as u32)))
        .collect();
    ids.len() == candidates.len() && check_ballot(&ids, ballot).is_ok()
}

// **** Duels ****

// An unordered pair of candidates.
// Invariant: first < second, so that a pair has a single key.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct DuelKey {
    first: CandidateId,
    second: CandidateId,
}

impl DuelKey {
    // No key for a candidate against itself.
    fn new(a: CandidateId, b: CandidateId) -> Option<DuelKey> {
        match a.cmp(&b) {
            Ordering::Less => Some(DuelKey {
                first: a,
                second: b,
            }),
            Ordering::Greater => Some(DuelKey {
                first: b,
                second: a,
            }),
            Ordering::Equal => None,
        }
    }
}

// All the distinct pairs, in registration order.
fn all_pairs(num_candidates: usize) -> impl Iterator<Item = DuelKey> {
    (0..num_candidates).flat_map(move |i| {
        (i + 1..num_candidates).map(move |j| DuelKey {
            first: CandidateId(i as u32),
            second: CandidateId(j as u32),
        })
    })
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
enum DuelOutcome {
    FirstWins,
    SecondWins,
    Draw,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
struct DuelRecord {
    first_score: VoteCount,
    second_score: VoteCount,
    outcome: DuelOutcome,
}

/// The outcome of every duel, from the point of view of both candidates.
#[derive(Debug, Clone, Default)]
struct DuelTable {
    records: BTreeMap<DuelKey, DuelRecord>,
}

impl DuelTable {
    fn is_resolved(&self, key: &DuelKey) -> bool {
        self.records.contains_key(key)
    }

    // A pair is only evaluated once. Recording it again is a logic error, it is ignored outside
    // of debug builds.
    fn record(&mut self, key: DuelKey, record: DuelRecord) {
        if self.is_resolved(&key) {
            debug_assert!(false, "duel {:?} evaluated twice", key);
            warn!("record: duel {:?} already evaluated, ignoring", key);
            return;
        }
        self.records.insert(key, record);
    }

    /// Did `cid` win against `adversary`? None if the duel was not evaluated.
    fn won(&self, cid: CandidateId, adversary: CandidateId) -> Option<bool> {
        let key = DuelKey::new(cid, adversary)?;
        let record = self.records.get(&key)?;
        let winner = match record.outcome {
            DuelOutcome::FirstWins => Some(key.first),
            DuelOutcome::SecondWins => Some(key.second),
            DuelOutcome::Draw => None,
        };
        Some(winner == Some(cid))
    }

    fn wins(&self, cid: CandidateId, num_candidates: usize) -> u32 {
        (0..num_candidates)
            .filter(|idx| self.won(cid, CandidateId(*idx as u32)) == Some(true))
            .count() as u32
    }
}

fn run_duel(ledger: &CandidateLedger, key: DuelKey, tie_rule: DuelTieRule) -> DuelRecord {
    let mut first_score = VoteCount::EMPTY;
    let mut second_score = VoteCount::EMPTY;
    for (r1, r2) in ledger.ranks(key.first).iter().zip(ledger.ranks(key.second)) {
        match r1.cmp(r2) {
            Ordering::Less => first_score += VoteCount::ONE,
            Ordering::Greater => second_score += VoteCount::ONE,
            Ordering::Equal => {}
        }
    }
    let outcome = match first_score.cmp(&second_score) {
        Ordering::Greater => DuelOutcome::FirstWins,
        Ordering::Less => DuelOutcome::SecondWins,
        Ordering::Equal => match tie_rule {
            DuelTieRule::FavorSecond => DuelOutcome::SecondWins,
            DuelTieRule::Draw => DuelOutcome::Draw,
        },
    };
    DuelRecord {
        first_score,
        second_score,
        outcome,
    }
}

fn resolve_all_duels(ledger: &CandidateLedger, rules: &VoteRules) -> DuelTable {
    let mut table = DuelTable::default();
    for key in all_pairs(ledger.num_candidates()) {
        let record = run_duel(ledger, key, rules.duel_tie_rule);
        debug!(
            "resolve_all_duels: {} vs {}: {:?}",
            ledger.name(key.first),
            ledger.name(key.second),
            record
        );
        table.record(key, record);
    }
    table
}

// **** Winner ****

#[derive(Eq, PartialEq, Debug, Clone)]
struct Resolution {
    ranking: Vec<CandidateId>,
    wins: Vec<u32>,
    borda_scores: HashMap<CandidateId, BordaScore>,
    tiebreak: TiebreakSituation,
}

// Black's method: the most duels won, then the highest Borda score among the ex aequo.
// Both sorts are stable, the registration order settles the remaining ties.
fn resolve_winner(ledger: &CandidateLedger, table: &DuelTable) -> Result<Resolution, VotingErrors> {
    let num_candidates = ledger.num_candidates();
    let wins: Vec<u32> = (0..num_candidates)
        .map(|idx| table.wins(CandidateId(idx as u32), num_candidates))
        .collect();

    let mut by_wins: Vec<CandidateId> = (0..num_candidates)
        .map(|idx| CandidateId(idx as u32))
        .collect();
    by_wins.sort_by_key(|cid| Reverse(wins[cid.idx()]));

    let top = *by_wins.first().ok_or(VotingErrors::EmptyElection)?;
    let top_wins = wins[top.idx()];
    let ex_aequo_len = by_wins
        .iter()
        .take_while(|cid| wins[cid.idx()] == top_wins)
        .count();
    debug!(
        "resolve_winner: {} candidate(s) with {} duel wins",
        ex_aequo_len, top_wins
    );

    if ex_aequo_len == 1 {
        return Ok(Resolution {
            ranking: by_wins,
            wins,
            borda_scores: HashMap::new(),
            tiebreak: TiebreakSituation::Clean,
        });
    }

    let max_score = num_candidates as u32;
    let borda_scores: HashMap<CandidateId, BordaScore> = by_wins[..ex_aequo_len]
        .iter()
        .map(|cid| (*cid, ledger.borda_score(*cid, max_score)))
        .collect();
    debug!("resolve_winner: borda scores: {:?}", borda_scores);

    let mut ranking: Vec<CandidateId> = by_wins[..ex_aequo_len].to_vec();
    ranking.sort_by_key(|cid| Reverse(borda_scores[cid]));
    ranking.extend_from_slice(&by_wins[ex_aequo_len..]);

    Ok(Resolution {
        ranking,
        wins,
        borda_scores,
        tiebreak: TiebreakSituation::BordaTiebreak,
    })
}

pub(crate) fn tabulate(
    ledger: &CandidateLedger,
    rules: &VoteRules,
    rejected_ballots: u64,
) -> Result<VotingResult, VotingErrors> {
    if ledger.num_candidates() == 0 {
        return Err(VotingErrors::EmptyElection);
    }
    info!(
        "Tabulating {} ballots for {} candidates, rules: {:?}",
        ledger.num_ballots(),
        ledger.num_candidates(),
        rules
    );

    let table = resolve_all_duels(ledger, rules);
    let resolution = resolve_winner(ledger, &table)?;

    let candidate_stats: Vec<CandidateStats> = (0..ledger.num_candidates())
        .map(|idx| {
            let cid = CandidateId(idx as u32);
            CandidateStats {
                name: ledger.name(cid).to_string(),
                duel_wins: resolution.wins[idx],
                borda_score: resolution.borda_scores.get(&cid).map(|s| s.0),
            }
        })
        .collect();
    for cs in candidate_stats.iter() {
        info!("Candidate {}: {} duel(s) won", cs.name, cs.duel_wins);
    }

    let duels: Vec<DuelStats> = table
        .records
        .iter()
        .map(|(key, record)| DuelStats {
            first: ledger.name(key.first).to_string(),
            second: ledger.name(key.second).to_string(),
            first_score: record.first_score.0,
            second_score: record.second_score.0,
            winner: match record.outcome {
                DuelOutcome::FirstWins => Some(ledger.name(key.first).to_string()),
                DuelOutcome::SecondWins => Some(ledger.name(key.second).to_string()),
                DuelOutcome::Draw => None,
            },
        })
        .collect();

    let ranking: Vec<String> = resolution
        .ranking
        .iter()
        .map(|cid| ledger.name(*cid).to_string())
        .collect();
    let winner = ranking.first().cloned().ok_or(VotingErrors::EmptyElection)?;
    info!(
        "Winner: {} ({:?}), ranking: {:?}",
        winner, resolution.tiebreak, ranking
    );

    Ok(VotingResult {
        winner,
        ranking,
        candidate_stats,
        duels,
        tiebreak: resolution.tiebreak,
        accepted_ballots: ledger.num_ballots() as u64,
        rejected_ballots,
    })
}

/// Runs the election for the given ballots.
///
/// Arguments:
/// * `coll` the ballots. The ones that do not rank every candidate exactly once are
///   reported and skipped.
/// * `rules` the rules that govern this election
/// * `candidates` the registered candidates, in order. This order settles the ties that
///   neither the duels nor the Borda scores can break.
pub fn run_voting_stats(
    coll: &[Ballot],
    rules: &VoteRules,
    candidates: &[String],
) -> Result<VotingResult, VotingErrors> {
    info!(
        "Processing {:?} ballots, candidates: {:?}",
        coll.len(),
        candidates
    );
    let mut ledger = CandidateLedger::new(candidates)?;
    let mut rejected: u64 = 0;
    for ballot in coll.iter() {
        if let Err(e) = ledger.add_ballot(&ballot.choices) {
            warn!("Skipping ballot {:?}: {}", ballot.id, e);
            rejected += 1;
        }
    }
    tabulate(&ledger, rules, rejected)
}
