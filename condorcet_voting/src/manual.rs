/*!

This is the long-form manual for `condorcet_voting` and `condorcet`.

## How the winner is picked

Every voter ranks all the candidates, from the most preferred to the least preferred.
The election is then decided in two stages (Black's method):

1. **Duels.** Every pair of candidates is compared over all the ballots. A candidate scores
   a point for each ballot that ranks them above the other one, and wins the duel if they
   score more points. When both candidates score the same number of points, the duel goes
   to the candidate that was registered second (this can be changed with the
   `duelTieRule` option, see below). The candidates are ranked by number of duels won.
2. **Borda score.** If several candidates won the same, highest number of duels, the winner
   among them is the one with the highest Borda score. With `n` candidates, a ballot gives
   `n` points to its first choice, `n - 1` points to its second choice, and so on down to 1
   point for the last choice.

Any tie that remains is settled by the order in which the candidates were registered.

For example, with the candidates `A`, `B` and `C` and the ballots:

```text
B, C, A
C, A, B
C, B, A
```

`B` beats `A` (2 ballots to 1), `C` beats `A` (3 to 0) and `C` beats `B` (2 to 1).
`C` wins 2 duels, `B` wins 1 and `A` none: `C` is elected without looking at Borda scores.

## Input formats

The candidates are listed in a text file, one name per line. Leading and trailing spaces are
removed and empty lines are ignored.

The following ballot formats are supported:
* `text` one ballot per file, one candidate per line, the first line being the most
  preferred candidate.
* `lines` one ballot per line, the candidates separated by a delimiter (`,` by default).

A ballot must name every candidate exactly once. Other ballots are reported and skipped,
they do not stop the election.

When several files are passed in a single `--input` flag, they must be separated by commas.
A file name without extension is assumed to be a `.txt` file.

## Configuration

Instead of passing the files on the command line, an election can be described in a JSON file:

```text
{
  "outputSettings": { "contestName": "Board election" },
  "candidatesFilePath": "candidates.txt",
  "ballotFileSources": [
    { "provider": "lines", "filePath": "ballots.csv", "delimiter": ";" },
    { "provider": "text", "filePath": "ballot_1.txt" }
  ],
  "rules": { "duelTieRule": "favorSecond" }
}
```

The candidates can also be given inline with `"candidates": [{"name": "Alice"}, ...]`.
The file paths are relative to the location of the configuration file.

Options for `rules`:
 - `duelTieRule` (optional, `favorSecond` by default): what happens to a tied duel.
   `favorSecond` gives the duel to the candidate registered second, `draw` gives the duel
   to nobody.

## Output

The summary of the election is written in JSON with the `--out` flag. It contains the
winner, the full ranking, the number of duels won by each candidate, the Borda scores when
they were needed, and the score of every duel. The `--reference` flag compares this summary
with a previously saved one and reports the differences.

 */
