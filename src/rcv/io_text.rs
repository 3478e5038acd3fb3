// Primitives for reading plain text candidate lists and ballots.

use crate::rcv::{io_common::simplify_file_name, *};
use snafu::ResultExt;

/// Breaks a string on the delimiter. The tokens are trimmed and the empty ones dropped.
pub fn tokenize(s: &str, delim: &str) -> Vec<String> {
    s.split(delim)
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn read_file(path: &str) -> RcvResult<String> {
    fs::read_to_string(path).context(OpeningFileSnafu { path })
}

/// One candidate per line.
pub fn read_candidates(path: &str) -> RcvResult<Vec<String>> {
    info!("Attempting to read candidates file {:?}", path);
    let res = tokenize(&read_file(path)?, "\n");
    debug!("read_candidates: {:?}", res);
    Ok(res)
}

/// A single ballot per file, one candidate per line, most preferred first.
pub fn read_text_ballot(path: &str) -> RcvResult<Ballot> {
    let choices = tokenize(&read_file(path)?, "\n");
    debug!("read_text_ballot: {:?}: {:?}", path, choices);
    Ok(Ballot {
        id: Some(simplify_file_name(path)),
        choices,
    })
}

/// One ballot per line, the candidates separated by the delimiter. Empty lines are skipped.
pub fn read_lines_ballots(path: &str, delimiter: &str) -> RcvResult<Vec<Ballot>> {
    let default_id = make_default_id(path);
    let contents = read_file(path)?;
    let mut res: Vec<Ballot> = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let lineno = idx + 1;
        let choices = tokenize(line, delimiter);
        if choices.is_empty() {
            continue;
        }
        debug!("read_lines_ballots: lineno: {:?} row: {:?}", lineno, choices);
        res.push(Ballot {
            id: Some(default_id(lineno)),
            choices,
        });
    }
    Ok(res)
}

fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_trims() {
        assert_eq!(tokenize("A\n B \r\n\nC\n", "\n"), vec!["A", "B", "C"]);
        assert_eq!(tokenize("A; B ;C", ";"), vec!["A", "B", "C"]);
        assert!(tokenize("", "\n").is_empty());
    }

    #[test]
    fn default_ids() {
        let f = make_default_id("/data/ballots.csv");
        assert_eq!(f(12), "ballots.csv-00000012");
    }

    #[test]
    fn missing_file() {
        let res = read_candidates("/nonexistent/condorcet/candidates.txt");
        assert!(matches!(res, Err(RcvError::OpeningFile { .. })));
    }
}
