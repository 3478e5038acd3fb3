use log::{debug, info, warn};

use condorcet_voting::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::rcv::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_text;

#[derive(Debug, Snafu)]
pub enum RcvError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("No candidates provided, use --candidates or the configuration file"))]
    MissingCandidates {},
    #[snafu(display("No ballots provided, use --input or the configuration file"))]
    MissingBallots {},
    #[snafu(display("Unknown input type {provider:?}"))]
    UnknownProvider { provider: String },
    #[snafu(display("Voting error: {source}"))]
    Voting { source: VotingErrors },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RcvResult<T> = Result<T, RcvError>;

fn tiebreak_to_str(tb: TiebreakSituation) -> &'static str {
    match tb {
        TiebreakSituation::Clean => "clean",
        TiebreakSituation::BordaTiebreak => "borda",
    }
}

fn result_stats_to_json(rs: &VotingResult) -> JSValue {
    let mut tally: Vec<JSValue> = Vec::new();
    for cs in rs.candidate_stats.iter() {
        let mut js: JSMap<String, JSValue> = JSMap::new();
        js.insert("name".to_string(), json!(cs.name));
        js.insert("duelWins".to_string(), json!(cs.duel_wins));
        if let Some(score) = cs.borda_score {
            js.insert("bordaScore".to_string(), json!(score));
        }
        tally.push(JSValue::Object(js));
    }

    let mut duels: Vec<JSValue> = Vec::new();
    for ds in rs.duels.iter() {
        let mut js: JSMap<String, JSValue> = JSMap::new();
        js.insert("candidates".to_string(), json!([ds.first, ds.second]));
        js.insert(
            "scores".to_string(),
            json!([ds.first_score, ds.second_score]),
        );
        // Absent for a draw
        if let Some(w) = &ds.winner {
            js.insert("winner".to_string(), json!(w));
        }
        duels.push(JSValue::Object(js));
    }

    json!({
        "winner": rs.winner,
        "ranking": rs.ranking,
        "tiebreak": tiebreak_to_str(rs.tiebreak),
        "ballots": {
            "accepted": rs.accepted_ballots,
            "rejected": rs.rejected_ballots,
        },
        "tally": tally,
        "duels": duels,
    })
}

fn build_summary_js(settings: &OutputSettings, rv: &VotingResult) -> JSValue {
    let c = OutputConfig {
        contest: settings.contest_name.clone(),
        date: settings.contest_date.clone(),
        jurisdiction: settings.contest_jurisdiction.clone(),
        office: settings.contest_office.clone(),
    };
    json!({
        "config": c,
        "results": result_stats_to_json(rv) })
}

fn read_ballots(root_path: &Path, cfs: &FileSource) -> RcvResult<Vec<Ballot>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read ballot file {:?}", p2);
    match cfs.provider.as_str() {
        "text" => Ok(vec![io_text::read_text_ballot(&p2)?]),
        "lines" => io_text::read_lines_ballots(&p2, cfs.delimiter.as_deref().unwrap_or(",")),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

// The command line flags take precedence over the configuration file.
fn collect_candidates(args: &Args, config: &RcvConfig, root_path: &Path) -> RcvResult<Vec<String>> {
    if let Some(path) = &args.candidates {
        return io_text::read_candidates(path);
    }
    if let Some(cands) = &config.candidates {
        return Ok(cands.iter().map(|c| c.name.trim().to_string()).collect());
    }
    if let Some(path) = &config.candidates_file_path {
        let p = root_path.join(path).display().to_string();
        return io_text::read_candidates(&p);
    }
    MissingCandidatesSnafu {}.fail()
}

fn collect_sources(args: &Args, config: &RcvConfig) -> RcvResult<Vec<FileSource>> {
    let sources: Vec<FileSource> = if let Some(inputs) = &args.input {
        let provider = args.input_type.clone().unwrap_or_else(|| "text".to_string());
        inputs
            .iter()
            .flat_map(|s| io_common::expand_file_names(s))
            .map(|file_path| FileSource {
                provider: provider.clone(),
                file_path,
                delimiter: args.delimiter.clone(),
            })
            .collect()
    } else {
        config.ballot_file_sources.clone()
    };
    ensure!(!sources.is_empty(), MissingBallotsSnafu {});
    Ok(sources)
}

fn write_summary(out_path: &str, pretty_js: &str) -> RcvResult<()> {
    if out_path == "stdout" {
        println!("{}", pretty_js);
        Ok(())
    } else {
        info!("Writing summary to {:?}", out_path);
        fs::write(out_path, pretty_js).context(WritingFileSnafu { path: out_path })
    }
}

fn check_summary(summary_path: &str, pretty_js_stats: &str) -> RcvResult<()> {
    let summary_ref = read_summary(summary_path)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    Ok(())
}

pub fn run_election(args: &Args) -> RcvResult<VotingResult> {
    // Without a configuration file, the paths are relative to the working directory.
    let (config, root_path): (RcvConfig, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root_p = Path::new(config_path.as_str())
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root_p)
        }
        None => (RcvConfig::default(), PathBuf::new()),
    };
    info!("config: {:?}", config);

    let rules = VoteRules {
        duel_tie_rule: config.rules.duel_tie_rule()?,
    };

    let candidates = collect_candidates(args, &config, &root_path)?;
    let sources = collect_sources(args, &config)?;

    let mut data: Vec<Ballot> = Vec::new();
    for cfs in sources.iter() {
        let mut file_data = read_ballots(&root_path, cfs)?;
        data.append(&mut file_data);
    }
    debug!("data: {:?}", data);

    let result = run_voting_stats(&data, &rules, &candidates).context(VotingSnafu {})?;
    info!("res {:?}", result);

    // Assemble the final json
    let result_js = build_summary_js(&config.output_settings, &result);
    let pretty_js_stats =
        serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;

    if let Some(out_path) = &args.out {
        write_summary(out_path, &pretty_js_stats)?;
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        check_summary(summary_p, &pretty_js_stats)?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = std::env::temp_dir().join(format!("condorcet_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(dir: &Path, name: &str, contents: &str) -> String {
        let p = dir.join(name);
        fs::write(&p, contents).unwrap();
        p.display().to_string()
    }

    #[test]
    fn text_ballots_from_command_line() {
        let dir = test_dir("text");
        let candidates = write(&dir, "candidates.txt", "A\nB\nC\n");
        let v1 = write(&dir, "vote1.txt", "B\nC\nA\n");
        let v2 = write(&dir, "vote2.txt", "C\nA\nB\n");
        let v3 = write(&dir, "vote3.txt", "C\nB\nA\n");
        // Not a full ranking
        let v4 = write(&dir, "vote4.txt", "C\nB\n");
        let args = Args {
            candidates: Some(candidates),
            // The extension is optional
            input: Some(vec![
                format!("{},{}", v1, v2.trim_end_matches(".txt")),
                format!("{},{}", v3, v4),
            ]),
            ..Default::default()
        };
        let res = run_election(&args).unwrap();
        assert_eq!(res.winner, "C");
        assert_eq!(res.ranking, vec!["C", "B", "A"]);
        assert_eq!(res.accepted_ballots, 3);
        assert_eq!(res.rejected_ballots, 1);
    }

    #[test]
    fn lines_ballots_from_config() {
        let dir = test_dir("lines");
        write(&dir, "ballots.csv", "X; Y\n\nY;X\n");
        let config = write(
            &dir,
            "config.json",
            r#"{
                "outputSettings": { "contestName": "Tie" },
                "candidates": [{ "name": "X" }, { "name": "Y" }],
                "ballotFileSources": [{ "provider": "lines", "filePath": "ballots.csv", "delimiter": ";" }],
                "rules": { "duelTieRule": "draw" }
            }"#,
        );
        let out = dir.join("summary.json").display().to_string();
        let args = Args {
            config: Some(config),
            out: Some(out.clone()),
            ..Default::default()
        };
        let res = run_election(&args).unwrap();
        assert_eq!(res.tiebreak, TiebreakSituation::BordaTiebreak);
        assert_eq!(res.winner, "X");

        let js = read_summary(&out).unwrap();
        assert_eq!(js["config"]["contest"], json!("Tie"));
        assert_eq!(js["results"]["winner"], json!("X"));
        assert_eq!(js["results"]["tiebreak"], json!("borda"));
        assert_eq!(js["results"]["ballots"]["accepted"], json!(2));
        assert_eq!(js["results"]["tally"][0]["bordaScore"], json!(3));
        assert_eq!(js["results"]["duels"][0]["scores"], json!([1, 1]));
        assert!(js["results"]["duels"][0].get("winner").is_none());
    }

    #[test]
    fn reference_summary() {
        let dir = test_dir("reference");
        write(&dir, "candidates.txt", "A\nB\n");
        write(&dir, "ballots.txt", "A,B\nA,B\nB,A\n");
        let config = write(
            &dir,
            "config.json",
            r#"{
                "candidatesFilePath": "candidates.txt",
                "ballotFileSources": [{ "provider": "lines", "filePath": "ballots.txt" }]
            }"#,
        );
        let reference = dir.join("reference.json").display().to_string();
        let args = Args {
            config: Some(config.clone()),
            out: Some(reference.clone()),
            ..Default::default()
        };
        assert_eq!(run_election(&args).unwrap().winner, "A");

        let args = Args {
            config: Some(config.clone()),
            reference: Some(reference.clone()),
            ..Default::default()
        };
        assert!(run_election(&args).is_ok());

        let altered = fs::read_to_string(&reference)
            .unwrap()
            .replace("\"accepted\": 3", "\"accepted\": 4");
        fs::write(&reference, altered).unwrap();
        assert!(matches!(
            run_election(&args),
            Err(RcvError::ReferenceMismatch {})
        ));
    }

    #[test]
    fn missing_inputs() {
        let dir = test_dir("missing");
        let candidates = write(&dir, "candidates.txt", "A\nB\n");
        let args = Args {
            candidates: Some(candidates.clone()),
            ..Default::default()
        };
        assert!(matches!(
            run_election(&args),
            Err(RcvError::MissingBallots {})
        ));

        let args = Args {
            input: Some(vec![candidates.clone()]),
            ..Default::default()
        };
        assert!(matches!(
            run_election(&args),
            Err(RcvError::MissingCandidates {})
        ));

        let args = Args {
            candidates: Some(candidates.clone()),
            input: Some(vec![candidates]),
            input_type: Some("xlsx".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            run_election(&args),
            Err(RcvError::UnknownProvider { .. })
        ));
    }

    #[test]
    fn empty_candidates_file() {
        let dir = test_dir("empty");
        let candidates = write(&dir, "candidates.txt", "\n");
        let ballot = write(&dir, "vote.txt", "A\n");
        let args = Args {
            candidates: Some(candidates),
            input: Some(vec![ballot]),
            ..Default::default()
        };
        assert!(matches!(
            run_election(&args),
            Err(RcvError::Voting {
                source: VotingErrors::EmptyElection
            })
        ));
    }
}
