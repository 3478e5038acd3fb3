use crate::rcv::*;
use snafu::ResultExt;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName", default)]
    pub contest_name: String,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    pub office: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// Only for the `lines` provider.
    pub delimiter: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RcvCandidate {
    pub name: String,
    pub code: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RcvRules {
    #[serde(rename = "duelTieRule")]
    pub _duel_tie_rule: Option<String>,
}

impl RcvRules {
    pub fn duel_tie_rule(&self) -> RcvResult<DuelTieRule> {
        match self._duel_tie_rule.as_deref() {
            None | Some("favorSecond") => Ok(DuelTieRule::FavorSecond),
            Some("draw") => Ok(DuelTieRule::Draw),
            Some(x) => whatever!("unknown duel tie rule: {}", x),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RcvConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    pub candidates: Option<Vec<RcvCandidate>>,
    #[serde(rename = "candidatesFilePath")]
    pub candidates_file_path: Option<String>,
    #[serde(rename = "ballotFileSources", default)]
    pub ballot_file_sources: Vec<FileSource>,
    #[serde(default)]
    pub rules: RcvRules,
}

pub fn read_config(path: &str) -> RcvResult<RcvConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: RcvConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> RcvResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let js = r#"{
            "outputSettings": { "contestName": "Board", "contestOffice": "Chair" },
            "candidates": [{ "name": "A" }, { "name": "B", "code": "b" }],
            "ballotFileSources": [{ "provider": "lines", "filePath": "b.csv", "delimiter": ";" }],
            "rules": { "duelTieRule": "draw" }
        }"#;
        let config: RcvConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.contest_name, "Board");
        assert_eq!(config.output_settings.contest_office, Some("Chair".to_string()));
        assert_eq!(config.candidates.unwrap().len(), 2);
        assert_eq!(config.ballot_file_sources[0].delimiter, Some(";".to_string()));
        assert_eq!(config.rules.duel_tie_rule().unwrap(), DuelTieRule::Draw);
    }

    #[test]
    fn parse_minimal_config() {
        let config: RcvConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RcvConfig::default());
        assert_eq!(config.rules.duel_tie_rule().unwrap(), DuelTieRule::FavorSecond);
    }

    #[test]
    fn unknown_tie_rule() {
        let rules = RcvRules {
            _duel_tie_rule: Some("coinFlip".to_string()),
        };
        assert!(rules.duel_tie_rule().is_err());
    }
}
