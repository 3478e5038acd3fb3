use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Splits a comma-separated list of files. A file without extension is a `.txt` file.
pub fn expand_file_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if Path::new(s).extension().is_none() {
                format!("{}.txt", s)
            } else {
                s.to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/tmp/votes/vote1.txt"), "vote1.txt");
        assert_eq!(
            expand_file_names("vote1,vote2.txt, data/vote3.csv"),
            vec!["vote1.txt", "vote2.txt", "data/vote3.csv"]
        );
        assert!(expand_file_names("").is_empty());
    }
}
