use clap::Parser;

/// This is a Condorcet election tabulation program (Black's method).
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the election description in JSON.
    /// For more information about the file format, read the documentation of the manual.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) The list of candidates, one per line. Setting this option overrides
    /// the candidates that may be specified with the --config option.
    #[clap(long, value_parser)]
    pub candidates: Option<String>,

    /// (file path) A reference file containing the outcome of an election in JSON format. If provided,
    /// the tabulated output is checked against the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file paths, may be repeated) The ballot files. Several files may be separated by commas, and
    /// '.txt' is added to the names without extension. Setting this option overrides the ballot
    /// sources that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<Vec<String>>,

    /// (default text) The type of the input: 'text' (one ballot per file, one candidate per line)
    /// or 'lines' (one ballot per line).
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default ',') The separator between candidates for the 'lines' input type.
    #[clap(long, value_parser)]
    pub delimiter: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
