mod args;
mod rcv;

use clap::Parser;
use log::{info, warn};
use snafu::ErrorCompat;

fn main() {
    let args = args::Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
    info!("args {:?}", args);

    match rcv::run_election(&args) {
        Ok(result) => {
            for cs in result.candidate_stats.iter() {
                println!("Candidate {}: {}", cs.name, cs.duel_wins);
            }
            println!("The winner of the vote is: {}", result.winner);
        }
        Err(e) => {
            warn!("Error occured {:?}", e);
            eprintln!("An error occured: {}", e);
            if let Some(bt) = ErrorCompat::backtrace(&e) {
                eprintln!("trace: {}", bt);
            }
            std::process::exit(1);
        }
    }
}
