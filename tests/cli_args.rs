use clap::Parser;
use kira_biotriage::cli::{Cli, Commands};

#[test]
fn search_defaults() {
    let cli = Cli::parse_from([
        "kira-biotriage",
        "search",
        "--input",
        "records.tsv",
        "--out",
        "out",
    ]);
    match cli.command {
        Commands::Search(args) => {
            assert!((args.min_sensitivity - 0.95).abs() < 1e-12);
            assert_eq!(args.top, 10);
            assert_eq!(args.threads, 0);
            assert!(args.grid.is_none());
            assert!(!args.json);
        }
        _ => panic!("expected search command"),
    }
}

#[test]
fn run_flags() {
    let cli = Cli::parse_from([
        "kira-biotriage",
        "run",
        "--input",
        "records.tsv",
        "--out",
        "out",
        "--json",
        "--threads",
        "4",
    ]);
    match cli.command {
        Commands::Run(args) => {
            assert!(args.json);
            assert!(!args.tsv);
            assert_eq!(args.threads, 4);
        }
        _ => panic!("expected run command"),
    }
}

#[test]
fn run_requires_out() {
    assert!(Cli::try_parse_from(["kira-biotriage", "run", "--input", "x"]).is_err());
}
