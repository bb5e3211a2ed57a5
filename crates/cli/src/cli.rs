use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tickprof")]
#[command(version)]
#[command(about = "Render a tick profiler snapshot as a nested timing report", long_about = None)]
pub struct Cli {
    /// Snapshot JSON captured by the host profiler
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Report config JSON (build mode, tick rate, depth limit, separator)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Save the report here instead of printing it
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Label the report as a dev build
    #[arg(long)]
    pub dev: bool,

    /// Expected ticks per second
    #[arg(long, value_name = "N")]
    pub tick_rate: Option<u32>,

    /// Path segment separator used in snapshot keys
    #[arg(long, value_name = "CHAR")]
    pub separator: Option<char>,

    /// Print only the timing tree below root
    #[arg(long)]
    pub root_only: bool,

    /// Use a fixed banner comment
    #[arg(long, value_name = "TEXT")]
    pub comment: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "tickprof",
            "snap.json",
            "--dev",
            "--tick-rate",
            "30",
            "--separator",
            ".",
            "-o",
            "out/report.txt",
        ])
        .unwrap();
        assert!(cli.dev);
        assert_eq!(cli.tick_rate, Some(30));
        assert_eq!(cli.separator, Some('.'));
        assert_eq!(cli.output, Some(PathBuf::from("out/report.txt")));
        assert!(!cli.root_only);
    }
}
