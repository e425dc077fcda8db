use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

use qiitaz::app::{self, Failure, Mode};
use qiitaz::config;

#[derive(Parser)]
#[command(
    name = "qiitaz",
    about = "Search Qiita articles with a fuzzy finder and read them in your terminal",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("QIITAZ_BUILD_INFO"), ")")
)]
struct Cli {
    /// Search query (multiple words are joined with spaces)
    #[arg(required = true)]
    query: Vec<String>,

    /// Sort key: rel, like, stock or created (default: rel)
    #[arg(short, long)]
    sort: Option<String>,

    /// Open the chosen URLs in your web browser
    #[arg(short, long)]
    open: bool,

    /// Read the chosen article in the terminal
    #[arg(short, long, conflicts_with = "json")]
    preview: bool,

    /// Number of search result pages to fetch (default: 1)
    #[arg(short = 'n', long = "pageno")]
    pageno: Option<u32>,

    /// Print results as JSON instead of opening the finder
    #[arg(short, long)]
    json: bool,

    /// Log output file path (enables logging when specified)
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => Failure::Args as i32,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Some(log_path) = &cli.log {
        let file = match std::fs::File::create(log_path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error: failed to open log file {}: {e}", log_path.display());
                std::process::exit(Failure::Args as i32);
            }
        };
        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    } else if cli.json {
        env_logger::init();
    }
    // finder / pager modes + no --log → logger not initialized (no log output)

    // Load config file and merge CLI overrides
    let mut cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(Failure::Args as i32);
        }
    };
    cfg.merge_cli(cli.sort, cli.pageno);
    let config = match cfg.resolve() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(Failure::Args as i32);
        }
    };

    let mode = if cli.json {
        Mode::Json
    } else if cli.preview {
        Mode::Preview
    } else {
        Mode::Select { open: cli.open }
    };

    if let Err(e) = app::run(&cli.query.join(" "), mode, &config) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_short_flags() {
        let cli = Cli::try_parse_from(["qiitaz", "-s", "like", "-n", "3", "-o", "rust", "async"])
            .unwrap();
        assert_eq!(cli.query, vec!["rust", "async"]);
        assert_eq!(cli.sort.as_deref(), Some("like"));
        assert_eq!(cli.pageno, Some(3));
        assert!(cli.open);
        assert!(!cli.preview && !cli.json);
    }

    #[test]
    fn query_is_required() {
        let err = Cli::try_parse_from(["qiitaz", "-j"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn preview_and_json_conflict() {
        let err = Cli::try_parse_from(["qiitaz", "-p", "-j", "rust"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn negative_page_is_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["qiitaz", "-n", "-1", "rust"]).is_err());
    }
}
