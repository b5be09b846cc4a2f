use crate::cli::args::{Cli, Commands, PathArgs};
use crate::config::AppConfig;
use crate::error::Result;
use crate::processors::BatchProcessor;
use tracing::info;
use validator::Validate;

/// Execute the parsed command line. Returns `false` when any file failed.
pub fn run(cli: Cli) -> Result<bool> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    let command = cli.command.unwrap_or(Commands::Clean {
        paths: PathArgs::default(),
        report: false,
    });

    match command {
        Commands::Clean { paths, report } => {
            apply_paths(&mut config, paths);
            config.validate()?;
            clean(&config, cli.quiet, report)
        }

        Commands::Analyze {
            paths,
            pollutant,
            top_n,
        } => {
            apply_paths(&mut config, paths);
            apply_analysis(&mut config, pollutant, top_n);
            config.validate()?;
            analyze(&config, cli.quiet)
        }

        Commands::Run {
            paths,
            pollutant,
            top_n,
            report,
        } => {
            apply_paths(&mut config, paths);
            apply_analysis(&mut config, pollutant, top_n);
            config.validate()?;
            let cleaned = clean(&config, cli.quiet, report)?;
            let analyzed = analyze(&config, cli.quiet)?;
            Ok(cleaned && analyzed)
        }
    }
}

fn clean(config: &AppConfig, quiet: bool, write_report: bool) -> Result<bool> {
    info!(
        raw_dir = %config.paths.raw_dir.display(),
        processed_dir = %config.paths.processed_dir.display(),
        files = config.paths.files.len(),
        "Cleaning datasets"
    );

    let processor = BatchProcessor::new(config.clone()).with_silent(quiet);
    let report = processor.clean_all();

    println!("\n{}", report.generate_summary());

    if write_report {
        let path = processor.write_report(&report)?;
        info!(path = %path.display(), "Wrote batch report");
    }

    Ok(report.is_success())
}

fn analyze(config: &AppConfig, quiet: bool) -> Result<bool> {
    info!(
        processed_dir = %config.paths.processed_dir.display(),
        output_dir = %config.paths.output_dir.display(),
        pollutant = %config.analysis.trend_pollutant,
        "Analyzing cleaned datasets"
    );

    let processor = BatchProcessor::new(config.clone()).with_silent(quiet);
    let batch = processor.analyze_all();

    println!("\n{}", batch.generate_summary());

    Ok(batch.is_success())
}

fn apply_paths(config: &mut AppConfig, paths: PathArgs) {
    if let Some(dir) = paths.raw_dir {
        config.paths.raw_dir = dir;
    }
    if let Some(dir) = paths.processed_dir {
        config.paths.processed_dir = dir;
    }
    if let Some(dir) = paths.output_dir {
        config.paths.output_dir = dir;
    }
    if !paths.files.is_empty() {
        config.paths.files = paths.files;
    }
}

fn apply_analysis(config: &mut AppConfig, pollutant: Option<String>, top_n: Option<usize>) {
    if let Some(pollutant) = pollutant {
        config.analysis.trend_pollutant = pollutant;
    }
    if let Some(top_n) = top_n {
        config.analysis.top_n = top_n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["aqi-processor"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_path_overrides() {
        let cli = Cli::try_parse_from([
            "aqi-processor",
            "clean",
            "--raw-dir",
            "/in",
            "--file",
            "a.csv",
            "--file",
            "b.csv",
        ])
        .unwrap();

        let Some(Commands::Clean { paths, report }) = cli.command else {
            panic!("expected clean command");
        };
        assert!(!report);

        let mut config = AppConfig::default();
        apply_paths(&mut config, paths);

        assert_eq!(config.paths.raw_dir, PathBuf::from("/in"));
        assert_eq!(config.paths.processed_dir, PathBuf::from("data/processed"));
        assert_eq!(config.paths.files, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_report_is_opt_in() {
        let cli = Cli::try_parse_from(["aqi-processor", "clean", "--report"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Clean { report: true, .. })));

        let cli = Cli::try_parse_from(["aqi-processor", "run"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Run { report: false, .. })));

        assert!(Cli::try_parse_from(["aqi-processor", "clean", "--no-report"]).is_err());
    }

    #[test]
    fn test_clean_writes_report_only_when_asked() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let mut config = AppConfig::default();
        config.paths.raw_dir = temp_dir.path().join("raw");
        config.paths.processed_dir = temp_dir.path().join("processed");
        config.paths.files = vec!["stations.csv".to_string()];
        std::fs::create_dir_all(&config.paths.raw_dir)?;
        std::fs::write(
            config.paths.raw_dir.join("stations.csv"),
            "StationId,City\nST1,Delhi\n",
        )?;
        let report_path = config.paths.processed_dir.join("cleaning_report.json");

        assert!(clean(&config, true, false)?);
        assert!(!report_path.exists());

        assert!(clean(&config, true, true)?);
        assert!(report_path.exists());
        Ok(())
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["aqi-processor", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_analysis_overrides() {
        let mut config = AppConfig::default();
        apply_analysis(&mut config, Some("NO2".to_string()), Some(3));

        assert_eq!(config.analysis.trend_pollutant, "NO2");
        assert_eq!(config.analysis.top_n, 3);
    }
}
