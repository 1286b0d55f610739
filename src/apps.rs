use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};

use crate::classify::Classifier;
use crate::config::ClassifierConfig;
use crate::errors::ReportError;
use crate::recirculation::{analyze_recirculation, describe_recirculation};
use crate::render::render_text;
use crate::report::Report;
use crate::summary::{ClassificationSummary, describe};

#[derive(Debug, Parser)]
#[command(
    name = "classify_report",
    disable_help_subcommand = true,
    about = "Highlight likely mixed-pallet rows in a blind-receiver report",
    long_about = "Classify the rows of a blind-receiver report (.rpt or .txt) into High/Medium/Low priority tiers around the first short-received quantity line, and flag rows at inaccessible locations.",
    after_help = "Set RUST_LOG=blind_receiver=debug to trace section, event, and neighbor decisions."
)]
struct ClassifyReportCli {
    #[arg(value_name = "REPORT", help = "Path to the exported report")]
    report: PathBuf,
    #[arg(long, help = "Print the classification as JSON")]
    json: bool,
    #[arg(
        long,
        help = "Print the report with tier markers instead of the summary"
    )]
    render: bool,
    #[arg(
        long,
        conflicts_with = "render",
        help = "Analyze pallet recirculation (Pallet Moved To rows) instead of classifying"
    )]
    recirculation: bool,
    #[arg(
        long,
        value_name = "PATH",
        requires = "render",
        help = "Write rendered output to PATH instead of stdout"
    )]
    output: Option<PathBuf>,
    #[arg(
        long = "full-pallet-multiple",
        value_name = "CASES",
        help = "Case multiple that makes a full pallet (default 6)"
    )]
    full_pallet_multiple: Option<u32>,
    #[arg(
        long = "restricted-marker",
        value_name = "CHAR",
        help = "Marker that makes a time-bearing row count as timestamped (default '!')"
    )]
    restricted_marker: Option<char>,
}

/// Run the `classify_report` command with arguments excluding the program name.
pub fn run_classify_report<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) = parse_cli::<ClassifyReportCli, _>(
        std::iter::once("classify_report".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let mut config = ClassifierConfig::default();
    if let Some(multiple) = cli.full_pallet_multiple {
        config = config.with_full_pallet_multiple(multiple);
    }
    if let Some(marker) = cli.restricted_marker {
        config = config.with_restricted_marker(marker);
    }
    let classifier = Classifier::new(config)?;

    let report = Report::load(&cli.report)?;
    if cli.recirculation {
        let analysis = analyze_recirculation(&report.lines);
        if cli.json {
            let payload = serde_json::to_string_pretty(&analysis)
                .map_err(|err| ReportError::Serialization(err.to_string()))?;
            println!("{payload}");
        } else {
            for message in describe_recirculation(&analysis) {
                println!("{message}");
            }
        }
        return Ok(());
    }

    let classification = classifier.classify_report(&report);

    if cli.json {
        let payload = serde_json::to_string_pretty(&classification)
            .map_err(|err| ReportError::Serialization(err.to_string()))?;
        println!("{payload}");
    } else if cli.render {
        let rendered = render_text(&report, &classification, classifier.config());
        match cli.output {
            Some(path) => {
                fs::write(&path, rendered).map_err(ReportError::from)?;
                println!("Highlighted rows written to {}", path.display());
            }
            None => print!("{rendered}"),
        }
    } else {
        let summary = ClassificationSummary::from_classification(&classification);
        if let Some(modified_at) = report.modified_at {
            println!(
                "Report last modified {}",
                modified_at.format("%Y-%m-%d %H:%M UTC")
            );
        }
        println!(
            "{} lines, {} highlighted ({} high / {} medium / {} low), {} crossed",
            report.len(),
            summary.highlighted(),
            summary.high,
            summary.medium,
            summary.low,
            summary.crossed
        );
        for message in describe(&report, &classification) {
            println!("{message}");
        }
    }
    Ok(())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const REPORT: &str = "\
123400  WidgetZ  070124  30 36 6
123401  FE3VEZZ1  02/01  9:10  35  D4
123410  WidgetA  070124  50 48 2
123411  FE3VER9U  02/01  10:05  48  DOCK
";

    fn args(values: &[&str]) -> std::vec::IntoIter<String> {
        values
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn help_exits_cleanly() {
        assert!(run_classify_report(args(&["--help"])).is_ok());
    }

    #[test]
    fn missing_report_is_an_error() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("missing.rpt");
        let result = run_classify_report(args(&[missing.to_str().unwrap()]));
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<ReportError>().is_some());
    }

    #[test]
    fn render_writes_output_file() {
        let temp = tempdir().unwrap();
        let report = temp.path().join("BF1.rpt");
        let output = temp.path().join("BF1_highlighted.txt");
        fs::write(&report, REPORT).unwrap();

        run_classify_report(args(&[
            report.to_str().unwrap(),
            "--render",
            "--output",
            output.to_str().unwrap(),
        ]))
        .unwrap();

        let rendered = fs::read_to_string(&output).unwrap();
        assert_eq!(rendered.lines().count(), 4);
        assert!(rendered.lines().nth(1).unwrap().starts_with("HIGH~"));
    }

    #[test]
    fn rejects_invalid_pallet_multiple() {
        let temp = tempdir().unwrap();
        let report = temp.path().join("BF1.rpt");
        fs::write(&report, REPORT).unwrap();

        let result = run_classify_report(args(&[
            report.to_str().unwrap(),
            "--full-pallet-multiple",
            "0",
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn recirculation_mode_succeeds_and_rejects_render() {
        let temp = tempdir().unwrap();
        let report = temp.path().join("FORK_21.txt");
        fs::write(
            &report,
            "  DOCK1  OP17  Pallet Moved To  P0001  PRD1  Widget A  070124  48  02/01  08:05\n\
             \x20 DOCK2  OP11  Pallet Moved To  P0001  PRD1  Widget A  070124  48  02/01  09:05\n",
        )
        .unwrap();
        let path = report.to_str().unwrap();

        assert!(run_classify_report(args(&[path, "--recirculation"])).is_ok());
        assert!(run_classify_report(args(&[path, "--recirculation", "--json"])).is_ok());
        assert!(run_classify_report(args(&[path, "--recirculation", "--render"])).is_err());
    }

    #[test]
    fn json_and_summary_modes_succeed() {
        let temp = tempdir().unwrap();
        let report = temp.path().join("BF1.rpt");
        fs::write(&report, REPORT).unwrap();

        assert!(run_classify_report(args(&[report.to_str().unwrap(), "--json"])).is_ok());
        assert!(run_classify_report(args(&[report.to_str().unwrap()])).is_ok());
    }
}
