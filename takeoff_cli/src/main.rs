//! # Takeoff CLI
//!
//! Loads a project file, runs one calculation pass, prints the result and
//! optionally exports it.
//!
//! ```text
//! takeoff calculate job.json --pdf job.pdf --csv job.csv
//! takeoff calculate job.json --best-effort --json
//! takeoff sample job.json
//! ```
//!
//! The process exits non-zero when the result carries item errors or an
//! export is refused.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use takeoff_core::catalog::PanelType;
use takeoff_core::errors::{CalcError, CalcResult};
use takeoff_core::estimate::{CalculationResult, ErrorPolicy};
use takeoff_core::export::render_csv;
use takeoff_core::file_io::{load_project, save_project, write_atomic};
use takeoff_core::items::{CeilingInput, WallInput};
use takeoff_core::pdf::render_takeoff_pdf;
use takeoff_core::project::Project;
use takeoff_core::report::render_text;

/// Drywall material takeoff
#[derive(Parser, Debug)]
#[command(name = "takeoff")]
#[command(about = "Estimate drywall materials for walls and ceilings")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate the takeoff for a project file
    Calculate {
        /// Project file (JSON)
        project: PathBuf,

        /// Estimate valid items even when others are invalid
        #[arg(long)]
        best_effort: bool,

        /// Print the result as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Write a PDF report
        #[arg(long, value_name = "OUT")]
        pdf: Option<PathBuf>,

        /// Write a CSV spreadsheet
        #[arg(long, value_name = "OUT")]
        csv: Option<PathBuf>,
    },

    /// Write a sample project file to start from
    Sample {
        /// Where to write the project
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let outcome = match args.command {
        Command::Calculate {
            project,
            best_effort,
            json,
            pdf,
            csv,
        } => {
            let policy = if best_effort {
                ErrorPolicy::BestEffort
            } else {
                ErrorPolicy::Strict
            };
            run_calculate(&project, policy, json, pdf, csv)
        }
        Command::Sample { out } => run_sample(&out),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the takeoff carries item errors.
fn run_calculate(
    path: &Path,
    policy: ErrorPolicy,
    json: bool,
    pdf: Option<PathBuf>,
    csv: Option<PathBuf>,
) -> CalcResult<bool> {
    let project = load_project(path)?;
    let result = project.calculate_with(policy)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_text(&result));
    }

    if let Some(out) = pdf {
        export(&out, || render_takeoff_pdf(&project.meta, &result))?;
    }
    if let Some(out) = csv {
        export(&out, || render_csv(&result).map(String::into_bytes))?;
    }

    Ok(is_clean(&result))
}

fn export(out: &Path, render: impl FnOnce() -> CalcResult<Vec<u8>>) -> CalcResult<()> {
    let bytes = render()?;
    write_atomic(out, &bytes)?;
    eprintln!("Wrote {}", out.display());
    Ok(())
}

fn is_clean(result: &CalculationResult) -> bool {
    !result.has_errors()
}

fn run_sample(out: &Path) -> CalcResult<bool> {
    if out.exists() {
        return Err(CalcError::file_error(
            "write sample",
            out.display().to_string(),
            "file already exists",
        ));
    }
    save_project(&sample_project(), out)?;
    eprintln!("Wrote sample project to {}", out.display());
    Ok(true)
}

fn sample_project() -> Project {
    let mut project = Project::new("Estimator", "25-001", "Sample Client");
    project.add_item(
        WallInput::new(PanelType::Normal)
            .with_label("Corridor")
            .with_segment(3.0, 2.4)
            .with_segment(1.2, 0.9)
            .with_second_face(PanelType::MoistureResistant)
            .into(),
    );
    project.add_item(
        WallInput::new(PanelType::Exterior)
            .with_label("Facade")
            .with_segment(6.0, 2.7)
            .with_double_structure()
            .into(),
    );
    project.add_item(
        CeilingInput::new(PanelType::Normal)
            .with_label("Lobby")
            .with_segment(4.0, 5.0)
            .with_segment(1.0, 1.2)
            .with_plenum(0.6)
            .into(),
    );
    project
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "takeoff",
            "calculate",
            "job.json",
            "--best-effort",
            "--csv",
            "out.csv",
        ])
        .unwrap();
        match args.command {
            Command::Calculate {
                project,
                best_effort,
                json,
                pdf,
                csv,
            } => {
                assert_eq!(project, PathBuf::from("job.json"));
                assert!(best_effort);
                assert!(!json);
                assert!(pdf.is_none());
                assert_eq!(csv, Some(PathBuf::from("out.csv")));
            }
            Command::Sample { .. } => panic!("expected calculate"),
        }
    }

    #[test]
    fn test_sample_project_calculates_cleanly() {
        let result = sample_project().calculate().unwrap();
        assert!(is_clean(&result));
        assert_eq!(result.item_summaries.len(), 3);
    }
}
