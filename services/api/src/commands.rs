use crate::infra::{parse_date, InMemoryEmployeeRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::collections::HashSet;
use std::path::PathBuf;
use talentark::analytics;
use talentark::directory::EmployeeRepository;
use talentark::error::AppError;
use talentark::roster::{self, ImportRun};

#[derive(Args, Debug, Default)]
pub(crate) struct AnalyticsExportArgs {
    /// Snapshot evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Output path. Defaults to talentark-analytics-<date>.json in the
    /// current directory.
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

pub(crate) fn run_analytics_export(args: AnalyticsExportArgs) -> Result<(), AppError> {
    let repository = InMemoryEmployeeRepository::seeded();
    let employees = repository.list_all()?;

    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let snapshot = analytics::snapshot(&employees, as_of);

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(analytics::export_file_name(as_of)));
    let payload = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(&out, payload)?;

    println!("Analytics snapshot as of {as_of}");
    println!("  employees:        {}", snapshot.total_employees);
    println!("  avg employee:     {}", snapshot.average_employee_score);
    println!("  avg company:      {:.1}", snapshot.average_company_score);
    println!("  recent hires:     {}", snapshot.recent_hires);
    println!("written to {}", out.display());
    Ok(())
}

#[derive(Args, Debug)]
pub(crate) struct RosterImportArgs {
    /// Roster sheet to import (CSV with a header row)
    pub(crate) file: PathBuf,
    /// Partition and report only; write nothing
    #[arg(long)]
    pub(crate) dry_run: bool,
}

pub(crate) fn run_roster_import(args: RosterImportArgs) -> Result<(), AppError> {
    let repository = InMemoryEmployeeRepository::seeded();
    let existing: HashSet<String> = repository
        .list_all()?
        .into_iter()
        .map(|record| record.email)
        .collect();

    let mut run = ImportRun::new();
    let outcome = run.preview_path(&args.file, &existing)?;
    println!(
        "Previewed {}: {} accepted, {} duplicates, {} errors",
        args.file.display(),
        outcome.accepted.len(),
        outcome.duplicates.len(),
        outcome.errors.len()
    );

    if args.dry_run {
        for warning in &outcome.duplicates {
            println!("  row {}: {}", warning.row, warning.warning);
        }
        for error in &outcome.errors {
            println!("  row {}: {}", error.row, error.error);
        }
        return Ok(());
    }

    let report = run.commit(&repository, &mut |processed, total| {
        println!("  importing {processed}/{total}");
    })?;

    println!(
        "Import complete: {} inserted, {} warnings, {} errors",
        report.success,
        report.warnings.len(),
        report.errors.len()
    );
    for warning in &report.warnings {
        println!("  row {}: {}", warning.row, warning.warning);
    }
    for error in &report.errors {
        println!("  row {}: {}", error.row, error.error);
    }
    Ok(())
}

#[derive(Args, Debug)]
pub(crate) struct RosterTemplateArgs {
    /// Where to write the template
    #[arg(long, default_value = "roster-template.csv")]
    pub(crate) out: PathBuf,
}

pub(crate) fn run_roster_template(args: RosterTemplateArgs) -> Result<(), AppError> {
    std::fs::write(&args.out, roster::template())?;
    println!("roster template written to {}", args.out.display());
    Ok(())
}
