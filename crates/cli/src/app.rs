//! Command dispatch and output rendering for the `skillgap` binary.
//!
//! Reports go to stdout; logs go to stderr (filter with `RUST_LOG`).

use crate::cli::{Cli, Commands, PairArgs};
use anyhow::{Context, Result};
use clap::Parser;
use skillgap_engine::{
    load_config, EngineConfig, EngineError, Enricher, GapEntry, GapPlanReport, GapPlanService,
    InMemorySource, ProfileSource, Skill, SkillCategory,
};
use std::fmt::Write as _;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;

/// Exit status for requests rejected as malformed or referencing unknown data.
const EXIT_CALLER_ERROR: u8 = 2;
/// Exit status for requests that could not be completed because data is missing.
const EXIT_UPSTREAM_ERROR: u8 = 3;

/// The main entry point for the `skillgap` application.
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match execute(cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Map an error to the process exit status.
pub(crate) fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<EngineError>().map(EngineError::status_code) {
        Some(400) => EXIT_CALLER_ERROR,
        Some(424) => EXIT_UPSTREAM_ERROR,
        _ => 1,
    }
}

/// Run a parsed command and return what should be printed.
pub(crate) fn execute(cli: Cli) -> Result<String> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Plan {
            pair,
            max_items,
            enrich,
            json,
        } => {
            let service = open(&pair, config)?;
            let report = if enrich {
                plan_enriched(&service, &pair, max_items)?
            } else {
                service.gap_and_plan(&pair.employee, &pair.role, max_items)?
            };
            if json {
                to_json(&report)
            } else {
                Ok(render_report(&report))
            }
        }
        Commands::Gaps { pair, json } => {
            let service = open(&pair, config)?;
            let gaps = service.gaps(&pair.employee, &pair.role)?;
            if json {
                to_json(&gaps)
            } else {
                Ok(render_gaps(&gaps))
            }
        }
        Commands::Catalog {
            data,
            category,
            json,
        } => {
            let source = InMemorySource::from_path(&data)?;
            let catalog = source.skill_catalog()?;
            let skills: Vec<&Skill> = match category {
                Some(c) => catalog.by_category(c).collect(),
                None => catalog.iter().collect(),
            };
            if json {
                to_json(&skills)
            } else {
                Ok(render_catalog(&skills, category))
            }
        }
    }
}

fn open(pair: &PairArgs, config: EngineConfig) -> Result<GapPlanService<InMemorySource>> {
    let source = InMemorySource::from_path(&pair.data)?;
    Ok(GapPlanService::with_config(source, config))
}

fn plan_enriched(
    service: &GapPlanService<InMemorySource>,
    pair: &PairArgs,
    max_items: Option<usize>,
) -> Result<GapPlanReport> {
    let enrich = &service.config().enrich;
    let Some(client) = enrich.client() else {
        warn!(
            target: "skillgap::cli",
            "--enrich given but no narrative endpoint is configured; returning the plain plan"
        );
        return Ok(service.gap_and_plan(&pair.employee, &pair.role, max_items)?);
    };
    let enricher = Enricher::new(Arc::new(client)).with_timeout(enrich.timeout());

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let report = rt.block_on(service.gap_and_plan_enriched(
        &pair.employee,
        &pair.role,
        max_items,
        &enricher,
    ))?;
    Ok(report)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

fn gap_line(out: &mut String, gap: &GapEntry) {
    let _ = writeln!(
        out,
        "  {:<12} {} ({}) -> {} ({})  delta {:+}  weight {:.1}",
        gap.skill_id.as_str(),
        gap.current_level.ordinal(),
        gap.current_level.label(),
        gap.required_level.ordinal(),
        gap.required_level.label(),
        gap.delta,
        gap.weight,
    );
}

pub(crate) fn render_gaps(gaps: &[GapEntry]) -> String {
    if gaps.is_empty() {
        return "No requirements for this role\n".to_string();
    }
    let mut out = String::new();
    for gap in gaps {
        gap_line(&mut out, gap);
    }
    out
}

pub(crate) fn render_report(report: &GapPlanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} -> {}", report.employee_id, report.role_id);
    let _ = writeln!(
        out,
        "Fitness {:.1}%, workforce risk {} ({:.1}/100)",
        report.fitness_percent, report.risk_summary.label, report.risk_summary.score
    );

    out.push_str("\nGaps:\n");
    out.push_str(&render_gaps(&report.gaps));

    let _ = writeln!(out, "\nPlan: {}", report.plan_summary);
    for item in &report.plan {
        let _ = writeln!(
            out,
            "  {}. {:<12} [{}] {}",
            item.priority,
            item.skill_id.as_str(),
            item.suggested_action,
            item.summary
        );
        if let Some(narrative) = &item.narrative {
            let _ = writeln!(out, "     {narrative}");
        }
    }

    if let Some(warning) = &report.enrichment_warning {
        let _ = writeln!(out, "\nNarrative unavailable: {warning}");
    }
    out
}

pub(crate) fn render_catalog(skills: &[&Skill], category: Option<SkillCategory>) -> String {
    if skills.is_empty() {
        return match category {
            Some(c) => format!("No skills in category {c}\n"),
            None => "Catalog is empty\n".to_string(),
        };
    }
    let mut out = String::new();
    for skill in skills {
        let _ = writeln!(
            out,
            "{:<12} {:<14} {}",
            skill.id.as_str(),
            skill.category.label(),
            skill.name
        );
    }
    out
}
