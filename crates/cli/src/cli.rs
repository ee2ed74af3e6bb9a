use clap::{Args, Parser, Subcommand};
use skillgap_engine::SkillCategory;
use std::path::PathBuf;

/// Command-line interface for the `skillgap` application.
#[derive(Debug, Parser)]
#[command(
    name = "skillgap",
    version,
    about = "Skill-gap analysis and workforce-risk learning plans"
)]
pub struct Cli {
    /// Engine configuration file (default: ~/.skillgap/config.toml).
    #[arg(long, global = true, value_name = "FILE", env = "SKILLGAP_CONFIG")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

/// Employee/role selection shared by `plan` and `gaps`.
#[derive(Debug, Args)]
pub struct PairArgs {
    /// JSON data file with skills, employees, roles and signals.
    #[arg(long, value_name = "FILE")]
    pub data: PathBuf,
    /// Employee id.
    #[arg(long)]
    pub employee: String,
    /// Target role id.
    #[arg(long)]
    pub role: String,
}

/// Available `skillgap` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Computes gaps, risk and a ranked learning plan for an employee and role.
    Plan {
        #[command(flatten)]
        pair: PairArgs,
        /// Keep only the N highest-priority plan items.
        #[arg(long, value_name = "N")]
        max_items: Option<usize>,
        /// Ask the configured narrative service to annotate plan items.
        #[arg(long, default_value_t = false)]
        enrich: bool,
        /// Print the full report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Lists per-skill gaps only, without scoring risk.
    Gaps {
        #[command(flatten)]
        pair: PairArgs,
        /// Print gaps as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Lists the skill catalog.
    Catalog {
        /// JSON data file with skills, employees, roles and signals.
        #[arg(long, value_name = "FILE")]
        data: PathBuf,
        /// Only list skills in this category.
        #[arg(long)]
        category: Option<SkillCategory>,
        /// Print skills as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}
