mod loader;
mod models;
mod query;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use models::Job;
use query::{Criteria, FilterChoices, SortKey, SortOrder};

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Browse exported job listings - filter, sort, and search offline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List jobs matching the given filters
    List {
        /// Path to the JSON export
        file: PathBuf,

        /// Only jobs with exactly this level
        #[arg(short, long)]
        level: Option<String>,

        /// Only jobs with exactly this type
        #[arg(short = 't', long = "type")]
        job_type: Option<String>,

        /// Only jobs with exactly this skill
        #[arg(short, long)]
        skill: Option<String>,

        /// Case-insensitive match against title or detail
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Sort key (none, title, posted)
        #[arg(long, default_value = "none")]
        sort: String,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,
    },

    /// Show full details for one job
    Show {
        /// Path to the JSON export
        file: PathBuf,

        /// Job number
        job_no: String,
    },

    /// Show the filter values present in the data
    Filters {
        /// Path to the JSON export
        file: PathBuf,
    },

    /// Browse jobs interactively
    Browse {
        /// Path to the JSON export
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            file,
            level,
            job_type,
            skill,
            search,
            sort,
            desc,
        } => {
            let jobs = loader::read_jobs(&file)?;
            let criteria = Criteria {
                level,
                job_type,
                skill,
                search: search.unwrap_or_default(),
                sort: SortKey::parse(&sort)?,
                order: if desc {
                    SortOrder::Descending
                } else {
                    SortOrder::Ascending
                },
            };
            print_job_list(&criteria.apply(&jobs));
        }

        Commands::Show { file, job_no } => {
            let jobs = loader::read_jobs(&file)?;
            match jobs.iter().find(|job| job.job_no == job_no) {
                Some(job) => print_job(job),
                None => println!("Job {} not found.", job_no),
            }
        }

        Commands::Filters { file } => {
            let jobs = loader::read_jobs(&file)?;
            let choices = FilterChoices::derive(&jobs);
            println!("Levels: {}", choices.levels.join(", "));
            println!("Types:  {}", choices.types.join(", "));
            println!("Skills: {}", choices.skills.join(", "));
        }

        Commands::Browse { file } => {
            tui::run_browse(&file)?;
        }
    }

    Ok(())
}

fn print_job_list(jobs: &[Job]) {
    if jobs.is_empty() {
        println!("No jobs found.");
        return;
    }

    println!(
        "{:<8} {:<36} {:<12} {:<10} {:<14} {:<12}",
        "JOB NO", "TITLE", "TYPE", "LEVEL", "SKILL", "POSTED"
    );
    println!("{}", "-".repeat(96));
    for job in jobs {
        println!(
            "{:<8} {:<36} {:<12} {:<10} {:<14} {:<12}",
            truncate(&job.job_no, 8),
            truncate(&job.title, 34),
            truncate(&job.job_type, 10),
            truncate(&job.level, 8),
            truncate(&job.skill, 12),
            job.posted
        );
    }
}

fn print_job(job: &Job) {
    println!("Job {}", job.job_no);
    println!("Title: {}", job.title);
    println!("Posted: {}", job.posted);
    println!("Type: {}", job.job_type);
    println!("Level: {}", job.level);
    println!("Estimated Time: {}", job.estimated_time);
    println!("Skill: {}", job.skill);
    println!("Link: {}", job.link);
    println!("\n{}", textwrap::fill(&job.detail, 78));
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
