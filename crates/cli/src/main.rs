use anyhow::Context;
use clap::{Parser, Subcommand};
use igw_core::{
    classify_priority, config::check_job_name_max_len, constants::DEFAULT_JOB_NAME_MAX_LEN,
    job_name::job_name, validate, DnsLabelSanitizer, InferenceRequest,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "igw")]
#[command(about = "Inference gateway request tooling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an inference request JSON file
    Validate {
        /// Path to the request JSON
        file: PathBuf,
    },
    /// Classify a raw priority (0-255)
    Priority {
        /// Raw priority value
        value: u8,
    },
    /// Derive the job name of a request JSON file at the current UTC time
    JobName {
        /// Path to the request JSON
        file: PathBuf,
        /// Maximum job-name length (1-253)
        #[arg(long, default_value_t = DEFAULT_JOB_NAME_MAX_LEN, value_parser = parse_max_len)]
        max_len: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate { file }) => {
            let mut request = read_request(&file)?;
            let report = validate(&mut request);
            if report.is_valid() {
                println!(
                    "Valid: transaction {} (priority {:?})",
                    request.transaction_id,
                    request.priority_class()
                );
            } else {
                for error in report.errors() {
                    eprintln!("- {error}");
                }
                anyhow::bail!(
                    "{} validation error(s) in {}",
                    report.errors().len(),
                    file.display()
                );
            }
        }
        Some(Commands::Priority { value }) => {
            println!("{:?}", classify_priority(value));
        }
        Some(Commands::JobName { file, max_len }) => {
            let request = read_request(&file)?;
            let name = job_name(&request, chrono::Utc::now(), &DnsLabelSanitizer::new(max_len))?;
            println!("{name}");
        }
        None => {
            println!("Use 'igw --help' for commands");
        }
    }

    Ok(())
}

fn read_request(file: &Path) -> anyhow::Result<InferenceRequest> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    Ok(InferenceRequest::from_submission_json(&text)?)
}

fn parse_max_len(value: &str) -> Result<usize, String> {
    let max_len = value.trim().parse::<usize>().map_err(|e| e.to_string())?;
    check_job_name_max_len(max_len).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_job_name(max_len: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(["igw", "job-name", "request.json", "--max-len", max_len])
    }

    #[test]
    fn max_len_outside_the_configurable_range_is_rejected() {
        assert!(parse_job_name("0").is_err());
        assert!(parse_job_name("254").is_err());
        assert!(parse_job_name("ten").is_err());
    }

    #[test]
    fn max_len_defaults_to_a_dns_label() {
        let cli = Cli::try_parse_from(["igw", "job-name", "request.json"]).expect("parse");
        match cli.command {
            Some(Commands::JobName { max_len, .. }) => {
                assert_eq!(max_len, DEFAULT_JOB_NAME_MAX_LEN)
            }
            _ => panic!("expected job-name command"),
        }
        let cli = parse_job_name("40").expect("parse");
        assert!(matches!(cli.command, Some(Commands::JobName { max_len: 40, .. })));
    }
}
