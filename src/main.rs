use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::path::PathBuf;

use grade_calc::grading::{self, Mark, Policy};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_USAGE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a module, or show what the final assessment needs when its mark is missing (default)
    Check {
        /// Assessment mark as ID=VALUE (repeatable); leave the final one out to solve for it
        #[arg(short, long = "score", value_parser = parse_score)]
        scores: Vec<(String, String)>,
    },
    /// Required mark on one assessment for a target grade
    Required {
        #[arg(short, long = "score", value_parser = parse_score)]
        scores: Vec<(String, String)>,

        /// Target module grade (defaults to the policy's pass mark)
        #[arg(short, long)]
        target: Option<f64>,

        /// Assessment to solve for (defaults to the policy's summative assessment)
        #[arg(short, long)]
        unknown: Option<String>,
    },
    /// List available policies
    Policies,
    /// Write a config file containing the built-in policies
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "grade-calc")]
#[command(about = "Module result and required-mark calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/grade-calc/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Policy id (defaults to the config's default_policy)
    #[arg(short, long, global = true)]
    policy: Option<String>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_score(s: &str) -> Result<(String, String), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{}'", s))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing assessment id in '{}'", s));
    }
    Ok((id.to_string(), value.trim().to_string()))
}

/// Check `--score` pairs against the policy and collect them by id.
///
/// Every mark must be a number between 0 and the assessment's maximum.
/// Only `open` (the assessment being solved for) may be left without a mark.
fn collect_scores(
    policy: &Policy,
    scores: Vec<(String, String)>,
    open: &str,
) -> Result<HashMap<String, String>, String> {
    let mut map = HashMap::new();
    for (id, value) in scores {
        let Some(assessment) = policy.assessment(&id) else {
            let known = policy
                .assessments
                .iter()
                .map(|a| a.id.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(format!(
                "Unknown assessment '{}' for policy {} (expected one of: {})",
                id, policy.id, known
            ));
        };
        if map.contains_key(&id) {
            return Err(format!("Score for '{}' given more than once", id));
        }
        match Mark::parse(&value) {
            Mark::Empty => {}
            Mark::Value(v) if (0.0..=assessment.out_of).contains(&v) => {}
            Mark::Value(v) => {
                return Err(format!(
                    "Score for '{}' must be between 0 and {}, got {}",
                    id, assessment.out_of, v
                ));
            }
            Mark::Invalid(text) => {
                return Err(format!("Score for '{}' is not a number: '{}'", id, text));
            }
        }
        map.insert(id, value);
    }

    let missing = policy
        .assessments
        .iter()
        .filter(|a| a.id != open)
        .filter(|a| map.get(&a.id).map_or(true, |v| v.trim().is_empty()))
        .map(|a| a.id.as_str())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(format!("Missing score for: {}", missing.join(", ")));
    }

    Ok(map)
}

fn score_map(policy: &Policy, scores: Vec<(String, String)>, open: &str) -> HashMap<String, String> {
    match collect_scores(policy, scores, open) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_USAGE);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize result: {}", e);
            std::process::exit(EXIT_USAGE);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Check { scores: Vec::new() });

    if let Err(e) = grade_calc::telemetry::init(cli.verbose) {
        eprintln!("Logging disabled: {}", e);
    }

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { force } = command {
        let path = config_path.unwrap_or_else(grade_calc::config::get_config_path);
        let config = grade_calc::config::default_config();
        if let Err(e) = grade_calc::config::write_config(&path, &config, force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Config written to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match grade_calc::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate policies at startup
    let policies = config.policies();
    if let Err(errors) = grading::validate_policies(&policies) {
        eprintln!("Policy config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    tracing::debug!(count = policies.len(), "policies available");

    let use_colors = grade_calc::output::should_use_colors();

    if let Commands::Policies = command {
        match cli.format {
            OutputFormat::Json => print_json(&policies),
            _ => println!(
                "{}",
                grade_calc::output::format_policy_list(
                    &policies,
                    config.default_policy_id(),
                    use_colors && cli.format == OutputFormat::Human
                )
            ),
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let policy_id = cli
        .policy
        .as_deref()
        .unwrap_or_else(|| config.default_policy_id());
    let policy = match grading::find_policy(&policies, policy_id) {
        Some(p) => p,
        None => {
            eprintln!("Unknown policy '{}'. Run `grade-calc policies` to list them.", policy_id);
            std::process::exit(EXIT_USAGE);
        }
    };

    match command {
        Commands::Check { scores } => {
            let final_id = policy.roles().final_component;
            let scores = score_map(policy, scores, &final_id);
            let components = policy.components(&scores);
            let result = grading::evaluate(&components, policy);

            match cli.format {
                OutputFormat::Human => println!(
                    "{}",
                    grade_calc::output::format_result(&result, policy, use_colors)
                ),
                OutputFormat::Tsv => println!("{}", grade_calc::output::format_tsv(&result)),
                OutputFormat::Json => print_json(&result),
            }
        }
        Commands::Required {
            scores,
            target,
            unknown,
        } => {
            let unknown_id = match unknown {
                Some(id) => id,
                None => policy.roles().final_component,
            };
            if policy.assessment(&unknown_id).is_none() {
                eprintln!("Unknown assessment '{}' for policy {}", unknown_id, policy.id);
                std::process::exit(EXIT_USAGE);
            }
            let mut scores = score_map(policy, scores, &unknown_id);
            if scores.get(&unknown_id).is_some_and(|v| !v.trim().is_empty()) {
                tracing::warn!(assessment = %unknown_id, "ignoring the mark given for the assessment being solved");
            }
            // The solved-for assessment never counts towards the known total
            scores.remove(&unknown_id);

            let target_grade = target.unwrap_or(policy.thresholds.pass);
            let components = policy.components(&scores);
            let required = match grading::required_for(&components, policy, &unknown_id, target_grade) {
                Some(r) => r,
                None => {
                    eprintln!("Assessment '{}' has no usable maximum", unknown_id);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let out_of = policy
                .assessment(&unknown_id)
                .map(|a| a.out_of)
                .unwrap_or(100.0);
            match cli.format {
                OutputFormat::Human => println!(
                    "{} for {}: {}",
                    unknown_id,
                    grade_calc::output::format_percentage(target_grade),
                    grade_calc::output::format_required(&required, out_of, use_colors)
                ),
                OutputFormat::Tsv => println!(
                    "{}\t{}\t{}\t{}",
                    unknown_id, required.percentage, required.raw_score, required.achievable
                ),
                OutputFormat::Json => print_json(&required),
            }
        }
        Commands::Policies | Commands::Init { .. } => unreachable!("handled above"),
    }

    std::process::exit(EXIT_SUCCESS);
}
