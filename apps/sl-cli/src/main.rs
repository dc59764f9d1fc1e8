use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sl_app::{
    AppResult, Outcome, ReportRequest, analyze_load, analyze_no_load, build_report,
    format_load_summary, format_no_load_summary, format_summary_rows,
    format_validation_messages, load_policy, load_rating, save_report_json,
};
use sl_core::TestConditions;
use sl_table::{ValidationPolicy, read_table_file, validate_table};

#[derive(Parser)]
#[command(name = "sl-cli")]
#[command(about = "Segloss CLI - induction-motor loss segregation from test logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a test-log CSV without computing losses
    Validate {
        /// Path to the test-log CSV file
        csv_path: PathBuf,
        /// Optional validation policy YAML (defaults built in)
        #[arg(long)]
        policy: Option<PathBuf>,
    },
    /// Analyze a no-load test file
    NoLoad {
        /// Path to the no-load CSV file
        csv_path: PathBuf,
        /// Path to the nameplate rating YAML
        #[arg(long)]
        rating: PathBuf,
        /// Optional validation policy YAML
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Winding temperature of the run in deg C (defaults to the
        /// resistance reference temperature)
        #[arg(long)]
        winding_temp: Option<f64>,
    },
    /// Analyze a load test file
    Load {
        /// Path to the load CSV file
        csv_path: PathBuf,
        /// Path to the nameplate rating YAML
        #[arg(long)]
        rating: PathBuf,
        /// Optional validation policy YAML
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Winding temperature of the run in deg C
        #[arg(long)]
        winding_temp: Option<f64>,
    },
    /// Build the full segregated-loss report from a file pair
    Report {
        /// Path to the no-load CSV file
        #[arg(long)]
        no_load: PathBuf,
        /// Path to the load CSV file
        #[arg(long)]
        load: PathBuf,
        /// Path to the nameplate rating YAML
        #[arg(long)]
        rating: PathBuf,
        /// Optional validation policy YAML
        #[arg(long)]
        policy: Option<PathBuf>,
        /// No-load run winding temperature in deg C
        #[arg(long)]
        no_load_temp: Option<f64>,
        /// Load run winding temperature in deg C
        #[arg(long)]
        load_temp: Option<f64>,
        /// Friction/windage split method: voltage-squared or voltage
        #[arg(long, default_value = "voltage-squared")]
        split: String,
        /// Write the report as pretty JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { csv_path, policy } => cmd_validate(&csv_path, policy.as_deref()),
        Commands::NoLoad {
            csv_path,
            rating,
            policy,
            winding_temp,
        } => cmd_no_load(&csv_path, &rating, policy.as_deref(), winding_temp),
        Commands::Load {
            csv_path,
            rating,
            policy,
            winding_temp,
        } => cmd_load(&csv_path, &rating, policy.as_deref(), winding_temp),
        Commands::Report {
            no_load,
            load,
            rating,
            policy,
            no_load_temp,
            load_temp,
            split,
            json,
        } => cmd_report(
            &no_load,
            &load,
            &rating,
            policy.as_deref(),
            no_load_temp,
            load_temp,
            &split,
            json.as_deref(),
        ),
    };

    match result {
        Ok(clean) if clean => ExitCode::SUCCESS,
        // Error-severity diagnostics gate report export in scripts.
        Ok(_) => ExitCode::from(2),
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn conditions(
    rating: &sl_core::MotorRating,
    winding_temp: Option<f64>,
) -> TestConditions {
    match winding_temp {
        Some(winding_temp_c) => TestConditions { winding_temp_c },
        None => TestConditions::at_reference(rating),
    }
}

fn cmd_validate(csv_path: &Path, policy_path: Option<&Path>) -> AppResult<bool> {
    println!("Validating test file: {}", csv_path.display());
    let policy: ValidationPolicy = load_policy(policy_path)?;
    let table = read_table_file(csv_path)?;
    let result = validate_table(&table, &policy);

    print!("{}", format_validation_messages(&result.messages));
    if result.is_usable() {
        println!(
            "✓ File is usable ({} rows, {} warnings)",
            result.readings.len(),
            result.warning_count()
        );
        Ok(true)
    } else {
        println!(
            "✗ File is not usable ({} errors, {} warnings)",
            result.error_count(),
            result.warning_count()
        );
        Ok(false)
    }
}

fn cmd_no_load(
    csv_path: &Path,
    rating_path: &Path,
    policy_path: Option<&Path>,
    winding_temp: Option<f64>,
) -> AppResult<bool> {
    let rating = load_rating(rating_path)?;
    let policy = load_policy(policy_path)?;
    let analysis = analyze_no_load(csv_path, &rating, &conditions(&rating, winding_temp), &policy)?;

    print!("{}", format_validation_messages(&analysis.messages));
    println!("\nNo-load results:");
    print!("{}", format_no_load_summary(&analysis.points));
    Ok(analysis.outcome() != Outcome::Failed)
}

fn cmd_load(
    csv_path: &Path,
    rating_path: &Path,
    policy_path: Option<&Path>,
    winding_temp: Option<f64>,
) -> AppResult<bool> {
    let rating = load_rating(rating_path)?;
    let policy = load_policy(policy_path)?;
    let analysis = analyze_load(csv_path, &rating, &conditions(&rating, winding_temp), &policy)?;

    print!("{}", format_validation_messages(&analysis.messages));
    println!("\nLoad results:");
    print!("{}", format_load_summary(&analysis.points));
    if let Some(fit) = analysis.fit {
        println!(
            "\nStray-load fit: loss = {:.6} * torque^2 + {:.3}",
            fit.slope, fit.intercept
        );
    }
    Ok(analysis.outcome() != Outcome::Failed)
}

#[allow(clippy::too_many_arguments)]
fn cmd_report(
    no_load_path: &Path,
    load_path: &Path,
    rating_path: &Path,
    policy_path: Option<&Path>,
    no_load_temp: Option<f64>,
    load_temp: Option<f64>,
    split: &str,
    json_path: Option<&Path>,
) -> AppResult<bool> {
    let rating = load_rating(rating_path)?;
    let policy = load_policy(policy_path)?;
    let split_method = sl_app::config::parse_split_method(split)?;

    let report = build_report(&ReportRequest {
        no_load_path,
        load_path,
        rating: &rating,
        policy: &policy,
        no_load_conditions: conditions(&rating, no_load_temp),
        load_conditions: conditions(&rating, load_temp),
        split_method,
    })?;

    print!("{}", format_validation_messages(&report.messages));

    if let Some(split) = &report.split {
        println!(
            "\nFriction/windage: {:.1} W   Iron: {:.1} W",
            split.friction_windage_w, split.iron_w
        );
    }
    println!("\nSegregated-loss summary:");
    print!("{}", format_summary_rows(&report.rows));

    if let Some(path) = json_path {
        save_report_json(path, &report)?;
        println!("✓ Report written to {}", path.display());
    }

    Ok(report.outcome() != Outcome::Failed)
}
