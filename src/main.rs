use clap::Parser;
use drivespeed::bench::SpeedTester;
use drivespeed::config::{RunConfig, Settings};
use drivespeed::models::{IterationResult, RunSummary};
use drivespeed::util::units::format_size;
use drivespeed::volume;
use drivespeed::{error, Result};
use std::path::PathBuf;
use std::process;
use tokio::sync::mpsc;

const SEPARATOR: &str = "------------------";

/// Sequential read/write speed tester for mounted storage volumes
#[derive(Parser, Debug)]
#[command(name = "drivespeed", version, about)]
struct Cli {
    /// Test file size in megabytes
    #[arg(short = 's', long, value_name = "MB")]
    file_size_mb: Option<u64>,

    /// Number of iterations to run and average
    #[arg(short, long)]
    iterations: Option<i64>,

    /// Volume to test: a drive letter or a mount path
    #[arg(short, long)]
    drive: Option<String>,

    /// Print the run summary as JSON after the report
    #[arg(long)]
    json: bool,

    /// Persist the effective parameters as new defaults
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        process::exit(error::exit_code(&err));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;
    let file_size_mb = cli.file_size_mb.unwrap_or(settings.file_size_mb);
    let iterations = cli.iterations.unwrap_or(settings.iterations);
    let drive = cli.drive.unwrap_or_else(|| settings.drive.clone());

    if cli.save_config {
        Settings {
            file_size_mb,
            iterations,
            drive: drive.clone(),
        }
        .save()?;
    }

    // Install location, computed once here and passed down explicitly
    let install_dir = std::env::current_exe()?
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mounts = volume::mounted_volumes();
    let mount_ids: Vec<String> = mounts
        .iter()
        .map(|m| volume::normalize_identifier(&m.to_string_lossy()))
        .collect();
    println!("Mounted volumes: {:?}", mount_ids);

    let target = volume::resolve(&drive, &install_dir, &mounts)?;
    println!(
        "Test file path {}, is_dir: {}",
        target.dir.display(),
        target.is_dir
    );

    let config = RunConfig::new(&target.volume, file_size_mb, iterations);
    println!(
        "Testing r/w speed for drive '{}' with file size {} for {} iterations. Please wait...",
        target.volume,
        format_size(config.file_size as f64, "B"),
        config.iterations
    );

    let tester = SpeedTester::new(config.clone(), target.dir.clone())?;

    let (tx, mut rx) = mpsc::channel::<IterationResult>(100);
    let pb = indicatif::ProgressBar::new(config.iterations as u64);
    pb.set_style(
        indicatif::ProgressStyle::with_template("{spinner} iteration {pos}/{len} {msg}").unwrap(),
    );

    let reporter = tokio::spawn(async move {
        while let Some(result) = rx.recv().await {
            pb.inc(1);
            pb.set_message(format!(
                "write {:.1} MB/s, read {:.1} MB/s",
                result.write_mbps, result.read_mbps
            ));
            println!("{}", SEPARATOR);
            println!("Iteration: {}", result.index);
            println!("Write Speed: {:.2} MB/s", result.write_mbps);
            println!("Read Speed: {:.2} MB/s", result.read_mbps);
            println!(
                "Iteration time elapsed: {:.2} seconds",
                result.elapsed.as_secs_f64()
            );
        }
        pb.finish_and_clear();
    });

    let summary = tester.run(tx).await?;
    reporter.await.ok();

    report_summary(&summary);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

fn report_summary(summary: &RunSummary) {
    if summary.iterations.len() > 1 {
        println!("{}", SEPARATOR);
        println!(
            "Average write speed: {:.2} MB/s",
            summary.average_write_mbps
        );
        println!("Average read speed: {:.2} MB/s", summary.average_read_mbps);
        println!("{}", SEPARATOR);
    }
    println!(
        "Total time elapsed: {:.2} seconds",
        summary.total_elapsed.as_secs_f64()
    );
}
