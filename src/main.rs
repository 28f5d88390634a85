//! Vigil CLI - security-compliance results console
//!
//! Usage: vigil <COMMAND>
//!
//! Commands:
//!   report  Render the categorized check report for one or all targets
//!   scan    Run the audit playbook (whole fleet or one target)
//!   fix     Remediate one failing check (two-step approval)
//!   export  Write the tabular report as a CSV spreadsheet
//!   watch   Re-render the report whenever result files change
//!   targets List known targets

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use vigil::config::Config;
use vigil::models::{CheckId, CheckResult, Status};
use vigil::remediate::{Approval, PlaybookRunner};
use vigil::store::ResultStore;
use vigil::ui::views;
use vigil::ui::TerminalCapabilities;
use vigil::watcher::{watch, WatchEvent, WatchOptions};
use vigil::{report, ScanDiagnostic};

/// Vigil - security-compliance results console
#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, default_value = "false")]
    json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the categorized check report
    Report {
        /// Only this target (default: every target with results)
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Run the audit playbook and re-render the report
    Scan {
        /// Limit the audit to one target
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Remediate one failing check
    Fix {
        /// Check identifier, e.g. U-01 or U01
        check_id: String,

        /// Target host the check failed on
        #[arg(short, long)]
        target: String,

        /// Skip the interactive confirmation (for automation)
        #[arg(short, long)]
        yes: bool,
    },

    /// Export the tabular report as CSV
    Export {
        /// Only this target (default: every target with results)
        #[arg(short, long)]
        target: Option<String>,

        /// Output file (default: Report_<target>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Watch the results directory and re-render on change
    Watch {
        /// Only this target
        #[arg(short, long)]
        target: Option<String>,
    },

    /// List known targets
    Targets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report { target } => cmd_report(target, cli.json, cli.verbose),
        Commands::Scan { target } => cmd_scan(target, cli.json, cli.verbose),
        Commands::Fix {
            check_id,
            target,
            yes,
        } => cmd_fix(&check_id, &target, yes, cli.json),
        Commands::Export { target, output } => cmd_export(target, output, cli.json),
        Commands::Watch { target } => cmd_watch(target, cli.json, cli.verbose),
        Commands::Targets => cmd_targets(cli.json),
    }
}

/// Load config from the working directory, surfacing unknown-key warnings.
fn load_config(json: bool) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    let (config, warnings) = Config::load_or_default(&cwd);
    if !json {
        for warning in &warnings {
            eprintln!("⚠ {warning}");
        }
    }
    Ok(config)
}

fn store_for(config: &Config) -> ResultStore {
    ResultStore::new(config.results_dir()).with_mysql_marker(config.mysql_marker.clone())
}

fn cmd_report(target: Option<String>, json: bool, verbose: u8) -> Result<()> {
    let config = load_config(json)?;
    let store = store_for(&config);
    let caps = vigil::ui::detect_capabilities();

    let scan = store.load();
    let records = report::dedup(scan.records);

    let targets = match &target {
        Some(t) => vec![t.clone()],
        None => {
            let mut all: Vec<String> = records.iter().map(|r| r.target.clone()).collect();
            all.sort();
            all.dedup();
            all
        }
    };

    if json {
        for target in &targets {
            let subset = report::filter_target(&records, target);
            let card = report::score(&subset, &config.grades);
            let output = serde_json::json!({
                "event": "report",
                "target": target,
                "scorecard": card,
                "records": subset,
                "skipped": scan.diagnostics.len(),
            });
            println!("{output}");
        }
        return Ok(());
    }

    if targets.is_empty() {
        println!("No check results in {}.", store.root().display());
        println!("Run `vigil scan` to audit the fleet.");
        print!("{}", views::render_diagnostics(&scan.diagnostics, &caps));
        return Ok(());
    }

    for target in &targets {
        let subset = report::filter_target(&records, target);
        let card = report::score(&subset, &config.grades);
        print!("{}", views::render_metrics(target, &card, &caps));
        println!();
        print!("{}", views::render_report(&subset, &caps, verbose));
    }
    print!("{}", views::render_diagnostics(&scan.diagnostics, &caps));

    Ok(())
}

fn cmd_scan(target: Option<String>, json: bool, verbose: u8) -> Result<()> {
    let config = load_config(json)?;
    let store = store_for(&config);
    let runner = PlaybookRunner::new(config.remediation.clone(), store);

    if !json {
        match &target {
            Some(t) => println!("🔍 Auditing {t}..."),
            None => println!("🔍 Auditing all targets..."),
        }
    }

    runner.audit(target.as_deref()).context("audit run failed")?;

    if json {
        let output = serde_json::json!({
            "event": "scan",
            "target": target.as_deref().unwrap_or("all"),
            "status": "success",
        });
        println!("{output}");
        return Ok(());
    }

    println!("✓ Audit complete\n");
    cmd_report(target, json, verbose)
}

fn cmd_fix(check_id: &str, target: &str, yes: bool, json: bool) -> Result<()> {
    let config = load_config(json)?;
    let store = store_for(&config);
    let caps = vigil::ui::detect_capabilities();
    let runner = PlaybookRunner::new(config.remediation.clone(), store);

    let check_id = CheckId::new(check_id);
    let record = runner
        .current_record(target, &check_id)
        .with_context(|| format!("no result record for {check_id} on {target}"))?;

    if record.status.is_pass() {
        if json {
            println!(
                "{}",
                serde_json::json!({"event": "fix", "check_id": check_id, "target": target, "status": "already_passing"})
            );
        } else {
            println!("✓ {check_id} on {target} is already passing. Nothing to do.");
        }
        return Ok(());
    }

    let mut approval = Approval::request(target, check_id.clone())?;

    if yes {
        approval.confirm();
    } else {
        if !caps.is_tty {
            bail!("refusing to remediate without confirmation; re-run with --yes");
        }
        print_impact(&record);
        let start = dialoguer::Confirm::new()
            .with_prompt(format!("Start remediation process for {check_id} on {target}?"))
            .default(false)
            .interact()?;
        if !start {
            approval.cancel();
            println!("Cancelled.");
            return Ok(());
        }
        let approved = dialoguer::Confirm::new()
            .with_prompt("Operational impact reviewed and final approval obtained. Execute now?")
            .default(false)
            .interact()?;
        if !approved {
            approval.cancel();
            println!("Cancelled.");
            return Ok(());
        }
        approval.confirm();
    }

    if !json {
        println!("🛠 Remediating {check_id} on {target}...");
    }

    let outcome = runner.fix(&approval)?;

    if json {
        let output = serde_json::json!({
            "event": "fix",
            "check_id": check_id,
            "target": target,
            "status_before": outcome.status_before,
            "status_after": outcome.status_after(),
            "record_rewritten": outcome.record_rewritten,
            "resolved": outcome.resolved(),
        });
        println!("{output}");
        return Ok(());
    }

    match outcome.status_after() {
        Some(Status::Pass) => println!("✓ {check_id} remediated and verified on {target}"),
        Some(status) => println!(
            "⚠ {check_id} still reports {status} after remediation; review the playbook output"
        ),
        None => println!("⚠ no result record found for {check_id} after remediation"),
    }
    if !outcome.record_rewritten {
        println!("  (result file was not rewritten by the playbooks)");
    }

    Ok(())
}

/// Show the operator what the fix is expected to touch before asking.
fn print_impact(record: &CheckResult) {
    println!("{} {}", record.check_id, record.title);
    let level = record.impact_level.as_deref().unwrap_or("LOW");
    let impact = record
        .action_impact
        .as_deref()
        .unwrap_or("No operational impact expected in the common case.");
    match level {
        "LOW" => println!("  [SAFE] {impact}"),
        _ => println!("  [CAUTION] {impact}"),
    }
}

fn cmd_export(target: Option<String>, output: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config(json)?;
    let store = store_for(&config);

    let scan = store.load();
    let mut records = report::dedup(scan.records);
    if let Some(target) = &target {
        records.retain(|r| &r.target == target);
    }

    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!("Report_{}.csv", target.as_deref().unwrap_or("all")))
    });

    vigil::export::write_report(&path, &records, chrono::Utc::now())?;

    if json {
        let output = serde_json::json!({
            "event": "export",
            "path": path.display().to_string(),
            "records": records.len(),
            "skipped": scan.diagnostics.len(),
        });
        println!("{output}");
    } else {
        println!("📊 Wrote {} records to {}", records.len(), path.display());
        if !scan.diagnostics.is_empty() {
            eprintln!("⚠ {} result file(s) were skipped", scan.diagnostics.len());
        }
    }

    Ok(())
}

fn cmd_watch(target: Option<String>, json: bool, verbose: u8) -> Result<()> {
    let config = load_config(json)?;
    let caps = vigil::ui::detect_capabilities();

    let options = WatchOptions {
        results_dir: config.results_dir(),
        target,
        mysql_marker: config.mysql_marker.clone(),
    };

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("error setting Ctrl+C handler")?;

    if !json {
        println!("⟳ Vigil Watch");
        println!("Results: {}", options.results_dir.display());
        println!("Press Ctrl+C to stop\n");
    }

    let grades = config.grades;
    watch(options, running, |event| {
        if json {
            println!("{}", event.to_json());
            return;
        }
        match event {
            WatchEvent::Started { dir } => {
                println!("📂 Watching: {dir}");
            }
            WatchEvent::FileChanged { path } => {
                println!("📝 Changed: {path}");
            }
            WatchEvent::Rescanned {
                records,
                diagnostics,
            } => {
                render_watch_frame(&records, &diagnostics, &grades, &caps, verbose);
            }
            WatchEvent::Error { message } => {
                eprintln!("✗ Error: {message}");
            }
            WatchEvent::Shutdown => {
                println!("\n👋 Shutting down...");
            }
        }
    })?;

    Ok(())
}

fn render_watch_frame(
    records: &[CheckResult],
    diagnostics: &[ScanDiagnostic],
    grades: &report::GradeThresholds,
    caps: &TerminalCapabilities,
    verbose: u8,
) {
    let mut targets: Vec<String> = records.iter().map(|r| r.target.clone()).collect();
    targets.sort();
    targets.dedup();

    for target in &targets {
        let subset = report::filter_target(records, target);
        let card = report::score(&subset, grades);
        print!("{}", views::render_metrics(target, &card, caps));
        println!();
        print!("{}", views::render_report(&subset, caps, verbose));
    }
    print!("{}", views::render_diagnostics(diagnostics, caps));
}

fn cmd_targets(json: bool) -> Result<()> {
    let config = load_config(json)?;
    let store = store_for(&config);

    let mut targets = config.base_targets.clone();
    targets.extend(store.load().targets());
    targets.sort();
    targets.dedup();
    // Descending, so numbered hosts list in rollout order (Rocky9 first).
    targets.reverse();

    if json {
        println!("{}", serde_json::json!({"event": "targets", "targets": targets}));
    } else {
        for target in &targets {
            println!("{target}");
        }
    }

    Ok(())
}
