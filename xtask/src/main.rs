use std::fs;
use std::path::{Path, PathBuf};
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the lead router workspace",
    long_about = "A unified CLI for CI checks and local demo runs of the lead router\n\
                  against the CSV fixtures under demos/."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lead_router on a scratch copy of demos/ with the CSV backend
    Demo {
        /// Which lead_router command to run
        #[arg(value_enum, default_value_t = DemoStep::Run)]
        step: DemoStep,
        /// CRM endpoint receiving leads
        #[arg(long, env = "CRM_API_URL", default_value = "http://127.0.0.1:8080/api/leads")]
        crm_url: String,
        /// CRM bearer token
        #[arg(long, env = "CRM_API_TOKEN_SECRET", default_value = "demo-token")]
        crm_token: String,
        /// Fixed shuffle seed
        #[arg(long, default_value_t = 7)]
        seed: u64,
        /// Keep the previous scratch copy instead of resetting it
        #[arg(long)]
        keep: bool,
    },
    /// Run CI checks (fmt, clippy, tests, docs)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DemoStep {
    /// Email intake, then distribution
    Run,
    /// Email intake only (no CRM needed)
    Intake,
    /// Distribution only
    Distribute,
}

impl DemoStep {
    fn as_arg(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Intake => "intake",
            Self::Distribute => "distribute",
        }
    }
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build rustdoc with warnings denied
    Doc,
    /// Run check + doc
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn copy_tree(from: &Path, to: &Path) {
    fs::create_dir_all(to).expect("failed to create demo directory");
    for entry in fs::read_dir(from).expect("failed to read demo fixtures") {
        let entry = entry.expect("failed to read demo fixture entry");
        let target = to.join(entry.file_name());
        if entry.path().is_dir() {
            copy_tree(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).expect("failed to copy demo fixture");
        }
    }
}

/// Fresh copy of demos/ so runs never rewrite the checked-in fixtures.
fn prepare_demo_dir(keep: bool) -> PathBuf {
    let scratch = Path::new("target").join("lead_router_demo");
    if scratch.exists() && keep {
        return scratch;
    }
    if scratch.exists() {
        fs::remove_dir_all(&scratch).expect("failed to reset demo directory");
    }
    copy_tree(Path::new("demos"), &scratch);
    for sub in ["new", "cur", "tmp"] {
        fs::create_dir_all(scratch.join("inbox").join(sub)).expect("failed to create maildir");
    }
    scratch
}

fn run_demo(step_kind: DemoStep, crm_url: &str, crm_token: &str, seed: u64, keep: bool) {
    step("Prepare demo workspace");
    let scratch = prepare_demo_dir(keep);
    let csv_dir = scratch.display().to_string();
    let maildir = scratch.join("inbox").display().to_string();
    let seed = seed.to_string();

    step(&format!("lead_router {}", step_kind.as_arg()));
    run_cargo(&[
        "run",
        "-p",
        "leads_runtime",
        "--bin",
        "lead_router",
        "--",
        step_kind.as_arg(),
        "--backend",
        "csv",
        "--csv-dir",
        &csv_dir,
        "--inbox-maildir",
        &maildir,
        "--team-a",
        "North",
        "--team-b",
        "South",
        "--seed",
        &seed,
        "--crm-api-url",
        crm_url,
        "--crm-api-token",
        crm_token,
        "--json",
    ]);
    eprintln!("\nDemo sheets written to {csv_dir}");
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test leads_core");
    run_cargo(&["test", "-p", "leads_core"]);

    step("Test leads_runtime");
    run_cargo(&["test", "-p", "leads_runtime"]);
}

fn ci_doc() {
    step("Build docs");
    std::env::set_var("RUSTDOCFLAGS", "-D warnings");
    run_cargo(&["doc", "--no-deps", "-p", "leads_core", "-p", "leads_runtime"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            step,
            crm_url,
            crm_token,
            seed,
            keep,
        } => run_demo(step, &crm_url, &crm_token, seed, keep),
        Commands::Ci { job } => match job {
            CiJob::Check => ci_check(),
            CiJob::Doc => ci_doc(),
            CiJob::All => {
                ci_check();
                ci_doc();
            }
        },
    }
}
