use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

const LESSONS: [&str; 2] = ["basic", "geometry"];

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for cubestudy")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, smoke
    Check,
    /// Check formatting
    Fmt,
    /// Lint with warnings denied
    Clippy,
    /// Run the workspace test suite
    Test,
    /// Run every lesson headless through cubestudy-cli
    Smoke,
    /// Build API docs
    Doc,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_smoke()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Smoke => run_smoke()?,
        Commands::Doc => run_doc()?,
    }

    Ok(())
}

fn cargo(args: &[&str], what: &str) -> Result<()> {
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{what} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    println!("==> fmt");
    cargo(&["fmt", "--all", "--", "--check"], "cargo fmt check")
}

fn run_clippy() -> Result<()> {
    println!("==> clippy");
    cargo(
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
        "cargo clippy",
    )
}

fn run_tests() -> Result<()> {
    println!("==> test");
    cargo(&["test", "--workspace"], "cargo test")
}

fn run_smoke() -> Result<()> {
    for lesson in LESSONS {
        println!("==> smoke: {lesson}");
        cargo(
            &[
                "run",
                "--quiet",
                "-p",
                "cubestudy-cli",
                "--",
                "run",
                "--lesson",
                lesson,
                "--ticks",
                "120",
                "--resize-at",
                "1024x512@60",
                "--json",
            ],
            &format!("smoke run of {lesson}"),
        )?;
    }
    Ok(())
}

fn run_doc() -> Result<()> {
    println!("==> doc");
    cargo(&["doc", "--workspace", "--no-deps"], "cargo doc")
}
