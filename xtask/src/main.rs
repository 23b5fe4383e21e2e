use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for oricra")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Quick checks before commit (fmt, clippy)
    Check {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy {
        #[arg(long)]
        fix: bool,
    },
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        #[arg(long)]
        doc: bool,
        /// Run only media record tests
        #[arg(long)]
        media: bool,
        /// Run only session (transaction, reconciler) tests
        #[arg(long)]
        session: bool,
        /// Run only host event bridge tests
        #[arg(long)]
        host: bool,
        /// Run only memory bridge tests
        #[arg(long)]
        bridge: bool,
        /// Run only the integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Run benchmarks
    Bench,
    /// Load media into a headless session and print its status
    Demo {
        /// Tape (.tap) or disk (.dsk) images
        media: Vec<String>,
        /// Enable hardcore mode
        #[arg(long)]
        hardcore: bool,
        /// Reset after loading
        #[arg(long)]
        reset: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Check { verbose } => run_check(verbose),
        Commands::Fmt { check } => run_fmt(check),
        Commands::Clippy { fix } => run_clippy(fix),
        Commands::Build { release } => run_build(release),
        Commands::Test {
            doc,
            media,
            session,
            host,
            bridge,
            integration,
        } => run_test(
            doc,
            TestFilter {
                media,
                session,
                host,
                bridge,
                integration,
            },
        ),
        Commands::Bench => run_bench(),
        Commands::Demo {
            media,
            hardcore,
            reset,
        } => run_demo(&media, hardcore, reset),
    }
}

/// Module selection for `cargo x test`
#[derive(Default)]
struct TestFilter {
    media: bool,
    session: bool,
    host: bool,
    bridge: bool,
    integration: bool,
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;
    run_task("Build", || run_build(false), verbose)?;
    run_task("Test", || run_test(false, TestFilter::default()), verbose)?;

    let elapsed = start.elapsed();
    println!(
        "\n{} {}",
        "✓ CI passed in".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn run_check(verbose: bool) -> Result<()> {
    println!("{}", "=== Running Quick Checks ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;

    let elapsed = start.elapsed();
    println!(
        "\n{} {}",
        "✓ Checks passed in".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn run_fmt(check: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("fmt").arg("--all");

    if check {
        cmd.arg("--").arg("--check");
    }

    execute_command(&mut cmd)
}

fn run_clippy(fix: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("clippy").arg("--workspace").arg("--all-targets");

    if fix {
        cmd.arg("--fix");
    } else {
        cmd.arg("--").arg("-D").arg("warnings");
    }

    execute_command(&mut cmd)
}

fn run_build(release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("build");

    if release {
        cmd.arg("--release");
    }

    execute_command(&mut cmd)
}

fn run_test(doc: bool, filter: TestFilter) -> Result<()> {
    if doc {
        let mut cmd = Command::new("cargo");
        cmd.arg("test").arg("--doc");
        return execute_command(&mut cmd);
    }

    let suites = [
        (filter.media, vec!["--lib", "core::media"], "Media"),
        (filter.session, vec!["--lib", "core::session"], "Session"),
        (filter.host, vec!["--lib", "core::host"], "Host"),
        (filter.bridge, vec!["--lib", "core::memory_bridge"], "Memory bridge"),
        (filter.integration, vec!["--test", "media_lifecycle"], "Integration"),
    ];
    let selected = suites.iter().filter(|(enabled, _, _)| *enabled).count();

    if selected == 0 {
        let mut cmd = Command::new("cargo");
        cmd.arg("test");
        return execute_command(&mut cmd);
    }

    let mut failed = Vec::new();

    for (enabled, test_args, name) in &suites {
        if !enabled {
            continue;
        }

        println!("{} Running {} tests...", "→".blue(), name.bold());

        let mut cmd = Command::new("cargo");
        cmd.arg("test").args(test_args);

        match execute_command(&mut cmd) {
            Ok(_) => println!("{} {} tests passed\n", "✓".green(), name),
            Err(e) => {
                println!("{} {} tests failed\n", "✗".red(), name);
                if selected == 1 {
                    return Err(e);
                }
                failed.push(*name);
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("Tests failed: {}", failed.join(", "))
    }
}

fn run_bench() -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("bench");

    execute_command(&mut cmd)
}

fn run_demo(media: &[String], hardcore: bool, reset: bool) -> Result<()> {
    println!("{}", "=== Headless Session Demo ===".bold().blue());

    if media.is_empty() {
        println!(
            "{} No media given; the session will report empty slots",
            "ℹ".blue()
        );
    }

    let mut cmd = Command::new("cargo");
    cmd.arg("run").arg("--bin").arg("oricra").arg("--");

    if hardcore {
        cmd.arg("--hardcore");
    }
    if reset {
        cmd.arg("--reset");
    }
    cmd.args(media);

    execute_command(&mut cmd)
}

fn run_task<F>(name: &str, task: F, verbose: bool) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    print!("{} {} ... ", "→".blue(), name);

    let start = Instant::now();

    match task() {
        Ok(_) => {
            let elapsed = start.elapsed();
            println!(
                "{} {}",
                "✓".green().bold(),
                if verbose {
                    format!("({:.2}s)", elapsed.as_secs_f64())
                } else {
                    String::new()
                }
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            Err(e)
        }
    }
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
