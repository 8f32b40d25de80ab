use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use env_logger::Builder;
use log::{error, info, Level, LevelFilter};
use similar::udiff::unified_diff;
use std::fs;
use std::io::{IsTerminal, Read, Write};
use std::path::PathBuf;

use unipatch::model::FileChange;
use unipatch::{apply_patch, plan_patch, FsBackend};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Apply a self-describing *** Begin Patch / *** End Patch diff to a target directory.",
    long_about = "Parses the patch grammar, locates hunk context with tolerant fallback, \
                  and applies the result through an injected file backend."
)]
struct Args {
    /// Path to the patch file, or `-` to read the patch from stdin.
    input_file: PathBuf,

    /// Target directory the patch is applied against.
    target_dir: PathBuf,

    #[arg(short = 'n', long, help = "Show what would change, but don't modify files.")]
    dry_run: bool,

    /// Increase logging verbosity. Can be used multiple times (e.g., -v, -vv).
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        long_help = "Increase logging verbosity.\n-v for info, -vv for debug, -vvv for trace.\nBy default, only warnings and errors are shown."
    )]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| match record.level() {
            Level::Error => writeln!(buf, "{} {}", "error:".red().bold(), record.args()),
            Level::Warn => writeln!(buf, "{} {}", "warning:".yellow().bold(), record.args()),
            Level::Info => writeln!(buf, "{}", record.args()),
            Level::Debug => writeln!(buf, "{} {}", "debug:".blue().bold(), record.args()),
            Level::Trace => writeln!(buf, "{} {}", "trace:".cyan().bold(), record.args()),
        })
        .init();

    if !args.target_dir.is_dir() {
        anyhow::bail!(
            "Target directory '{}' not found or is not a directory.",
            args.target_dir.display()
        );
    }

    let text = if args.input_file == PathBuf::from("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read patch text from stdin")?;
        buf
    } else {
        fs::read_to_string(&args.input_file)
            .with_context(|| format!("Failed to read input file '{}'", args.input_file.display()))?
    };

    let backend = FsBackend::new(&args.target_dir);

    if args.dry_run {
        let commit = plan_patch(&text, &backend)?;
        if std::io::stdout().is_terminal() {
            println!();
        }
        let mut count = 0;
        for (path, change) in commit.iter() {
            count += 1;
            println!("----- Proposed Changes for {} -----", path.display());
            match change {
                FileChange::Add { new } => {
                    let diff = unified_diff(similar::Algorithm::default(), "", new, 3, Some(("/dev/null", "b")));
                    print!("{diff}");
                }
                FileChange::Delete { old } => {
                    let diff = unified_diff(similar::Algorithm::default(), old, "", 3, Some(("a", "/dev/null")));
                    print!("{diff}");
                }
                FileChange::Update { old, new, move_path } => {
                    if let Some(dest) = move_path {
                        println!("  (move to {})", dest.display());
                    }
                    let diff = unified_diff(similar::Algorithm::default(), old, new, 3, Some(("a", "b")));
                    print!("{diff}");
                }
            }
            println!("------------------------------------");
        }
        info!("DRY RUN: {count} file(s) would change. No files were modified.");
        return Ok(());
    }

    match apply_patch(&text, &backend) {
        Ok(receipt) => {
            for line in receipt.lines() {
                info!("{line}");
            }
            println!("Patch applied successfully.");
            Ok(())
        }
        Err(e) => {
            error!("--- FAILED to apply patch: {e}");
            Err(e.into())
        }
    }
}
