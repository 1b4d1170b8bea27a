mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, PlanArgs, SplitArgs, VerifyArgs};
use pdf_splitter::codec::{self, BoundCodec, Codec, PageSource};
use pdf_splitter::{
    DocumentSplitter, OutputInspector, PdfSplitterError, Result, SplitConfig, SplitPlan,
    SplitReport, SplitResult,
};
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let working_dir = std::env::current_dir().context("Cannot read current directory")?;

    if let Err(e) = run(&cli, codec::bind, &working_dir) {
        error!("Operation failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Binds the codec, then dispatches the command. Relative paths resolve
/// against `working_dir`. Returns the split result when parts were written.
fn run<B>(cli: &Cli, bind: B, working_dir: &Path) -> Result<Option<SplitResult>>
where
    B: FnOnce() -> Result<BoundCodec>,
{
    let codec = bind()?;
    let output_dir = working_dir.join(&cli.output);

    let default_split = SplitArgs::default();
    let split_args = match &cli.command {
        Some(Commands::Split(args)) => args,
        Some(Commands::Plan(args)) => {
            return handle_plan_command(codec, args, working_dir, &output_dir).map(|_| None)
        }
        Some(Commands::Verify(args)) => {
            return handle_verify_command(codec, args, working_dir, &output_dir).map(|_| None)
        }
        None => &default_split,
    };

    let result = handle_split_command(codec, split_args, working_dir, &output_dir)?;
    println!(
        "\n{}",
        split_summary(result.parts_created(), &cli.output)
    );
    Ok(Some(result))
}

fn split_summary(parts_created: usize, output_dir: &Path) -> String {
    format!(
        "Successfully split into {} parts in '{}/' directory",
        parts_created,
        output_dir.display()
    )
}

fn splitter_for(
    codec: BoundCodec,
    pages_per_part: usize,
    output_dir: &Path,
) -> DocumentSplitter<BoundCodec> {
    DocumentSplitter::new(
        codec,
        SplitConfig {
            pages_per_part,
            output_dir: output_dir.to_path_buf(),
        },
    )
}

fn handle_split_command(
    codec: BoundCodec,
    args: &SplitArgs,
    working_dir: &Path,
    output_dir: &Path,
) -> Result<SplitResult> {
    let splitter = splitter_for(codec, args.pages_per_part, output_dir);
    let result = splitter.split_file(&working_dir.join(&args.input))?;
    debug!(
        "Split {} into {} parts under {}",
        args.input.display(),
        result.parts_created(),
        splitter.config().output_dir.display()
    );

    if let Some(report_path) = &args.json_report {
        let report = SplitReport {
            source: args.input.display().to_string(),
            codec: splitter.codec().name().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            result: result.clone(),
        };
        let json_content = serde_json::to_string_pretty(&report)
            .context("Failed to serialize split report")?;
        let report_path = working_dir.join(report_path);
        std::fs::write(&report_path, json_content).context("Failed to write split report")?;
        info!("Split report written to: {}", report_path.display());
    }

    Ok(result)
}

fn handle_plan_command(
    codec: BoundCodec,
    args: &PlanArgs,
    working_dir: &Path,
    output_dir: &Path,
) -> Result<()> {
    let splitter = splitter_for(codec, args.pages_per_part, output_dir);
    let source = splitter.open(&working_dir.join(&args.input))?;
    let total_pages = source.page_count();
    let parts =
        DocumentSplitter::<BoundCodec>::calculate_split_info(total_pages, args.pages_per_part)?;

    println!("\n=== Plan for '{}' ===", args.input.display());
    println!("Total pages: {}", total_pages);
    println!("Pages per part: {}", splitter.config().pages_per_part);
    println!("Parts: {}", parts.len());
    for part in &parts {
        println!(
            "  {} ({} pages)",
            DocumentSplitter::<BoundCodec>::generate_output_filename(output_dir, part).display(),
            part.len()
        );
    }

    if let Some(json_path) = &args.json_output {
        let plan = SplitPlan {
            source: args.input.display().to_string(),
            total_pages,
            pages_per_part: args.pages_per_part,
            created_at: chrono::Utc::now().to_rfc3339(),
            parts,
        };
        let json_content =
            serde_json::to_string_pretty(&plan).context("Failed to serialize split plan")?;
        let json_path = working_dir.join(json_path);
        std::fs::write(&json_path, json_content).context("Failed to write split plan")?;
        info!("Plan written to: {}", json_path.display());
    }

    Ok(())
}

fn handle_verify_command(
    codec: BoundCodec,
    args: &VerifyArgs,
    working_dir: &Path,
    output_dir: &Path,
) -> Result<()> {
    let splitter = splitter_for(codec, args.pages_per_part, output_dir);
    let source = splitter.open(&working_dir.join(&args.input))?;
    let parts = DocumentSplitter::<BoundCodec>::calculate_split_info(
        source.page_count(),
        args.pages_per_part,
    )?;

    let inspector = OutputInspector::new()?;
    let layout = inspector.inspect(output_dir)?;
    let check = inspector.check(&layout, &parts);

    println!("\n=== Verification of '{}' ===", output_dir.display());
    println!("Expected parts: {}", check.expected_parts);
    println!("Found parts: {}", check.found_parts);

    if !check.is_complete() {
        for name in &check.missing {
            println!("  - missing: {}", name);
        }
        for name in &check.unexpected {
            println!("  - unexpected: {}", name);
        }
        return Err(PdfSplitterError::OutputLayout {
            reason: format!(
                "{} missing and {} unexpected part files",
                check.missing.len(),
                check.unexpected.len()
            ),
        });
    }

    println!("Output directory matches the plan!");
    Ok(())
}
