use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// Import from clauseguard-core
use clauseguard_core::enrichment::{CancellationToken, EnrichmentRunner, PatternSimplifier};
use clauseguard_core::processor::PipelineStages;
use clauseguard_core::storage::{EnrichmentCache, FileCache, NoOpCache};
use clauseguard_core::{AnalysisConfig, CompositeExtractor, DocumentProcessor, DocumentReport, TextExtractor};

// Import CLI utilities
use clauseguard_cli::init_logging;
use clauseguard_cli::report::{extension_for, save_report};

#[derive(Parser)]
#[command(name = "clauseguard")]
#[command(about = "Split legal documents into clauses and flag risky contract language")]
struct Args {
    /// Path to the document to analyze (.txt, .md or .pdf)
    #[arg(short, long, required_unless_present_any = ["show_configs", "print_default_config"])]
    input: Option<String>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Output format: report, clauses, or text
    #[arg(short = 'f', long, default_value = "report")]
    output_format: String,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,

    /// Print the built-in configuration as YAML and exit
    #[arg(long)]
    print_default_config: bool,

    /// Output file path (if not specified, auto-generated based on input)
    #[arg(short, long)]
    output: Option<String>,

    /// Only segment the document and print the clause boundaries
    #[arg(long)]
    segment_only: bool,

    /// Add plain-language rewrites and explanations to every clause
    #[arg(long)]
    simplify: bool,

    /// Directory for cached enrichment results (default: user cache dir)
    #[arg(long)]
    cache_dir: Option<String>,

    /// Skip the enrichment cache and call the simplifier for every clause
    #[arg(long)]
    skip_cache: bool,

    /// Score clauses in parallel
    #[arg(long)]
    parallel: bool,

    /// Log per-stage timings
    #[arg(long)]
    profile: bool,

    /// Dump intermediate pipeline stage outputs to a directory
    /// Captures: extracted text, normalized text, fragments, and the final report
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output (default: test_outputs/stages)
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: String,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Profiling output is logged at info level
    let verbosity = if args.profile { args.verbose.max(1) } else { args.verbose };
    init_logging(verbosity);

    println!("🦀 ClauseGuard Contract Analyzer");

    if args.show_configs {
        show_help();
        return Ok(());
    }

    if args.print_default_config {
        print!("{}", AnalysisConfig::default().to_yaml()?);
        return Ok(());
    }

    let input = args.input.as_deref().unwrap_or_default();
    let input_path = Path::new(input);

    // Check if input file exists
    if !input_path.exists() {
        println!("⚠️  Input document not found at: {input}");
        println!("   Please check the file path.");
        return Ok(());
    }

    let mut config = AnalysisConfig::load_with_fallback(args.config.as_deref().map(Path::new));

    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {config_path}");
    } else {
        println!("📋 Using default config");
    }

    // Apply CLI overrides to config
    if args.parallel {
        config.processing.parallel = true;
    }
    if args.profile {
        config.processing.profile = true;
    }
    if args.simplify {
        config.enrichment.enabled = true;
    }

    let processor = DocumentProcessor::new(config).context("invalid analysis configuration")?;
    tracing::debug!(fingerprint = processor.config_fingerprint(), "processor ready");
    let extractor = CompositeExtractor::with_defaults();

    println!("📄 Processing: {input}");

    if args.segment_only {
        let text = extractor.extract(input_path)?;
        print_segments(&processor.segment_with_stages(&text));
        return Ok(());
    }

    // Stage dump mode: capture and save all intermediates
    if args.dump_stages {
        println!("\n🔬 Pipeline stage dump mode");
        let text = extractor.extract(input_path)?;
        let stages = processor.segment_with_stages(&text);
        match processor.analyze_text(&text, Some(input)) {
            Ok(report) => {
                save_stages(&text, &stages, &report, &args.stages_dir)?;
                println!("\n✅ All stages dumped to: {}", args.stages_dir);
            }
            Err(e) => {
                eprintln!("❌ Stage dump failed: {e}");
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    match processor.analyze_file(input_path, &extractor) {
        Ok(mut report) => {
            println!("✅ Successfully analyzed document");

            if processor.config().enrichment.enabled {
                enrich_report(&mut report, &processor, &args)?;
            }

            print_summary(&report);

            // Generate output path
            let output_path = if let Some(output) = &args.output {
                PathBuf::from(output)
            } else {
                let input_name = input_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("output");
                let config_suffix = args
                    .config
                    .as_ref()
                    .and_then(|p| Path::new(p).file_stem())
                    .and_then(|s| s.to_str())
                    .map(|s| format!("_{s}"))
                    .unwrap_or_default();
                PathBuf::from(format!(
                    "{input_name}{config_suffix}_clauseguard.{}",
                    extension_for(&args.output_format)
                ))
            };

            save_report(&report, &output_path, &args.output_format)?;
            println!("💾 {} format results saved to: {}", args.output_format, output_path.display());
        }
        Err(e) => {
            eprintln!("❌ Analysis failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn cache_for(args: &Args) -> Result<Box<dyn EnrichmentCache>> {
    if args.skip_cache {
        return Ok(Box::new(NoOpCache));
    }
    let cache_dir = match &args.cache_dir {
        Some(dir) => PathBuf::from(dir),
        None => dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("clauseguard"),
    };
    let cache = FileCache::new(&cache_dir)
        .with_context(|| format!("failed to open enrichment cache at {}", cache_dir.display()))?;
    Ok(Box::new(cache))
}

fn enrich_report(report: &mut DocumentReport, processor: &DocumentProcessor, args: &Args) -> Result<()> {
    let cache = cache_for(args)?;
    // The bundled simplifier runs in-process, so calls are not paced
    let mut enrichment = processor.config().enrichment.clone();
    enrichment.min_request_interval_ms = 0;
    let mut runner = EnrichmentRunner::new(Arc::new(PatternSimplifier::new()), cache.as_ref(), &enrichment);
    let stats = runner.enrich_clauses(&mut report.clauses, &CancellationToken::new());
    println!(
        "✨ Enriched {} clause(s) ({} from cache, {} failed)",
        stats.enriched + stats.cached,
        stats.cached,
        stats.failed
    );
    Ok(())
}

fn print_summary(report: &DocumentReport) {
    let summary = &report.summary;
    println!("📊 Risk summary:");
    println!("   - Overall risk: {}", summary.overall_risk.as_str().to_uppercase());
    println!("   - Clauses: {}", summary.total_clauses);
    println!("   - High risk: {}", summary.high_risk_count);
    println!("   - Medium risk: {}", summary.medium_risk_count);
    println!("   - Low risk: {}", summary.low_risk_count);
    println!("   - Average score: {:.1}", summary.average_risk_score);
    for warning in summary.critical_warnings.iter().take(3) {
        println!("   ⚠️  {warning}");
    }
}

fn print_segments(stages: &PipelineStages) {
    if stages.fragments.is_empty() {
        println!("⚠️  No clauses found; the whole document would be scored as one clause.");
        return;
    }
    println!("✂️  {} clause(s):", stages.fragments.len());
    for (i, fragment) in stages.fragments.iter().enumerate() {
        println!("\n[{}] ({:?})", i + 1, fragment.origin);
        println!("{}", fragment.text.trim());
    }
}

fn show_help() {
    println!("\n📋 Available Configuration Options:");
    println!("  --config <path>          Load custom config file");
    println!("  --input <path>           Document to analyze (.txt, .md, .pdf)");
    println!("  --output <path>          Output file path (auto-generated if not specified)");
    println!("  --output-format <fmt>    Output format: report, clauses, or text");
    println!("  --segment-only           Print clause boundaries without scoring");
    println!("  --simplify               Add plain-language rewrites to each clause");
    println!("  --cache-dir <path>       Enrichment cache directory (default: user cache dir)");
    println!("  --print-default-config   Print the built-in rules as YAML");

    println!("\n📄 Output Formats:");
    println!("  report   - Full JSON report with clauses, summary and distribution (default)");
    println!("  clauses  - JSON array of scored clauses only");
    println!("  text     - Human-readable report");

    println!("\n📁 Custom rules:");
    println!("  Start from --print-default-config and edit header patterns, keyword lists,");
    println!("  risk patterns, weights and thresholds. Every section is optional.");

    println!("\n📝 Usage Examples:");
    println!("  cargo run -- -i contract.pdf");
    println!("  cargo run -- -i contract.txt -f text -o contract_report.txt");
    println!("  cargo run -- -i contract.pdf -c strict.yaml --simplify");

    #[cfg(not(feature = "pdf"))]
    {
        println!("\n⚠️  Built without the `pdf` feature: only .txt, .text and .md are supported.");
    }
}

fn save_stages(text: &str, stages: &PipelineStages, report: &DocumentReport, output_dir: &str) -> Result<()> {
    use std::fs;
    fs::create_dir_all(output_dir)?;

    // Stage 1: Extracted text
    let extracted_path = format!("{output_dir}/stage1_extracted.txt");
    fs::write(&extracted_path, text)?;
    println!("  💾 {extracted_path}");

    // Stage 2: Normalized text
    let normalized_path = format!("{output_dir}/stage2_normalized.txt");
    fs::write(&normalized_path, &stages.normalized)?;
    println!("  💾 {normalized_path}");

    // Stage 3: Fragments with their origin
    let fragments_path = format!("{output_dir}/stage3_fragments.json");
    fs::write(&fragments_path, serde_json::to_string_pretty(&stages.fragments)?)?;
    println!("  💾 {} ({} fragments)", fragments_path, stages.fragments.len());

    // Stage 4: Final report
    let report_path = format!("{output_dir}/stage4_report.json");
    fs::write(&report_path, report.to_json_pretty()?)?;
    println!("  💾 {} ({} clauses)", report_path, report.clauses.len());

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "input": report.source,
        "captured_at": report.analyzed_at.to_rfc3339(),
        "config_fingerprint": report.config_fingerprint,
        "stage_counts": {
            "extracted_bytes": text.len(),
            "normalized_bytes": stages.normalized.len(),
            "fragments": stages.fragments.len(),
            "clauses": report.clauses.len(),
        },
        "overall_risk": report.summary.overall_risk,
    });
    let summary_path = format!("{output_dir}/summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!("  💾 {summary_path}");

    Ok(())
}
