use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

// Import from mystify-core
use mystify_core::{BuildReport, ChapterPipeline, ChapterStages, MystifyConfig, StepProfiler};

// Import CLI utilities
use mystify_cli::find_project_root;

#[derive(Parser)]
#[command(name = "mystify")]
#[command(about = "Convert Markdown chapters into MyST/Sphinx sources and a combined README")]
struct Args {
    /// Project root (default: nearest ancestor of the current directory
    /// that contains the chapters directory)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show the effective configuration and exit
    #[arg(long)]
    show_configs: bool,

    /// Bypass every rewrite rule (only paragraph spacing is normalised)
    #[arg(long)]
    passthrough: bool,

    /// Do not write the combined README
    #[arg(long)]
    no_readme: bool,

    /// Convert everything but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long)]
    profile: bool,

    /// Dump every chapter's intermediate stages to a directory
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output
    #[arg(long, default_value = "stages")]
    stages_dir: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    println!("🦀 Mystify Chapter Converter");

    if let Err(e) = run(&args) {
        eprintln!("❌ Conversion failed: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let config = MystifyConfig::load_from_file(path)?;
            log::info!("Loaded config from {}", path.display());
            println!("📋 Loaded config from: {}", path.display());
            config
        }
        None => {
            println!("📋 Using default config");
            MystifyConfig::default()
        }
    };

    // Apply CLI overrides to config
    if args.passthrough {
        config.passthrough = true;
    }
    if args.no_readme {
        config.combine_readme = false;
    }
    if args.dry_run {
        config.dry_run = true;
    }

    if args.show_configs {
        show_config(&config)?;
        return Ok(());
    }

    let root = match &args.root {
        Some(root) => root.clone(),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            let root = find_project_root(&cwd, &config.paths.chapters_dir)?;
            log::info!(
                "Discovered project root {} from {}",
                root.display(),
                cwd.display()
            );
            root
        }
    };
    println!("📁 Project root: {}", root.display());

    let pipeline = ChapterPipeline::from_config(&config, &root)?;
    let mut profiler = StepProfiler::new(args.profile);

    let report = if args.dump_stages {
        println!("\n🔬 Pipeline stage dump mode");
        let (report, stages) = pipeline.run_capture_stages(&mut profiler)?;
        save_stages(&report, &stages, &args.stages_dir)?;
        println!("\n✅ All stages dumped to: {}", args.stages_dir.display());
        report
    } else {
        pipeline.run_with_profiler(&mut profiler)?
    };

    print_report(&report);

    if profiler.is_enabled() {
        print!("\n{}", profiler.summary());
    }

    Ok(())
}

fn show_config(config: &MystifyConfig) -> Result<()> {
    println!("\n📋 Effective configuration:");
    print!("{}", config.to_yaml()?);

    println!("\n📝 Rules (applied in order, each to the previous rule's output):");
    println!("  Admonition         - '> :kind: title' quotes become fenced directives");
    println!("  HeaderReference    - '## Title' becomes a '(Title)=' anchor plus '# Title'");
    println!("  ConsecutiveHeader  - '###...' headers move up one level");

    println!("\n📝 Usage Examples:");
    println!("  mystify");
    println!("  mystify --root path/to/book --dry-run");
    println!("  mystify -c mystify.yaml --profile");
    Ok(())
}

fn print_report(report: &BuildReport) {
    let verb = if report.dry_run { "Would convert" } else { "Converted" };
    println!(
        "✅ {} {} chapters ({} paragraphs, {} rewritten)",
        verb,
        report.chapters.len(),
        report.total_paragraphs(),
        report.total_rewritten()
    );

    for chapter in &report.chapters {
        println!(
            "   - {}: {} paragraphs, {} rewritten",
            chapter.chapter, chapter.paragraphs, chapter.rewritten_paragraphs
        );
    }

    if let Some(output_dir) = &report.output_dir {
        let verb = if report.dry_run {
            "Would write Sphinx sources to"
        } else {
            "Sphinx sources saved to"
        };
        println!("💾 {}: {}", verb, output_dir.display());
    }
    if let Some(readme) = &report.readme_path {
        let verb = if report.dry_run { "Would write" } else { "Combined README saved to" };
        println!("💾 {}: {} ({} bytes)", verb, readme.display(), report.readme_bytes);
    }
}

fn save_stages(report: &BuildReport, stages: &[ChapterStages], output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    // One file per chapter: paragraphs, per-paragraph rewrites, final output
    for chapter in stages {
        let path = output_dir.join(format!("{}.stages.json", chapter.chapter));
        let json = serde_json::to_string_pretty(chapter)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "  💾 {} ({} paragraphs)",
            path.display(),
            chapter.paragraphs.len()
        );
    }

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "dry_run": report.dry_run,
        "readme_bytes": report.readme_bytes,
        "total_paragraphs": report.total_paragraphs(),
        "total_rewritten": report.total_rewritten(),
        "chapters": report.chapters,
    });
    let summary_path = output_dir.join("summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;
    println!("  💾 {}", summary_path.display());

    Ok(())
}
