use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use hawk_sprite_core::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "hawk-sprite",
    about = "Build the Minecraft icon sprite used by the reports UI",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show a progress spinner (disable with --progress=false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the sprite, the SCSS sprite map and the icon index
    Build(BuildArgs),
    /// Resolve report keys against an icon index
    Resolve(ResolveArgs),
}

#[derive(Parser, Debug, Clone)]
struct BuildArgs {
    // Input/Output
    /// Minecraft resources pack (ZIP)
    #[arg(
        long,
        default_value = "static/sprites/resources.zip",
        help_heading = "Input/Output"
    )]
    resources_pack: PathBuf,
    /// Folder with entities/ and gui/ images
    #[arg(long, default_value = "static/sprites/images", help_heading = "Input/Output")]
    images: PathBuf,
    /// Generated sprite image
    #[arg(
        long,
        default_value = "static/dist/sprite/hawk-sprite.png",
        help_heading = "Input/Output"
    )]
    output_sprite: PathBuf,
    /// Generated SCSS sprite map
    #[arg(
        long,
        default_value = "static/scss/reports/minecraft/_icons_map.scss",
        help_heading = "Input/Output"
    )]
    output_scss: PathBuf,
    /// Generated icon index (JSON)
    #[arg(
        long,
        default_value = "static/dist/sprite/icons.json",
        help_heading = "Input/Output"
    )]
    output_index: PathBuf,
    /// YAML config file path (fields override the built-in tables)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Tools
    /// Packer: glue | builtin
    #[arg(long, value_parser = ["glue", "builtin"], default_value = "glue", help_heading = "Tools")]
    packer: String,
    /// glue executable
    #[arg(long, default_value = "glue", help_heading = "Tools")]
    glue: PathBuf,
    /// optipng executable
    #[arg(long, default_value = "optipng", help_heading = "Tools")]
    optipng: PathBuf,
    /// Padding between frames for the builtin packer
    #[arg(long, default_value_t = 0, help_heading = "Tools")]
    padding: u32,
    /// Fast mode: skip the sprite optimization
    #[arg(long, default_value_t = false, help_heading = "Tools")]
    fast: bool,

    // Debug
    /// Debug mode: write the packer outputs to --debug-dir and leave the outputs untouched
    #[arg(long, default_value_t = false, help_heading = "Debug")]
    debug: bool,
    /// Inspection directory used by --debug
    #[arg(long, default_value = "sprite-debug", help_heading = "Debug")]
    debug_dir: PathBuf,
    /// Policy for trim/colorize names missing from the pack: fail | skip
    #[arg(long, help_heading = "Debug")]
    missing_targets: Option<String>,
    /// Print the merged configuration (after YAML/CLI) and exit
    #[arg(long, default_value_t = false, help_heading = "Debug")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Debug")]
    print_config_format: String,
}

#[derive(Parser, Debug, Clone)]
struct ResolveArgs {
    /// Icon index generated by `build`
    #[arg(long, default_value = "static/dist/sprite/icons.json")]
    index: PathBuf,
    /// Tier: normal | small | large
    #[arg(long, default_value = "normal")]
    tier: String,
    /// Keys to resolve (damage causes, statistics, ...)
    #[arg(required = true)]
    keys: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Build(args) => run_build(args, cli.progress && !cli.quiet),
        Commands::Resolve(args) => run_resolve(args),
    }
}

fn load_config(args: &BuildArgs) -> anyhow::Result<SpriteConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let file = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            serde_yaml::from_str::<SpriteConfig>(&file)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => SpriteConfig::default(),
    };
    if let Some(policy) = &args.missing_targets {
        cfg.missing_targets = policy
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown missing-targets policy: {policy}"))?;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run_build(args: &BuildArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = load_config(args)?;

    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let glue = GluePacker::new(&args.glue);
    let shelf = ShelfPacker::new(args.padding);
    let packer: &dyn AtlasPacker = match args.packer.as_str() {
        "builtin" => &shelf,
        _ => &glue,
    };
    let optipng = OptiPng {
        program: args.optipng.clone(),
        ..OptiPng::default()
    };
    let req = BuildRequest {
        resources_pack: args.resources_pack.clone(),
        images: args.images.clone(),
        output_sprite: args.output_sprite.clone(),
        output_scss: args.output_scss.clone(),
        output_index: args.output_index.clone(),
        fast: args.fast,
        inspect_dir: args.debug.then(|| args.debug_dir.clone()),
    };

    let spinner = if show_progress {
        let b = ProgressBar::new_spinner();
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {wide_msg}",
        )?);
        b.enable_steady_tick(Duration::from_millis(120));
        Some(b)
    } else {
        None
    };
    let outcome = build(
        &req,
        &cfg,
        Tools {
            packer,
            optimizer: &optipng,
        },
        |stage| match &spinner {
            Some(b) => b.set_message(stage.label()),
            None => info!("{}", stage.label()),
        },
    );
    if let Some(b) = &spinner {
        b.finish_and_clear();
    }

    match outcome.context("sprite build failed")? {
        BuildOutcome::Written(report) => {
            info!(
                sprite = %req.output_sprite.display(),
                scss = %req.output_scss.display(),
                index = %req.output_index.display(),
                "outputs written"
            );
            println!(
                "Done: {} icons and {} aliases ({} total), sprite is {} KiB.",
                report.icons,
                report.aliases,
                report.total(),
                report.sprite_bytes / 1024
            );
        }
        BuildOutcome::Inspected { dir } => {
            warn!("debug mode: production files were not modified");
            println!("Debug outputs written to {}", dir.display());
        }
    }
    Ok(())
}

fn run_resolve(args: &ResolveArgs) -> anyhow::Result<()> {
    let tier: Tier = args
        .tier
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown tier: {}", args.tier))?;
    let index = IconIndex::load_or_empty(&args.index)
        .with_context(|| format!("read {}", args.index.display()))?;
    let resolver = IconResolver::new(index, CuratedTable::builtin(), MemoryCache::seeded());
    for key in &args.keys {
        println!("{key} -> {}", resolver.resolve(key, tier));
    }
    Ok(())
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
