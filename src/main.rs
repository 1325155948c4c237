//! update-verify - command line entry point.
//!
//! Builds the update-verify config for one platform of a release:
//!
//! 1. Load run settings (defaults, `--settings` file, `UPDATE_VERIFY_*` env)
//! 2. Initialize logging → `<log_dir>/update-verify.<date>`
//! 3. Load the release config and patcher config (YAML)
//! 4. Resolve the target release and its historical versions
//! 5. Build the verify matrix for `--platform`
//! 6. Write it to `--output`, replacing any previous file only on success

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use update_verify::services::DEFAULT_FULL_CHECK_LOCALES;
use update_verify::{
    APP_NAME, ConfigLoader, MatrixBuilder, Platform, ReleaseMetadataResolver, Settings, VERSION,
};

#[derive(Parser, Debug)]
#[clap(name = "update-verify", version, about = "Create update verify configs for a release")]
struct Args {
    /// Patcher config describing the update and previous releases
    #[clap(short, long)]
    config: Utf8PathBuf,

    /// Build platform (linux, linux64, macosx64, win32, win64)
    #[clap(long)]
    platform: String,

    /// Release config, relative to --configs-dir unless absolute
    #[clap(short = 'r', long = "release-config-file")]
    release_config: Utf8PathBuf,

    /// Directory holding release configs
    #[clap(short = 'b', long, default_value = ".")]
    configs_dir: Utf8PathBuf,

    /// Update channel the harness queries
    #[clap(long)]
    channel: Option<String>,

    /// Locale to download and diff in full; repeat for more
    #[clap(long = "full-check-locale")]
    full_check_locales: Vec<String>,

    /// Where to write the update verify config
    #[clap(short, long)]
    output: Utf8PathBuf,

    /// Optional settings file (YAML, TOML or JSON)
    #[clap(long)]
    settings: Option<Utf8PathBuf>,

    /// Directory for log files
    #[clap(long)]
    log_dir: Option<String>,

    /// Enable debug logging
    #[clap(long)]
    debug: bool,

    /// Do not mirror log output to the console
    #[clap(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let settings = Settings::load(args.settings.as_deref())?;

    let log_dir = args.log_dir.clone().unwrap_or_else(|| settings.log_dir.clone());
    let _guard = update_verify::logging::setup_logging_with_console(
        &log_dir,
        "update-verify",
        args.debug || settings.debug,
        !args.quiet,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    // Logged while the file appender guard is still alive
    generate(&args, &settings).inspect_err(|e| tracing::error!("Run failed: {:#}", e))
}

fn generate(args: &Args, settings: &Settings) -> Result<()> {
    let channel = args.channel.clone().unwrap_or_else(|| {
        tracing::info!("Using channel {} from settings", settings.channel);
        settings.channel.clone()
    });

    let full_check_locales = if args.full_check_locales.is_empty() {
        if settings.uses_default_full_check_locales() {
            tracing::warn!(
                "No full check locales given, using defaults: {}",
                DEFAULT_FULL_CHECK_LOCALES.join(", ")
            );
        }
        settings.full_check_locales.clone()
    } else {
        args.full_check_locales.clone()
    };

    let platform = Platform::from_build_name(&args.platform)?;

    let loader = ConfigLoader::new(&args.configs_dir);
    let release_config = loader.load_release_config(&args.release_config)?;
    // The patcher config path is taken as given, not relative to the configs dir
    let patcher_config = ConfigLoader::new(".").load_patcher_config(&args.config)?;

    let resolved = ReleaseMetadataResolver::new(&release_config, &patcher_config)
        .resolve()
        .context("Invalid release configuration")?;

    let matrix = MatrixBuilder::new(&resolved, &patcher_config.releases, platform, channel)
        .with_full_check_locales(full_check_locales)
        .build()
        .with_context(|| {
            format!(
                "Failed to build update verify matrix for {} on {}",
                resolved.target_version, platform.build
            )
        })?;

    ConfigLoader::new(".").write_matrix(&matrix, &args.output)?;

    tracing::info!(
        "Update verify config for {} {} ({}) written to {}",
        resolved.app_name,
        resolved.target_display_version,
        platform.update_platform(),
        args.output
    );

    Ok(())
}
