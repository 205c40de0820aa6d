use std::{error::Error as _, io::Write, path::PathBuf, process::ExitCode};

use clap::Parser;
use env_logger::Builder;
use log::{debug, error, info, log_enabled, Level, LevelFilter};
use scale_clusterdef::{
    cluster_definition::build_cluster_definition,
    document::{write_document, DocumentFormat},
    error::Result,
    failure_group_strategies,
    inventory::Inventory,
};

/// Converts a Terraform inventory into a Spectrum Scale cluster definition for the installer.
#[derive(Parser, Debug)]
struct Args {
    /// Terraform inventory file path (JSON or YAML).
    #[arg(long = "tf_inv_path")]
    tf_inv_path: PathBuf,

    /// Spectrum Scale cluster definition output path. `.yaml`/`.yml` selects YAML, anything else JSON.
    #[arg(long = "scale_cluster_def_path")]
    scale_cluster_def_path: PathBuf,

    /// Spectrum Scale tuning profile file path. Only its name and directory are recorded.
    #[arg(long = "scale_tuning_profile_file")]
    scale_tuning_profile_file: PathBuf,

    /// How storage nodes are mapped to failure groups: `auto`, `split` or `subnet`.
    #[arg(long = "failure_groups", default_value = "auto")]
    failure_groups: String,

    /// Print log messages.
    #[arg(long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<()> {
    let inventory = Inventory::from_file(&args.tf_inv_path)?;
    let strategy = failure_group_strategies::resolve(&args.failure_groups, inventory.is_multi_az())?;
    let definition = build_cluster_definition(&inventory, &args.scale_tuning_profile_file, strategy.as_ref())?;

    if log_enabled!(Level::Debug) {
        debug!(
            "content of cluster definition: {}",
            DocumentFormat::from_path(&args.scale_cluster_def_path).render(&definition)?
        );
    }
    info!("writing cluster definition to {}", args.scale_cluster_def_path.display());
    write_document(&definition, &args.scale_cluster_def_path)?;
    info!(
        "completed writing cluster definition to {}",
        args.scale_cluster_def_path.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    Builder::new()
        .filter_level(if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn })
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
