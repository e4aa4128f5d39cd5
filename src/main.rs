use nifti_slice_grid::{cli::Cli, pipeline, plugin};

use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_normalized(std::env::args_os());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .init();

    if cli.is_info_request() {
        if cli.man {
            println!("{}", plugin::man_page());
        }
        if cli.meta {
            println!("{}", serde_json::to_string_pretty(&plugin::meta())?);
        }
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&plugin::app_representation())?);
        }
        if let Some(dir) = &cli.savejson {
            let path = plugin::save_json(dir)?;
            info!(path = %path.display(), "saved plugin representation");
        }
        return Ok(());
    }

    let config = cli.config()?;

    info!("{}", plugin::BANNER);
    info!(version = plugin::VERSION, "starting");

    let summary = pipeline::run(&config)?;
    info!(images = summary.written.len(), "done");
    Ok(())
}
