use clap::Parser;
use extrudekit::cli::{self, Cli};
use extrudekit::{init_logging, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;
    tracing::debug!("extrudekit {} (built {})", VERSION, BUILD_DATE);

    cli::run(&cli)?;
    Ok(())
}
