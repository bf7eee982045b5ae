use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = quantum_viz::config::Config::parse();
    if cfg.list_variants {
        quantum_viz::app::list_variants()?;
        return Ok(());
    }

    quantum_viz::app::run(cfg)
}
