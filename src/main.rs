use anyhow::Result;
use env_logger::Env;
use prompt_history::{config::Config, run};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = Config::load()?;
    run(config)
}
