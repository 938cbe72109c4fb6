use super::utils::{load_config, store_dir};
use anyhow::Result;
use brandlog_infrastructure::BrandlogPaths;

pub fn show() -> Result<()> {
    let config = load_config()?;

    match BrandlogPaths::config_file() {
        Ok(path) => println!("Config file: {}", path.display()),
        Err(e) => println!("Config file: unavailable ({})", e),
    }
    println!("Store dir:   {}", store_dir(&config)?.display());
    println!();
    // Debug output redacts the remote API key
    println!("{:#?}", config);

    Ok(())
}
