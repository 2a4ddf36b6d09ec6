//! Saves the device configuration to a file, or loads and applies one.

use std::env;

use anyhow::{anyhow, bail};
use vidcap::{ConfigManager, Device};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let usage = || anyhow!("usage: save-restore <device> save|load <file>");
    let path = args.next().ok_or_else(usage)?;
    let action = args.next().ok_or_else(usage)?;
    let file = args.next().ok_or_else(usage)?;

    let device = Device::new(path);
    let _guard = device.acquire()?;
    let mut config = ConfigManager::new(&device);

    match action.as_str() {
        "save" => {
            config.save(&file)?;
            println!("configuration written to {}", file);
        }
        "load" => {
            config.load(&file)?;
            config.validate(false)?;
            config.apply()?;
            config.verify()?;
            println!("configuration from {} applied and verified", file);
        }
        other => bail!("unknown action {other:?}"),
    }

    Ok(())
}
