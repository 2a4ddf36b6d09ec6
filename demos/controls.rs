//! Shows, reads and writes device controls.
//!
//! With no further arguments, all controls are listed per class. With a control name, its value
//! is printed; with a name and a value, the value is written.

use std::env;

use anyhow::{anyhow, bail};
use vidcap::Device;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| anyhow!("usage: controls <device> [<control> [<value>]]"))?;
    let name = args.next();
    let value = args.next();

    let device = Device::new(path);
    let _guard = device.acquire()?;
    let controls = device.controls()?;

    let name = match name {
        Some(name) => name,
        None => {
            for class in controls.used_classes() {
                println!("{:?} controls:", class);
                for control in controls.with_class(class) {
                    println!("  {:?}", control);
                    if let Some(items) = control.menu_items() {
                        for (index, label) in items {
                            println!("     +-- {}: {}", index, label);
                        }
                    }
                }
            }
            return Ok(());
        }
    };

    let control = match controls.get(name.as_str()) {
        Ok(control) => control,
        Err(_) => bail!("device has no control named {name:?}"),
    };

    match value {
        Some(value) => {
            control.set_clipping(true);
            control.set_str(&value)?;
            println!("{} = {}", name, control.value()?);
        }
        None => {
            if control.is_readable() {
                println!("{} = {}", name, control.value()?);
            } else {
                println!("{} is write-only and cannot be read", name);
            }
        }
    }

    Ok(())
}
