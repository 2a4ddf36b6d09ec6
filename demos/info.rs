//! Prints detailed device information.

use std::env;

use anyhow::anyhow;
use vidcap::Device;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args.next().ok_or_else(|| anyhow!("usage: info <device>"))?;

    let device = Device::new(path);
    let _guard = device.acquire()?;
    let info = device.info()?;

    println!("card: {}", info.card);
    println!("driver: {}", info.driver);
    println!("bus info: {}", info.bus_info);
    println!("version: {}", info.version);
    println!("all capabilities:    {:?}", info.capabilities);
    println!("avail. capabilities: {:?}", info.device_capabilities);
    println!("buffer types: {:?}", info.buffers);

    println!("- formats:");
    for fmt in &info.formats {
        println!(
            "  - [{}] {} ({:?})",
            fmt.pixel_format, fmt.description, fmt.buf_type
        );
        if !fmt.flags.is_empty() {
            println!("    {:?}", fmt.flags);
        }
    }

    println!("- frame types:");
    for frame_type in &info.frame_types {
        println!(
            "  - {}x{} {} @ {}-{} fps (step {})",
            frame_type.width,
            frame_type.height,
            frame_type.pixel_format,
            frame_type.min_fps,
            frame_type.max_fps,
            frame_type.step_fps,
        );
    }

    println!("- crop capabilities:");
    for crop in &info.crop {
        println!(
            "  - {:?}: bounds {:?}, default {:?}, pixel aspect {}",
            crop.buf_type, crop.bounds, crop.default, crop.pixel_aspect
        );
    }

    println!("- inputs:");
    for input in &info.inputs {
        println!("  - [{:?}] {}", input.input_type, input.name);
        println!("    status: {:?}", input.status);
        println!("    capabilities: {:?}", input.capabilities);
    }

    println!("- controls:");
    for desc in &info.controls {
        println!(
            "  - [{:#010x}] {:?} {:?} [{}-{}, step {}, default {}]",
            desc.id, desc.name, desc.control_type, desc.minimum, desc.maximum, desc.step,
            desc.default_value,
        );
        if !desc.flags.is_empty() {
            println!("    {:?}", desc.flags);
        }
    }

    Ok(())
}
