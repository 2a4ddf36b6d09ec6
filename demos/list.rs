//! Lists all capture-capable video devices.

fn main() -> anyhow::Result<()> {
    env_logger::init();

    for device in vidcap::iter_video_capture_devices()? {
        let _guard = device.acquire()?;
        let info = device.info()?;
        let number = vidcap::device_number(device.path());
        println!(
            "{:>2}: {}",
            number.map(|n| n.to_string()).unwrap_or_default(),
            info.card
        );
        println!("\tdriver  : {}", info.driver);
        println!("\tversion : {}", info.version);
        println!("\tbus     : {}", info.bus_info);
        println!("\tcaps    : {:?}", info.device_capabilities);
        println!();
    }

    Ok(())
}
