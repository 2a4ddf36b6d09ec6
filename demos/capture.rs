//! Captures a few frames and prints their metadata.

use std::env;

use anyhow::anyhow;
use vidcap::{BufType, Device, PixelFormat};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| anyhow!("usage: capture <device> [<count>]"))?;
    let count: usize = match args.next() {
        Some(count) => count.parse()?,
        None => 10,
    };

    let device = Device::new(path);
    let _guard = device.acquire()?;

    device.set_format(BufType::VIDEO_CAPTURE, 640, 480, PixelFormat::MJPG)?;
    let format = device.get_format(BufType::VIDEO_CAPTURE)?;
    println!("negotiated format: {}", format);

    let mut stream = device.capture_stream(4)?;
    for frame in stream.frames().take(count) {
        let frame = frame?;
        println!(
            "#{} {} bytes @ {:.6}s{}",
            frame.sequence(),
            frame.len(),
            frame.timestamp(),
            if frame.is_error() { " (error flag)" } else { "" },
        );
    }

    Ok(())
}
