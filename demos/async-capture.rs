//! Captures frames through the async reader.

use std::env;
use std::time::Duration;

use anyhow::anyhow;
use vidcap::reader::AsyncFrameReader;
use vidcap::Device;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| anyhow!("usage: async-capture <device>"))?;

    let device = Device::new(path);
    let mut reader = AsyncFrameReader::start(device, 4);

    for _ in 0..30 {
        match reader.read_timeout(Duration::from_secs(5)).await? {
            Some(frame) => println!(
                "#{} {} bytes @ {:.6}s",
                frame.sequence(),
                frame.len(),
                frame.timestamp(),
            ),
            None => {
                println!("timed out waiting for a frame");
                break;
            }
        }
    }

    Ok(())
}
