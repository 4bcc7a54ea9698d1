mod refresh;
mod serial;

use anyhow::{Context, bail};
use clap::Parser;
use enttec_dmx::{DmxWriter, MAX_PAYLOAD_SIZE};
use log::info;

use crate::serial::SerialTransport;

#[derive(Parser, Debug)]
#[command(name = "dmx-demo", version)]
#[command(about = "Drive an Enttec DMX USB Pro with a constant frame.", long_about = None)]
struct Args {
    /// Serial port of the widget, e.g. COM3 or /dev/ttyUSB0
    #[arg(env = "ENTTEC_PORT", required_unless_present = "list")]
    port: Option<String>,

    /// Frames per second
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u32).range(1..=44))]
    rate: u32,

    /// Number of channels in each frame (24 to 512)
    #[arg(long, default_value_t = 500)]
    channels: usize,

    /// Set every channel to this value instead of the default pattern
    #[arg(long)]
    level: Option<u8>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// List serial ports and exit
    #[arg(long)]
    list: bool,
}

/// The frame to send: `level` on every channel, or the first two channels at full.
fn demo_frame(channels: usize, level: Option<u8>) -> Vec<u8> {
    match level {
        Some(level) => vec![level; channels],
        None => {
            let mut frame = vec![0; channels];
            for channel in frame.iter_mut().take(2) {
                *channel = 255;
            }
            frame
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list {
        for (name, kind) in serial::available_ports()? {
            println!("{name}\t{kind}");
        }
        return Ok(());
    }
    let Some(port) = args.port.as_deref() else {
        bail!("no serial port given");
    };
    if args.channels > MAX_PAYLOAD_SIZE {
        log::warn!(
            "{} channels requested; the widget takes at most {MAX_PAYLOAD_SIZE}",
            args.channels
        );
    }

    let frame = demo_frame(args.channels, args.level);
    let mut writer = DmxWriter::new(SerialTransport::default());
    writer
        .open(port)
        .await
        .with_context(|| format!("couldn't open {port}"))?;
    info!("sending {} channels to {port} at {} Hz", frame.len(), args.rate);

    let stop = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("couldn't listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };
    let result = refresh::run(&mut writer, &frame, args.rate, args.frames, stop).await;
    writer.dispose().await.context("couldn't release the port")?;
    let sent = result?;
    info!("sent {sent} frames");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_frame() {
        let frame = demo_frame(500, None);
        assert_eq!(frame.len(), 500);
        assert_eq!(&frame[..2], &[255, 255]);
        assert!(frame[2..].iter().all(|&c| c == 0));
    }

    #[test]
    fn level_frame() {
        assert_eq!(demo_frame(24, Some(64)), vec![64; 24]);
    }

    #[test]
    fn args_defaults() {
        let args = Args::try_parse_from(["dmx-demo", "COM3"]).unwrap();
        assert_eq!(args.port.as_deref(), Some("COM3"));
        assert_eq!(args.rate, 40);
        assert_eq!(args.channels, 500);
        assert_eq!(args.level, None);
        assert_eq!(args.frames, None);
    }

    #[test]
    fn rate_is_bounded() {
        assert!(Args::try_parse_from(["dmx-demo", "COM3", "--rate", "0"]).is_err());
        assert!(Args::try_parse_from(["dmx-demo", "COM3", "--rate", "100"]).is_err());
    }

    #[test]
    fn list_needs_no_port() {
        let args = Args::try_parse_from(["dmx-demo", "--list"]).unwrap();
        assert!(args.list);
    }
}
