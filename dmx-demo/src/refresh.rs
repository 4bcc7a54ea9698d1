use std::time::Duration;

use anyhow::Context;
use enttec_dmx::{DmxWriter, Transport};
use log::debug;
use tokio::time::MissedTickBehavior;

/// Write `frame` `rate` times a second until `stop` completes or `limit` frames are sent.
///
/// Returns the number of frames written. The first failed write ends the loop.
pub async fn run<T: Transport>(
    writer: &mut DmxWriter<T>,
    frame: &[u8],
    rate: u32,
    limit: Option<u64>,
    stop: impl Future<Output = ()>,
) -> anyhow::Result<u64> {
    let mut ticker = tokio::time::interval(Duration::from_secs(1) / rate.max(1));
    // a slow port shouldn't make us burst frames to catch up
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut stop = std::pin::pin!(stop);
    let mut sent = 0;

    while limit.is_none_or(|limit| sent < limit) {
        tokio::select! {
            biased;

            _ = &mut stop => {
                debug!("refresh loop received stop");
                break;
            }

            _ = ticker.tick() => {
                writer
                    .write(frame)
                    .await
                    .with_context(|| format!("couldn't send frame {sent} to {:?}", writer.name()))?;
                sent += 1;
            }
        }
    }
    Ok(sent)
}
