use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::info;

/// Duration of a media clip in milliseconds, taken from its default track
pub fn probe_duration_ms(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();

    let file = File::open(path).context("Failed to open clip")?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Unsupported clip format")?;

    let track = probed
        .format
        .default_track()
        .context("Clip has no playable track")?;
    let params = &track.codec_params;
    let n_frames = params.n_frames.context("Clip length is unknown")?;

    let duration_ms = if let Some(time_base) = params.time_base {
        let time = time_base.calc_time(n_frames);
        time.seconds * 1000 + (time.frac * 1000.0).round() as u64
    } else if let Some(sample_rate) = params.sample_rate {
        n_frames * 1000 / sample_rate as u64
    } else {
        anyhow::bail!("Clip has neither a time base nor a sample rate");
    };

    info!("Probed {}: {}ms", path.display(), duration_ms);

    Ok(duration_ms)
}
