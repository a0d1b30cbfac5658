use noy_core::{EngineError, EngineResult, LoopClip};
use std::path::{Path, PathBuf};

/// WAV file for a configured asset path: same stem, looked up in `dir`.
///
/// `audio/noy3.ogg` becomes `<dir>/noy3.wav`.
pub fn wav_path(dir: &Path, asset: &str) -> PathBuf {
    let stem = Path::new(asset)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| asset.to_string());
    dir.join(format!("{stem}.wav"))
}

pub fn load_clip(path: &Path) -> EngineResult<LoopClip> {
    let shown = path.display().to_string();
    let mut reader =
        hound::WavReader::open(path).map_err(|e| EngineError::asset(&shown, e.to_string()))?;
    let spec = reader.spec();
    let data: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| EngineError::asset(&shown, e.to_string()))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .map_err(|e| EngineError::asset(&shown, e.to_string()))?
        }
    };
    let clip = LoopClip::from_interleaved(&data, spec.channels as usize, spec.sample_rate);
    log::info!(
        "[assets] {} {}ch {}Hz {:.3}s",
        shown,
        spec.channels,
        spec.sample_rate,
        clip.duration()
    );
    Ok(clip)
}

/// Load every level loop, quietest first. Fails on the first bad file.
pub fn load_bank(dir: &Path, assets: &[String]) -> EngineResult<Vec<LoopClip>> {
    assets
        .iter()
        .map(|a| load_clip(&wav_path(dir, a)))
        .collect()
}
