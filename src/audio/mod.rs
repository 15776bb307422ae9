//! Audio chunking and concatenation utilities.
//!
//! The transcription service rejects uploads over a fixed size, so long
//! session recordings get split into contiguous MP3 chunks first. The chunk
//! count comes from measuring a short sample at the export bitrate and
//! extrapolating: over-estimating the count is fine, an oversized chunk is
//! not. All exports go through ffmpeg; durations are probed with ffprobe.

use crate::config::AudioSettings;
use crate::error::{Result, SagaError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// A single audio chunk, ordered by time.
///
/// For recordings under the size ceiling this is the original file itself.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub path: PathBuf,
    /// Zero-based position in time order.
    pub index: usize,
    pub start_ms: u64,
    pub duration_ms: u64,
}

/// Parameters controlling chunk planning and export.
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    pub max_bytes: u64,
    pub bitrate: String,
    pub sample_seconds: u32,
    pub safety_factor: f64,
}

impl From<&AudioSettings> for ChunkOptions {
    fn from(settings: &AudioSettings) -> Self {
        Self {
            max_bytes: settings.max_upload_bytes,
            bitrate: settings.chunk_bitrate.clone(),
            sample_seconds: settings.sample_seconds,
            safety_factor: settings.safety_factor,
        }
    }
}

/// Compute how many chunks an estimated compressed size requires.
///
/// The safety factor pads the ratio before rounding up, and the extra +1
/// chunk pads it again: the estimate comes from a single sample, so it must
/// err toward more, smaller chunks.
pub fn chunk_count(estimated_bytes: f64, max_bytes: u64, safety_factor: f64) -> usize {
    ((estimated_bytes / max_bytes as f64) * safety_factor).ceil() as usize + 1
}

/// Plan contiguous, gapless segments covering the full duration.
///
/// Boundaries are in integer milliseconds. All segments share the same
/// length except the last, which absorbs the division remainder, so the
/// durations always sum to exactly `total_ms`.
pub fn plan_segments(total_ms: u64, num_chunks: usize) -> Vec<(u64, u64)> {
    let chunk_ms = total_ms / num_chunks as u64;

    (0..num_chunks)
        .map(|i| {
            let start = i as u64 * chunk_ms;
            let end = if i == num_chunks - 1 {
                total_ms
            } else {
                (i as u64 + 1) * chunk_ms
            };
            (start, end - start)
        })
        .collect()
}

/// Split an audio file into chunks that fit under the upload ceiling.
///
/// A file already under the ceiling comes back as a single chunk pointing
/// at the original, untouched. Otherwise chunks are exported into `workdir`
/// (caller-owned; deleting it after transcription cleans everything up).
/// The measurement sample is removed before returning.
#[instrument(skip(workdir, opts), fields(source = %source.display()))]
pub async fn chunk_audio(source: &Path, workdir: &Path, opts: &ChunkOptions) -> Result<Vec<AudioChunk>> {
    if !source.exists() {
        return Err(SagaError::Audio(format!(
            "Audio file not found: {}",
            source.display()
        )));
    }

    let file_size = std::fs::metadata(source)?.len();
    let total_ms = probe_duration_ms(source).await?;

    if file_size <= opts.max_bytes {
        info!(
            "Audio file is {:.2} MB, under the {:.0} MB limit; no chunking needed",
            mb(file_size),
            mb(opts.max_bytes)
        );
        return Ok(vec![AudioChunk {
            path: source.to_path_buf(),
            index: 0,
            start_ms: 0,
            duration_ms: total_ms,
        }]);
    }

    info!(
        "Audio file is {:.2} MB, over the {:.0} MB limit; splitting",
        mb(file_size),
        mb(opts.max_bytes)
    );

    std::fs::create_dir_all(workdir)?;

    // Estimate the compressed size from a short sample at the chunk bitrate.
    let sample_ms = (opts.sample_seconds as u64 * 1000).min(total_ms);
    let sample_path = workdir.join("sample.mp3");
    export_clip(source, &sample_path, 0, sample_ms, &opts.bitrate).await?;
    let sample_size = std::fs::metadata(&sample_path)?.len();
    std::fs::remove_file(&sample_path)?;

    let estimated_size = sample_size as f64 / sample_ms as f64 * total_ms as f64;
    let num_chunks = chunk_count(estimated_size, opts.max_bytes, opts.safety_factor);

    info!(
        "Estimated compressed size {:.2} MB; splitting into {} chunks",
        mb(estimated_size as u64),
        num_chunks
    );

    let mut chunks = Vec::with_capacity(num_chunks);
    for (i, (start_ms, duration_ms)) in plan_segments(total_ms, num_chunks).into_iter().enumerate() {
        let chunk_path = workdir.join(format!("chunk_{}.mp3", i + 1));
        export_clip(source, &chunk_path, start_ms, duration_ms, &opts.bitrate).await?;

        let chunk_size = std::fs::metadata(&chunk_path)?.len();
        debug!(
            "Chunk {}/{}: {:.2} MB",
            i + 1,
            num_chunks,
            mb(chunk_size)
        );
        if chunk_size > opts.max_bytes {
            // The chunk count is an estimate from one sample; it can
            // under-shoot on recordings with very uneven audio density.
            warn!(
                "Chunk {} is {:.2} MB, over the {:.0} MB limit; the upload may be rejected",
                i + 1,
                mb(chunk_size),
                mb(opts.max_bytes)
            );
        }

        chunks.push(AudioChunk {
            path: chunk_path,
            index: i,
            start_ms,
            duration_ms,
        });
    }

    Ok(chunks)
}

/// Concatenate two recordings into one output file without re-encoding.
///
/// Both inputs must share container and codec (the usual case: two halves
/// of the same session recorded by the same device).
#[instrument(skip_all, fields(output = %output.display()))]
pub async fn join_audio(first: &Path, second: &Path, output: &Path) -> Result<()> {
    for input in [first, second] {
        if !input.exists() {
            return Err(SagaError::Audio(format!(
                "Audio file not found: {}",
                input.display()
            )));
        }
    }

    // ffmpeg's concat demuxer wants a list file.
    let list_dir = tempfile::tempdir()?;
    let list_path = list_dir.path().join("concat.txt");
    let list_content = format!(
        "file '{}'\nfile '{}'\n",
        std::fs::canonicalize(first)?.display(),
        std::fs::canonicalize(second)?.display()
    );
    std::fs::write(&list_path, list_content)?;

    let result = Command::new("ffmpeg")
        .arg("-f").arg("concat")
        .arg("-safe").arg("0")
        .arg("-i").arg(&list_path)
        .arg("-c").arg("copy")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(output)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => {
            info!("Combined audio saved to {}", output.display());
            Ok(())
        }
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(SagaError::ToolFailed(format!("ffmpeg concat failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SagaError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(SagaError::ToolFailed(format!("ffmpeg error: {e}"))),
    }
}

/// Export a time range of an audio file as MP3 at a fixed bitrate.
async fn export_clip(
    source: &Path,
    dest: &Path,
    start_ms: u64,
    duration_ms: u64,
    bitrate: &str,
) -> Result<()> {
    let result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start_ms as f64 / 1000.0))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", duration_ms as f64 / 1000.0))
        .arg("-vn")
        .arg("-codec:a").arg("libmp3lame")
        .arg("-b:a").arg(bitrate)
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(SagaError::ToolFailed(format!("ffmpeg export failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SagaError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(SagaError::ToolFailed(format!("ffmpeg error: {e}"))),
    }
}

/// Query the duration of an audio file in milliseconds using ffprobe.
async fn probe_duration_ms(path: &Path) -> Result<u64> {
    let result = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SagaError::ToolNotFound("ffprobe".into()));
        }
        Err(e) => {
            return Err(SagaError::ToolFailed(format!("ffprobe failed: {e}")));
        }
    };

    if !output.status.success() {
        return Err(SagaError::Audio(format!(
            "ffprobe returned error for {}",
            path.display()
        )));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|_| SagaError::Audio("Invalid ffprobe output".into()))?;

    let seconds = parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| SagaError::Audio("Could not determine audio duration".into()))?;

    Ok((seconds * 1000.0).round() as u64)
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn test_chunk_count_over_limit() {
        // 30 MB estimate against a 25 MB ceiling: ceil(1.2 * 1.2) + 1 = 3.
        let n = chunk_count(30.0 * MB as f64, 25 * MB, 1.2);
        assert!(n >= 2);
        assert_eq!(n, 3);
    }

    #[test]
    fn test_chunk_count_always_over_estimates() {
        for estimated in [1.0, 24.9, 25.0, 26.0, 100.0, 500.0] {
            let estimated_bytes = estimated * MB as f64;
            let n = chunk_count(estimated_bytes, 25 * MB, 1.2);
            // Even a perfect estimate leaves each chunk comfortably under
            // the ceiling.
            assert!(estimated_bytes / n as f64 <= (25 * MB) as f64);
            assert!(n >= 2);
        }
    }

    #[test]
    fn test_plan_segments_durations_sum_to_total() {
        for (total_ms, n) in [(10_000, 3), (3_600_000, 7), (12_345_678, 11), (999, 4)] {
            let segments = plan_segments(total_ms, n);
            assert_eq!(segments.len(), n);
            let sum: u64 = segments.iter().map(|(_, d)| d).sum();
            assert_eq!(sum, total_ms);
        }
    }

    #[test]
    fn test_plan_segments_contiguous_and_gapless() {
        let segments = plan_segments(7_200_000, 5);
        assert_eq!(segments[0].0, 0);
        for pair in segments.windows(2) {
            let (start, duration) = pair[0];
            assert_eq!(start + duration, pair[1].0);
        }
        let (last_start, last_duration) = *segments.last().unwrap();
        assert_eq!(last_start + last_duration, 7_200_000);
    }

    #[test]
    fn test_plan_segments_last_absorbs_remainder() {
        let segments = plan_segments(10, 3);
        assert_eq!(segments, vec![(0, 3), (3, 3), (6, 4)]);
    }

    #[tokio::test]
    async fn test_chunk_audio_missing_source_fails_early() {
        let workdir = tempfile::tempdir().unwrap();
        let opts = ChunkOptions::from(&AudioSettings::default());
        let result = chunk_audio(Path::new("/no/such/session.m4a"), workdir.path(), &opts).await;
        assert!(matches!(result, Err(SagaError::Audio(_))));
        // Nothing was written.
        assert_eq!(std::fs::read_dir(workdir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_join_audio_missing_input_fails_early() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("joined.m4a");
        let result = join_audio(Path::new("/no/a.m4a"), Path::new("/no/b.m4a"), &out).await;
        assert!(matches!(result, Err(SagaError::Audio(_))));
    }
}
