//! Waveform peak extraction for the inline audio scrubber.
//!
//! Rendering the bars is the UI's concern; this module only produces and
//! caches the downsampled min/max peak data. Builds are cancellable: the
//! abort flag is checked between decoded chunks, and a build whose owning
//! asset changed or unmounted mid-decode discards its result.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::decode::decode_audio_chunks;

/// Frames folded into one peak pair.
const PEAK_BLOCK_FRAMES: usize = 1024;

/// One downsampled block: min/max sample scaled to i16.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PeakPair {
    pub min: i16,
    pub max: i16,
}

/// Peaks for one audio asset, cached on disk beside the project.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeakCache {
    pub sample_rate: u32,
    pub block_size: usize,
    pub source_size: u64,
    pub source_mtime: u64,
    pub peaks: Vec<PeakPair>,
}

/// Cache file location for an asset's peaks.
pub fn peak_cache_path(cache_root: &Path, asset_id: Uuid) -> PathBuf {
    cache_root
        .join("audio")
        .join("peaks")
        .join(format!("{}.json", asset_id))
}

/// File size + mtime, the invalidation key for a source file.
pub fn source_identity(path: &Path) -> Result<(u64, u64), String> {
    let metadata = std::fs::metadata(path).map_err(|err| err.to_string())?;
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|duration| duration.as_secs())
        .unwrap_or(0);
    Ok((metadata.len(), mtime))
}

/// True when a cached peak set still matches the source file on disk.
pub fn cache_matches_source(cache: &PeakCache, source_path: &Path) -> bool {
    match source_identity(source_path) {
        Ok((size, mtime)) => cache.source_size == size && cache.source_mtime == mtime,
        Err(_) => false,
    }
}

pub fn load_peak_cache(path: &Path) -> Result<PeakCache, String> {
    let json = std::fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&json).map_err(|err| err.to_string())
}

pub fn write_peak_cache(path: &Path, cache: &PeakCache) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    let json = serde_json::to_string(cache).map_err(|err| err.to_string())?;
    std::fs::write(path, json).map_err(|err| err.to_string())
}

/// Decode a source file into peaks, honoring `abort` between chunks.
pub fn build_peak_cache(source_path: &Path, abort: &AtomicBool) -> Result<PeakCache, String> {
    let (source_size, source_mtime) = source_identity(source_path)?;
    let mut accumulator = PeakAccumulator::new(PEAK_BLOCK_FRAMES);

    let meta = decode_audio_chunks(source_path, 1, |chunk| {
        accumulator.push(chunk);
        !abort.load(Ordering::Relaxed)
    })?;
    if abort.load(Ordering::Relaxed) {
        return Err("Peak build cancelled".to_string());
    }

    Ok(PeakCache {
        sample_rate: meta.source_rate,
        block_size: PEAK_BLOCK_FRAMES,
        source_size,
        source_mtime,
        peaks: accumulator.finish(),
    })
}

/// Build peaks and store them, returning the cache path.
pub fn build_and_store_peak_cache(
    cache_root: &Path,
    asset_id: Uuid,
    source_path: &Path,
    abort: &AtomicBool,
) -> Result<PathBuf, String> {
    let cache = build_peak_cache(source_path, abort)?;
    let cache_path = peak_cache_path(cache_root, asset_id);
    write_peak_cache(&cache_path, &cache)?;
    log::debug!(
        "[AUDIO] Peak cache saved: asset_id={} blocks={}",
        asset_id,
        cache.peaks.len()
    );
    Ok(cache_path)
}

/// Folds mono f32 samples into fixed-size min/max blocks.
pub struct PeakAccumulator {
    block_frames: usize,
    current_min: f32,
    current_max: f32,
    current_count: usize,
    peaks: Vec<PeakPair>,
}

impl PeakAccumulator {
    pub fn new(block_frames: usize) -> Self {
        Self {
            block_frames: block_frames.max(1),
            current_min: f32::MAX,
            current_max: f32::MIN,
            current_count: 0,
            peaks: Vec::new(),
        }
    }

    pub fn push(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.current_min = self.current_min.min(sample);
            self.current_max = self.current_max.max(sample);
            self.current_count += 1;
            if self.current_count >= self.block_frames {
                self.flush_block();
            }
        }
    }

    fn flush_block(&mut self) {
        self.peaks.push(PeakPair {
            min: scale_to_i16(self.current_min),
            max: scale_to_i16(self.current_max),
        });
        self.current_min = f32::MAX;
        self.current_max = f32::MIN;
        self.current_count = 0;
    }

    pub fn finish(mut self) -> Vec<PeakPair> {
        if self.current_count > 0 {
            self.flush_block();
        }
        self.peaks
    }
}

fn scale_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_blocks() {
        let mut acc = PeakAccumulator::new(4);
        acc.push(&[0.0, 0.5, -0.5, 0.25]);
        acc.push(&[1.0, -1.0]);
        let peaks = acc.finish();
        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0].max, scale_to_i16(0.5));
        assert_eq!(peaks[0].min, scale_to_i16(-0.5));
        assert_eq!(peaks[1].max, i16::MAX);
    }

    #[test]
    fn test_scale_clamps() {
        assert_eq!(scale_to_i16(2.0), i16::MAX);
        assert_eq!(scale_to_i16(-2.0), -i16::MAX);
    }

    #[test]
    fn test_cache_round_trip() {
        let dir = std::env::temp_dir().join(format!("segitelep-peaks-{}", Uuid::new_v4()));
        let cache = PeakCache {
            sample_rate: 44_100,
            block_size: PEAK_BLOCK_FRAMES,
            source_size: 10,
            source_mtime: 20,
            peaks: vec![PeakPair { min: -100, max: 100 }],
        };
        let path = peak_cache_path(&dir, Uuid::new_v4());
        write_peak_cache(&path, &cache).unwrap();
        let loaded = load_peak_cache(&path).unwrap();
        assert_eq!(loaded.peaks, cache.peaks);
        std::fs::remove_dir_all(&dir).ok();
    }
}
