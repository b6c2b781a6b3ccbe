//! Linear interpolation resampling for decoded audio.
//!
//! Good enough for slideshow playback; the teleprompter never pitch-shifts
//! or time-stretches, it only matches the decoder output to the output
//! device rate once at load time.

/// Resample interleaved f32 frames from `source_rate` to `target_rate`.
pub fn linear_resample(
    samples: &[f32],
    channels: u16,
    source_rate: u32,
    target_rate: u32,
) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if source_rate == target_rate || samples.is_empty() || source_rate == 0 {
        return samples.to_vec();
    }

    let source_frames = samples.len() / channels;
    if source_frames < 2 {
        return samples.to_vec();
    }

    let ratio = source_rate as f64 / target_rate as f64;
    let target_frames = ((source_frames as f64) / ratio).floor() as usize;
    let mut out = Vec::with_capacity(target_frames * channels);

    for frame in 0..target_frames {
        let source_pos = frame as f64 * ratio;
        let index = source_pos.floor() as usize;
        let frac = (source_pos - index as f64) as f32;
        let next = (index + 1).min(source_frames - 1);
        for channel in 0..channels {
            let a = samples[index * channels + channel];
            let b = samples[next * channels + channel];
            out.push(a + (b - a) * frac);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_when_rates_match() {
        let samples = vec![0.1, 0.2, 0.3, 0.4];
        assert_eq!(linear_resample(&samples, 2, 48_000, 48_000), samples);
    }

    #[test]
    fn test_downsample_halves_frame_count() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let out = linear_resample(&samples, 1, 48_000, 24_000);
        assert_eq!(out.len(), 50);
        // Interpolated values stay within the source range.
        assert!(out.iter().all(|s| (0.0..1.0).contains(s)));
    }

    #[test]
    fn test_upsample_interpolates_between_frames() {
        let samples = vec![0.0, 1.0];
        let out = linear_resample(&samples, 1, 10, 20);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }
}
