use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::audio::domain::audio_reader::{AudioReadError, AudioReader};
use crate::audio::domain::sample_buffer::SampleBuffer;

/// Reads 16-bit PCM WAV files via hound, down-mixing to mono.
pub struct WavAudioReader;

impl AudioReader for WavAudioReader {
    fn read_samples(&self, path: &Path) -> Result<SampleBuffer, AudioReadError> {
        let read_error = |e: hound::Error| AudioReadError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut reader = WavReader::open(path).map_err(read_error)?;
        let spec = reader.spec();
        log::info!(
            "Loaded WAV {}: {} Hz, {} channels, {} bits",
            path.display(),
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample
        );

        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(AudioReadError::UnsupportedFormat {
                path: path.to_path_buf(),
                detail: format!(
                    "expected 16-bit integer PCM, got {}-bit {:?}",
                    spec.bits_per_sample, spec.sample_format
                ),
            });
        }
        if spec.channels == 0 {
            return Err(AudioReadError::UnsupportedFormat {
                path: path.to_path_buf(),
                detail: "zero channels".to_string(),
            });
        }

        let interleaved = reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_error)?;

        let samples = if spec.channels == 1 {
            interleaved
        } else {
            downmix(&interleaved, spec.channels as usize)
        };

        Ok(SampleBuffer::new(samples, spec.sample_rate))
    }
}

/// Average interleaved frames into a single channel. A trailing partial
/// frame is dropped.
fn downmix(interleaved: &[i16], channels: usize) -> Vec<i16> {
    interleaved
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use tempfile::TempDir;

    fn write_wav(dir: &TempDir, name: &str, spec: WavSpec, samples: &[i16]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    fn pcm16(channels: u16, sample_rate: u32) -> WavSpec {
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    #[test]
    fn test_reads_mono_samples_and_rate() {
        let tmp = TempDir::new().unwrap();
        let path = write_wav(&tmp, "mono.wav", pcm16(1, 16000), &[1, -2, 3, -4]);

        let buffer = WavAudioReader.read_samples(&path).unwrap();
        assert_eq!(buffer.samples(), &[1, -2, 3, -4]);
        assert_eq!(buffer.sample_rate(), 16000);
    }

    #[test]
    fn test_downmixes_stereo() {
        let tmp = TempDir::new().unwrap();
        let path = write_wav(&tmp, "stereo.wav", pcm16(2, 16000), &[100, 300, -50, -150]);

        let buffer = WavAudioReader.read_samples(&path).unwrap();
        assert_eq!(buffer.samples(), &[200, -100]);
    }

    #[test]
    fn test_keeps_header_sample_rate() {
        let tmp = TempDir::new().unwrap();
        let path = write_wav(&tmp, "cd.wav", pcm16(1, 44100), &[0; 10]);

        let buffer = WavAudioReader.read_samples(&path).unwrap();
        assert_eq!(buffer.sample_rate(), 44100);
    }

    #[test]
    fn test_rejects_float_wav() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("float.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0.5f32).unwrap();
        writer.finalize().unwrap();

        let err = WavAudioReader.read_samples(&path).unwrap_err();
        assert!(matches!(err, AudioReadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_nonexistent_file_returns_error() {
        let result = WavAudioReader.read_samples(Path::new("/nonexistent/audio.wav"));
        assert!(matches!(result, Err(AudioReadError::Read { .. })));
    }

    #[test]
    fn test_downmix_drops_partial_frame() {
        assert_eq!(downmix(&[2, 4, 6], 2), vec![3]);
    }
}
