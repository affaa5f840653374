//! Still-image music video encoding
//!
//! Wraps the external `ffmpeg` binary: one still image looped over the full
//! audio track, encoded with a fixed configuration suited to beat videos.
//! Availability is probed at construction so missing tooling surfaces as an
//! error before any work is queued.

use std::fmt;
use std::path::Path;
use std::process::Command;

/// Fixed encoding parameters for generated videos
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Video codec (default: libx264)
    pub video_codec: String,

    /// Encoder tuning profile (default: stillimage)
    pub tune: String,

    /// Audio codec (default: aac)
    pub audio_codec: String,

    /// Audio bitrate (default: 192k)
    pub audio_bitrate: String,

    /// Pixel format for broad player compatibility (default: yuv420p)
    pub pixel_format: String,

    /// Output frame rate; 1 fps keeps still-image output small (default: 1)
    pub frame_rate: u32,

    /// Output resolution as WxH (default: 1920x1080)
    pub resolution: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            tune: "stillimage".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
            pixel_format: "yuv420p".to_string(),
            frame_rate: 1,
            resolution: "1920x1080".to_string(),
        }
    }
}

/// Errors reported by the media encoder
#[derive(Debug)]
pub enum EncoderError {
    /// ffmpeg is not installed or not runnable
    Unavailable(String),

    /// The encoder process could not be spawned or awaited
    Io(std::io::Error),

    /// ffmpeg ran and reported failure; the payload carries its stderr
    Ffmpeg(String),
}

impl fmt::Display for EncoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncoderError::Unavailable(msg) => write!(f, "Encoder unavailable: {}", msg),
            EncoderError::Io(err) => write!(f, "Encoder I/O error: {}", err),
            EncoderError::Ffmpeg(stderr) => write!(f, "FFmpeg error: {}", stderr),
        }
    }
}

impl std::error::Error for EncoderError {}

/// External media encoder wrapper
///
/// Accepts an audio file, a static image, and an output path, and produces a
/// muxed video deterministically encoded per the fixed [`EncoderConfig`].
#[derive(Debug, Clone)]
pub struct VideoEncoder {
    config: EncoderConfig,
}

impl VideoEncoder {
    /// Create an encoder with the default configuration
    ///
    /// # Errors
    ///
    /// Returns `EncoderError::Unavailable` if `ffmpeg -version` cannot be run
    /// successfully.
    pub fn new() -> Result<Self, EncoderError> {
        Self::with_config(EncoderConfig::default())
    }

    /// Create an encoder with an explicit configuration
    pub fn with_config(config: EncoderConfig) -> Result<Self, EncoderError> {
        match Command::new("ffmpeg").arg("-version").output() {
            Ok(out) if out.status.success() => Ok(Self { config }),
            Ok(out) => Err(EncoderError::Unavailable(format!(
                "ffmpeg -version exited with {}",
                out.status
            ))),
            Err(e) => Err(EncoderError::Unavailable(format!("ffmpeg not found: {}", e))),
        }
    }

    /// Mux `audio` and a looped still `image` into `output`
    ///
    /// The output stops at the end of the audio stream (`-shortest`) and an
    /// existing file at `output` is overwritten.
    ///
    /// # Errors
    ///
    /// Returns `EncoderError::Io` if the process cannot be spawned and
    /// `EncoderError::Ffmpeg` (carrying ffmpeg's stderr) if encoding fails.
    pub fn encode(&self, audio: &Path, image: &Path, output: &Path) -> Result<(), EncoderError> {
        let args = self.build_args(audio, image, output);
        log::debug!("Running ffmpeg with args: {:?}", args);

        let out = Command::new("ffmpeg")
            .args(&args)
            .output()
            .map_err(EncoderError::Io)?;

        if out.status.success() {
            log::debug!("Encoded video to {}", output.display());
            Ok(())
        } else {
            Err(EncoderError::Ffmpeg(
                String::from_utf8_lossy(&out.stderr).into_owned(),
            ))
        }
    }

    /// ffmpeg argv for one encode, minus the program name
    fn build_args(&self, audio: &Path, image: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-loop".to_string(),
            "1".to_string(),
            "-i".to_string(),
            image.display().to_string(),
            "-i".to_string(),
            audio.display().to_string(),
            "-c:v".to_string(),
            self.config.video_codec.clone(),
            "-tune".to_string(),
            self.config.tune.clone(),
            "-c:a".to_string(),
            self.config.audio_codec.clone(),
            "-b:a".to_string(),
            self.config.audio_bitrate.clone(),
            "-pix_fmt".to_string(),
            self.config.pixel_format.clone(),
            "-shortest".to_string(),
            "-r".to_string(),
            self.config.frame_rate.to_string(),
            "-s".to_string(),
            self.config.resolution.clone(),
            output.display().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_carries_fixed_configuration() {
        let encoder = VideoEncoder {
            config: EncoderConfig::default(),
        };
        let args = encoder.build_args(
            Path::new("track.mp3"),
            Path::new("cover.jpg"),
            Path::new("out.mp4"),
        );

        for expected in [
            "-y", "-loop", "-c:v", "libx264", "-tune", "stillimage", "-c:a", "aac", "-b:a",
            "192k", "-pix_fmt", "yuv420p", "-shortest", "-s", "1920x1080",
        ] {
            assert!(
                args.iter().any(|a| a == expected),
                "missing {} in {:?}",
                expected,
                args
            );
        }

        // Image is the looped input, audio the second input, output last.
        let image_pos = args.iter().position(|a| a == "cover.jpg").unwrap();
        let audio_pos = args.iter().position(|a| a == "track.mp3").unwrap();
        assert!(image_pos < audio_pos);
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn test_build_args_respects_custom_config() {
        let encoder = VideoEncoder {
            config: EncoderConfig {
                resolution: "1280x720".to_string(),
                frame_rate: 2,
                ..EncoderConfig::default()
            },
        };
        let args = encoder.build_args(Path::new("a.wav"), Path::new("i.png"), Path::new("v.mp4"));
        assert!(args.iter().any(|a| a == "1280x720"));
        assert!(args.windows(2).any(|w| w[0] == "-r" && w[1] == "2"));
    }

    #[test]
    fn test_error_display() {
        let err = EncoderError::Unavailable("ffmpeg not found".to_string());
        assert!(err.to_string().contains("ffmpeg not found"));

        let err = EncoderError::Ffmpeg("frame write failed".to_string());
        assert!(err.to_string().starts_with("FFmpeg error"));
    }
}
