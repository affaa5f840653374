//! Audio decoding using Symphonia
//!
//! Decodes any supported container/codec to mono f32 samples. Multi-channel
//! audio is downmixed by averaging the channels; integer sample formats are
//! rescaled to [-1.0, 1.0].

use crate::error::AnalysisError;
use crate::features::AudioSignal;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

/// Decode an audio file to a mono signal
///
/// # Arguments
///
/// * `path` - Path to the audio file
///
/// # Returns
///
/// The decoded mono samples and their sample rate as an [`AudioSignal`].
///
/// # Errors
///
/// Returns `AnalysisError::Decode` if the file cannot be opened, probed as a
/// supported container, or decoded into at least one audio frame.
pub fn decode_audio(path: &Path) -> Result<AudioSignal, AnalysisError> {
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path)
        .map_err(|e| AnalysisError::Decode(format!("cannot open {}: {}", path.display(), e)))?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

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
        .map_err(|e| {
            AnalysisError::Decode(format!("unsupported or corrupt container: {}", e))
        })?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::Decode("no supported audio track found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AnalysisError::Decode(format!("cannot create decoder: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(_) => break,
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => append_mono(&decoded, &mut samples),
            // Corrupt packets are skipped; the rest of the stream may still decode.
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(AnalysisError::Decode(format!("decode failed: {}", e))),
        }
    }

    if samples.is_empty() {
        return Err(AnalysisError::Decode(format!(
            "no audio frames decoded from {}",
            path.display()
        )));
    }

    log::debug!(
        "Decoded {} mono samples at {} Hz from {}",
        samples.len(),
        sample_rate,
        path.display()
    );

    Ok(AudioSignal::new(samples, sample_rate))
}

/// Downmix one decoded buffer to mono f32 and append it to `out`
fn append_mono(decoded: &AudioBufferRef<'_>, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::F32(buf) => downmix(buf.as_ref(), |s| s, out),
        AudioBufferRef::F64(buf) => downmix(buf.as_ref(), |s| s as f32, out),
        AudioBufferRef::S16(buf) => downmix(buf.as_ref(), |s| s as f32 / 32768.0, out),
        AudioBufferRef::S24(buf) => downmix(buf.as_ref(), |s| s.inner() as f32 / 8388608.0, out),
        AudioBufferRef::S32(buf) => downmix(buf.as_ref(), |s| s as f32 / 2147483648.0, out),
        AudioBufferRef::U8(buf) => downmix(buf.as_ref(), |s| (s as f32 - 128.0) / 128.0, out),
        _ => log::warn!("Skipping packet with unsupported sample format"),
    }
}

/// Average all channels of a planar buffer into mono
fn downmix<S, F>(buf: &AudioBuffer<S>, convert: F, out: &mut Vec<f32>)
where
    S: Sample,
    F: Fn(S) -> f32,
{
    let channels = buf.spec().channels.count();
    let frames = buf.frames();

    if channels == 1 {
        out.extend(buf.chan(0).iter().map(|&s| convert(s)));
        return;
    }

    let scale = 1.0 / channels as f32;
    out.reserve(frames);
    for i in 0..frames {
        let mut acc = 0.0f32;
        for ch in 0..channels {
            acc += convert(buf.chan(ch)[i]);
        }
        out.push(acc * scale);
    }
}
