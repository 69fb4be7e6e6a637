use std::path::Path;

use claxon::FlacReader;

/// Decodes FLAC or WAV into `(sample_rate_hz, mono samples in [-1, 1])`.
pub fn read_mono(path: &Path) -> Result<(u32, Vec<f32>), String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("flac") => read_flac_mono(path),
        Some("wav") | Some("wave") => read_wav_mono(path),
        _ => Err(format!(
            "Unsupported audio file '{}': expected .flac or .wav",
            path.display()
        )),
    }
}

fn int_scale(bits_per_sample: u32) -> f32 {
    if bits_per_sample > 1 {
        ((1_i64 << (bits_per_sample - 1)) - 1) as f32
    } else {
        1.0
    }
}

fn downmix(interleaved: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved;
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

fn read_flac_mono(path: &Path) -> Result<(u32, Vec<f32>), String> {
    let mut reader = FlacReader::open(path)
        .map_err(|err| format!("Failed to decode FLAC '{}': {err}", path.display()))?;
    let streaminfo = reader.streaminfo();
    let channels = streaminfo.channels as usize;
    let scale = int_scale(streaminfo.bits_per_sample);
    if channels == 0 {
        return Err(format!("FLAC has zero channels: {}", path.display()));
    }

    let mut interleaved = Vec::new();
    for sample in reader.samples() {
        let sample = sample
            .map_err(|err| format!("Failed reading sample from '{}': {err}", path.display()))?;
        interleaved.push(sample as f32 / scale);
    }
    Ok((streaminfo.sample_rate, downmix(interleaved, channels)))
}

fn read_wav_mono(path: &Path) -> Result<(u32, Vec<f32>), String> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|err| format!("Failed to decode WAV '{}': {err}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(format!("WAV has zero channels: {}", path.display()));
    }

    let interleaved = match spec.sample_format {
        hound::SampleFormat::Int => {
            let scale = int_scale(u32::from(spec.bits_per_sample));
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 / scale))
                .collect::<Result<Vec<f32>, _>>()
        }
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<f32>, _>>(),
    }
    .map_err(|err| format!("Failed reading sample from '{}': {err}", path.display()))?;
    Ok((spec.sample_rate, downmix(interleaved, channels)))
}
