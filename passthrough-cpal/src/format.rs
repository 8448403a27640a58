use cpal::{SampleFormat, SizedSample};
use passthrough_core::{PlatformStatus, SampleEncoding};

/// cpal sample format carrying `encoding`, or `None` for compressed
/// encodings a desktop stream cannot carry.
pub fn sample_format(encoding: SampleEncoding) -> Option<SampleFormat> {
    match encoding {
        SampleEncoding::Pcm8Bit => Some(SampleFormat::U8),
        SampleEncoding::Default | SampleEncoding::Pcm16Bit => Some(SampleFormat::I16),
        SampleEncoding::PcmFloat => Some(SampleFormat::F32),
        _ => None,
    }
}

/// cpal format and bytes per sample for `encoding`.
pub fn pcm_layout(encoding: SampleEncoding) -> Option<(SampleFormat, usize)> {
    Some((sample_format(encoding)?, encoding.bytes_per_sample()?))
}

/// Convert a frame count to a byte count, clamped to the sizing query's
/// `i32` range. Zero frames is reported as a generic error.
pub fn frames_to_bytes(frames: u32, channels: u16, width: usize) -> i32 {
    if frames == 0 {
        return PlatformStatus::ERROR;
    }
    let bytes = frames as u64 * channels as u64 * width as u64;
    i32::try_from(bytes).unwrap_or(i32::MAX)
}

/// A cpal sample that travels through the pump as little-endian bytes.
pub trait PcmSample: SizedSample + Send + 'static {
    const WIDTH: usize;

    fn from_le(bytes: &[u8]) -> Self;

    fn put_le(self, out: &mut Vec<u8>);
}

macro_rules! pcm_sample {
    ($($t:ty),* $(,)?) => {
        $(
            impl PcmSample for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                fn from_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(&bytes[..Self::WIDTH]);
                    <$t>::from_le_bytes(raw)
                }

                fn put_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

pcm_sample!(u8, i16, f32);

/// Append `samples` to `out` as little-endian bytes.
pub fn encode<T: PcmSample>(samples: &[T], out: &mut Vec<u8>) {
    out.reserve(samples.len() * T::WIDTH);
    for &sample in samples {
        sample.put_le(out);
    }
}

/// Fill `out` from `bytes`; slots without a complete sample get silence.
pub fn decode<T: PcmSample>(bytes: &[u8], out: &mut [T]) {
    let mut chunks = bytes.chunks_exact(T::WIDTH);
    for slot in out.iter_mut() {
        *slot = match chunks.next() {
            Some(chunk) => T::from_le(chunk),
            None => T::EQUILIBRIUM,
        };
    }
}
