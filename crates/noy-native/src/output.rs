use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use noy_core::SharedMixer;

/// Default output device and its preferred config.
pub struct OutputDevice {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
}

impl OutputDevice {
    pub fn open_default() -> Option<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;
        let config = device.default_output_config().ok()?;
        Some(Self { device, config })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    /// Start a stream that renders `mixer` on the audio callback.
    pub fn play(self, mixer: SharedMixer) -> anyhow::Result<cpal::Stream> {
        let channels = self.config.channels() as usize;
        let err_fn = |err| log::error!("audio stream error: {err}");
        let config: cpal::StreamConfig = self.config.config();

        let stream = match self.config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream_f32(&self.device, &config, channels, mixer, err_fn)?
            }
            cpal::SampleFormat::I16 => {
                build_stream_i16(&self.device, &config, channels, mixer, err_fn)?
            }
            cpal::SampleFormat::U16 => {
                build_stream_u16(&self.device, &config, channels, mixer, err_fn)?
            }
            other => anyhow::bail!("unsupported sample format {other:?}"),
        };
        stream.play()?;
        Ok(stream)
    }
}

fn build_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mixer: SharedMixer,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    device.build_output_stream(
        config,
        move |data: &mut [f32], _| mixer.render(data, channels),
        err_fn,
        None,
    )
}

fn build_stream_i16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mixer: SharedMixer,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    let mut scratch = Vec::new();
    device.build_output_stream(
        config,
        move |data: &mut [i16], _| {
            scratch.resize(data.len(), 0.0f32);
            mixer.render(&mut scratch, channels);
            for (out, s) in data.iter_mut().zip(&scratch) {
                *out = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            }
        },
        err_fn,
        None,
    )
}

fn build_stream_u16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mixer: SharedMixer,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    let mut scratch = Vec::new();
    device.build_output_stream(
        config,
        move |data: &mut [u16], _| {
            scratch.resize(data.len(), 0.0f32);
            mixer.render(&mut scratch, channels);
            for (out, s) in data.iter_mut().zip(&scratch) {
                *out = ((s * 0.5 + 0.5).clamp(0.0, 1.0) * u16::MAX as f32) as u16;
            }
        },
        err_fn,
        None,
    )
}
