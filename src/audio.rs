use js_sys::ArrayBuffer;
use noy_core::{AudioBackend, EngineError, EngineResult, PlaySpec};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn js_err(e: JsValue) -> String {
    format!("{:?}", e)
}

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> EngineResult<web::GainNode> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("{} GainNode error: {:?}", label, e);
            Err(EngineError::audio(js_err(e)))
        }
    }
}

/// [`AudioBackend`] over a browser `AudioContext`.
///
/// Every call maps onto the matching Web Audio primitive; the audio thread
/// does the actual timing.
pub struct WebAudioBackend {
    ctx: web::AudioContext,
    master: Option<web::GainNode>,
}

impl WebAudioBackend {
    /// Must run inside a user gesture, or the context starts suspended.
    pub fn new() -> EngineResult<Self> {
        let ctx = web::AudioContext::new().map_err(|e| EngineError::audio(js_err(e)))?;
        Ok(Self { ctx, master: None })
    }

    pub fn context(&self) -> &web::AudioContext {
        &self.ctx
    }
}

impl AudioBackend for WebAudioBackend {
    type Gain = web::GainNode;
    type Source = web::AudioBufferSourceNode;
    type Buffer = web::AudioBuffer;

    fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }

    fn init_master(&mut self, gain: f32) -> EngineResult<()> {
        if self.master.is_some() {
            return Ok(());
        }
        let master = create_gain(&self.ctx, gain, "Master")?;
        master
            .connect_with_audio_node(&self.ctx.destination())
            .map_err(|e| EngineError::audio(js_err(e)))?;
        self.master = Some(master);
        Ok(())
    }

    fn create_gain(&mut self, initial: f32) -> EngineResult<web::GainNode> {
        let Some(master) = &self.master else {
            return Err(EngineError::audio("master bus not initialised"));
        };
        let g = create_gain(&self.ctx, initial, "Level")?;
        _ = g.connect_with_audio_node(master);
        Ok(g)
    }

    fn gain_value(&self, gain: &web::GainNode) -> f32 {
        gain.gain().value()
    }

    fn cancel_scheduled_values(&mut self, gain: &web::GainNode, from: f64) {
        _ = gain.gain().cancel_scheduled_values(from);
    }

    fn set_value_at_time(&mut self, gain: &web::GainNode, value: f32, at: f64) {
        _ = gain.gain().set_value_at_time(value, at);
    }

    fn linear_ramp_to_value_at_time(&mut self, gain: &web::GainNode, value: f32, at: f64) {
        _ = gain.gain().linear_ramp_to_value_at_time(value, at);
    }

    fn buffer_duration(&self, buffer: &web::AudioBuffer) -> f64 {
        buffer.duration()
    }

    #[allow(deprecated)]
    fn play_buffer(
        &mut self,
        buffer: &web::AudioBuffer,
        gain: &web::GainNode,
        spec: PlaySpec,
    ) -> EngineResult<web::AudioBufferSourceNode> {
        let src = self
            .ctx
            .create_buffer_source()
            .map_err(|e| EngineError::audio(js_err(e)))?;
        src.set_buffer(Some(buffer));
        if let Some(end) = spec.loop_end {
            src.set_loop(true);
            src.set_loop_start(0.0);
            src.set_loop_end(end);
        }
        src.connect_with_audio_node(gain)
            .map_err(|e| EngineError::audio(js_err(e)))?;
        src.start_with_when_and_grain_offset(spec.when, spec.offset)
            .map_err(|e| EngineError::audio(js_err(e)))?;
        Ok(src)
    }

    fn stop_source(&mut self, source: &web::AudioBufferSourceNode, at: f64) {
        // Throws when already stopped; nothing to do then.
        #[allow(deprecated)]
        let _ = source.stop_with_when(at);
    }

    fn resume(&mut self) -> EngineResult<()> {
        if self.ctx.state() == web::AudioContextState::Closed {
            return Err(EngineError::audio("audio context closed"));
        }
        self.ctx
            .resume()
            .map(|_| ())
            .map_err(|e| EngineError::audio(js_err(e)))
    }

    fn suspend(&mut self) {
        _ = self.ctx.suspend();
    }
}

/// Wait for a suspended context to actually run.
pub async fn resume_context(ctx: &web::AudioContext) {
    if let Ok(p) = ctx.resume() {
        if let Err(e) = JsFuture::from(p).await {
            log::warn!("[audio] resume refused: {:?}", e);
        }
    }
}

async fn fetch_ok(path: &str) -> Result<web::Response, String> {
    let window = web::window().ok_or_else(|| "no window".to_string())?;
    let resp = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(js_err)?
        .dyn_into::<web::Response>()
        .map_err(js_err)?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    Ok(resp)
}

async fn fetch_and_decode(ctx: &web::AudioContext, path: &str) -> Result<web::AudioBuffer, String> {
    let resp = fetch_ok(path).await?;
    let bytes = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .dyn_into::<ArrayBuffer>()
        .map_err(js_err)?;
    JsFuture::from(ctx.decode_audio_data(&bytes).map_err(js_err)?)
        .await
        .map_err(js_err)?
        .dyn_into::<web::AudioBuffer>()
        .map_err(js_err)
}

/// Fetch and decode the six level loops in order.
pub async fn load_loop_bank(
    ctx: &web::AudioContext,
    paths: &[String],
) -> EngineResult<Vec<web::AudioBuffer>> {
    let mut buffers = Vec::with_capacity(paths.len());
    for path in paths {
        let buf = fetch_and_decode(ctx, path)
            .await
            .map_err(|msg| EngineError::asset(path.as_str(), msg))?;
        log::info!("[audio] decoded {} ({:.3}s)", path, buf.duration());
        buffers.push(buf);
    }
    Ok(buffers)
}

/// Body of an optional text resource; `None` when it is absent.
pub async fn fetch_text(path: &str) -> Option<String> {
    let resp = match fetch_ok(path).await {
        Ok(r) => r,
        Err(e) => {
            log::debug!("[config] {} not loaded: {}", path, e);
            return None;
        }
    };
    let text = JsFuture::from(resp.text().ok()?).await.ok()?;
    text.as_string()
}
