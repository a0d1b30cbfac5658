use clap::{Parser, ValueEnum};
use glam::Vec2;
use noy_core::{
    EngineMode, GameConfig, GameSession, LoopEngine, Mixer, ProximityEngine, SharedMixer,
    StartPrime, Viewport,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

mod assets;
mod output;
mod sim;

const OFFLINE_SAMPLE_RATE: u32 = 44_100;
const POINTER_SPEED: f32 = 260.0; // px per second
const POINTER_WOBBLE: f32 = 0.6;
const PAUSE_AFTER_FIND_SEC: f64 = 1.5;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Continuous,
    Scheduled,
}

impl From<ModeArg> for EngineMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Continuous => EngineMode::Continuous,
            ModeArg::Scheduled => EngineMode::Scheduled,
        }
    }
}

/// Audition the proximity engine: a scripted pointer hunts random targets
/// while the level loops play through the default output device.
#[derive(Parser, Debug)]
#[command(name = "noy-native", version)]
struct Args {
    /// Directory with noy1.wav .. noy6.wav
    #[arg(long)]
    assets: PathBuf,

    /// JSON file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// How long to run, seconds
    #[arg(long, default_value_t = 20.0)]
    seconds: f64,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 800.0)]
    height: f32,

    #[arg(long)]
    seed: Option<u64>,

    /// Render offline into a WAV file instead of playing live
    #[arg(long)]
    render_to: Option<PathBuf>,
}

enum Output {
    Live(cpal::Stream),
    /// No device; the mixer clock is advanced by hand.
    Silent,
    File(hound::WavWriter<BufWriter<File>>),
}

fn load_config(path: Option<&Path>) -> GameConfig {
    let Some(path) = path else {
        return GameConfig::default();
    };
    let parsed = std::fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|text| GameConfig::from_json(&text).map_err(anyhow::Error::from));
    match parsed {
        Ok(cfg) => {
            log::info!("[config] loaded {}", path.display());
            cfg
        }
        Err(e) => {
            log::error!("[config] {} rejected, using defaults: {e:#}", path.display());
            GameConfig::default()
        }
    }
}

fn open_output(args: &Args) -> anyhow::Result<(SharedMixer, Output)> {
    if let Some(path) = &args.render_to {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: OFFLINE_SAMPLE_RATE,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let writer = hound::WavWriter::create(path, spec)?;
        log::info!("[output] rendering to {}", path.display());
        return Ok((
            SharedMixer::new(Mixer::new(OFFLINE_SAMPLE_RATE)),
            Output::File(writer),
        ));
    }

    let Some(device) = output::OutputDevice::open_default() else {
        log::warn!("[output] no output device, running silently");
        return Ok((SharedMixer::new(Mixer::new(OFFLINE_SAMPLE_RATE)), Output::Silent));
    };
    let mixer = SharedMixer::new(Mixer::new(device.sample_rate()));
    match device.play(mixer.clone()) {
        Ok(stream) => Ok((mixer, Output::Live(stream))),
        Err(e) => {
            log::warn!("[output] {e:#}; running silently");
            Ok((mixer, Output::Silent))
        }
    }
}

/// Let `dt` seconds of audio time pass.
fn advance(output: &mut Output, mixer: &SharedMixer, dt: f64) -> anyhow::Result<()> {
    match output {
        Output::Live(_) => thread::sleep(Duration::from_secs_f64(dt)),
        Output::Silent => {
            thread::sleep(Duration::from_secs_f64(dt));
            mixer.lock().advance(dt);
        }
        Output::File(writer) => {
            let mut buf = vec![0.0f32; (dt * OFFLINE_SAMPLE_RATE as f64).round() as usize];
            mixer.render(&mut buf, 1);
            for s in buf {
                writer.write_sample(s)?;
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref());
    if let Some(mode) = args.mode {
        config.audio.mode = mode.into();
    }

    let (mixer, mut output) = open_output(&args)?;
    let mut engine = LoopEngine::from_config(mixer.clone(), &config);
    if let Err(e) = engine.initialize() {
        log::warn!("[audio] {e}; running silently");
    }
    match assets::load_bank(&args.assets, &config.audio.asset_paths) {
        Ok(bank) => {
            if let Err(e) = engine.load_assets(bank) {
                log::warn!("[audio] {e}; running silently");
            }
        }
        Err(e) => log::warn!("[audio] {e}; running silently"),
    }
    log::info!("[audio] mode={:?}", engine.mode());

    let tick_sec = config.audio.scheduler_tick_ms as f64 / 1000.0;
    let viewport = Viewport::new(args.width, args.height);
    let mut session = GameSession::new(config, viewport)?;
    session.attach_engine(engine);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sweep = sim::Sweep::new(POINTER_SPEED, POINTER_WOBBLE);

    let mut state = session.begin_round(&mut rng, StartPrime::At(Vec2::ZERO));
    let mut last_level = state.level;
    let mut found_at: Option<f64> = None;
    let mut rounds = 1;
    let mut elapsed = 0.0;
    log::info!("[sim] round {rounds}: level {}", state.level);

    while elapsed < args.seconds {
        if let Some(t) = found_at {
            if elapsed - t >= PAUSE_AFTER_FIND_SEC {
                rounds += 1;
                state = session.restart(&mut rng);
                last_level = state.level;
                found_at = None;
                log::info!("[sim] round {rounds}: level {}", state.level);
            }
        } else {
            let p = sweep.step(
                &mut rng,
                session.effective_pointer(),
                session.target(),
                tick_sec as f32,
            );
            state = session.on_pointer_move(p);
            if state.level != last_level {
                log::info!(
                    "[sim] level {} -> {} at distance {:.0}",
                    last_level,
                    state.level,
                    state.distance
                );
                last_level = state.level;
            }
            if state.near && session.try_reveal() {
                log::info!("[sim] found after {:.2}s", elapsed);
                found_at = Some(elapsed);
            }
        }
        session.tick();
        advance(&mut output, &mixer, tick_sec)?;
        elapsed += tick_sec;
    }

    session.stop();
    if let Output::File(writer) = output {
        writer.finalize()?;
    }
    log::info!("[sim] done, {rounds} round(s)");
    Ok(())
}
