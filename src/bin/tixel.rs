use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tixel::{
    Canvas, CpuSurface, DotSurface as _, Engine, EngineConfig, FfmpegSink, FfmpegSinkOpts, Fps,
    FrameIndex, FrameSink, PngSequenceSink, SinkConfig, SwapOutcome,
};

#[derive(Parser, Debug)]
#[command(name = "tixel", version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a run of refreshes to an MP4 (requires `ffmpeg` on PATH) or a PNG directory.
    Render(RenderArgs),
    /// Compile an expression and report the canary value or the error.
    Check(CheckArgs),
    /// List the preset library.
    Presets(PresetsArgs),
}

#[derive(Parser, Debug)]
struct EngineArgs {
    /// Engine configuration JSON. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Expression to start with.
    #[arg(long)]
    expr: Option<String>,

    /// Cells per side.
    #[arg(long)]
    grid_size: Option<u32>,

    /// Square canvas side in pixels.
    #[arg(long)]
    size: Option<u32>,

    /// Start with the clock paused.
    #[arg(long)]
    paused: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    engine: EngineArgs,

    /// Refreshes to run before capturing (time advances once per refresh).
    #[arg(long, default_value_t = 1)]
    refreshes: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    engine: EngineArgs,

    /// Number of refreshes (frames) to render.
    #[arg(long, default_value_t = 240)]
    frames: u64,

    /// Output path: `*.mp4` for video, anything else is a PNG directory.
    #[arg(long)]
    out: PathBuf,

    /// Output frame rate as `num` or `num/den`. Defaults to the config value.
    #[arg(long, value_parser = parse_fps)]
    fps: Option<Fps>,

    /// Cycle to the next preset every K frames.
    #[arg(long)]
    cycle_every: Option<u64>,

    /// Scripted interaction: `FRAME:next` or `FRAME:expr=SOURCE`. Repeatable.
    #[arg(long = "event", value_parser = parse_event)]
    events: Vec<ScriptedEvent>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Expression source.
    expr: String,
}

#[derive(Parser, Debug)]
struct PresetsArgs {
    /// Engine configuration JSON whose presets to list.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
enum EventAction {
    Next,
    Expr(String),
}

#[derive(Clone, Debug, PartialEq)]
struct ScriptedEvent {
    frame: u64,
    action: EventAction,
}

fn parse_event(s: &str) -> Result<ScriptedEvent, String> {
    let (frame, action) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FRAME:ACTION, got '{s}'"))?;
    let frame: u64 = frame
        .trim()
        .parse()
        .map_err(|e| format!("invalid frame '{frame}': {e}"))?;
    let action = if action == "next" {
        EventAction::Next
    } else if let Some(src) = action.strip_prefix("expr=") {
        EventAction::Expr(src.to_owned())
    } else {
        return Err(format!("unknown action '{action}' (expected next or expr=...)"));
    };
    Ok(ScriptedEvent { frame, action })
}

fn parse_fps(s: &str) -> Result<Fps, String> {
    let (num, den) = s.split_once('/').unwrap_or((s, "1"));
    let num: u32 = num.trim().parse().map_err(|e| format!("invalid fps '{s}': {e}"))?;
    let den: u32 = den.trim().parse().map_err(|e| format!("invalid fps '{s}': {e}"))?;
    Fps::new(num, den).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
        Command::Presets(args) => cmd_presets(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_path(p)
            .with_context(|| format!("load engine config '{}'", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn build_config(args: &EngineArgs) -> anyhow::Result<EngineConfig> {
    let mut cfg = read_config(args.config.as_deref())?;
    if let Some(expr) = &args.expr {
        cfg.initial_expression = expr.clone();
    }
    if let Some(n) = args.grid_size {
        cfg.grid_size = n;
    }
    if let Some(side) = args.size {
        cfg.canvas = Some(Canvas {
            width: side,
            height: side,
        });
    }
    if args.paused {
        cfg.start_paused = true;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn build_engine(cfg: &EngineConfig) -> anyhow::Result<(Engine, CpuSurface)> {
    let canvas = cfg.canvas()?;
    let engine = Engine::new(cfg.clone()).context("build engine")?;
    let surface = CpuSurface::from_canvas(canvas).context("allocate surface")?;
    Ok((engine, surface))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.engine)?;
    let (mut engine, mut surface) = build_engine(&cfg)?;

    engine.start();
    for _ in 0..args.refreshes.max(1) {
        engine.refresh(&mut surface);
    }
    engine.stop();
    let frame = surface.render();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    tixel::write_png(&args.out, &frame)?;

    eprintln!("wrote {} (t = {:.3})", args.out.display(), engine.time());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.engine)?;
    let (mut engine, mut surface) = build_engine(&cfg)?;

    let mut sink: Box<dyn FrameSink> = if is_mp4(&args.out) {
        Box::new(FfmpegSink::new(FfmpegSinkOpts::new(
            &args.out,
            cfg.palette.background,
        )))
    } else {
        Box::new(PngSequenceSink::new(&args.out))
    };
    let fps = args.fps.unwrap_or(cfg.fps);
    sink.begin(SinkConfig {
        width: surface.width(),
        height: surface.height(),
        fps,
    })?;

    let mut events = args.events.clone();
    events.sort_by_key(|e| e.frame);
    let mut events = events.into_iter().peekable();

    engine.start();
    for n in 0..args.frames {
        if let Some(k) = args.cycle_every
            && k > 0
            && n > 0
            && n.is_multiple_of(k)
        {
            report(n, "next", engine.cycle_example());
        }
        while let Some(ev) = events.next_if(|e| e.frame <= n) {
            match ev.action {
                EventAction::Next => report(n, "next", engine.cycle_example()),
                EventAction::Expr(src) => report(n, &src, engine.set_expression(&src)),
            }
        }

        engine.refresh(&mut surface);
        let frame = surface.render();
        sink.push_frame(FrameIndex(n), &frame)?;
    }
    engine.stop();
    sink.end()?;

    eprintln!(
        "wrote {} ({} frames, {:.2}s)",
        args.out.display(),
        args.frames,
        args.frames as f64 * fps.frame_duration_secs()
    );
    Ok(())
}

fn report(frame: u64, what: &str, outcome: SwapOutcome) {
    match outcome {
        SwapOutcome::Replaced => tracing::info!(frame, what, "expression replaced"),
        SwapOutcome::Unchanged => tracing::debug!(frame, what, "expression unchanged"),
        SwapOutcome::Rejected(r) => tracing::warn!(frame, what, reason = %r, "expression rejected"),
    }
}

fn is_mp4(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"))
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    match tixel::compile(&args.expr) {
        tixel::CompiledFn::Program(p) => {
            let [t, i, x, y] = tixel::CANARY_INPUT;
            println!("ok: {} (locals: {})", p.eval(t, i, x, y), p.local_count());
            Ok(())
        }
        tixel::CompiledFn::Error(r) => anyhow::bail!("{r}"),
    }
}

fn cmd_presets(args: PresetsArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let lib = cfg.preset_library()?;
    for (idx, src) in lib.iter().enumerate() {
        println!("{idx:>3}  {src}");
    }
    for (idx, reason) in lib.invalid_entries() {
        eprintln!("warning: preset {idx} is not accepted: {reason}");
    }
    Ok(())
}
