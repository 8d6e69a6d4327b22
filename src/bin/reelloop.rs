use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelloop", version, about = "Loop the episodes of one series fullscreen")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a series in a loop until `q`, window close or Ctrl+C (the default).
    Play(PlayArgs),
    /// List the series under the media root and the episode order of each.
    List(LibraryArgs),
    /// Letterbox a still image onto the canvas and write it as PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug, Default)]
struct LibraryArgs {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory whose sub-directories are the series.
    #[arg(long)]
    media_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Default)]
struct PlayArgs {
    #[command(flatten)]
    library: LibraryArgs,

    /// Play this series instead of a random one.
    #[arg(long)]
    series: Option<String>,

    /// Seed for the random series pick.
    #[arg(long)]
    seed: Option<u64>,

    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Wait after each frame, in milliseconds.
    #[arg(long)]
    frame_wait_ms: Option<u64>,

    /// Key that stops playback.
    #[arg(long)]
    quit_key: Option<char>,

    /// Use a normal window instead of borderless fullscreen.
    #[arg(long)]
    windowed: bool,

    /// Decode and composite without opening a window (stop with Ctrl+C).
    #[arg(long)]
    headless: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Resampling filter.
    #[arg(long, value_enum, default_value_t = FilterChoice::Linear)]
    filter: FilterChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    Nearest,
    Linear,
    CatmullRom,
}

impl From<FilterChoice> for reelloop::ScaleFilter {
    fn from(choice: FilterChoice) -> Self {
        match choice {
            FilterChoice::Nearest => Self::Nearest,
            FilterChoice::Linear => Self::Linear,
            FilterChoice::CatmullRom => Self::CatmullRom,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Some(Command::Play(args)) => cmd_play(args),
        Some(Command::List(args)) => cmd_list(args),
        Some(Command::Frame(args)) => cmd_frame(args),
        None => cmd_play(PlayArgs::default()),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &LibraryArgs) -> anyhow::Result<reelloop::KioskConfig> {
    let mut cfg = match &args.config {
        Some(path) => reelloop::KioskConfig::load_json(path)?,
        None => reelloop::KioskConfig::default(),
    };
    if let Some(dir) = &args.media_dir {
        cfg.media_dir = dir.clone();
    }
    Ok(cfg)
}

fn play_config(args: &PlayArgs) -> anyhow::Result<reelloop::KioskConfig> {
    let mut cfg = load_config(&args.library)?;
    if let Some(series) = &args.series {
        cfg.series = Some(series.clone());
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    if let Some(width) = args.width {
        cfg.canvas.width = width;
    }
    if let Some(height) = args.height {
        cfg.canvas.height = height;
    }
    if let Some(ms) = args.frame_wait_ms {
        cfg.frame_wait_ms = ms;
    }
    if let Some(key) = args.quit_key {
        cfg.quit_key = key;
    }
    if args.windowed {
        cfg.fullscreen = false;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn display_kind(headless: bool) -> reelloop::DisplayKind {
    if headless {
        return reelloop::DisplayKind::Headless;
    }
    #[cfg(feature = "window")]
    {
        reelloop::DisplayKind::Window
    }
    #[cfg(not(feature = "window"))]
    {
        tracing::warn!("built without the 'window' feature, running headless");
        reelloop::DisplayKind::Headless
    }
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let cfg = play_config(&args)?;

    if !reelloop::is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg and ffprobe are required for playback, but were not found on PATH");
    }

    let cancel = reelloop::CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel()).context("install Ctrl+C handler")?;
    }

    // Selection happens before any window exists: an empty series ends the run here.
    let mut selector = reelloop::SeriesSelector::new(&cfg.media_dir, cfg.seed);
    let mut controller =
        reelloop::PlaybackController::initialize(&mut selector, cfg.series.as_deref())?
            .with_idle_backoff(cfg.idle_backoff());

    let settings = reelloop::DisplaySettings {
        canvas: cfg.canvas,
        fullscreen: cfg.fullscreen,
        title: format!("reelloop - {}", controller.series().name()),
    };
    let mut display = reelloop::create_display(display_kind(args.headless), &settings)?;
    let mut decoder = reelloop::FfmpegDecoder::new();
    let compositor = reelloop::FrameCompositor::new(cfg.canvas)?.with_filter(cfg.scale_filter);

    let report = {
        let mut session = reelloop::PlaybackSession::new(
            &mut decoder,
            display.as_mut(),
            cfg.session_settings(),
            cancel,
        )?
        .with_compositor(compositor);
        controller.run(&mut session)?
    };
    drop(display);

    eprintln!(
        "stopped after {} episode(s), {} skipped, {} frame(s)",
        report.episodes_completed, report.episodes_skipped, report.frames_presented
    );
    Ok(())
}

fn cmd_list(args: LibraryArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let selector = reelloop::SeriesSelector::new(&cfg.media_dir, None);
    let names = selector.list_series()?;
    if names.is_empty() {
        return Err(reelloop::ReelError::NoSeries(cfg.media_dir).into());
    }

    for name in names {
        match selector.load_series(&name) {
            Ok(series) => {
                println!("{} ({} episodes)", series.name(), series.len());
                for episode in series.episodes() {
                    let file = episode.file_name().unwrap_or(episode.as_os_str());
                    println!("  {}", file.to_string_lossy());
                }
            }
            Err(err) => println!("{} (unplayable: {err})", name.to_string_lossy()),
        }
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let canvas = reelloop::CanvasGeometry::new(args.width, args.height)?;
    let img = image::open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?
        .to_rgb8();
    let (width, height) = img.dimensions();
    let frame = reelloop::FrameRGB::new(width, height, img.into_raw())?;

    let compositor = reelloop::FrameCompositor::new(canvas)?.with_filter(args.filter.into());
    let placement = compositor.placement_for(&frame);
    let out = compositor.compose(&frame)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &out.data,
        out.width,
        out.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "placed {}x{} at ({}, {}) on {}x{}",
        placement.width, placement.height, placement.x, placement.y, canvas.width, canvas.height
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
