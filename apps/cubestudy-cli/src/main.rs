use clap::{Parser, Subcommand};
use cubestudy_app::{
    App, AppSummary, HeadlessContainer, HeadlessHost, HostEvents, Lesson, LessonConfig,
    ManualScheduler, Resize,
};
use cubestudy_common::Viewport;
use cubestudy_render::{DebugTextRenderer, RenderError};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubestudy-cli", about = "Headless runner for the cubestudy lessons")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Drive a lesson for a fixed number of frames and print what it drew
    Run {
        /// Lesson to run: basic or geometry
        #[arg(short, long, default_value = "basic")]
        lesson: Lesson,
        /// Number of frames to deliver
        #[arg(short, long, default_value = "3")]
        ticks: u64,
        /// Milliseconds between frame timestamps
        #[arg(short, long, default_value = "16.0")]
        interval_ms: f64,
        /// Container width in logical pixels
        #[arg(long, default_value = "800")]
        width: u32,
        /// Container height in logical pixels
        #[arg(long, default_value = "600")]
        height: u32,
        /// Device pixel ratio
        #[arg(long, default_value = "1.0")]
        pixel_ratio: f32,
        /// Resize the container before this frame, as WIDTHxHEIGHT@FRAME
        #[arg(long)]
        resize_at: Option<String>,
        /// Lesson config file (YAML, or JSON by extension)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print every frame instead of only the last
        #[arg(long)]
        every_frame: bool,
        /// Print a JSON summary instead of frame dumps
        #[arg(long)]
        json: bool,
    },
    /// Print the default lesson config as YAML
    Config,
}

/// A container resize scheduled before a given frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeAt {
    width: u32,
    height: u32,
    frame: u64,
}

fn parse_resize_at(s: &str) -> anyhow::Result<ResizeAt> {
    let (size, frame) = s
        .split_once('@')
        .ok_or_else(|| anyhow::anyhow!("expected WIDTHxHEIGHT@FRAME, got '{s}'"))?;
    let (width, height) = size
        .split_once('x')
        .ok_or_else(|| anyhow::anyhow!("expected WIDTHxHEIGHT, got '{size}'"))?;
    Ok(ResizeAt {
        width: width.trim().parse()?,
        height: height.trim().parse()?,
        frame: frame.trim().parse()?,
    })
}

struct RunOptions {
    lesson: Lesson,
    ticks: u64,
    interval_ms: f64,
    viewport: Viewport,
    resize_at: Option<ResizeAt>,
    config: LessonConfig,
    every_frame: bool,
    json: bool,
}

fn run(opts: RunOptions) -> anyhow::Result<AppSummary> {
    let container = HeadlessContainer::new(opts.viewport);
    let host = HeadlessHost::new().with_container(&opts.config.container_selector, container.clone());
    let events = HostEvents::new();
    let mut scheduler = ManualScheduler::new();

    let mut app = App::new(
        &host,
        &opts.config,
        opts.lesson,
        &events,
        &mut scheduler,
        |_: &HeadlessContainer| Ok::<_, RenderError>(DebugTextRenderer::new()),
    )?;

    let mut last = None;
    for frame in 0..opts.ticks {
        if let Some(resize) = opts.resize_at.filter(|r| r.frame == frame) {
            container.resize(resize.width, resize.height);
            events.resize.emit(&Resize);
        }
        if !scheduler.take_pending() {
            tracing::info!(frame, "no frame requested; stopping early");
            break;
        }
        let timestamp_ms = frame as f64 * opts.interval_ms;
        let Some(dump) = app.on_frame(timestamp_ms, &mut scheduler)? else {
            break;
        };
        if opts.every_frame && !opts.json {
            print!("{dump}");
        }
        last = Some(dump);
    }

    let summary = app.summary();
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !opts.every_frame {
        match last {
            Some(dump) => print!("{dump}"),
            None => println!("no frames rendered"),
        }
    }
    Ok(summary)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("cubestudy-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", cubestudy_scene::crate_info());
            println!("render: {}", cubestudy_render::crate_info());
            println!("input: {}", cubestudy_input::crate_info());
            println!("app: {}", cubestudy_app::crate_info());
            let lessons: Vec<String> = Lesson::ALL.iter().map(Lesson::to_string).collect();
            println!("lessons: {}", lessons.join(", "));
        }
        Commands::Run {
            lesson,
            ticks,
            interval_ms,
            width,
            height,
            pixel_ratio,
            resize_at,
            config,
            every_frame,
            json,
        } => {
            let config = match config {
                Some(path) => LessonConfig::load(path)?,
                None => LessonConfig::default(),
            };
            let resize_at = resize_at.as_deref().map(parse_resize_at).transpose()?;
            run(RunOptions {
                lesson,
                ticks,
                interval_ms,
                viewport: Viewport::new(width, height).with_pixel_ratio(pixel_ratio),
                resize_at,
                config,
                every_frame,
                json,
            })?;
        }
        Commands::Config => {
            print!("{}", LessonConfig::default().to_yaml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_spec_parses() {
        assert_eq!(
            parse_resize_at("1024x512@2").unwrap(),
            ResizeAt {
                width: 1024,
                height: 512,
                frame: 2
            }
        );
        assert!(parse_resize_at("1024x512").is_err());
        assert!(parse_resize_at("1024@2").is_err());
        assert!(parse_resize_at("wide x tall@1").is_err());
    }

    fn options(lesson: Lesson, ticks: u64, resize_at: Option<ResizeAt>) -> RunOptions {
        RunOptions {
            lesson,
            ticks,
            interval_ms: 16.0,
            viewport: Viewport::new(800, 600),
            resize_at,
            config: LessonConfig::default(),
            every_frame: false,
            json: true,
        }
    }

    #[test]
    fn run_applies_mid_run_resize() {
        let resize = parse_resize_at("400x200@2").unwrap();
        let summary = run(options(Lesson::Basic, 4, Some(resize))).unwrap();

        assert_eq!(summary.lesson, Lesson::Basic);
        assert_eq!(summary.frames, 4);
        assert_eq!(summary.state, "scheduled");
        assert_eq!((summary.width, summary.height), (400, 200));
        assert_eq!(summary.aspect, 2.0);
        // One resize at startup, one mid-run.
        assert_eq!(summary.resizes, 2);
        // The last update ran at 48 ms.
        assert!((summary.tracked_rotation[0] - 0.048).abs() < 1e-5);
        assert!((summary.tracked_rotation[1] - 0.048).abs() < 1e-5);
        assert_eq!(summary.tracked_rotation[2], 0.0);
        serde_json::to_string(&summary).unwrap();
    }

    #[test]
    fn run_without_resize_keeps_startup_size() {
        let summary = run(options(Lesson::Geometry, 3, None)).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!((summary.width, summary.height), (800, 600));
        assert_eq!(summary.resizes, 1);
        assert_eq!(summary.nodes, 4);
        assert_eq!(summary.tracked_rotation, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn cli_parses_run() {
        let cli = Cli::try_parse_from([
            "cubestudy-cli",
            "run",
            "--lesson",
            "geometry",
            "--ticks",
            "5",
            "--resize-at",
            "400x400@1",
            "--json",
        ])
        .unwrap();
        let Commands::Run {
            lesson,
            ticks,
            resize_at,
            json,
            ..
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(lesson, Lesson::Geometry);
        assert_eq!(ticks, 5);
        assert_eq!(resize_at.as_deref(), Some("400x400@1"));
        assert!(json);
    }
}
