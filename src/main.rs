use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;
use std::str::FromStr;

use html5_video::player::{Html5PlayerBuilder, PlayerEvents, VideoPlayer, VideoSource};
use html5_video::utils::{format_seconds, Config};
use html5_video::HeadlessSurface;

/// html5-video - replay a playback script against a headless player
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script steps: meta:<duration> play pause click seek:<s> volume:<0-100>
    /// rate:<r> advance:<s> end fail
    #[arg(value_name = "STEP")]
    steps: Vec<String>,

    /// Configuration file (defaults to the system and user config files)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Video source URL; may be repeated, format is taken from the extension
    #[arg(short, long = "source", value_name = "URL")]
    sources: Vec<String>,

    /// Poster image URL
    #[arg(long)]
    poster: Option<String>,

    /// Log every native event
    #[arg(short, long)]
    debug: bool,

    /// Print the diagnostic log as JSON when done
    #[arg(long)]
    dump_logs: bool,
}

/// One step of a replay script
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Metadata(f64),
    Play,
    Pause,
    Click,
    Seek(f64),
    Volume(f64),
    Rate(String),
    Advance(f64),
    End,
    Fail,
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, value) = match s.split_once(':') {
            Some((name, value)) => (name, Some(value)),
            None => (s, None),
        };

        let number = |value: Option<&str>| -> Result<f64> {
            let value = value.ok_or_else(|| anyhow!("step '{}' needs a value", name))?;
            value
                .parse()
                .with_context(|| format!("invalid value in step '{}'", s))
        };

        let step = match name {
            "meta" => Step::Metadata(number(value)?),
            "play" => Step::Play,
            "pause" => Step::Pause,
            "click" => Step::Click,
            "seek" => Step::Seek(number(value)?),
            "volume" => Step::Volume(number(value)?),
            "rate" => Step::Rate(
                value
                    .ok_or_else(|| anyhow!("step 'rate' needs a value"))?
                    .to_string(),
            ),
            "advance" => Step::Advance(number(value)?),
            "end" => Step::End,
            "fail" => Step::Fail,
            other => bail!("unknown step '{}'", other),
        };
        Ok(step)
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let mut config = Config::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            config.apply_env_overrides()?;
            config
        }
        None => Config::load()?,
    };

    config
        .player
        .video_sources
        .extend(args.sources.iter().map(VideoSource::from_url));
    if args.poster.is_some() {
        config.player.poster = args.poster.clone();
    }
    if args.debug {
        config.player.debug = true;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let steps = args
        .steps
        .iter()
        .map(|s| s.parse())
        .collect::<Result<Vec<Step>>>()?;

    let config = load_config(&args)?;

    let log_level = if args.debug { "debug" } else { config.general.log_level.as_str() };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    info!("Starting html5-video v{}", env!("CARGO_PKG_VERSION"));

    let events = PlayerEvents::new()
        .on_ready(|| info!("Player ready"))
        .on_state_change(|change| info!("State changed to {:?} ({})", change.data, change.data.code()))
        .on_error(|| error!("Video cannot be played"));

    let (surface, handle) = HeadlessSurface::new();
    let mut player = Html5PlayerBuilder::from_config(&config)
        .events(events)
        .build(Box::new(surface))?;
    player.process_events();

    for step in steps {
        match &step {
            Step::Metadata(duration) => handle.load_metadata(*duration),
            Step::Play => player.play_video(),
            Step::Pause => player.pause_video(),
            Step::Click => player.toggle_playback(),
            Step::Seek(seconds) => player.seek_to(*seconds),
            Step::Volume(value) => player.set_volume(*value),
            Step::Rate(value) => player.set_playback_rate_str(value),
            Step::Advance(seconds) => handle.advance(*seconds),
            Step::End => handle.finish(),
            Step::Fail => handle.fail_all_sources(),
        }
        player.process_events();

        println!(
            "{:<16} state={:<2} {}/{} volume={:.2} rate={}",
            format!("{:?}", step),
            player.player_state().code(),
            format_seconds(player.current_time()),
            format_seconds(player.duration()),
            player.volume(),
            handle.playback_rate()
        );
    }

    if args.dump_logs {
        println!("{}", player.export_logs()?);
    }

    player.destroy();
    Ok(())
}
