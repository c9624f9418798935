//! MixForge pipeline binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mixforge_catalog::{download_track_audio, ChannelHistory, SunoSource, TrackSource};
use mixforge_imagegen::ImageGenClient;
use mixforge_media::{check_ffmpeg, check_ffprobe, probe_duration, SegmentSpec};
use mixforge_models::{Effect, Track};
use mixforge_pipeline::{
    describe, load_compilation_info, BatchProcessor, CompilationAssembler, PipelineConfig,
    ShortAssembler,
};

#[derive(Parser)]
#[command(name = "mixforge", version, about = "Automated compilation videos and shorts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch metadata for a single track URL
    Fetch {
        url: String,
        /// Also download the track audio
        #[arg(long)]
        download: bool,
    },
    /// Fetch a batch of tracks, classify and order them, prepare assets
    Batch {
        /// Track URLs
        #[arg(long, num_args = 1..)]
        links: Vec<String>,
        /// File with one track URL per line
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value = "compilation")]
        name: String,
    },
    /// Render a compilation from a prepared info document
    Compile {
        /// Path to compilation_info.json
        #[arg(long)]
        info: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Visual effect for segments
        #[arg(long, default_value = "glow_bars")]
        effect: String,
        /// Skip the audio visualizer layers
        #[arg(long)]
        no_visualizer: bool,
    },
    /// Render a single visualizer video for one track
    Video {
        #[arg(long)]
        audio: PathBuf,
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Track name for the overlay
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "zoom")]
        effect: String,
        /// Mask image for masked effects (white = effect area)
        #[arg(long)]
        mask: Option<PathBuf>,
        /// Limit output duration in seconds
        #[arg(long)]
        duration: Option<f64>,
    },
    /// Render a vertical short clip from a track's hook section
    Short {
        #[arg(long)]
        audio: PathBuf,
        /// Vertical (9:16) background image
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value = "")]
        title: String,
        /// Hook start in seconds; computed from the track when omitted
        #[arg(long)]
        start: Option<f64>,
        /// Clip duration in seconds
        #[arg(long)]
        duration: Option<f64>,
    },
    /// Show run history and pending manual tasks
    History {
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = PipelineConfig::from_env();

    match cli.command {
        Command::Fetch { url, download } => fetch(&config, &url, download).await,
        Command::Batch { links, file, name } => batch(&config, links, file, &name).await,
        Command::Compile {
            info,
            output,
            effect,
            no_visualizer,
        } => compile(&config, &info, &output, &effect, no_visualizer).await,
        Command::Video {
            audio,
            image,
            output,
            title,
            effect,
            mask,
            duration,
        } => video(&config, audio, image, output, title, &effect, mask, duration).await,
        Command::Short {
            audio,
            image,
            output,
            title,
            start,
            duration,
        } => short(&config, audio, image, output, title, start, duration).await,
        Command::History { path } => history(&config, path).await,
    }
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("mixforge=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

async fn fetch(config: &PipelineConfig, url: &str, download: bool) -> anyhow::Result<()> {
    let source = SunoSource::new();
    let record = source.fetch(url).await.context("metadata fetch failed")?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    if download {
        let track = record.into_track();
        let dir = config.output_dir.join("tracks").join(&track.slug);
        let client = reqwest::Client::new();
        let path = download_track_audio(&client, &track.slug, track.audio_url.as_deref(), &dir)
            .await
            .context("audio download failed")?;
        info!("Audio saved: {}", path.display());
    }
    Ok(())
}

async fn batch(
    config: &PipelineConfig,
    links: Vec<String>,
    file: Option<PathBuf>,
    name: &str,
) -> anyhow::Result<()> {
    let mut urls = links;
    if let Some(file) = file {
        let raw = tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("reading {}", file.display()))?;
        urls.extend(
            raw.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from),
        );
    }
    anyhow::ensure!(!urls.is_empty(), "provide track URLs with --links or --file");

    let imagegen = ImageGenClient::from_env().context("image generation client")?;
    let processor = BatchProcessor::new(config.clone(), Box::new(SunoSource::new()), imagegen);
    let info = processor.process(&urls, name).await?;
    println!(
        "Prepared {} tracks ({:.1} minutes) in {}",
        info.track_count,
        info.total_minutes(),
        config.output_dir.join(name).display()
    );
    Ok(())
}

async fn compile(
    config: &PipelineConfig,
    info_path: &PathBuf,
    output: &PathBuf,
    effect: &str,
    no_visualizer: bool,
) -> anyhow::Result<()> {
    check_ffmpeg()?;
    check_ffprobe()?;

    let info = load_compilation_info(info_path).await?;
    let effect = if no_visualizer {
        Effect::Zoom
    } else {
        Effect::parse_or_static(effect)
    };

    let assembler = CompilationAssembler::new(config);
    let name = info.name.clone();
    let outcome = assembler.assemble(&name, info.tracks, effect, output).await?;

    println!(
        "Compilation ready: {} ({} tracks, {} skipped)",
        outcome.video_path.display(),
        outcome.rendered,
        outcome.skipped
    );
    println!("\nChapters for the upload description:\n{}", outcome.chapter_text);
    println!(
        "{}",
        describe::compilation_description(&outcome.info, &outcome.chapters, &config.settings)
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn video(
    config: &PipelineConfig,
    audio: PathBuf,
    image: PathBuf,
    output: PathBuf,
    title: String,
    effect: &str,
    mask: Option<PathBuf>,
    duration: Option<f64>,
) -> anyhow::Result<()> {
    check_ffmpeg()?;

    let track_duration = probe_duration(&audio).await?;
    let duration = match duration {
        Some(limit) if limit < track_duration => limit,
        _ => track_duration,
    };

    let spec = SegmentSpec::new(audio, image, duration)
        .with_title(title.clone())
        .with_mask(mask)
        .with_effect(Effect::parse_or_static(effect));

    mixforge_pipeline::render_with_fallback(&spec, &config.settings, &config.encoding, &output)
        .await?;
    println!("Video created: {}", output.display());

    if !title.is_empty() {
        let track = Track::new(mixforge_models::slugify(&title), title, duration);
        println!("\n{}", describe::track_description(&track, &config.settings));
    }
    Ok(())
}

async fn short(
    config: &PipelineConfig,
    audio: PathBuf,
    image: PathBuf,
    output: PathBuf,
    title: String,
    start: Option<f64>,
    duration: Option<f64>,
) -> anyhow::Result<()> {
    check_ffmpeg()?;

    let track_duration = probe_duration(&audio).await?;

    let slug = output
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "short".to_string());
    let mut track = Track::new(slug, title, track_duration);
    track.local_audio = Some(audio);
    track.local_image_vertical = Some(image);

    let assembler = ShortAssembler::new(config);
    assembler.assemble(&track, start, duration, &output).await?;
    println!("Short created: {}", output.display());
    Ok(())
}

async fn history(config: &PipelineConfig, path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(|| config.history_path.clone());
    let history = ChannelHistory::load(&path).await?;

    println!(
        "Uploads: {} ({:.0} minutes published)",
        history.stats.total_uploads, history.stats.total_minutes
    );
    let open: Vec<_> = history.open_tasks().collect();
    if open.is_empty() {
        println!("No pending manual tasks.");
    } else {
        println!("Pending related-video links:");
        for task in open {
            println!("  {} - {}", task.short_id, task.short_title);
        }
    }
    Ok(())
}
