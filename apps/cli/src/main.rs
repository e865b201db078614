use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use jumpsafe_core::{
    Endpoints, FeedbackRating, FeedbackReporter, FfmpegFrameSource, HttpUploadSink, UploadOutcome,
    run_pipeline,
};

const DEFAULT_SERVER: &str = "http://127.0.0.1:5055";

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

/// CLI wrapper for FeedbackRating enum (needed for clap ValueEnum)
#[derive(Clone, ValueEnum)]
enum CliRating {
    ThumbsUp,
    ThumbsDown,
    Comment,
}

impl From<CliRating> for FeedbackRating {
    fn from(cli: CliRating) -> Self {
        match cli {
            CliRating::ThumbsUp => FeedbackRating::ThumbsUp,
            CliRating::ThumbsDown => FeedbackRating::ThumbsDown,
            CliRating::Comment => FeedbackRating::Comment,
        }
    }
}

#[derive(Parser)]
#[command(name = "jumpsafe")]
#[command(about = "Sample frames from a jump video, stream them to the JumpSafe server, and rate the prediction")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract sampled frames from a video and upload them
    Upload {
        /// Path to the video file
        video: PathBuf,

        /// JumpSafe server base URL
        #[arg(short, long, default_value = DEFAULT_SERVER)]
        server: String,
    },
    /// Rate the prediction for the last uploaded video
    Feedback {
        /// How the prediction was
        #[arg(value_enum)]
        rating: CliRating,

        /// Comment text (required when rating is "comment")
        #[arg(short, long, default_value = "")]
        comment: String,

        /// JumpSafe server base URL
        #[arg(short, long, default_value = DEFAULT_SERVER)]
        server: String,
    },
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    println!(
        "\n{}  {}\n",
        style("jumpsafe").cyan().bold(),
        style("Jump Video Client").dim()
    );

    match cli.command {
        Command::Upload { video, server } => upload(video, &server).await,
        Command::Feedback {
            rating,
            comment,
            server,
        } => feedback(rating.into(), &comment, &server).await,
    }
}

async fn upload(video: PathBuf, server: &str) -> Result<()> {
    let endpoints = Endpoints::from_base(server)?;
    let sink = HttpUploadSink::new(endpoints);
    let source = FfmpegFrameSource::new(&video);

    let start = Instant::now();
    let spinner = create_spinner("Analyzing video...");
    let status = {
        let spinner = spinner.clone();
        move |message: &str| spinner.set_message(message.to_string())
    };

    let summary = match run_pipeline(&source, &sink, &status).await {
        Ok(summary) => summary,
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("{} {}", style("✗").red().bold(), e);
            std::process::exit(1);
        }
    };

    spinner.set_message("Waiting for uploads to settle...");
    sink.drain().await;
    if let Err(e) = source.cleanup().await {
        log::warn!("could not remove scratch frames: {e}");
    }

    spinner.finish_with_message(format!(
        "{} Done. Uploaded {} frames (video end sent). {}",
        style("✓").green().bold(),
        summary.frames_dispatched,
        style(format!("[{}]", format_duration(start.elapsed()))).dim()
    ));

    if summary.frames_skipped > 0 {
        println!(
            "{} {} of {} frames could not be decoded and were skipped",
            style("!").yellow().bold(),
            summary.frames_skipped,
            summary.frames_sampled
        );
    }

    println!(
        "\n{} jumpsafe feedback thumbs-up | thumbs-down | comment -c \"...\"\n",
        style("Rate the prediction:").dim()
    );

    Ok(())
}

async fn feedback(rating: FeedbackRating, comment: &str, server: &str) -> Result<()> {
    // Mirrors the submit gate of the original client: a bare comment
    // rating with nothing to say is rejected before it hits the wire.
    if rating == FeedbackRating::Comment && comment.trim().is_empty() {
        eprintln!(
            "{} a non-empty --comment is required with the \"comment\" rating",
            style("✗").red().bold()
        );
        std::process::exit(1);
    }

    let reporter = FeedbackReporter::new(Endpoints::from_base(server)?);
    let spinner = create_spinner("Sending feedback...");

    match reporter.send(rating, comment).await? {
        outcome if outcome.is_success() => {
            spinner.finish_with_message(format!(
                "{} Feedback sent. Thanks!",
                style("✓").green().bold()
            ));
            Ok(())
        }
        UploadOutcome::Delivered { status, body } => {
            spinner.finish_and_clear();
            eprintln!(
                "{} server rejected feedback: status {} {}",
                style("✗").red().bold(),
                status,
                style(body).dim()
            );
            std::process::exit(1);
        }
        UploadOutcome::Failed { reason } => {
            spinner.finish_and_clear();
            eprintln!(
                "{} feedback not sent: {} (try again)",
                style("✗").red().bold(),
                reason
            );
            std::process::exit(1);
        }
    }
}
