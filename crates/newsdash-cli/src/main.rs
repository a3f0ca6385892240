use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use tokio::sync::mpsc;

use newsdash_core::{
    Config, DashboardController, NewsClient, NewsReport, Notification, SessionResult,
};

mod output;

use output::Painter;

/// Newsdash - search a topic and follow the news-analysis pipeline live
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Topic to search for
    #[arg(required_unless_present = "check")]
    topic: Option<String>,

    /// Base URL of the pipeline service [env: NEWSDASH_API_URL]
    #[arg(long)]
    api_url: Option<String>,

    /// Wait for the whole report instead of streaming progress
    #[arg(long)]
    no_stream: bool,

    /// Print the report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Only check that the pipeline service is up
    #[arg(long)]
    check: bool,

    /// Log debug records on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(args.verbose, !args.no_color);

    let painter = Painter::new(!args.no_color && !args.json);

    // Resolve config from CLI flags > env vars > defaults
    let mut config = Config::from_env();
    if let Some(url) = args.api_url.as_deref() {
        config = config.with_api_url(url);
    }
    let client = NewsClient::new(&config)?;

    if args.check {
        let health = client
            .health()
            .await
            .with_context(|| format!("pipeline service at {} is unreachable", client.base_url()))?;
        println!("{}: {} ({})", client.base_url(), health.status, health.message);
        if !health.is_ok() {
            bail!("pipeline service reports status {:?}", health.status);
        }
        return Ok(());
    }

    let Some(topic) = args.topic.as_deref() else {
        bail!("a topic is required");
    };
    if topic.trim().is_empty() {
        bail!("the topic must not be blank");
    }

    let report = if args.no_stream {
        fetch(&client, topic, !args.json).await?
    } else {
        stream(&client, topic, &painter, !args.json).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if let Some(warning) = report.result.error.as_deref() {
            eprintln!("{}", painter.warning(&format!("Pipeline warning: {warning}")));
        }
        println!();
        print!("{}", output::render_distribution(&report.result.sentiment_distribution, &painter));
        println!();
        print!("{}", output::render_articles(&report.result.articles, &painter));
    }
    Ok(())
}

fn init_logging(verbose: bool, color: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str("newsdash")
        .build();
    let color = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, color);
}

fn spinner(visible: bool) -> anyhow::Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Follow the event stream until the result arrives.
async fn stream(
    client: &NewsClient,
    topic: &str,
    painter: &Painter,
    show_progress: bool,
) -> anyhow::Result<NewsReport> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = DashboardController::new(Arc::new(client.stream_launcher()), tx);
    let pb = spinner(show_progress)?;

    controller.search(topic);
    for line in controller.log() {
        pb.println(painter.line(line));
        pb.set_message(line.text.clone());
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let event = tokio::select! {
            _ = &mut ctrl_c => {
                controller.cancel();
                pb.finish_and_clear();
                bail!("interrupted");
            }
            event = rx.recv() => event,
        };
        let Some(event) = event else {
            bail!("event channel closed unexpectedly");
        };

        match controller.handle_event(event) {
            Some(Notification::LogUpdated(line)) => {
                pb.println(painter.line(&line));
                pb.set_message(line.text.replace('\n', " "));
            }
            Some(Notification::ResultReady) => {
                if let Some(line) = controller.session_log().last() {
                    pb.println(painter.line(line));
                }
                pb.finish_and_clear();
                break;
            }
            Some(Notification::Failed(message)) => {
                pb.finish_and_clear();
                eprintln!("{}", painter.error(&message));
                bail!("search for {topic:?} failed");
            }
            None => {}
        }
    }

    Ok(NewsReport {
        topic: topic.to_string(),
        result: SessionResult {
            articles: controller.articles().to_vec(),
            sentiment_distribution: controller.sentiment().clone(),
            error: controller.warning().map(str::to_string),
        },
    })
}

/// Call the non-streaming endpoint and wait for the whole run.
async fn fetch(client: &NewsClient, topic: &str, show_progress: bool) -> anyhow::Result<NewsReport> {
    let pb = spinner(show_progress)?;
    pb.set_message(format!("Running pipeline for {topic:?} (this can take minutes)"));

    let report = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            pb.finish_and_clear();
            bail!("interrupted");
        }
        report = client.fetch_news(topic) => report,
    };
    pb.finish_and_clear();
    report.with_context(|| format!("search for {topic:?} failed"))
}
