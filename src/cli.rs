//! Command-line front end: replays a recorded landmark trace as a reading
//! session and prints the attention results.

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;

use crate::{
    attention::IndicatorName,
    documents::DocumentId,
    error::EngineError,
    monitor::MonitorController,
    reporting::{DisabledReporter, ResultsReporter},
    replay::{load_trace, ReplayCamera, ReplayDetector},
    sensing::camera,
    session::SessionSummary,
    settings::MonitorConfig,
};

#[derive(Parser)]
#[command(
    name = "readfocus",
    about = "Estimate reading attention from facial landmark geometry",
    version
)]
pub struct Cli {
    /// Enable debug logging (per-frame metrics)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available reading documents
    Documents,

    /// Run a reading session over a recorded landmark trace
    Read {
        /// Document key: corto, mediano or extenso
        document: DocumentId,

        /// JSON-lines landmark trace
        trace: PathBuf,

        /// Settings file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep results local instead of posting them
        #[arg(long)]
        no_report: bool,

        /// Print the document text before monitoring starts
        #[arg(long)]
        show_text: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::utils::logging::init(cli.verbose);

    match cli.command {
        Commands::Documents => {
            list_documents();
            Ok(())
        }
        Commands::Read {
            document,
            trace,
            config,
            no_report,
            show_text,
        } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(read(document, trace, config, no_report, show_text))
        }
    }
}

fn list_documents() {
    for id in DocumentId::ALL {
        let doc = id.document();
        println!("{:<8} {:<28} {}", id.key(), doc.title, doc.estimated_reading);
    }
}

async fn read(
    document: DocumentId,
    trace_path: PathBuf,
    config_path: Option<PathBuf>,
    no_report: bool,
    show_text: bool,
) -> Result<()> {
    let config = MonitorConfig::load(config_path.as_deref())?;
    let trace = load_trace(&trace_path)?;

    let reporter: Arc<dyn ResultsReporter> = if no_report {
        Arc::new(DisabledReporter)
    } else {
        MonitorController::reporter_for(&config)?
    };

    let detector = ReplayDetector::new(trace);
    let frames = detector.frame_count();
    let exhausted = detector.exhausted();

    let controller = MonitorController::new(
        config,
        camera::shared(ReplayCamera::default()),
        Arc::new(detector),
        reporter,
    );

    let doc = document.document();
    println!(
        "'{}' has an estimated reading time of {}. Press Ctrl-C to finish early.",
        doc.title, doc.estimated_reading
    );
    if show_text {
        println!("\n{}\n", doc.body);
    }

    match controller.start_session(document).await {
        Ok(_) => {}
        Err(err @ EngineError::CameraUnavailable { .. }) => {
            println!("Monitoring unavailable: {err}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    info!("Replaying {} recorded frames from {}", frames, trace_path.display());

    tokio::select! {
        _ = exhausted.notified() => {
            // let the final frame land before stopping
            tokio::time::sleep(controller.config().sample_interval()).await;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Finished early by the reader");
        }
    }

    let elapsed_ms = controller.state().await.elapsed_ms(Utc::now());
    let summary = controller.finish_session().await?;
    print_summary(&summary, elapsed_ms);

    controller.flush_reports().await;
    Ok(())
}

fn print_summary(summary: &SessionSummary, elapsed_ms: u64) {
    println!(
        "\nAttention results for '{}' ({} frames, {})",
        summary.document_id,
        summary.total_frames,
        format_reading_time(elapsed_ms)
    );
    println!("  {:<22} {:>10}", "Indicator", "Percentage");
    for (name, pct) in summary.percentages.iter() {
        let marker = if name == summary.best { "  <- best" } else { "" };
        println!("  {:<22} {:>9.2}%{}", name.description(), pct, marker);
    }
    println!("\n{}", best_sentence(summary.best, summary.best_percentage()));
}

fn format_reading_time(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1_000;
    format!("read in {}:{:02}", secs / 60, secs % 60)
}

fn best_sentence(best: IndicatorName, pct: f64) -> String {
    format!(
        "In this session the best indicator is {} with the highest recorded attention level, reaching {:.2}%.",
        best.label(),
        pct
    )
}
