//! Scam Detector - Main Entry Point
//!
//! Reads accessibility events as JSON lines on stdin, one per line:
//! `{"type":"notification_posted","package":"com.sms","title":"...","text":"..."}`

use std::process::ExitCode;
use std::sync::Arc;

use scam_detector_core::constants::{APP_NAME, APP_VERSION};
use scam_detector_core::{
    Classifier, DetectionService, FileNotifier, JsonLinesSource, Lifecycle, LogNotifier, Notifier,
    ServiceConfig,
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let classifier = Arc::new(Classifier::load(&config.asset_paths()));
    if !classifier.is_ready() {
        log::warn!("Running without a model - no alerts will fire");
    }

    let notifier: Arc<dyn Notifier> = match &config.alert_file {
        Some(path) => match FileNotifier::new(path.clone()) {
            Ok(notifier) => Arc::new(notifier),
            Err(e) => {
                log::warn!("Alert file unavailable ({}), falling back to log", e);
                Arc::new(LogNotifier)
            }
        },
        None => Arc::new(LogNotifier),
    };

    let source = JsonLinesSource::new(std::io::BufReader::new(std::io::stdin()));
    let mut service = DetectionService::new(config, Arc::clone(&classifier), notifier)
        .with_source(Box::new(source));

    if let Err(e) = service.start() {
        log::error!("Failed to start service: {}", e);
        return ExitCode::FAILURE;
    }

    service.join_source();
    service.stop();

    let status = classifier.status();
    log::info!(
        "Classifier: {} inferences, avg {:.2} ms, {} failures",
        status.inference_count,
        status.avg_latency_ms,
        status.failure_count
    );
    ExitCode::SUCCESS
}
