use std::fs::File;

use tracing_subscriber::prelude::*;

/// Install a tracing subscriber if one was requested.
///
/// `VOICEDESK_LOG=<path>` writes debug logs to a file, which keeps them out of
/// the raw-mode terminal. Otherwise `RUST_LOG` enables a stderr subscriber.
/// With neither set, logging stays off.
pub fn init() {
    if let Ok(path) = std::env::var("VOICEDESK_LOG") {
        match File::create(&path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false);
                let filter = tracing_subscriber::EnvFilter::new("voicedesk=debug");
                let _ = tracing_subscriber::registry()
                    .with(file_layer.with_filter(filter))
                    .try_init();
            }
            Err(err) => {
                eprintln!("Failed to create log file {path}: {err}");
            }
        }
    } else if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }
}
