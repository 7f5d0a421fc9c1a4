use std::path::PathBuf;

use clap::Parser;
use voicedesk::config::DEFAULT_CONFIG_PATH;
use voicedesk::conversation::scripted::DEFAULT_SCRIPT_PATH;

#[derive(Parser, Debug)]
#[command(
    name = "voicedesk",
    about = "A minimal terminal front-end for live voice-agent conversations",
    version
)]
pub struct Cli {
    /// YAML file with API_KEY and AGENT_ID.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Recorded conversation replayed by each session (NDJSON).
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SCRIPT_PATH)]
    pub script: PathBuf,
}
