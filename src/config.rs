use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub capture: CaptureConfig,
    pub submission: SubmissionConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    /// Directory holding pre-recorded `statement-<n>.<ext>` clips
    pub clips_dir: String,
    /// Directory captures are copied into
    pub recordings_path: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionConfig {
    /// NATS server URL; submissions are only logged when unset
    pub nats_url: Option<String>,
    pub subject_prefix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("CHALLENGE_RECORDER").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl CaptureConfig {
    pub fn clips_dir(&self) -> PathBuf {
        expand(&self.clips_dir)
    }

    pub fn recordings_path(&self) -> PathBuf {
        expand(&self.recordings_path)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
