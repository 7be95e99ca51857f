use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

/// Runtime configuration for one reclamation run.
///
/// Thresholds are fractional hours, matching the knobs operators already
/// set on the legacy deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Which directory deployment to query. Required.
    pub directory_scope: String,

    /// Target service region.
    pub region: String,

    /// Directory endpoint override. Defaults to the regional endpoint.
    #[serde(default)]
    pub directory_endpoint: Option<String>,

    /// Minimum connected duration, in hours, for a session to become a
    /// reclamation candidate.
    pub active_threshold_hours: f64,

    /// Minimum inactivity, in hours, before a candidate is terminated.
    pub idle_threshold_hours: f64,

    /// Maximum groups per directory listing call.
    pub batch_size: usize,

    /// Bounded worker pool size for session evaluation.
    pub concurrency: usize,

    /// Delay between requesting termination and re-checking the session.
    pub grace_secs: u64,

    /// Overall run deadline. Evaluation abandons remaining sessions at the
    /// deadline and returns the partial report.
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

impl Config {
    /// Load configuration: built-in defaults, then an optional config file,
    /// then `REAPER_*` environment variables, each layer overriding the
    /// previous.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let region_default =
            std::env::var("REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let mut builder = config::Config::builder()
            // Empty placeholder so a scope supplied only on the command
            // line can be applied after load; validate() rejects a scope
            // that is still empty.
            .set_default("directory_scope", "")?
            .set_default("region", region_default)?
            .set_default("active_threshold_hours", 5.0)?
            .set_default("idle_threshold_hours", 2.0)?
            .set_default("batch_size", 100)?
            .set_default("concurrency", 10)?
            .set_default("grace_secs", 2)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("REAPER").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Check required options once every override (config file, env, CLI)
    /// has been applied.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.directory_scope.is_empty(),
            "directory_scope is required (config file, REAPER_DIRECTORY_SCOPE, or --scope)"
        );
        Ok(())
    }

    pub fn active_threshold(&self) -> Duration {
        Duration::from_secs_f64(self.active_threshold_hours * 3600.0)
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs_f64(self.idle_threshold_hours * 3600.0)
    }

    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    /// Directory endpoint: explicit override, else derived from the region
    /// the way the legacy client derived its regional endpoint.
    pub fn endpoint(&self) -> String {
        self.directory_endpoint
            .clone()
            .unwrap_or_else(|| format!("https://directory.{}.internal.example.com", self.region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reaper.toml");

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
directory_scope = "scope-from-file"
active_threshold_hours = 1.5
idle_threshold_hours = 0.5
batch_size = 25
deadline_secs = 300
"#
        )
        .unwrap();

        let cfg = Config::load(Some(path.to_str().unwrap())).unwrap();

        assert_eq!(cfg.directory_scope, "scope-from-file");
        assert_eq!(cfg.active_threshold(), Duration::from_secs(5400));
        assert_eq!(cfg.idle_threshold(), Duration::from_secs(1800));
        assert_eq!(cfg.batch_size, 25);
        assert_eq!(cfg.deadline(), Some(Duration::from_secs(300)));
        // Untouched keys keep their defaults.
        assert_eq!(cfg.concurrency, 10);
        assert_eq!(cfg.grace(), Duration::from_secs(2));
    }

    #[test]
    fn scope_can_be_supplied_after_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reaper.toml");

        // No directory_scope in the file: load still succeeds so a CLI
        // override can fill it in.
        std::fs::write(&path, "region = \"us-west-2\"\n").unwrap();

        let mut cfg = Config::load(Some(path.to_str().unwrap())).unwrap();

        assert!(cfg.validate().is_err());

        cfg.directory_scope = "scope-from-cli".to_string();
        cfg.validate().unwrap();
    }

    #[test]
    fn endpoint_derived_from_region() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reaper.toml");

        std::fs::write(
            &path,
            "directory_scope = \"scope\"\nregion = \"eu-west-1\"\n",
        )
        .unwrap();

        let cfg = Config::load(Some(path.to_str().unwrap())).unwrap();

        assert_eq!(cfg.active_threshold_hours, 5.0);
        assert_eq!(cfg.idle_threshold_hours, 2.0);
        assert!(cfg.endpoint().contains("eu-west-1"));

        let mut with_override = cfg;
        with_override.directory_endpoint = Some("http://localhost:9000".to_string());
        assert_eq!(with_override.endpoint(), "http://localhost:9000");
    }
}
