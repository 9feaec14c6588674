//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, KitConfig};
use crate::error::{Error, Result, ResultExt};
use serde_json::{json, Value};
use std::time::Duration;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Validate => self.validate(),
            Commands::Schedule => self.schedule(),
        }
    }

    /// Load the config file given with `-c`
    fn load_config(&self) -> Result<KitConfig> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config file not specified (use -c flag)"))?;
        load_config(path).with_context(|| format!("Invalid config '{}'", path.display()))
    }

    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        self.output_message(&validation_message(&config));
        Ok(())
    }

    fn schedule(&self) -> Result<()> {
        let config = self.load_config()?;
        self.output_message(&schedule_message(&config)?);
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn validation_message(config: &KitConfig) -> Value {
    let polling = if config.polling.is_some() {
        "with polling"
    } else {
        "without polling"
    };
    json!({
        "type": "LOG",
        "log": {
            "level": "INFO",
            "message": format!(
                "Config is valid ({polling}, {} retries per page)",
                config.pagination.max_retries
            )
        }
    })
}

fn schedule_message(config: &KitConfig) -> Result<Value> {
    let polling = config.polling_policy()?;
    let waits = polling.schedule();

    // Offsets from the start of the watch at which each poll happens
    let mut offset = Duration::ZERO;
    let mut polls_at_ms = vec![0_u64];
    for wait in &waits {
        offset += *wait;
        polls_at_ms.push(offset.as_millis() as u64);
    }

    let retry = config.retry_policy();
    let retry_delays_ms: Vec<u64> = (0..retry.max_retries)
        .map(|attempt| retry.delay_for(attempt, None).as_millis() as u64)
        .collect();

    Ok(json!({
        "type": "SCHEDULE",
        "polling": {
            "max_total_wait_ms": polling.max_total_wait().as_millis() as u64,
            "waits_ms": waits.iter().map(|w| w.as_millis() as u64).collect::<Vec<_>>(),
            "polls_at_ms": polls_at_ms,
        },
        "retry": {
            "max_retries": retry.max_retries,
            "delays_ms": retry_delays_ms,
            "max_pages": config.pagination.max_pages,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schedule_message() {
        let config = load_config_from_str(
            r"
polling:
  initial_delay_ms: 1000
  max_delay_ms: 8000
  backoff_multiplier: 2.0
  max_total_wait_secs: 20
",
        )
        .unwrap();

        let msg = schedule_message(&config).unwrap();
        assert_eq!(msg["polling"]["waits_ms"], json!([1000, 2000, 4000, 8000, 5000]));
        assert_eq!(
            msg["polling"]["polls_at_ms"],
            json!([0, 1000, 3000, 7000, 15000, 20000])
        );
        assert_eq!(msg["retry"]["delays_ms"], json!([100, 200, 400]));
        assert!(msg["retry"]["max_pages"].is_null());
    }

    #[test]
    fn test_schedule_requires_polling() {
        let config = load_config_from_str("pagination: {}").unwrap();
        assert!(matches!(
            schedule_message(&config),
            Err(Error::MissingConfigField { .. })
        ));
    }

    #[test]
    fn test_validation_message() {
        let msg = validation_message(&KitConfig::default());
        assert_eq!(msg["type"], "LOG");
        assert_eq!(
            msg["log"]["message"],
            "Config is valid (without polling, 3 retries per page)"
        );
    }

    #[test]
    fn test_parse_cli() {
        let cli = Cli::try_parse_from([
            "marketplace-kit",
            "schedule",
            "-c",
            "kit.yaml",
            "--format",
            "pretty",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Schedule));
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert_eq!(cli.config.unwrap().to_string_lossy(), "kit.yaml");
    }

    #[tokio::test]
    async fn test_run_without_config_fails() {
        let cli = Cli::try_parse_from(["marketplace-kit", "validate"]).unwrap();
        let err = Runner::new(cli).run().await.unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
