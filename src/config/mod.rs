#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::{CliConfig, Command};

#[cfg(feature = "cli")]
mod cli_config {
    use crate::core::normalizer::ResponseMode;
    use crate::core::transport::DEFAULT_BASE_URL;
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_non_empty_string, validate_positive_number, validate_range, validate_url,
        Validate,
    };
    use clap::{Parser, Subcommand};
    use std::path::PathBuf;
    use std::time::Duration;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "goods-client")]
    #[command(about = "Command-line client for the goods dashboard API")]
    pub struct CliConfig {
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        pub base_url: String,

        #[arg(long, default_value = "10")]
        pub timeout_secs: u64,

        #[arg(long, default_value = "1")]
        pub retries: u32,

        #[arg(long, default_value = "1000")]
        pub retry_delay_ms: u64,

        #[arg(long, default_value = "pass-through", help = "pass-through or envelope")]
        pub response_mode: ResponseMode,

        #[arg(long, help = "Read client settings from a TOML file instead of flags")]
        pub config: Option<PathBuf>,

        #[arg(long, short, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// List all products
        List,
        /// Show the dashboard data for one product
        Dashboard { id: String },
        /// Ask the assistant a question about one product
        Chat { id: String, question: String },
        /// Download the product report (DOCX)
        Report {
            id: String,
            #[arg(long, default_value = ".")]
            out_dir: String,
        },
        /// Download the Mosprom letter (DOCX)
        Letter {
            id: String,
            #[arg(long, default_value = ".")]
            out_dir: String,
        },
    }

    impl ConfigProvider for CliConfig {
        fn base_url(&self) -> &str {
            &self.base_url
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(self.timeout_secs)
        }

        fn retries(&self) -> u32 {
            self.retries
        }

        fn retry_delay(&self) -> Duration {
            Duration::from_millis(self.retry_delay_ms)
        }

        fn response_mode(&self) -> ResponseMode {
            self.response_mode
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_url("base_url", &self.base_url)?;
            validate_positive_number("timeout_secs", self.timeout_secs, 1)?;
            validate_range("retries", self.retries, 0, 5)?;
            if let Command::Chat { question, .. } = &self.command {
                validate_non_empty_string("question", question)?;
            }
            Ok(())
        }
    }

}
