use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vb_api::config::VbConfig;

#[derive(Debug, Parser)]
#[command(version, about = "Talk to a paginated list/detail REST API")]
pub struct Cli {
    /// Configuration file; defaults to vb-api.toml in the user config dir
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags taking precedence over the configuration file
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Host and path prefix without scheme, e.g. api.example.com/v1
    #[arg(long, global = true)]
    pub host: Option<String>,

    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Use http:// instead of https://
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Value sent as the `format` query parameter
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Include request URL and response body in error reports
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Log level (error, warn, info, debug, trace, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut VbConfig) {
        if let Some(host) = &self.host {
            config.host = host.as_str().into();
        }
        if let Some(token) = &self.token {
            config.token = token.as_str().into();
        }
        if self.insecure {
            config.secure = false;
        }
        if let Some(format) = &self.format {
            config.output = format.as_str().into();
        }
        if self.verbose {
            config.verbose = true;
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(level) = &self.log_level {
            config.log_level = Some(level.as_str().into());
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List a collection, following `next` cursors for extra pages
    List {
        item: String,
        /// Raw query fragment such as `active=true`; repeatable
        #[arg(short, long = "option")]
        options: Vec<String>,
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Fetch a single resource
    Get {
        item: String,
        id: String,
        #[arg(short, long = "option")]
        options: Vec<String>,
    },
    /// Create a resource from a JSON payload
    Create {
        item: String,
        payload: String,
        #[arg(short, long = "option")]
        options: Vec<String>,
    },
    /// Replace a resource; the payload must contain `id`
    Update {
        item: String,
        payload: String,
        #[arg(short, long = "option")]
        options: Vec<String>,
    },
    /// Partially update a resource; the payload must contain `id`
    Patch {
        item: String,
        payload: String,
        #[arg(short, long = "option")]
        options: Vec<String>,
    },
    /// Delete the resource named by the payload's `id`
    Delete {
        item: String,
        payload: String,
        #[arg(short, long = "option")]
        options: Vec<String>,
    },
    /// Print the effective configuration
    Config {
        /// Write the effective configuration back to the file
        #[arg(long)]
        save: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_with_options() {
        let cli = Cli::parse_from([
            "vb-api", "--host", "api.example.com", "list", "widgets", "-o", "active=true", "-o",
            "sort=-id", "--pages", "3",
        ]);

        assert_eq!(cli.overrides.host.as_deref(), Some("api.example.com"));
        match cli.command {
            Command::List { item, options, pages } => {
                assert_eq!(item, "widgets");
                assert_eq!(options, vec!["active=true", "sort=-id"]);
                assert_eq!(pages, 3);
            },
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn payload_commands_require_a_payload() {
        assert!(Cli::try_parse_from(["vb-api", "update", "widgets"]).is_err());
        assert!(Cli::try_parse_from(["vb-api", "update", "widgets", r#"{"id":1}"#]).is_ok());
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = VbConfig::default();
        let cli = Cli::parse_from([
            "vb-api", "get", "widgets", "5", "--token", "T", "--insecure", "-v",
        ]);

        cli.overrides.apply(&mut config);

        assert_eq!(config.token, "T");
        assert!(!config.secure);
        assert!(config.verbose);
        assert_eq!(config.output, "json");
    }
}
