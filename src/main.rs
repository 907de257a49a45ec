mod cli;

use std::path::Path;

use clap::Parser;
use serde_json::Value;
use tracing::{debug, info};
use vb_api::{
    ApiClient, ClientConfig, Page,
    config::{VbConfig, default_config_path, load_config, save_config},
    logging::{LoggingConfig, init_logging},
    result::{Result, VbError},
};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = load_config(&config_path)?;
    cli.overrides.apply(&mut config);

    let mut logging = LoggingConfig::from_env();
    if let Some(level) = &config.log_level {
        logging = logging.with_level_name(level);
    }
    let _log_guard = init_logging(logging)?;
    info!(version = env!("CARGO_PKG_VERSION"), "vb-api starting up");

    run(cli.command, &config_path, config).await?;
    Ok(())
}

async fn run(command: Command, config_path: &Path, config: VbConfig) -> Result<()> {
    if let Command::Config { save } = command {
        if save {
            save_config(config_path, &config)?;
            info!(path = %config_path.display(), "Configuration saved");
        }
        println!("# {}", config_path.display());
        println!("{config:#?}");
        return Ok(());
    }

    let client_config = ClientConfig::from(config);
    client_config.validate()?;
    let mut api = ApiClient::new(client_config)?;
    debug!(target_api = %api, "Client configured");

    match command {
        Command::List { item, options, pages } => {
            let options = as_strs(&options);
            let mut results = api.list(&item, &options, None).await?;

            for _ in 1..pages {
                if api.cursor(&item).next.is_none() {
                    break;
                }
                results.extend(api.list(&item, &[], Some(Page::Next)).await?);
            }

            print_json(&Value::Array(results))
        },
        Command::Get { item, id, options } => {
            let body = api.get(&item, id, &as_strs(&options)).await?;
            print_json(&body)
        },
        Command::Create { item, payload, options } => {
            let body = api
                .create(&item, &parse_payload(&payload)?, &as_strs(&options))
                .await?;
            print_json(&body)
        },
        Command::Update { item, payload, options } => {
            let body = api
                .update(&item, &parse_payload(&payload)?, &as_strs(&options))
                .await?;
            print_json(&body)
        },
        Command::Patch { item, payload, options } => {
            let body = api
                .patch(&item, &parse_payload(&payload)?, &as_strs(&options))
                .await?;
            print_json(&body)
        },
        Command::Delete { item, payload, options } => {
            if api
                .delete(&item, &parse_payload(&payload)?, &as_strs(&options))
                .await?
            {
                println!("deleted");
                Ok(())
            } else {
                Err(VbError::DeleteRejected { item: item.into() })
            }
        },
        Command::Config { .. } => Ok(()),
    }
}

fn as_strs(options: &[String]) -> Vec<&str> {
    options.iter().map(String::as_str).collect()
}

fn parse_payload(payload: &str) -> Result<Value> {
    serde_json::from_str(payload).map_err(VbError::InvalidPayload)
}

fn print_json(value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(VbError::InvalidPayload)?;
    println!("{rendered}");
    Ok(())
}
