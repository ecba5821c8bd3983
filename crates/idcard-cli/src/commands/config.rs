//! Config command - inspect and edit the configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use idcard_core::IdCardConfig;

use super::default_config_path;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value (e.g. "server.port")
    Get { key: String },

    /// Change one value (e.g. "ocr.min_score" "0.5")
    Set { key: String, value: String },

    /// Print the configuration file location
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => {
            if !path.exists() {
                println!("{} No config file found, showing defaults.", style("ℹ").blue());
            }
            println!("{}", serde_json::to_string_pretty(&read_or_default(&path)?)?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            write_config(&path, &IdCardConfig::default())?;
            println!("{} Created configuration file at {}", style("✓").green(), path.display());
        }
        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(read_or_default(&path)?)?;
            println!("{}", serde_json::to_string_pretty(lookup(&json, &key)?)?);
        }
        ConfigCommand::Set { key, value } => {
            let parsed = parse_value(&value);
            let updated = assign(&read_or_default(&path)?, &key, parsed.clone())?;
            write_config(&path, &updated)?;
            println!("{} Set {} = {}", style("✓").green(), key, parsed);
        }
        ConfigCommand::Path => {
            println!("Configuration file: {}", path.display());
            if path.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!();
                println!("Run 'idcard config init' to create a configuration file.");
            }
        }
    }

    Ok(())
}

fn read_or_default(path: &Path) -> anyhow::Result<IdCardConfig> {
    if path.exists() {
        Ok(IdCardConfig::from_file(path)?)
    } else {
        Ok(IdCardConfig::default())
    }
}

fn write_config(path: &Path, config: &IdCardConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;
    Ok(())
}

/// Values that are not valid JSON are taken as plain strings.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn lookup<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.').try_fold(json, |current, part| {
        current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })
}

/// Set a dotted key and re-validate the result as a config.
fn assign(config: &IdCardConfig, key: &str, value: Value) -> anyhow::Result<IdCardConfig> {
    let mut json = serde_json::to_value(config)?;
    let (parent_key, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };

    let mut parent = &mut json;
    if let Some(parent_key) = parent_key {
        for part in parent_key.split('.') {
            parent = parent
                .get_mut(part)
                .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
        }
    }

    let object = parent
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("Cannot set value at non-object path"))?;
    if !object.contains_key(leaf) {
        anyhow::bail!("Configuration key not found: {}", key);
    }
    object.insert(leaf.to_string(), value);

    let updated: IdCardConfig = serde_json::from_value(json)?;
    updated.validate()?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup_nested_key() {
        let json = serde_json::to_value(IdCardConfig::default()).unwrap();
        assert_eq!(lookup(&json, "server.port").unwrap(), &Value::from(5000));
        assert!(lookup(&json, "server.missing").is_err());
    }

    #[test]
    fn test_assign_number_and_string() {
        let config = assign(&IdCardConfig::default(), "server.port", parse_value("8080")).unwrap();
        assert_eq!(config.server.port, 8080);

        let config = assign(&config, "server.host", parse_value("127.0.0.1")).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_assign_rejects_unknown_key() {
        assert!(assign(&IdCardConfig::default(), "ocr.threshold", Value::from(1)).is_err());
        assert!(assign(&IdCardConfig::default(), "nope.port", Value::from(1)).is_err());
    }

    #[test]
    fn test_assign_rejects_wrong_type() {
        assert!(assign(&IdCardConfig::default(), "server.port", parse_value("high")).is_err());
        assert!(assign(&IdCardConfig::default(), "ocr.min_score", parse_value("2")).is_err());
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = IdCardConfig::default();
        config.ocr.keep_unk = true;

        write_config(&path, &config).unwrap();
        assert!(read_or_default(&path).unwrap().ocr.keep_unk);
    }
}
