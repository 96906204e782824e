use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// How wire bytes are carried on stdin/stdout or in files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    Raw,
    #[default]
    Hex,
    Base64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    pub log_level: Option<String>,
    pub format: Option<WireFormat>,
    pub output: Option<OutputMode>,
}

impl CliConfig {
    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }

    pub fn format(&self, flag: Option<WireFormat>) -> WireFormat {
        flag.or(self.format).unwrap_or_default()
    }

    pub fn output(&self, json_flag: bool) -> OutputMode {
        if json_flag {
            OutputMode::Json
        } else {
            self.output.unwrap_or_default()
        }
    }
}
