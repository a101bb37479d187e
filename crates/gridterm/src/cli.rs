//! Command-line options.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};

use gridterm_core::EngineConfig;

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Usage: gridterm [OPTIONS]

Options:
  --config <PATH>    Load settings from a YAML or JSON file
  --width <COLS>     Grid width in cells
  --height <ROWS>    Grid height in cells
  --refresh <MS>     Render interval in milliseconds
  -h, --help         Print this help

Left click toggles a mark, right click clears, the wheel changes color.
Ctrl+C quits.
";

/// Parsed command-line options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// Configuration file
    pub config: Option<PathBuf>,
    /// Width override
    pub width: Option<u16>,
    /// Height override
    pub height: Option<u16>,
    /// Refresh interval override (ms)
    pub refresh_ms: Option<u64>,
    /// `--help` was given
    pub help: bool,
}

impl CliOptions {
    /// Parse arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => options.help = true,
                "--config" => options.config = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--width" => options.width = Some(number(&mut args, &arg)?),
                "--height" => options.height = Some(number(&mut args, &arg)?),
                "--refresh" => options.refresh_ms = Some(number(&mut args, &arg)?),
                other => bail!("unknown argument '{}'\n\n{}", other, USAGE),
            }
        }

        Ok(options)
    }

    /// Load the configuration file (or defaults) and apply overrides.
    pub fn load_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => EngineConfig::default(),
        };

        if let Some(width) = self.width {
            config.engine.width = width;
        }
        if let Some(height) = self.height {
            config.engine.height = height;
        }
        if let Some(refresh_ms) = self.refresh_ms {
            config.engine.refresh_interval_ms = refresh_ms;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<String> {
    args.next().ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn number<T>(args: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = value(args, flag)?;
    raw.parse()
        .with_context(|| format!("invalid value '{}' for {}", raw, flag))
}
