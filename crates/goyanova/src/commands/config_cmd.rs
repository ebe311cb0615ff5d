//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::config::{self, Config, Defaults, Settings};
use crate::error::CliError;
use crate::output;

use super::util;

const OUTPUT_CHOICES: &[&str] = &["table", "json", "json-compact", "yaml", "plain"];
const COLOR_CHOICES: &[&str] = &["auto", "always", "never"];
const LOCALE_CHOICES: &[&str] = &["es", "en"];

fn choose(prompt: &str, items: &[&str], current: &str, yes: bool) -> Result<String, CliError> {
    let default = items.iter().position(|i| *i == current).unwrap_or(0);
    let picked = util::select(prompt, items, default, yes)?;
    Ok(items.get(picked).copied().unwrap_or(current).to_owned())
}

pub fn handle(args: ConfigArgs, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = config::config_path();
            if !settings.quiet {
                eprintln!("GoyaNova configuration");
                eprintln!("   Config path: {}\n", path.display());
            }

            let current = config::load_config_or_default().defaults;
            let yes = settings.yes;
            let defaults = Defaults {
                output: choose("Default output format", OUTPUT_CHOICES, &current.output, yes)?,
                color: choose("Color output", COLOR_CHOICES, &current.color, yes)?,
                locale: choose("Label language", LOCALE_CHOICES, &current.locale, yes)?,
            };

            let saved = config::save_config(&Config { defaults })?;
            if !settings.quiet {
                eprintln!("   ✓ Saved {}", saved.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let as_toml = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                settings.output,
                &cfg,
                |_| as_toml.clone(),
                |c| {
                    format!(
                        "output={}\ncolor={}\nlocale={}",
                        c.defaults.output, c.defaults.color, c.defaults.locale
                    )
                },
            );
            output::print_output(out.trim_end(), settings.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), settings.quiet);
            Ok(())
        }
    }
}
