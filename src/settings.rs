// config lets you read a separate config file
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use tracing::warn;

use crate::error::Result;
use crate::language::LanguageTables;
use crate::registry::TypeRegistry;
use crate::system::{ExtensionPoint, Initializer, TypeSystem};

/// Name of the optional settings file, looked up without extension.
pub const SETTINGS_FILE: &str = "semtypes";
pub const ENV_PREFIX: &str = "SEMTYPES";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AliasSetting {
    pub label: String,
    #[serde(rename = "type")]
    pub type_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Language code selecting the built-in label tables.
    pub language: String,
    /// Extra aliases, e.g. `[[aliases]] label = "Web address", type = "_uri"`.
    pub aliases: Vec<AliasSetting>,
    /// Label overrides for already bound types.
    pub labels: Vec<AliasSetting>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: String::from("en"),
            aliases: Vec::new(),
            labels: Vec::new(),
        }
    }
}

impl Settings {
    /// Reads `semtypes.{toml,json,...}` when present, then `SEMTYPES_*` variables.
    pub fn load() -> Result<Self> {
        Self::load_from(SETTINGS_FILE)
    }
    pub fn load_from(name: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
    pub fn language_tables(&self) -> Result<LanguageTables> {
        LanguageTables::for_code(&self.language)
    }
    /// Applies the configured aliases and labels to a registry.
    pub fn initializer(&self) -> Initializer {
        let aliases = self.aliases.clone();
        let labels = self.labels.clone();
        Box::new(move |registry: &mut TypeRegistry| {
            for alias in &aliases {
                registry.register_data_type_alias(&alias.type_id, &alias.label);
            }
            for label in &labels {
                match registry.binding(&label.type_id) {
                    Some(binding) => registry.register_data_type(
                        &label.type_id,
                        binding.handler(),
                        binding.kind(),
                        Some(&label.label),
                    ),
                    None => warn!(type_id = %label.type_id, "cannot label an unbound type"),
                }
            }
        })
    }
    /// Builds a type system for these settings, with the configured
    /// aliases and labels applied at the current extension point.
    pub fn type_system(&self) -> Result<TypeSystem> {
        let mut system = TypeSystem::new(self.language_tables()?);
        system.register_initializer(ExtensionPoint::Current, self.initializer());
        Ok(system)
    }
}
