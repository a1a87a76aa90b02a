// Settings are read with the config crate: an optional file layered with
// SUBSUME__* environment variables. They describe the logging filter, the
// type the structural matcher is rooted at, and the customiser chain in
// registration order.

use std::sync::Arc;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::concept::Hierarchy;
use crate::custom::{Aggregator, RangeOverlapper, Ranker, SectionInverter};
use crate::customiser::{Customiser, CustomiserChain};
use crate::error::{Result, SubsumeError};
use crate::frame::SlotPath;
use crate::structural::StructuralMatcher;

const ENV_PREFIX: &str = "SUBSUME";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogSettings {
    #[serde(default = "LogSettings::default_filter")]
    pub filter: String,
}

impl LogSettings {
    fn default_filter() -> String {
        "subsume=info".to_owned()
    }

    /// Installs a fmt subscriber filtered by `filter`. A subscriber that is
    /// already installed is left in place.
    pub fn install(&self) -> Result<()> {
        let filter = EnvFilter::try_new(&self.filter)
            .map_err(|e| SubsumeError::Config(format!("log filter `{}`: {e}", self.filter)))?;
        if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
        Ok(())
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
        }
    }
}

/// One customiser of the chain, tagged by `kind`. Concepts are referenced by
/// name and slots by dotted path.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CustomiserSpec {
    Aggregator {
        matching_type: String,
        targets: String,
        value: String,
    },
    RangeOverlapper {
        matching_type: String,
        field: String,
    },
    Ranker {
        matching_type: String,
        optional: String,
        ranking: String,
    },
    SectionInverter {
        matching_type: String,
        section: String,
    },
}

impl CustomiserSpec {
    pub fn build(&self, model: &Arc<Hierarchy>) -> Result<Box<dyn Customiser>> {
        let customiser: Box<dyn Customiser> = match self {
            CustomiserSpec::Aggregator {
                matching_type,
                targets,
                value,
            } => {
                if value.trim().is_empty() {
                    return Err(SubsumeError::Config("aggregator value slot is empty".into()));
                }
                Box::new(Aggregator::new(
                    model.id(matching_type)?,
                    targets.parse::<SlotPath>()?,
                    value.trim(),
                ))
            }
            CustomiserSpec::RangeOverlapper {
                matching_type,
                field,
            } => Box::new(RangeOverlapper::new(
                model.id(matching_type)?,
                field.parse::<SlotPath>()?,
            )),
            CustomiserSpec::Ranker {
                matching_type,
                optional,
                ranking,
            } => Box::new(Ranker::new(
                Arc::clone(model),
                model.id(matching_type)?,
                optional.parse::<SlotPath>()?,
                ranking.parse::<SlotPath>()?,
            )),
            CustomiserSpec::SectionInverter {
                matching_type,
                section,
            } => Box::new(SectionInverter::new(
                model.id(matching_type)?,
                section.parse::<SlotPath>()?,
            )),
        };
        Ok(customiser)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub log: LogSettings,
    /// Concept the structural matcher is rooted at; the hierarchy root when absent.
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub customisers: Vec<CustomiserSpec>,
}

impl Settings {
    /// Reads `path` (any format the config crate recognises by extension,
    /// missing files allowed) and then the environment.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }

    /// Builds the customiser chain in the order the settings list it.
    pub fn chain(&self, model: &Arc<Hierarchy>) -> Result<CustomiserChain> {
        let mut chain = CustomiserChain::new(Arc::clone(model));
        for spec in &self.customisers {
            chain = chain.register_boxed(spec.build(model)?);
        }
        Ok(chain)
    }

    pub fn structural(&self, model: &Arc<Hierarchy>) -> Result<StructuralMatcher> {
        let root = match &self.root {
            Some(name) => model.id(name)?,
            None => model.root(),
        };
        Ok(StructuralMatcher::new(Arc::clone(model), root))
    }
}
