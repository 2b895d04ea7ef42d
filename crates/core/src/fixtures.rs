//! Fixtures

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    params::{ParamsError, PlanParams, ValueMode},
    roles::{Role, Roster, RosterError},
    search::DEFAULT_MAX_SOLUTIONS,
    tiers::{PopularityTier, UnknownTier},
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unrecognized tier label
    #[error(transparent)]
    UnknownTier(#[from] UnknownTier),

    /// Role set or ranking was invalid
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// Pricing parameters were invalid
    #[error(transparent)]
    Params(#[from] ParamsError),
}

/// One role of a scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioRole {
    /// Role name, unique within the scenario.
    pub name: String,

    /// Units sold/produced at the base price.
    pub count: u64,

    /// Optional popularity tier label (`+++` … `---`).
    #[serde(default)]
    pub tier: Option<String>,
}

/// A planning scenario loaded from a YAML fixture file.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Shared base price of every role.
    pub base_price: f64,

    /// Role declarations.
    pub roles: Vec<ScenarioRole>,

    /// Role names, most popular first.
    pub popularity: Vec<String>,

    /// Whole-unit adjustments when `true` (the default).
    #[serde(default = "default_integer_only")]
    pub integer_only: bool,

    /// Optional global lower adjustment limit.
    #[serde(default)]
    pub min_adj: Option<f64>,

    /// Optional global upper adjustment limit.
    #[serde(default)]
    pub max_adj: Option<f64>,

    /// Cap for the alternatives search.
    #[serde(default)]
    pub max_solutions: Option<usize>,
}

fn default_integer_only() -> bool {
    true
}

impl Scenario {
    /// Load a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] when the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Parse a scenario from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] when the text is not a valid scenario.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Assemble validated planning parameters from the scenario.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] for unknown tier labels or invalid roles,
    /// ranking entries or prices.
    pub fn params(&self) -> Result<PlanParams, FixtureError> {
        let roster = Roster::new(
            self.roles
                .iter()
                .map(|role| Role::new(role.name.clone(), role.count)),
            &self.popularity,
        )?;

        let mut params = PlanParams::new(
            self.base_price,
            roster,
            ValueMode::from_integer_only(self.integer_only),
        )?
        .with_limits(self.min_adj, self.max_adj)?;

        for role in &self.roles {
            if let Some(label) = &role.tier {
                params = params.with_tier(&role.name, label.parse::<PopularityTier>()?)?;
            }
        }

        Ok(params)
    }

    /// Cap for the alternatives search, defaulting to
    /// [`DEFAULT_MAX_SOLUTIONS`].
    #[must_use]
    pub fn max_solutions(&self) -> usize {
        self.max_solutions.unwrap_or(DEFAULT_MAX_SOLUTIONS)
    }
}
