//! Configuration: control field names, serializer options and server options.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional file (`kinetic.toml`, `kinetic.json`, ... or an explicit path),
//! then `KINETIC_` prefixed environment variables using `__` to reach nested
//! keys, e.g. `KINETIC_OPTIONS__SEARCH_PREFIX=/squery/`.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

pub const DEFAULT_CONFIG_NAME: &str = "kinetic";

/// Names of the reserved control fields in the submitted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlNames {
    pub class_key: String,
    pub domain: String,
    pub path: String,
    pub output_type: String,
    pub limit: String,
    pub order_by: String,
    pub sort_order: String,
    pub search: String,
}

impl Default for ControlNames {
    fn default() -> Self {
        Self {
            class_key: "_class_key".into(),
            domain: "_domain".into(),
            path: "_path".into(),
            output_type: "_type".into(),
            limit: "_limit".into(),
            order_by: "_order_by".into(),
            sort_order: "_sort_order".into(),
            search: "search".into(),
        }
    }
}

impl ControlNames {
    /// True for any of the reserved names; those never become predicates.
    pub fn is_control(&self, name: &str) -> bool {
        [
            &self.class_key,
            &self.domain,
            &self.path,
            &self.output_type,
            &self.limit,
            &self.order_by,
            &self.sort_order,
            &self.search,
        ]
        .iter()
        .any(|n| n.as_str() == name)
    }
}

/// Which bytes survive unescaped in path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Escaping {
    /// Browser `escape()` compatible: `A-Za-z0-9@*_+-./` pass through.
    #[default]
    Legacy,
    /// RFC 3986 unreserved characters only.
    Component,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    /// Placed between the class key and the escaped predicate.
    pub search_prefix: String,
    /// Placed between the path and the class key.
    pub class_key_prefix: String,
    /// Stands in for an empty predicate.
    pub null_marker: String,
    /// Backslash-escape `"` inside quoted predicate values.
    pub escape_embedded_quotes: bool,
    /// Use the text of the `search` control when a form yields no predicates.
    /// Off by default: a plain submit button also posts under that name.
    pub free_text_search: bool,
    pub escaping: Escaping,
    pub limit_segment: String,
    pub order_by_segment: String,
    pub sort_order_segment: String,
    pub output_type_param: String,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            search_prefix: "/search/STRING/".into(),
            class_key_prefix: String::new(),
            null_marker: "null".into(),
            escape_embedded_quotes: false,
            free_text_search: false,
            escaping: Escaping::Legacy,
            limit_segment: "limit".into(),
            order_by_segment: "order_by".into(),
            sort_order_segment: "sort_order".into(),
            output_type_param: "_type".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    /// Surface the computed url instead of redirecting to it.
    pub dry_run: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: "127.0.0.1:8080".into(), dry_run: false }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub names: ControlNames,
    pub options: SerializerOptions,
    pub server: ServerSettings,
}

impl Settings {
    /// Loads settings from `path` (required when given) or from an optional
    /// `kinetic.*` file in the working directory, with environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(p) => File::with_name(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        Self::from_config(
            Config::builder()
                .add_source(file)
                .add_source(Self::environment()),
        )
    }

    /// Loads settings from an in-memory document, e.g. an embedded default.
    pub fn parse(content: &str, format: config::FileFormat) -> Result<Self> {
        Self::from_config(Config::builder().add_source(File::from_str(content, format)))
    }

    fn environment() -> Environment {
        Environment::with_prefix("KINETIC")
            .prefix_separator("_")
            .separator("__")
    }

    fn from_config(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        debug!(?settings, "settings loaded");
        Ok(settings)
    }
}
