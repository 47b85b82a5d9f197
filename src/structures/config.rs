use std::fs;

use serde::Deserialize;

use crate::{source::StalePolicy, structures::RoutingParameters};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingDefaultConfig,
    pub router: RouterConfig,
}

#[derive(Debug, Deserialize)]
pub struct RoutingDefaultConfig {
    #[serde(default)]
    pub stale_responses: StalePolicy,
    #[serde(default = "RoutingDefaultConfig::default_walking_speed")]
    pub walking_speed: usize,
}

impl Default for RoutingDefaultConfig {
    fn default() -> Self {
        RoutingDefaultConfig {
            stale_responses: StalePolicy::default(),
            walking_speed: Self::default_walking_speed(),
        }
    }
}

impl RoutingDefaultConfig {
    fn default_walking_speed() -> usize {
        RoutingParameters::default().walking_speed
    }

    pub fn parameters(&self) -> RoutingParameters {
        RoutingParameters {
            walking_speed: self.walking_speed,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "router")]
pub enum RouterConfig {
    #[serde(rename = "mockup")]
    Mockup(MockupRouterConfig),
    #[serde(rename = "lookup")]
    Lookup(LookupRouterConfig),
    #[serde(rename = "union")]
    Union(UnionRouterConfig),
}

#[derive(Debug, Default, Deserialize)]
pub struct MockupRouterConfig {
    pub name: Option<String>,
    pub delay_ms: Option<u64>,
    pub segments: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LookupRouterConfig {
    #[serde(default)]
    pub places: Vec<PlaceEntry>,
    #[serde(default)]
    pub stops: Vec<StopEntry>,
    pub inner: Box<RouterConfig>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceEntry {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct StopEntry {
    pub id: String,
    pub name: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub platform: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnionRouterConfig {
    pub children: Vec<RouterConfig>,
}

impl RouterConfig {
    pub fn label(&self) -> &str {
        match self {
            RouterConfig::Mockup(c) => c.name.as_deref().unwrap_or("mockup"),
            RouterConfig::Lookup(_) => "lookup",
            RouterConfig::Union(_) => "union",
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config: {e}"))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        serde_yml::from_str(content).map_err(|e| format!("Failed to parse config: {e}"))
    }
}
