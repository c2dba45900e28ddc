use crate::types::{AggregatorError, Niche, Result, Source};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// A named group of sources inside a niche.
#[derive(Debug, Clone, PartialEq)]
pub struct Subsection {
    pub name: String,
    pub sources: Vec<Source>,
}

/// One niche's entry in the sources document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NicheConfig {
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
    /// Subsections in document order.
    #[serde(default, deserialize_with = "ordered_subsections")]
    pub subsections: Option<Vec<Subsection>>,
}

impl NicheConfig {
    /// True when the entry carries neither `sources` nor `subsections`.
    pub fn is_empty(&self) -> bool {
        self.sources.is_none() && self.subsections.is_none()
    }

    pub fn subsection(&self, name: &str) -> Option<&Subsection> {
        self.subsections
            .as_ref()?
            .iter()
            .find(|subsection| subsection.name == name)
    }

    /// Subsections concatenated in order, else the flat source list.
    pub fn flatten(&self) -> Vec<Source> {
        match (&self.subsections, &self.sources) {
            (Some(subsections), _) => subsections
                .iter()
                .flat_map(|subsection| subsection.sources.iter().cloned())
                .collect(),
            (None, Some(sources)) => sources.clone(),
            (None, None) => Vec::new(),
        }
    }
}

fn ordered_subsections<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Subsection>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SubsectionsVisitor;

    impl<'de> Visitor<'de> for SubsectionsVisitor {
        type Value = Vec<Subsection>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of subsection name to a list of sources")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut subsections = Vec::new();
            while let Some((name, sources)) = map.next_entry::<String, Vec<Source>>()? {
                subsections.push(Subsection { name, sources });
            }
            Ok(subsections)
        }
    }

    deserializer.deserialize_map(SubsectionsVisitor).map(Some)
}

/// A niche served from a subsection of another niche.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsectionAlias {
    pub parent: Niche,
    pub subsection: &'static str,
}

const SUBSECTION_ALIASES: &[(Niche, SubsectionAlias)] = &[
    (Niche::Php, SubsectionAlias { parent: Niche::Dev, subsection: "php" }),
    (Niche::Angular, SubsectionAlias { parent: Niche::Dev, subsection: "angular" }),
    (Niche::Spring, SubsectionAlias { parent: Niche::Dev, subsection: "spring" }),
];

pub fn alias_for(niche: Niche) -> Option<SubsectionAlias> {
    SUBSECTION_ALIASES
        .iter()
        .find(|(aliased, _)| *aliased == niche)
        .map(|(_, alias)| *alias)
}

/// The sources document, keyed by niche name.
///
/// Keys that are not niche names are ignored. A niche entry that fails to
/// decode is dropped with a warning so the other niches still run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "HashMap<String, Value>")]
pub struct SourcesConfig {
    niches: HashMap<String, NicheConfig>,
}

impl From<HashMap<String, Value>> for SourcesConfig {
    fn from(mut document: HashMap<String, Value>) -> Self {
        let mut niches = HashMap::new();

        for niche in Niche::ALL {
            let Some(value) = document.remove(niche.as_str()) else {
                continue;
            };
            match serde_json::from_value::<NicheConfig>(value) {
                Ok(config) => {
                    niches.insert(niche.as_str().to_string(), config);
                }
                Err(e) => warn!("Ignoring invalid sources entry for {}: {}", niche, e),
            }
        }

        for key in document.keys() {
            debug!("Ignoring unknown key '{}' in sources document", key);
        }

        Self { niches }
    }
}

impl SourcesConfig {
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AggregatorError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        serde_json::from_str(&content).map_err(|e| AggregatorError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn niche(&self, niche: Niche) -> Option<&NicheConfig> {
        self.niches.get(niche.as_str())
    }

    /// Flat, ordered source list feeding `niche`.
    pub fn resolve_sources(&self, niche: Niche) -> Vec<Source> {
        let direct = self.niche(niche).filter(|config| !config.is_empty());

        if let (None, Some(alias)) = (direct, alias_for(niche)) {
            debug!(
                "Resolving {} through {} subsection '{}'",
                niche, alias.parent, alias.subsection
            );
            return self
                .niche(alias.parent)
                .and_then(|parent| parent.subsection(alias.subsection))
                .map(|subsection| subsection.sources.clone())
                .unwrap_or_default();
        }

        direct.map(NicheConfig::flatten).unwrap_or_default()
    }
}
