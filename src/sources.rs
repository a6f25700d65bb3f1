//! The source registry: the closed set of supported review publishers.
//!
//! The registry is the single gate in front of the network. A URL whose
//! host is not registered is rejected before anything is fetched.

use anyhow::Result;
use serde::Serialize;

use crate::error::ReviewError;
use crate::source_blabbermouth::BlabbermouthSource;
use crate::source_kaaoszine::KaaoszineSource;
use crate::source_metalinjection::MetalInjectionSource;
use crate::source_metalliluola::MetalliluolaSource;
use crate::source_metalsucks::MetalSucksSource;
use crate::source_soundi::SoundiSource;
use crate::traits::ReviewSource;

/// Registry of review source adapters keyed by domain.
pub struct SourceRegistry {
    sources: Vec<Box<dyn ReviewSource>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Create a registry holding every built-in publisher.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(KaaoszineSource));
        registry.register(Box::new(SoundiSource));
        registry.register(Box::new(MetalliluolaSource));
        registry.register(Box::new(BlabbermouthSource));
        registry.register(Box::new(MetalInjectionSource));
        registry.register(Box::new(MetalSucksSource));
        registry
    }

    /// Register a source. A later registration for the same domain wins.
    pub fn register(&mut self, source: Box<dyn ReviewSource>) {
        self.sources.retain(|s| s.domain() != source.domain());
        self.sources.push(source);
    }

    pub fn is_supported(&self, domain: &str) -> bool {
        self.find(domain).is_some()
    }

    pub fn find(&self, domain: &str) -> Option<&dyn ReviewSource> {
        self.sources
            .iter()
            .find(|s| s.domain() == domain)
            .map(|s| s.as_ref())
    }

    /// The adapter for `domain`, or [`ReviewError::UnsupportedSource`].
    pub fn rule_set_for(&self, domain: &str) -> Result<&dyn ReviewSource, ReviewError> {
        self.find(domain)
            .ok_or_else(|| ReviewError::UnsupportedSource {
                domain: domain.to_string(),
            })
    }

    pub fn sources(&self) -> &[Box<dyn ReviewSource>] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Description of one registered source, as listed by `wafer sources`.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub domain: String,
    pub name: String,
    pub scale: String,
    pub encoding: String,
    pub language: String,
    pub dated: bool,
}

pub fn get_sources(registry: &SourceRegistry) -> Vec<SourceInfo> {
    registry
        .sources()
        .iter()
        .map(|s| SourceInfo {
            domain: s.domain().to_string(),
            name: s.display_name().to_string(),
            scale: s.max_scale().to_string(),
            encoding: s.rating_encoding().label().to_string(),
            language: if s.is_foreign_language() {
                s.language_code().to_string()
            } else {
                "fi".to_string()
            },
            dated: s.provides_date(),
        })
        .collect()
}

pub fn list_sources(registry: &SourceRegistry) -> Result<()> {
    println!(
        "{:<22} {:<16} {:<6} {:<15} {:<5} DATED",
        "DOMAIN", "NAME", "SCALE", "ENCODING", "LANG"
    );
    for info in get_sources(registry) {
        println!(
            "{:<22} {:<16} {:<6} {:<15} {:<5} {}",
            info.domain, info.name, info.scale, info.encoding, info.language, info.dated
        );
    }
    Ok(())
}
