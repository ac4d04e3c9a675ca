use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    curricula: HashMap<String, String>,
    characters: HashMap<String, CharacterEntry>,
}

#[derive(Debug, Deserialize)]
struct CharacterEntry {
    script: String,
    #[serde(default)]
    assets: Option<String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod curricula {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.curricula.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.curricula, "curriculum", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.curricula, "curriculum", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.curricula, "curriculum", name)?;
        Ok(resolve_path(rel))
    }
}

pub mod characters {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.characters.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn script_json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.characters, "character", name)?;
        read_to_string(&entry.script)
    }

    pub fn script<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.characters, "character", name)?;
        super::load_json(&entry.script)
    }

    pub fn assets_json(name: &str) -> Result<Option<String>> {
        let entry = lookup(&MANIFEST.characters, "character", name)?;
        match &entry.assets {
            Some(assets) => read_to_string(assets).map(Some),
            None => Ok(None),
        }
    }

    pub fn assets<T: DeserializeOwned>(name: &str) -> Result<Option<T>> {
        let entry = lookup(&MANIFEST.characters, "character", name)?;
        match &entry.assets {
            Some(assets) => super::load_json(assets).map(Some),
            None => Ok(None),
        }
    }
}
