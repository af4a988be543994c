//! Named collection of choice models loaded from a spec directory.

use std::collections::BTreeMap;
use std::path::Path;

use crate::model::DiscreteChoice;
use crate::mnl::MnlModel;
use crate::{ChoiceError, ChoiceResult};

#[derive(Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Box<dyn DiscreteChoice>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` file in `dir` as an [`MnlModel`], in file-name
    /// order.  A later file replaces an earlier model of the same name.
    pub fn load_dir(dir: &Path) -> ChoiceResult<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|x| x == "json"))
            .collect();
        paths.sort();

        let mut registry = Self::new();
        for path in paths {
            let model = MnlModel::from_json_path(&path).map_err(|e| {
                ChoiceError::InvalidSpec(format!("{}: {e}", path.display()))
            })?;
            registry.insert(Box::new(model));
        }
        log::info!("loaded {} choice models from {}", registry.len(), dir.display());
        Ok(registry)
    }

    pub fn insert(&mut self, model: Box<dyn DiscreteChoice>) {
        let name = model.name().to_string();
        if self.models.insert(name.clone(), model).is_some() {
            log::warn!("choice model {name:?} replaced");
        }
    }

    pub fn get(&self, name: &str) -> ChoiceResult<&dyn DiscreteChoice> {
        self.models
            .get(name)
            .map(|m| m.as_ref())
            .ok_or_else(|| ChoiceError::UnknownModel(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
