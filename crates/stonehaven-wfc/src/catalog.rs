//! Tile module catalog and its TOML persistence.

use std::fs;
use std::path::Path;

use ahash::AHashSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use stonehaven_common::{ConfigError, ModuleIndex, StonehavenError, StonehavenResult};
use tracing::info;

use crate::module::TileModule;

/// Ordered set of tile modules. Module order defines [`ModuleIndex`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog<T = String> {
    /// Modules in index order
    pub modules: Vec<TileModule<T>>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
        }
    }
}

impl<T> Catalog<T> {
    /// Creates a catalog from modules.
    #[must_use]
    pub fn new(modules: Vec<TileModule<T>>) -> Self {
        Self { modules }
    }

    /// Number of modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the catalog has no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module at `index`.
    #[must_use]
    pub fn get(&self, index: ModuleIndex) -> Option<&TileModule<T>> {
        self.modules.get(index.get())
    }

    /// Index of the first module with `id`.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<ModuleIndex> {
        self.modules
            .iter()
            .position(|m| m.id == id)
            .map(ModuleIndex::new)
    }

    /// Id of the module at `index`.
    #[must_use]
    pub fn id(&self, index: ModuleIndex) -> Option<&str> {
        self.get(index).map(|m| m.id.as_str())
    }

    /// Renderer payload of the module at `index`.
    #[must_use]
    pub fn payload(&self, index: ModuleIndex) -> Option<&T> {
        self.get(index).and_then(|m| m.tile.as_ref())
    }

    /// Checks the catalog is usable by the solver: non-empty, unique ids and
    /// positive finite weights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.modules.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let mut seen = AHashSet::with_capacity(self.modules.len());
        for module in &self.modules {
            if !seen.insert(module.id.as_str()) {
                return Err(ConfigError::DuplicateModuleId(module.id.clone()));
            }
            if !(module.weight.is_finite() && module.weight > 0.0) {
                return Err(ConfigError::InvalidWeight {
                    id: module.id.clone(),
                    weight: module.weight,
                });
            }
        }
        Ok(())
    }
}

impl<T: Serialize + DeserializeOwned> Catalog<T> {
    /// Parses a catalog from TOML (`[[modules]]` tables).
    pub fn from_toml_str(contents: &str) -> StonehavenResult<Self> {
        toml::from_str(contents).map_err(|e| StonehavenError::Serialization(e.to_string()))
    }

    /// Serializes the catalog to TOML.
    pub fn to_toml_string(&self) -> StonehavenResult<String> {
        toml::to_string_pretty(self).map_err(|e| StonehavenError::Serialization(e.to_string()))
    }

    /// Loads a catalog from a TOML file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> StonehavenResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&contents)?;
        info!(
            "Loaded {} tile modules from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Saves the catalog to a TOML file, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> StonehavenResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        info!("Saved tile catalog to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Category;
    use crate::templates;
    use tempfile::TempDir;

    #[test]
    fn test_validate_empty() {
        let catalog: Catalog = Catalog::default();
        assert!(matches!(catalog.validate(), Err(ConfigError::EmptyCatalog)));
    }

    #[test]
    fn test_validate_duplicate() {
        let catalog: Catalog = Catalog::new(vec![
            TileModule::new("grass_center", Category::Center),
            TileModule::new("grass_center", Category::Center),
        ]);
        assert!(matches!(
            catalog.validate(),
            Err(ConfigError::DuplicateModuleId(id)) if id == "grass_center"
        ));
    }

    #[test]
    fn test_validate_weight() {
        let catalog: Catalog =
            Catalog::new(vec![TileModule::new("grass_center", Category::Center).with_weight(0.0)]);
        assert!(matches!(
            catalog.validate(),
            Err(ConfigError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_lookup() {
        let catalog = templates::grass_water();
        let index = catalog.index_of("water_center").expect("water module");
        assert_eq!(catalog.id(index), Some("water_center"));
        assert!(catalog.index_of("lava_center").is_none());
    }

    #[test]
    fn test_catalog_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("catalog").join("grass_water.toml");

        let catalog = templates::grass_water_authored();
        catalog.save_to(&path).expect("Failed to save catalog");

        let loaded: Catalog = Catalog::load_from(&path).expect("Failed to load catalog");
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_bundled_catalog_derives_like_template() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/catalog/grass_water.toml");
        let mut catalog: Catalog = Catalog::load_from(path).expect("Failed to load catalog");
        assert_eq!(catalog, templates::grass_water());

        let report = crate::sockets::SocketDeriver::default().derive(&mut catalog.modules);
        assert!(report.is_clean());
        assert_eq!(catalog, templates::grass_water_derived());
    }

    #[test]
    fn test_catalog_toml_defaults() {
        let toml_str = r#"
            [[modules]]
            id = "grass_center"

            [[modules]]
            id = "grass_edge_n"
            category = "edge"
            weight = 0.5
            tile = "tiles/grass_edge_n.png"
        "#;
        let catalog: Catalog = Catalog::from_toml_str(toml_str).expect("parse");
        assert_eq!(catalog.len(), 2);
        assert!((catalog.modules[0].weight - 1.0).abs() < f32::EPSILON);
        assert_eq!(catalog.modules[1].category, Category::Edge);
        assert_eq!(
            catalog.payload(ModuleIndex::new(1)).map(String::as_str),
            Some("tiles/grass_edge_n.png")
        );
        assert!(catalog.payload(ModuleIndex::new(0)).is_none());
    }
}
