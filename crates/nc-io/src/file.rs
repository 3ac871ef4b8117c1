//! The keyed sample-file container.

use crate::spectrum::Spectrum;
use nc_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// An object stored under a key in a sample file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum StoredObject {
    /// A 1-D spectrum.
    Spectrum(Spectrum),
    /// An event tree: an ordered list of records whose schema is
    /// generator-specific.
    Tree {
        /// The tree's records, one JSON object per entry.
        entries: Vec<serde_json::Value>,
    },
}

/// Public info about one key (for `list_keys()`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// Key name.
    pub name: String,
    /// Object class name ("Spectrum" or "Tree").
    pub class: String,
}

/// One simulated sample on disk: spectra plus event trees, addressed by
/// key name.
#[derive(Debug, Clone, Default)]
pub struct SampleFile {
    path: PathBuf,
    objects: BTreeMap<String, StoredObject>,
}

impl SampleFile {
    /// Read a sample file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "cannot open sample file '{}': {e}; check that your file paths are correct and the file exists",
                path.display()
            ))
        })?;
        let objects: BTreeMap<String, StoredObject> = serde_json::from_str(&raw)
            .map_err(|e| Error::Format(format!("malformed sample file '{}': {e}", path.display())))?;
        Ok(Self { path: path.to_path_buf(), objects })
    }

    /// Empty in-memory file, to be populated and written.
    pub fn create() -> Self {
        Self::default()
    }

    /// Serialize to disk.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string(&self.objects)?;
        fs::write(path.as_ref(), raw)?;
        Ok(())
    }

    /// The path this file was opened from (empty for in-memory files).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All keys with their object classes.
    pub fn list_keys(&self) -> Vec<KeyInfo> {
        self.objects
            .iter()
            .map(|(name, obj)| KeyInfo {
                name: name.clone(),
                class: match obj {
                    StoredObject::Spectrum(_) => "Spectrum".into(),
                    StoredObject::Tree { .. } => "Tree".into(),
                },
            })
            .collect()
    }

    /// Does the file contain this key?
    pub fn has_key(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Store a spectrum under its own name.
    pub fn insert_spectrum(&mut self, spectrum: Spectrum) {
        self.objects.insert(spectrum.name.clone(), StoredObject::Spectrum(spectrum));
    }

    /// Store a tree of typed records under `name`.
    pub fn insert_tree<T: Serialize>(&mut self, name: impl Into<String>, entries: &[T]) -> Result<()> {
        let entries = entries
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.objects.insert(name.into(), StoredObject::Tree { entries });
        Ok(())
    }

    /// Fetch a spectrum by exact key name.
    pub fn spectrum(&self, name: &str) -> Result<&Spectrum> {
        match self.objects.get(name) {
            Some(StoredObject::Spectrum(s)) => Ok(s),
            Some(_) => Err(Error::Config(format!(
                "key '{name}' in '{}' is not a spectrum",
                self.path.display()
            ))),
            None => Err(Error::Config(format!(
                "no spectrum '{name}' in '{}'",
                self.path.display()
            ))),
        }
    }

    /// First spectrum whose key contains `fragment`.
    ///
    /// This is how the reserved flux/event-rate spectra are discovered
    /// when files carry decorated names (e.g. `flux_numu_FHC`).
    pub fn spectrum_matching(&self, fragment: &str) -> Option<&Spectrum> {
        self.objects.iter().find_map(|(name, obj)| match obj {
            StoredObject::Spectrum(s) if name.contains(fragment) => Some(s),
            _ => None,
        })
    }

    /// Number of entries in the tree stored under `name`.
    pub fn tree_len(&self, name: &str) -> Result<usize> {
        match self.objects.get(name) {
            Some(StoredObject::Tree { entries }) => Ok(entries.len()),
            Some(_) => Err(Error::Config(format!(
                "key '{name}' in '{}' is not a tree",
                self.path.display()
            ))),
            None => Err(Error::Config(format!(
                "tree '{name}' not located in '{}'; the file may need to be regenerated",
                self.path.display()
            ))),
        }
    }

    /// Decode the tree stored under `name` into typed records.
    pub fn tree<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        match self.objects.get(name) {
            Some(StoredObject::Tree { entries }) => entries
                .iter()
                .map(|v| serde_json::from_value(v.clone()).map_err(Error::from))
                .collect(),
            Some(_) => Err(Error::Config(format!(
                "key '{name}' in '{}' is not a tree",
                self.path.display()
            ))),
            None => Err(Error::Config(format!(
                "tree '{name}' not located in '{}'; the file may need to be regenerated",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        x: f64,
        tag: i32,
    }

    fn sample() -> SampleFile {
        let mut f = SampleFile::create();
        f.insert_spectrum(
            Spectrum::uniform("flux_numu", 2, 0.0, 2.0, vec![1.0, 2.0]).unwrap(),
        );
        f.insert_spectrum(
            Spectrum::uniform("evtrt_numu", 2, 0.0, 2.0, vec![3.0, 4.0]).unwrap(),
        );
        f.insert_tree("rows", &[Row { x: 1.5, tag: 7 }, Row { x: -2.0, tag: 9 }]).unwrap();
        f
    }

    #[test]
    fn keys_and_classes() {
        let f = sample();
        let keys = f.list_keys();
        assert_eq!(keys.len(), 3);
        assert!(keys.iter().any(|k| k.name == "rows" && k.class == "Tree"));
        assert!(keys.iter().any(|k| k.name == "flux_numu" && k.class == "Spectrum"));
    }

    #[test]
    fn substring_lookup() {
        let f = sample();
        assert_eq!(f.spectrum_matching("flux").unwrap().name, "flux_numu");
        assert_eq!(f.spectrum_matching("evtrt").unwrap().name, "evtrt_numu");
        assert!(f.spectrum_matching("nope").is_none());
        // Tree keys never match a spectrum lookup.
        assert!(f.spectrum_matching("rows").is_none());
    }

    #[test]
    fn round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");
        sample().write(&path).unwrap();

        let f = SampleFile::open(&path).unwrap();
        assert_eq!(f.tree_len("rows").unwrap(), 2);
        let rows: Vec<Row> = f.tree("rows").unwrap();
        assert_eq!(rows, vec![Row { x: 1.5, tag: 7 }, Row { x: -2.0, tag: 9 }]);
        assert_eq!(f.spectrum("flux_numu").unwrap().integral(), 3.0);
    }

    #[test]
    fn missing_objects_are_config_errors() {
        let f = sample();
        assert!(matches!(f.spectrum("absent"), Err(nc_core::Error::Config(_))));
        assert!(matches!(f.tree::<Row>("absent"), Err(nc_core::Error::Config(_))));
        assert!(matches!(f.tree::<Row>("flux_numu"), Err(nc_core::Error::Config(_))));
        assert!(matches!(SampleFile::open("/no/such/file.json"), Err(nc_core::Error::Config(_))));
    }
}
