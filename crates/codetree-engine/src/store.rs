//! In-memory ontology store.
//!
//! Holds every loaded ontology by name. Code arrays are validated on insert
//! and shared behind an `Arc`, so handing them to a filter pass never
//! copies.
//!
//! ```no_run
//! use codetree_engine::{LoaderConfig, OntologyStore};
//!
//! let mut store = OntologyStore::new();
//! store.load_dir("./data", &LoaderConfig::default())?;
//!
//! if let Some(codes) = store.get("ICD-10") {
//!     println!("ICD-10 has {} codes", codes.len());
//! }
//! # Ok::<(), codetree_engine::TreeError>(())
//! ```

use std::collections::HashMap;
use std::future::{ready, Future};
use std::path::Path;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use codetree_types::{Code, CodeId, Ontology};
use tracing::{info, warn};

use crate::encoding::ValidatedCodes;
use crate::loader::{discover_ontology_files, format_bytes, load_codes, OntologyFile};
use crate::types::{LoaderConfig, TreeError, TreeResult};

/// Named ontologies with validated code arrays.
#[derive(Clone, Default)]
pub struct OntologyStore {
    ontologies: HashMap<String, ValidatedCodes>,
}

impl std::fmt::Debug for OntologyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OntologyStore")
            .field("ontologies", &self.ontologies.len())
            .field("codes", &self.code_count())
            .finish()
    }
}

impl OntologyStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores the codes of ontology `name`.
    ///
    /// Replaces any ontology already stored under that name. Invalid
    /// encodings are refused and leave the store unchanged.
    pub fn insert(&mut self, name: impl Into<String>, codes: impl Into<Arc<[Code]>>) -> TreeResult<usize> {
        let codes = ValidatedCodes::new(codes)?;
        Ok(self.insert_validated(name, codes))
    }

    /// Stores already validated codes, returning their count.
    pub fn insert_validated(&mut self, name: impl Into<String>, codes: ValidatedCodes) -> usize {
        let name = name.into();
        let count = codes.len();
        if self.ontologies.insert(name.clone(), codes).is_some() {
            warn!(ontology = %name, "replaced previously loaded ontology");
        }
        count
    }

    /// Removes ontology `name`.
    pub fn remove(&mut self, name: &str) -> Option<ValidatedCodes> {
        self.ontologies.remove(name)
    }

    /// Codes of ontology `name`.
    pub fn get(&self, name: &str) -> Option<&ValidatedCodes> {
        self.ontologies.get(name)
    }

    /// Codes of ontology `name`, or [`TreeError::UnknownOntology`].
    pub fn require(&self, name: &str) -> TreeResult<&ValidatedCodes> {
        self.get(name).ok_or_else(|| TreeError::UnknownOntology {
            name: name.to_string(),
        })
    }

    /// Ontology `name` with its shared code array.
    pub fn ontology(&self, name: &str) -> Option<Ontology> {
        self.get(name).map(|codes| Ontology::new(name, codes.shared()))
    }

    /// Returns true if ontology `name` is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.ontologies.contains_key(name)
    }

    /// Names of all loaded ontologies, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ontologies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of loaded ontologies.
    pub fn len(&self) -> usize {
        self.ontologies.len()
    }

    /// Returns true if no ontology is loaded.
    pub fn is_empty(&self) -> bool {
        self.ontologies.is_empty()
    }

    /// Total number of codes across all ontologies.
    pub fn code_count(&self) -> usize {
        self.ontologies.values().map(|codes| codes.len()).sum()
    }

    /// Approximate heap usage of the stored codes in bytes.
    pub fn estimated_memory_bytes(&self) -> usize {
        use std::mem::size_of;

        self.ontologies
            .values()
            .flat_map(|codes| codes.iter())
            .map(|code| {
                size_of::<Code>()
                    + code.code.len()
                    + code.ontology_id.len()
                    + code.description.len()
                    + (code.path.len() + code.children_ids.len()) * size_of::<CodeId>()
            })
            .sum()
    }

    /// Loads one ontology file and stores it under its name.
    pub fn load_file(&mut self, file: &OntologyFile, config: &LoaderConfig) -> TreeResult<usize> {
        let codes = load_codes(file, &unvalidated(config))?;
        self.insert(file.name.clone(), codes)
    }

    /// Loads every ontology file in `dir`.
    ///
    /// Files that fail to load are skipped with a warning. Returns the number
    /// of ontologies loaded.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P, config: &LoaderConfig) -> TreeResult<usize> {
        let files = discover_ontology_files(dir)?;
        let mut loaded = 0;

        for file in &files {
            match self.load_file(file, config) {
                Ok(count) => {
                    info!(ontology = %file.name, codes = count, "loaded ontology");
                    loaded += 1;
                }
                Err(e) => warn!(path = %file.path.display(), error = %e, "skipping ontology file"),
            }
        }

        self.log_summary();
        Ok(loaded)
    }

    /// Loads every ontology file in `dir`, parsing files in parallel.
    ///
    /// Same semantics as [`load_dir`](Self::load_dir).
    #[cfg(feature = "parallel")]
    pub fn load_dir_parallel<P: AsRef<Path>>(&mut self, dir: P, config: &LoaderConfig) -> TreeResult<usize> {
        let files = discover_ontology_files(dir)?;
        let config = unvalidated(config);

        let results: Vec<(&OntologyFile, TreeResult<ValidatedCodes>)> = files
            .par_iter()
            .map(|file| {
                let codes = load_codes(file, &config).and_then(ValidatedCodes::new);
                (file, codes)
            })
            .collect();

        let mut loaded = 0;
        for (file, result) in results {
            match result {
                Ok(codes) => {
                    let count = self.insert_validated(file.name.clone(), codes);
                    info!(ontology = %file.name, codes = count, "loaded ontology");
                    loaded += 1;
                }
                Err(e) => warn!(path = %file.path.display(), error = %e, "skipping ontology file"),
            }
        }

        self.log_summary();
        Ok(loaded)
    }

    fn log_summary(&self) {
        info!(
            ontologies = self.len(),
            codes = self.code_count(),
            memory = %format_bytes(self.estimated_memory_bytes()),
            "ontology store ready"
        );
    }
}

// Insertion always validates.
fn unvalidated(config: &LoaderConfig) -> LoaderConfig {
    LoaderConfig {
        validate: false,
        ..config.clone()
    }
}

/// Asynchronous keyed lookup of ontology code arrays.
pub trait CodeStore {
    /// Fetches the validated codes of ontology `name`.
    fn fetch(&self, name: &str) -> impl Future<Output = TreeResult<ValidatedCodes>> + Send;
}

impl CodeStore for OntologyStore {
    fn fetch(&self, name: &str) -> impl Future<Output = TreeResult<ValidatedCodes>> + Send {
        ready(self.require(name).cloned())
    }
}

impl<S: CodeStore> CodeStore for Arc<S> {
    fn fetch(&self, name: &str) -> impl Future<Output = TreeResult<ValidatedCodes>> + Send {
        self.as_ref().fetch(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{make_code, sample_ontology};
    use std::fs;
    use tempfile::TempDir;

    fn data_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("ICD-10.tsv"),
            "id\tcode\tdescription\tpath\tlast_descendant_id\n1\tA\tRoot\t1\t2\n2\tA.1\tChild\t1/2\t2\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("sample.json"),
            serde_json::to_string(&sample_ontology()).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.path().join("broken.csv"),
            "id,code,description,path,last_descendant_id\n1,A,Root,1,5\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut store = OntologyStore::new();
        assert!(store.is_empty());
        assert_eq!(store.insert("sample", sample_ontology()).unwrap(), 20);

        assert!(store.contains("sample"));
        assert_eq!(store.get("sample").map(|c| c.len()), Some(20));
        assert_eq!(store.names(), vec!["sample"]);
        assert_eq!(store.code_count(), 20);

        let ontology = store.ontology("sample").unwrap();
        assert_eq!(ontology.name, "sample");
        assert_eq!(ontology.roots().count(), 2);
    }

    #[test]
    fn test_insert_refuses_invalid_encoding() {
        let mut store = OntologyStore::new();
        store.insert("o", sample_ontology()).unwrap();

        let broken = vec![make_code(1, vec![1], vec![], 3)];
        assert!(store.insert("o", broken).is_err());
        assert_eq!(store.get("o").map(|c| c.len()), Some(20));
    }

    #[test]
    fn test_require_unknown() {
        let store = OntologyStore::new();
        assert!(matches!(
            store.require("ICD-10"),
            Err(TreeError::UnknownOntology { name }) if name == "ICD-10"
        ));
    }

    #[test]
    fn test_remove() {
        let mut store = OntologyStore::new();
        store.insert("o", sample_ontology()).unwrap();
        assert!(store.remove("o").is_some());
        assert!(store.remove("o").is_none());
        assert_eq!(store.code_count(), 0);
    }

    #[test]
    fn test_load_dir_skips_broken_files() {
        let dir = data_dir();
        let mut store = OntologyStore::new();
        let loaded = store.load_dir(dir.path(), &LoaderConfig::default()).unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(store.names(), vec!["ICD-10", "sample"]);
        assert_eq!(store.code_count(), 22);
        assert!(store.estimated_memory_bytes() > 0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_load_dir_parallel_matches_sequential() {
        let dir = data_dir();
        let mut sequential = OntologyStore::new();
        sequential.load_dir(dir.path(), &LoaderConfig::default()).unwrap();

        let mut parallel = OntologyStore::new();
        let loaded = parallel
            .load_dir_parallel(dir.path(), &LoaderConfig::default())
            .unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(parallel.names(), sequential.names());
        for name in sequential.names() {
            assert_eq!(&parallel.get(name).unwrap()[..], &sequential.get(name).unwrap()[..]);
        }
    }

    #[test]
    fn test_load_dir_missing() {
        let mut store = OntologyStore::new();
        assert!(store
            .load_dir("/nonexistent/codetree", &LoaderConfig::default())
            .is_err());
    }

    #[tokio::test]
    async fn test_code_store_fetch() {
        let mut store = OntologyStore::new();
        store.insert("sample", sample_ontology()).unwrap();
        let store = Arc::new(store);

        let codes = store.fetch("sample").await.unwrap();
        assert_eq!(codes.len(), 20);
        assert!(store.fetch("missing").await.is_err());
    }

    #[test]
    fn test_debug_shows_counts() {
        let mut store = OntologyStore::new();
        store.insert("sample", sample_ontology()).unwrap();
        assert_eq!(
            format!("{:?}", store),
            "OntologyStore { ontologies: 1, codes: 20 }"
        );
    }
}
