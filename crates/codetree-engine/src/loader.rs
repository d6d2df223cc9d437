//! Ontology file discovery and loading.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use codetree_types::{Code, CodeId};

use crate::encoding::validate;
use crate::parser::{delimiter_for, CodeParser};
use crate::types::{LoaderConfig, TreeError, TreeResult};

/// On-disk format of an ontology file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Delimited code table.
    Delimited {
        /// Field delimiter.
        delimiter: u8,
    },
    /// JSON array of codes.
    Json,
}

/// An ontology file found by [`discover_ontology_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyFile {
    /// Ontology name, taken from the file stem.
    pub name: String,
    /// Location of the file.
    pub path: PathBuf,
    /// File format.
    pub format: FileFormat,
}

impl OntologyFile {
    /// Recognises `*.tsv`, `*.csv` and `*.json` files.
    ///
    /// Returns `None` for any other path.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let format = match ext.as_str() {
            "tsv" | "csv" => FileFormat::Delimited {
                delimiter: delimiter_for(&path),
            },
            "json" => FileFormat::Json,
            _ => return None,
        };
        let name = path.file_stem()?.to_str()?.to_string();
        Some(Self { name, path, format })
    }
}

/// Discovers ontology files in a data directory.
///
/// Only the directory itself is scanned, not its subdirectories. Files are
/// returned ordered by name.
pub fn discover_ontology_files<P: AsRef<Path>>(dir: P) -> TreeResult<Vec<OntologyFile>> {
    let dir = dir.as_ref();

    if !dir.is_dir() {
        return Err(TreeError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(file) = OntologyFile::from_path(entry.path()) {
            files.push(file);
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    Ok(files)
}

/// Reads the codes of one ontology file.
///
/// Codes without an `ontology_id` get the file's ontology name. When no code
/// lists children and `config.derive_children` is set, children are derived
/// from paths. With `config.validate`, the tree encoding is checked before
/// returning.
pub fn load_codes(file: &OntologyFile, config: &LoaderConfig) -> TreeResult<Vec<Code>> {
    let mut codes = match file.format {
        FileFormat::Delimited { delimiter } => {
            let config = LoaderConfig {
                delimiter: Some(config.delimiter.unwrap_or(delimiter)),
                ..config.clone()
            };
            CodeParser::from_path(&file.path, config)?.parse_all()?
        }
        FileFormat::Json => {
            if !file.path.exists() {
                return Err(TreeError::FileNotFound {
                    path: file.path.display().to_string(),
                });
            }
            let reader = BufReader::new(File::open(&file.path)?);
            serde_json::from_reader::<_, Vec<Code>>(reader)?
        }
    };

    for code in codes.iter_mut().filter(|c| c.ontology_id.is_empty()) {
        code.ontology_id.clone_from(&file.name);
    }

    if config.derive_children && codes.iter().all(|c| c.children_ids.is_empty()) {
        derive_children(&mut codes);
    }

    if config.validate {
        validate(&codes)?;
    }

    Ok(codes)
}

/// Fills `children_ids` from the codes' paths.
///
/// `codes` must be sorted by id. Children whose parent is missing are left
/// out; validation reports those separately.
pub fn derive_children(codes: &mut [Code]) {
    let links: Vec<(usize, CodeId)> = codes
        .iter()
        .filter_map(|code| {
            let parent = code.parent_id()?;
            let index = codes.binary_search_by_key(&parent, |c| c.id).ok()?;
            Some((index, code.id))
        })
        .collect();

    for code in codes.iter_mut() {
        code.children_ids.clear();
    }
    for (index, child) in links {
        codes[index].children_ids.push(child);
    }
}

/// Formats a byte count as a human-readable string.
pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_ontology;
    use tempfile::TempDir;

    const TABLE: &str = "id\tcode\tdescription\tpath\tlast_descendant_id
1\tA00-B99\tInfectious diseases\t1\t4
2\tA00\tCholera\t1/2\t3
3\tA00.0\tClassical cholera\t1/2/3\t3
4\tA01\tTyphoid\t1/4\t4
5\tC00-D49\tNeoplasms\t5\t5
";

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_from_path_formats() {
        let tsv = OntologyFile::from_path("data/ICD-10.tsv").unwrap();
        assert_eq!(tsv.name, "ICD-10");
        assert_eq!(tsv.format, FileFormat::Delimited { delimiter: b'\t' });

        let csv = OntologyFile::from_path("data/Read.CSV").unwrap();
        assert_eq!(csv.format, FileFormat::Delimited { delimiter: b',' });

        let json = OntologyFile::from_path("opcs4.json").unwrap();
        assert_eq!(json.format, FileFormat::Json);

        assert!(OntologyFile::from_path("readme.md").is_none());
        assert!(OntologyFile::from_path("no_extension").is_none());
    }

    #[test]
    fn test_discover_ontology_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.tsv", TABLE);
        write(&dir, "a.json", "[]");
        write(&dir, "notes.txt", "ignored");
        fs::create_dir(dir.path().join("nested.tsv")).unwrap();

        let files = discover_ontology_files(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_discover_missing_directory() {
        let result = discover_ontology_files("/nonexistent/codetree");
        assert!(matches!(result, Err(TreeError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_load_delimited() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "ICD-10.tsv", TABLE);
        let file = OntologyFile::from_path(path).unwrap();

        let codes = load_codes(&file, &LoaderConfig::default()).unwrap();
        assert_eq!(codes.len(), 5);
        assert!(codes.iter().all(|c| c.ontology_id == "ICD-10"));
        assert_eq!(codes[0].children_ids, vec![2, 4]);
        assert_eq!(codes[1].children_ids, vec![3]);
        assert!(codes[4].children_ids.is_empty());
    }

    #[test]
    fn test_load_json_keeps_listed_children() {
        let dir = TempDir::new().unwrap();
        let json = serde_json::to_string(&sample_ontology()).unwrap();
        let path = write(&dir, "sample.json", &json);
        let file = OntologyFile::from_path(path).unwrap();

        let codes = load_codes(&file, &LoaderConfig::default()).unwrap();
        assert_eq!(codes, sample_ontology());
        assert_eq!(codes[0].ontology_id, "o");
    }

    #[test]
    fn test_load_rejects_broken_encoding() {
        let broken = "id,code,description,path,last_descendant_id\n1,A,Root,1,9\n2,B,Child,1/2,2\n";
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.csv", broken);
        let file = OntologyFile::from_path(path).unwrap();

        let err = load_codes(&file, &LoaderConfig::default()).unwrap_err();
        assert!(err.is_integrity_fault());

        let lenient = LoaderConfig {
            validate: false,
            ..Default::default()
        };
        assert_eq!(load_codes(&file, &lenient).unwrap().len(), 2);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.json", "{not json");
        let file = OntologyFile::from_path(path).unwrap();
        assert!(matches!(
            load_codes(&file, &LoaderConfig::default()),
            Err(TreeError::Json(_))
        ));
    }

    #[test]
    fn test_derive_children_matches_fixture() {
        let expected = sample_ontology();
        let mut codes = expected.clone();
        for code in codes.iter_mut() {
            code.children_ids.clear();
        }
        derive_children(&mut codes);
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 bytes");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GB");
    }
}
