//! Delimited code table parser.
//!
//! Streams codes from tab- or comma-delimited files with the columns
//! `id, code, description, path, last_descendant_id`. Paths are written as
//! `/`-separated ids from the root down to the code itself. Trailing extra
//! columns are ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use codetree_types::Code;
use csv::{Reader, ReaderBuilder, StringRecord};

use crate::types::{LoaderConfig, TreeError, TreeResult};

/// Expected leading columns of a code table.
pub const EXPECTED_COLUMNS: &[&str] = &["id", "code", "description", "path", "last_descendant_id"];

/// A streaming parser for code tables.
///
/// Yields one [`Code`] per non-blank record. `ontology_id` and
/// `children_ids` are left empty; the loader fills them in.
pub struct CodeParser<R: Read> {
    reader: Reader<R>,
    config: LoaderConfig,
    records_read: usize,
}

impl CodeParser<BufReader<File>> {
    /// Creates a parser from a file path.
    ///
    /// Without an explicit delimiter, `.tsv` files are read tab-delimited
    /// and everything else comma-delimited.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or has invalid headers.
    pub fn from_path<P: AsRef<Path>>(path: P, config: LoaderConfig) -> TreeResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TreeError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let mut config = config;
        if config.delimiter.is_none() {
            config.delimiter = Some(delimiter_for(path));
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), config)
    }
}

impl<R: Read> CodeParser<R> {
    /// Creates a parser from a reader; the delimiter defaults to tab.
    pub fn from_reader(reader: R, config: LoaderConfig) -> TreeResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(config.delimiter.unwrap_or(b'\t'))
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        Self::validate_headers(&mut csv_reader)?;

        Ok(Self {
            reader: csv_reader,
            config,
            records_read: 0,
        })
    }

    fn validate_headers(reader: &mut Reader<R>) -> TreeResult<()> {
        let headers = reader.headers()?;

        if headers.len() < EXPECTED_COLUMNS.len() {
            return Err(TreeError::InvalidHeader {
                expected: EXPECTED_COLUMNS.len(),
                found: headers.len(),
            });
        }

        for (i, expected_col) in EXPECTED_COLUMNS.iter().enumerate() {
            let found = headers.get(i).unwrap_or("");
            // UTF-8 BOM at start of file
            let found = found.trim_start_matches('\u{feff}');
            if found != *expected_col {
                return Err(TreeError::UnexpectedColumn {
                    position: i,
                    expected: expected_col.to_string(),
                    found: found.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Returns the number of records read so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Returns the parser configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Parses all remaining records, stopping at the first error.
    pub fn parse_all(self) -> TreeResult<Vec<Code>> {
        self.collect()
    }

    /// Parses records in batches of `config.batch_size`, calling `callback`
    /// for each batch. Returns the number of codes parsed.
    pub fn parse_batched<F>(mut self, mut callback: F) -> TreeResult<usize>
    where
        F: FnMut(Vec<Code>) -> TreeResult<()>,
    {
        let batch_size = self.config.batch_size.max(1);
        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0;

        for record in self.by_ref() {
            batch.push(record?);
            if batch.len() >= batch_size {
                total += batch.len();
                callback(std::mem::replace(
                    &mut batch,
                    Vec::with_capacity(batch_size),
                ))?;
            }
        }

        if !batch.is_empty() {
            total += batch.len();
            callback(batch)?;
        }

        Ok(total)
    }

    fn from_record(record: &StringRecord) -> TreeResult<Code> {
        let field = |i: usize| record.get(i).unwrap_or("");
        Ok(Code {
            id: parse::id(field(0))?,
            code: field(1).to_string(),
            ontology_id: String::new(),
            description: field(2).to_string(),
            path: parse::path(field(3))?,
            children_ids: Vec::new(),
            last_descendant_id: parse::id(field(4))?,
        })
    }
}

impl<R: Read> Iterator for CodeParser<R> {
    type Item = TreeResult<Code>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    self.records_read += 1;

                    if record.iter().all(|f| f.is_empty()) {
                        continue;
                    }

                    return Some(Self::from_record(&record));
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Delimiter implied by a file's extension.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Helper functions for parsing code table fields.
pub mod parse {
    use codetree_types::CodeId;

    use crate::types::{TreeError, TreeResult};

    /// Parses a code id.
    pub fn id(value: &str) -> TreeResult<CodeId> {
        value.trim().parse::<CodeId>().map_err(|_| TreeError::InvalidId {
            value: value.to_string(),
        })
    }

    /// Parses a `/`-separated path such as `1/6/9`.
    ///
    /// Leading and trailing separators are tolerated.
    pub fn path(value: &str) -> TreeResult<Vec<CodeId>> {
        value
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(id)
            .collect()
    }
}
