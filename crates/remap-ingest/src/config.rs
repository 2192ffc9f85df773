//! Project configuration file.
//!
//! A project names every file a run needs. The file is JSON or TOML, chosen
//! by extension, and relative paths inside it resolve against the directory
//! holding the configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Legacy records to migrate, streamed one at a time.
    pub input_file: PathBuf,
    pub one_to_one_column_mappings: PathBuf,
    pub one_to_many_column_mappings: PathBuf,
    pub one_to_few_column_mappings: PathBuf,
    pub table_filters: PathBuf,
    /// Ordered target tables; processing follows this order.
    pub table_list: PathBuf,
    /// Per-table modifiers such as renumbering directives.
    #[serde(default)]
    pub modifiers: Option<PathBuf>,
    /// CSV lookup tables with `LOOKUP_VALUE` and `LOOKUP_RESULT` columns.
    #[serde(default)]
    pub lookups: Vec<NamedFile>,
    /// JSON snapshots of existing target tables.
    #[serde(default)]
    pub tables: Vec<NamedFile>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedFile {
    pub name: String,
    #[serde(rename = "filePath")]
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the result files.
    #[serde(rename = "dataFilepath")]
    pub data_filepath: PathBuf,
}

impl ProjectConfig {
    /// Read a configuration file and resolve its relative paths.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| IngestError::io(path, source))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let config: Self = match extension.as_deref() {
            Some("json") => serde_json::from_str(&text).map_err(|source| IngestError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            Some("toml") => toml::from_str(&text).map_err(|source| IngestError::Toml {
                path: path.to_path_buf(),
                source,
            })?,
            _ => {
                return Err(IngestError::UnsupportedConfig {
                    path: path.to_path_buf(),
                });
            }
        };
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolved_against(base))
    }

    /// Join every relative path onto `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.input_file);
        resolve(&mut self.one_to_one_column_mappings);
        resolve(&mut self.one_to_many_column_mappings);
        resolve(&mut self.one_to_few_column_mappings);
        resolve(&mut self.table_filters);
        resolve(&mut self.table_list);
        if let Some(modifiers) = self.modifiers.as_mut() {
            resolve(modifiers);
        }
        for file in self.lookups.iter_mut().chain(self.tables.iter_mut()) {
            resolve(&mut file.file_path);
        }
        resolve(&mut self.output.data_filepath);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_config_dir() {
        let config = ProjectConfig {
            input_file: "input.csv".into(),
            one_to_one_column_mappings: "rules/one.csv".into(),
            one_to_many_column_mappings: "rules/many.csv".into(),
            one_to_few_column_mappings: "rules/few.csv".into(),
            table_filters: "filters.csv".into(),
            table_list: "/abs/tables.csv".into(),
            modifiers: Some("modifiers.csv".into()),
            lookups: vec![NamedFile {
                name: "genders".to_string(),
                file_path: "lookups/genders.csv".into(),
            }],
            tables: Vec::new(),
            output: OutputConfig {
                data_filepath: "out".into(),
            },
        }
        .resolved_against(Path::new("/project"));

        assert_eq!(config.input_file, PathBuf::from("/project/input.csv"));
        assert_eq!(config.table_list, PathBuf::from("/abs/tables.csv"));
        assert_eq!(
            config.lookups[0].file_path,
            PathBuf::from("/project/lookups/genders.csv")
        );
        assert_eq!(config.output.data_filepath, PathBuf::from("/project/out"));
    }
}
