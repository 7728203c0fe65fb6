use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::readings::BiomarkerReadings;
use super::status::{evaluate_status, BiomarkerStatus};

const EMBEDDED_CATALOG: &str = include_str!("catalog.json");

// Expected CSV column headers
const KEY_COL: &str = "key";
const NAME_COL: &str = "name";
const UNIT_COL: &str = "unit";
const DEFAULT_COL: &str = "default";
const DESCRIPTION_COL: &str = "description";
const RANGE_COL: &str = "range";
const INVERSE_COL: &str = "inverse";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BiomarkerDefinition {
    pub key: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub unit: String,
    #[serde(rename = "default")]
    pub default_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Vec<f64>>,
    #[serde(default)]
    pub inverse: bool,
}

impl BiomarkerDefinition {
    pub fn status(&self, value: Option<f64>) -> BiomarkerStatus {
        evaluate_status(value, self.range.as_deref(), self.inverse)
    }
}

/// Read-only list of biomarker definitions, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    definitions: Vec<BiomarkerDefinition>,
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_CATALOG).context("Embedded biomarker catalog is malformed")
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let definitions: Vec<BiomarkerDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
    }

    pub fn from_definitions(definitions: Vec<BiomarkerDefinition>) -> Result<Self> {
        for (idx, def) in definitions.iter().enumerate() {
            if definitions[..idx].iter().any(|other| other.key == def.key) {
                return Err(anyhow::anyhow!("Duplicate biomarker key '{}'", def.key));
            }
        }
        Ok(Self { definitions })
    }

    /// Loads a catalog from CSV. `range` holds `;`-separated numbers, `inverse`
    /// accepts `true/false/1/0/yes/no` and may be empty.
    pub fn load_csv(csv_path: &Path) -> Result<Self> {
        if !csv_path.exists() {
            return Err(anyhow::anyhow!("Biomarker catalog not found at: {:?}", csv_path));
        }

        let file = std::fs::File::open(csv_path)
            .with_context(|| format!("Failed to open biomarker catalog at {:?}", csv_path))?;
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", name))
        };
        let key_idx = column(KEY_COL)?;
        let name_idx = column(NAME_COL)?;
        let unit_idx = column(UNIT_COL)?;
        let default_idx = column(DEFAULT_COL)?;
        let range_idx = column(RANGE_COL)?;
        // Optional columns
        let description_idx = column(DESCRIPTION_COL).ok();
        let inverse_idx = column(INVERSE_COL).ok();

        let mut definitions = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.with_context(|| format!("Failed to read record at row index {}", row_index))?;
            let field = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");

            let key = field(key_idx);
            if key.is_empty() {
                tracing::warn!(row = row_index + 1, "Skipping catalog row without a key");
                continue;
            }

            let default_value = field(default_idx)
                .parse::<f64>()
                .with_context(|| format!("Invalid default value for '{}' at row {}", key, row_index + 1))?;
            let range = parse_range(field(range_idx))
                .with_context(|| format!("Invalid range for '{}' at row {}", key, row_index + 1))?;
            let description = description_idx
                .map(field)
                .filter(|d| !d.is_empty())
                .map(str::to_string);
            let inverse = match inverse_idx.map(field) {
                None | Some("") => false,
                Some(raw) => parse_flag(raw)
                    .ok_or_else(|| anyhow::anyhow!("Invalid inverse flag '{}' for '{}'", raw, key))?,
            };

            definitions.push(BiomarkerDefinition {
                key: key.to_string(),
                display_name: field(name_idx).to_string(),
                unit: field(unit_idx).to_string(),
                default_value,
                description,
                range,
                inverse,
            });
        }

        if definitions.is_empty() {
            return Err(anyhow::anyhow!("No biomarker definitions loaded from {:?}", csv_path));
        }
        tracing::debug!(count = definitions.len(), path = ?csv_path, "Loaded biomarker catalog");

        Self::from_definitions(definitions)
    }

    pub fn get(&self, key: &str) -> Option<&BiomarkerDefinition> {
        self.definitions.iter().find(|d| d.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BiomarkerDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Status of every catalog entry for the given readings, in catalog order.
    pub fn statuses<'a>(&'a self, readings: &BiomarkerReadings) -> Vec<(&'a BiomarkerDefinition, BiomarkerStatus)> {
        self.definitions
            .iter()
            .map(|def| (def, def.status(readings.get(&def.key))))
            .collect()
    }
}

fn parse_range(raw: &str) -> Result<Option<Vec<f64>>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let values = raw
        .split(';')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(values))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
