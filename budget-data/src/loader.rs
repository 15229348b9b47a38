use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use budget_core::{
    FederalSchedule, FicaConfig, FilingStatus, StateTaxConfig, TaxBracket, TaxTableError,
    TaxTables,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// File names expected inside a tax tables directory.
pub const FEDERAL_BRACKETS_FILE: &str = "federal_brackets.csv";
pub const STATE_TAX_FILE: &str = "state_tax.csv";
pub const TAX_YEAR_FILE: &str = "tax_year.toml";

/// Errors that can occur when loading tax table data.
#[derive(Debug, Error)]
pub enum TaxTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown filing status '{0}'")]
    UnknownFilingStatus(String),

    #[error("state {state}: unknown tax kind '{kind}' (expected none, flat, or progressive)")]
    UnknownStateKind { state: String, kind: String },

    #[error("state {state}: rows mix kinds '{first}' and '{second}'")]
    MixedStateKinds {
        state: String,
        first: String,
        second: String,
    },

    #[error("state {state}: '{field}' is required for {kind} rows")]
    MissingValue {
        state: String,
        kind: &'static str,
        field: &'static str,
    },

    #[error("federal brackets for {found} do not match tax year {expected}")]
    TaxYearMismatch { expected: i32, found: i32 },

    #[error("invalid tax tables: {0}")]
    Invalid(#[from] TaxTableError),
}

impl From<csv::Error> for TaxTableLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxTableLoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for TaxTableLoaderError {
    fn from(err: toml::de::Error) -> Self {
        TaxTableLoaderError::TomlParse(err.to_string())
    }
}

/// A single record from the federal brackets CSV file.
///
/// - `tax_year`: The tax year (e.g., 2024)
/// - `filing_status`: `single` or `married_jointly`
/// - `min_income`: Inclusive lower bound of the bracket
/// - `max_income`: Exclusive upper bound (empty for unlimited)
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FederalBracketRecord {
    pub tax_year: i32,
    pub filing_status: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

/// A single record from the state tax CSV file.
///
/// `none` states have one row with empty amounts, `flat` states one row with
/// only `rate`, and `progressive` states one row per bracket.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StateTaxRecord {
    pub state_code: String,
    pub kind: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub min_income: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub rate: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StandardDeductions {
    pub single: Decimal,
    pub married_jointly: Decimal,
}

/// Contents of `tax_year.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxYearRecord {
    pub tax_year: i32,
    pub standard_deduction: StandardDeductions,
    pub fica: FicaConfig,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Loader for tax tables stored as two CSV files and one TOML file.
///
/// Parsing and assembly are separate steps so malformed rows are reported
/// before any bracket invariants are checked by [`TaxTables::new`].
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse federal bracket records from a CSV reader.
    pub fn parse_federal<R: Read>(
        reader: R
    ) -> Result<Vec<FederalBracketRecord>, TaxTableLoaderError> {
        let mut records = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: FederalBracketRecord = result?;
            records.push(record);
        }
        Ok(records)
    }

    /// Parse state tax records from a CSV reader.
    pub fn parse_states<R: Read>(reader: R) -> Result<Vec<StateTaxRecord>, TaxTableLoaderError> {
        let mut records = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: StateTaxRecord = result?;
            records.push(record);
        }
        Ok(records)
    }

    pub fn parse_tax_year(contents: &str) -> Result<TaxYearRecord, TaxTableLoaderError> {
        Ok(toml::from_str(contents)?)
    }

    /// Assemble validated [`TaxTables`] from parsed records.
    ///
    /// Federal rows are grouped by filing status and state rows by state
    /// code, both keeping file order.
    pub fn build(
        tax_year: TaxYearRecord,
        federal: &[FederalBracketRecord],
        states: &[StateTaxRecord],
    ) -> Result<TaxTables, TaxTableLoaderError> {
        let mut single = Vec::new();
        let mut married_jointly = Vec::new();

        for record in federal {
            if record.tax_year != tax_year.tax_year {
                return Err(TaxTableLoaderError::TaxYearMismatch {
                    expected: tax_year.tax_year,
                    found: record.tax_year,
                });
            }
            let status = FilingStatus::parse(&record.filing_status).ok_or_else(|| {
                TaxTableLoaderError::UnknownFilingStatus(record.filing_status.clone())
            })?;
            let bracket = TaxBracket::new(record.min_income, record.max_income, record.rate);
            match status {
                FilingStatus::Single => single.push(bracket),
                FilingStatus::MarriedJointly => married_jointly.push(bracket),
            }
        }

        let state_configs = build_states(states)?;
        debug!(
            tax_year = tax_year.tax_year,
            single_brackets = single.len(),
            married_jointly_brackets = married_jointly.len(),
            states = state_configs.len(),
            "assembled tax tables"
        );

        let tables = TaxTables::new(
            tax_year.tax_year,
            FederalSchedule {
                standard_deduction: tax_year.standard_deduction.single,
                brackets: single,
            },
            FederalSchedule {
                standard_deduction: tax_year.standard_deduction.married_jointly,
                brackets: married_jointly,
            },
            state_configs,
            tax_year.fica,
        )?;
        Ok(tables)
    }

    /// Parse and assemble tables from in-memory file contents.
    pub fn load_from_strs(
        federal_csv: &str,
        state_csv: &str,
        tax_year_toml: &str,
    ) -> Result<TaxTables, TaxTableLoaderError> {
        let tax_year = Self::parse_tax_year(tax_year_toml)?;
        let federal = Self::parse_federal(federal_csv.as_bytes())?;
        let states = Self::parse_states(state_csv.as_bytes())?;
        Self::build(tax_year, &federal, &states)
    }

    /// Load the three table files from `dir`.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<TaxTables, TaxTableLoaderError> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| TaxTableLoaderError::Io {
                path: path.display().to_string(),
                source,
            })
        };

        let federal_csv = read(FEDERAL_BRACKETS_FILE)?;
        let state_csv = read(STATE_TAX_FILE)?;
        let tax_year_toml = read(TAX_YEAR_FILE)?;
        debug!(dir = %dir.display(), "loading tax tables from directory");

        Self::load_from_strs(&federal_csv, &state_csv, &tax_year_toml)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StateKind {
    None,
    Flat,
    Progressive,
}

impl StateKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "flat" => Some(Self::Flat),
            "progressive" => Some(Self::Progressive),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Flat => "flat",
            Self::Progressive => "progressive",
        }
    }
}

fn build_states(
    records: &[StateTaxRecord]
) -> Result<BTreeMap<String, StateTaxConfig>, TaxTableLoaderError> {
    let mut grouped: BTreeMap<String, (StateKind, Vec<&StateTaxRecord>)> = BTreeMap::new();

    for record in records {
        let kind = StateKind::parse(&record.kind).ok_or_else(|| {
            TaxTableLoaderError::UnknownStateKind {
                state: record.state_code.clone(),
                kind: record.kind.clone(),
            }
        })?;
        let entry = grouped
            .entry(record.state_code.clone())
            .or_insert_with(|| (kind, Vec::new()));
        if entry.0 != kind {
            return Err(TaxTableLoaderError::MixedStateKinds {
                state: record.state_code.clone(),
                first: entry.0.as_str().to_string(),
                second: kind.as_str().to_string(),
            });
        }
        entry.1.push(record);
    }

    let mut states = BTreeMap::new();
    for (code, (kind, rows)) in grouped {
        let missing = |field: &'static str| TaxTableLoaderError::MissingValue {
            state: code.clone(),
            kind: kind.as_str(),
            field,
        };

        let config = match kind {
            StateKind::None => StateTaxConfig::None,
            StateKind::Flat => {
                // Only the first row of a flat state is meaningful.
                let rate = rows.first().and_then(|r| r.rate).ok_or_else(|| missing("rate"))?;
                StateTaxConfig::Flat { rate }
            }
            StateKind::Progressive => {
                let mut brackets = Vec::with_capacity(rows.len());
                for row in &rows {
                    let min = row.min_income.ok_or_else(|| missing("min_income"))?;
                    let rate = row.rate.ok_or_else(|| missing("rate"))?;
                    brackets.push(TaxBracket::new(min, row.max_income, rate));
                }
                StateTaxConfig::Progressive { brackets }
            }
        };
        states.insert(code, config);
    }

    Ok(states)
}
