//! Load debt snapshots from CSV

use super::{Debt, DebtKind};
use csv::Reader;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: {message}")]
    Row { row: usize, message: String },
}

/// Raw CSV row: `id,name,kind,balance,rate,minimum,original,lender,due_day`
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    id: String,
    name: String,
    #[serde(default)]
    kind: String,
    balance: f64,
    rate: f64,
    minimum: f64,
    #[serde(default)]
    original: Option<f64>,
    #[serde(default)]
    lender: Option<String>,
    #[serde(default)]
    due_day: Option<u8>,
}

impl CsvRow {
    fn into_debt(self, row: usize) -> Result<Debt, LoadError> {
        let kind = DebtKind::from_tag(&self.kind).ok_or_else(|| LoadError::Row {
            row,
            message: format!("unknown debt kind: {}", self.kind),
        })?;

        let lender = self.lender.filter(|l| !l.trim().is_empty());

        Ok(Debt {
            id: self.id,
            name: self.name,
            kind,
            balance: self.balance,
            annual_interest_rate_percent: self.rate,
            minimum_payment: self.minimum,
            // Missing original amount defaults to the current balance
            original_amount: self.original.unwrap_or(self.balance),
            lender,
            due_day: self.due_day.unwrap_or(1),
        })
    }
}

/// Load all debts from a CSV file
pub fn load_debts<P: AsRef<Path>>(path: P) -> Result<Vec<Debt>, LoadError> {
    let path = path.as_ref();
    log::debug!("loading debts from {}", path.display());
    let reader = Reader::from_path(path)?;
    read_rows(reader)
}

/// Load debts from any reader (e.g., string buffer, request body)
pub fn load_debts_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Debt>, LoadError> {
    read_rows(Reader::from_reader(reader))
}

fn read_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Debt>, LoadError> {
    let mut debts = Vec::new();

    for (idx, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // Header is line 1
        debts.push(row.into_debt(idx + 2)?);
    }

    log::info!("loaded {} debts", debts.len());
    Ok(debts)
}
