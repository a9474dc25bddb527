use std::io::Read;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value};

use crate::draw::ColumnIndex;

/// A table of text cells with named columns, as read from stdin.
#[derive(Debug, Clone)]
pub struct PlotData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PlotData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read CSV with a header row. Cells are trimmed.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers: Vec<String> = csv
            .headers()
            .context("Failed to read CSV header row")?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.is_empty() {
            bail!("CSV input has no columns");
        }
        let mut rows = Vec::new();
        for (i, record) in csv.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV record {}", i + 1))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    /// Read a JSON array of objects. The keys of the first object name the
    /// columns; strings are trimmed like CSV cells and missing keys or nulls
    /// become empty cells.
    pub fn from_json(value: &Value) -> Result<Self> {
        let records = match value.as_array() {
            Some(records) if !records.is_empty() => records,
            Some(_) => bail!("JSON input has no records"),
            None => bail!("JSON input must be an array of objects"),
        };
        let headers: Vec<String> = json_record(0, &records[0])?.keys().cloned().collect();
        let mut rows = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let fields = json_record(i, record)?;
            let row = headers
                .iter()
                .map(|h| json_cell(fields.get(h)).with_context(|| format!("JSON record {}", i + 1)))
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }
        Ok(Self { headers, rows })
    }

    /// 0-based position of a selected column.
    pub fn column_position(&self, selector: &ColumnIndex) -> Result<usize> {
        let position = match selector {
            ColumnIndex::Number(0) => bail!("Column numbers start at 1"),
            ColumnIndex::Number(n) => n - 1,
            ColumnIndex::Name(name) => self
                .headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| anyhow!("Column '{}' not found", name))?,
            ColumnIndex::Expr(expr) => {
                bail!("Column expression '({})' cannot be evaluated on input data", expr)
            }
        };
        if position >= self.headers.len() {
            bail!(
                "Column {} is out of range, the input has {} columns",
                position + 1,
                self.headers.len()
            );
        }
        Ok(position)
    }

    pub fn header(&self, selector: &ColumnIndex) -> Result<&str> {
        Ok(self.headers[self.column_position(selector)?].as_str())
    }

    pub fn text_column(&self, selector: &ColumnIndex) -> Result<Vec<String>> {
        let position = self.column_position(selector)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(position).cloned().unwrap_or_default())
            .collect())
    }

    /// Values of a column; empty cells become NaN and end up as missing
    /// values in the data file.
    pub fn numeric_column(&self, selector: &ColumnIndex) -> Result<Vec<f64>> {
        let position = self.column_position(selector)?;
        let name = &self.headers[position];
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cell = row.get(position).map(String::as_str).unwrap_or("");
                if cell.is_empty() {
                    return Ok(f64::NAN);
                }
                cell.parse::<f64>().with_context(|| {
                    format!("Column '{}' row {}: '{}' is not a number", name, i + 1, cell)
                })
            })
            .collect()
    }

    /// True when every non-empty cell of the column parses as a number.
    pub fn is_numeric(&self, selector: &ColumnIndex) -> Result<bool> {
        let position = self.column_position(selector)?;
        Ok(self.rows.iter().all(|row| {
            row.get(position)
                .map(|c| c.is_empty() || c.parse::<f64>().is_ok())
                .unwrap_or(true)
        }))
    }
}

fn json_record(index: usize, record: &Value) -> Result<&Map<String, Value>> {
    record
        .as_object()
        .ok_or_else(|| anyhow!("JSON record {} is not an object", index + 1))
}

fn json_cell(value: Option<&Value>) -> Result<String> {
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => bail!("Nested value {} cannot be plotted", other),
    })
}
