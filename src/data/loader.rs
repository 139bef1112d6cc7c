use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{LaunchDataset, LaunchOutcome, LaunchRecord};

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; `Launch Site`, `Payload Mass (kg)`, `class`,
///   `Booster Version Category` columns (others are ignored)
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – the same four columns
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            load_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            load_json(&text)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::info!(
        "Loaded {} launches from {} ({} sites, payload {}..={} kg)",
        dataset.len(),
        path.display(),
        dataset.sites().count(),
        dataset.min_payload(),
        dataset.max_payload()
    );
    Ok(dataset)
}

/// Reject rows the dashboard cannot plot.
fn validate(rec: &LaunchRecord) -> Result<()> {
    if !rec.payload_mass_kg.is_finite() || rec.payload_mass_kg < 0.0 {
        bail!(
            "'{COL_PAYLOAD_MASS}' must be a non-negative number, got {}",
            rec.payload_mass_kg
        );
    }
    if rec.launch_site.is_empty() {
        bail!("empty '{COL_LAUNCH_SITE}'");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one launch per row.
pub fn load_csv<R: Read>(input: R) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_reader(input);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for required in [COL_LAUNCH_SITE, COL_PAYLOAD_MASS, COL_CLASS, COL_BOOSTER_CATEGORY] {
        if !headers.iter().any(|h| h == required) {
            bail!("CSV missing '{required}' column");
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<LaunchRecord>().enumerate() {
        // Line numbers as shown by an editor: the header is line 1.
        let line = row_no + 2;
        let rec = result.with_context(|| format!("CSV line {line}"))?;
        validate(&rec).with_context(|| format!("CSV line {line}"))?;
        records.push(rec);
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "class": 0,
///     "Booster Version Category": "v1.0"
///   },
///   ...
/// ]
/// ```
pub fn load_json(text: &str) -> Result<LaunchDataset> {
    let records: Vec<LaunchRecord> = serde_json::from_str(text).context("parsing JSON")?;
    for (i, rec) in records.iter().enumerate() {
        validate(rec).with_context(|| format!("JSON record {}", i + 1))?;
    }
    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing the launch table.
///
/// `Payload Mass (kg)` may be any float or integer column and `class` any
/// integer column. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let site_col = column(&batch, COL_LAUNCH_SITE)?;
        let mass_col = column(&batch, COL_PAYLOAD_MASS)?;
        let class_col = column(&batch, COL_CLASS)?;
        let booster_col = column(&batch, COL_BOOSTER_CATEGORY)?;

        for row in 0..batch.num_rows() {
            let row_no = records.len() + 1;
            let class = extract_i64(class_col, row)
                .with_context(|| format!("Parquet row {row_no}: failed to read '{COL_CLASS}'"))?;
            let outcome = LaunchOutcome::try_from(class)
                .map_err(|e| anyhow::anyhow!("Parquet row {row_no}: {e}"))?;

            let rec = LaunchRecord {
                launch_site: extract_string(site_col, row).with_context(|| {
                    format!("Parquet row {row_no}: failed to read '{COL_LAUNCH_SITE}'")
                })?,
                payload_mass_kg: extract_f64(mass_col, row).with_context(|| {
                    format!("Parquet row {row_no}: failed to read '{COL_PAYLOAD_MASS}'")
                })?,
                outcome,
                booster_version_category: extract_string(booster_col, row).with_context(|| {
                    format!("Parquet row {row_no}: failed to read '{COL_BOOSTER_CATEGORY}'")
                })?,
            };
            validate(&rec).with_context(|| format!("Parquet row {row_no}"))?;
            records.push(rec);
        }
    }

    Ok(LaunchDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("Expected string column, got {other:?}"),
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Float64 => Ok(downcast::<Float64Array>(col)?.value(row)),
        DataType::Float32 => Ok(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Int64 => Ok(downcast::<Int64Array>(col)?.value(row) as f64),
        DataType::Int32 => Ok(downcast::<Int32Array>(col)?.value(row) as f64),
        other => bail!("Expected numeric column, got {other:?}"),
    }
}

fn extract_i64(col: &Arc<dyn Array>, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Int64 => Ok(downcast::<Int64Array>(col)?.value(row)),
        DataType::Int32 => Ok(downcast::<Int32Array>(col)?.value(row) as i64),
        other => bail!("Expected integer column, got {other:?}"),
    }
}

fn downcast<T: Array + 'static>(col: &Arc<dyn Array>) -> Result<&T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array type {:?}", col.data_type()))
}
