use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::IngestionError;
use super::model::{Catalog, Gender, RawRecord};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load both catalog sources and merge them into one [`Catalog`].
///
/// Each source gets exactly one load attempt. The first failure aborts the
/// whole ingestion and names the source that failed.
pub fn ingest(male: &Path, female: &Path) -> Result<Catalog, IngestionError> {
    let male_rows = load_source(Gender::Male, male)?;
    let female_rows = load_source(Gender::Female, female)?;

    let (catalog, stats) = Catalog::from_segments_with_stats(male_rows, female_rows);
    log::info!(
        "Ingested {} listings ({} male, {} female)",
        catalog.len(),
        catalog.segment_len(Gender::Male),
        catalog.segment_len(Gender::Female),
    );
    log::debug!(
        "Normalization: {} of {} prices and {} sold counts fell back to zero",
        stats.zero_prices,
        stats.rows,
        stats.zero_sold,
    );
    Ok(catalog)
}

fn load_source(which: Gender, path: &Path) -> Result<Vec<RawRecord>, IngestionError> {
    match load_file(path) {
        Ok(rows) => {
            log::info!("Loaded {} {which} listings from {}", rows.len(), path.display());
            Ok(rows)
        }
        Err(e) => Err(IngestionError::MissingSource {
            which,
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        }),
    }
}

/// Load raw listings from a single file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; `brand,title,type,price,available,sold,itemLocation,...`
/// * `.json`    – `[{ "brand": ..., "price": ..., ... }, ...]`
/// * `.parquet` – one column per source field, any scalar type
pub fn load_file(path: &Path) -> Result<Vec<RawRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Columns are matched by header name; unknown columns are ignored and
/// empty cells read as absent.
fn load_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRecord>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Numbers are kept
/// as their textual form so they go through the same normalization as CSV.
fn load_json(path: &Path) -> Result<Vec<RawRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut raw = RawRecord::default();
        for (key, val) in obj {
            raw.set(key, json_text(val));
        }
        rows.push(raw);
    }
    Ok(rows)
}

fn json_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Each known source column may be any scalar Arrow type; values are
/// rendered to text. Missing columns leave the field absent.
fn load_parquet(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let known: Vec<(&str, &ArrayRef)> = RawRecord::COLUMNS
            .iter()
            .filter_map(|&name| {
                schema
                    .index_of(name)
                    .ok()
                    .map(|idx| (name, batch.column(idx)))
            })
            .collect();

        for row in 0..batch.num_rows() {
            let mut raw = RawRecord::default();
            for (name, col) in &known {
                let value = extract_text(col, row)
                    .with_context(|| format!("Row {row}: failed to read '{name}'"))?;
                raw.set(name, value);
            }
            rows.push(raw);
        }
    }

    Ok(rows)
}

/// Render one Arrow cell as text; nulls become `None`.
fn extract_text(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = array_value_to_string(col, row)?;
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_keeps_known_columns_only() {
        let file = write_file(
            ".csv",
            "brand,title,type,price,priceWithCurrency,available,sold,lastUpdated,itemLocation\n\
             Dior,Sauvage EDT,Eau de Toilette,89.99,US $89.99,5,\"1,024 sold\",\
             2024-05-01,\"Miami, Florida\"\n\
             Versace,Eros,,N/A,,,,,\n",
        );
        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].brand.as_deref(), Some("Dior"));
        assert_eq!(rows[0].sold.as_deref(), Some("1,024 sold"));
        assert_eq!(rows[0].item_location.as_deref(), Some("Miami, Florida"));
        assert_eq!(rows[1].perfume_type, None);
        assert_eq!(rows[1].available, None);
    }

    #[test]
    fn json_numbers_become_text() {
        let file = write_file(
            ".json",
            r#"[{"brand": "Chanel", "price": 120.5, "available": 3,
                 "sold": "12 sold", "extra": [1]}]"#,
        );
        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows[0].price.as_deref(), Some("120.5"));
        assert_eq!(rows[0].available.as_deref(), Some("3"));
    }

    #[test]
    fn json_must_be_an_array() {
        let file = write_file(".json", r#"{"brand": "Chanel"}"#);
        assert!(load_file(file.path()).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_file(".xlsx", "brand\nDior\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err}").contains(".xlsx"));
    }

    #[test]
    fn missing_source_names_the_segment() {
        let female = write_file(".csv", "brand\nDior\n");
        let err = ingest(Path::new("/nonexistent/men.csv"), female.path()).unwrap_err();
        assert_eq!(err.which(), Gender::Male);

        let male = write_file(".csv", "brand\nDior\n");
        let err = ingest(male.path(), Path::new("/nonexistent/women.csv")).unwrap_err();
        assert_eq!(err.which(), Gender::Female);
    }
}
