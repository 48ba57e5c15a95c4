//! Parquet sink for projected kline records.
//!
//! Single-shot whole-file write: the full record sequence becomes one Arrow
//! record batch, written with Snappy compression. Any failure here is fatal
//! to the run.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow_array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray, UInt64Array};
use arrow_schema::{ArrowError, DataType, Field, Schema, SchemaRef};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::errors::ParquetError;
use parquet::file::properties::WriterProperties;

use crate::models::KlineRecord;

/// Errors from the Parquet sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The destination file could not be created or written.
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Destination path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Arrow batch construction failed.
    #[error("Arrow encoding error: {0}")]
    Arrow(#[from] ArrowError),

    /// Parquet serialization failed.
    #[error("Parquet encoding error: {0}")]
    Parquet(#[from] ParquetError),
}

/// The output schema: one row per (symbol, interval).
fn output_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("symbol", DataType::Utf8, false),
        Field::new("open_time", DataType::Int64, false),
        Field::new("open", DataType::Float64, false),
        Field::new("high", DataType::Float64, false),
        Field::new("low", DataType::Float64, false),
        Field::new("close", DataType::Float64, false),
        Field::new("volume", DataType::Float64, false),
        Field::new("close_time", DataType::Int64, false),
        Field::new("quote_asset_volume", DataType::Float64, false),
        Field::new("number_of_trades", DataType::UInt64, false),
        Field::new("taker_buy_base_asset_volume", DataType::Float64, false),
        Field::new("taker_buy_quote_asset_volume", DataType::Float64, false),
    ]))
}

/// Convert the record sequence to one Arrow record batch.
fn to_record_batch(records: &[KlineRecord]) -> Result<RecordBatch, ArrowError> {
    let symbols: ArrayRef = Arc::new(StringArray::from(
        records.iter().map(|r| r.symbol.as_str()).collect::<Vec<_>>(),
    ));
    let open_times: ArrayRef = Arc::new(Int64Array::from(
        records.iter().map(|r| r.open_time).collect::<Vec<_>>(),
    ));
    let opens: ArrayRef = Arc::new(Float64Array::from(
        records.iter().map(|r| r.open).collect::<Vec<_>>(),
    ));
    let highs: ArrayRef = Arc::new(Float64Array::from(
        records.iter().map(|r| r.high).collect::<Vec<_>>(),
    ));
    let lows: ArrayRef = Arc::new(Float64Array::from(
        records.iter().map(|r| r.low).collect::<Vec<_>>(),
    ));
    let closes: ArrayRef = Arc::new(Float64Array::from(
        records.iter().map(|r| r.close).collect::<Vec<_>>(),
    ));
    let volumes: ArrayRef = Arc::new(Float64Array::from(
        records.iter().map(|r| r.volume).collect::<Vec<_>>(),
    ));
    let close_times: ArrayRef = Arc::new(Int64Array::from(
        records.iter().map(|r| r.close_time).collect::<Vec<_>>(),
    ));
    let quote_volumes: ArrayRef = Arc::new(Float64Array::from(
        records
            .iter()
            .map(|r| r.quote_asset_volume)
            .collect::<Vec<_>>(),
    ));
    let trade_counts: ArrayRef = Arc::new(UInt64Array::from(
        records
            .iter()
            .map(|r| r.number_of_trades)
            .collect::<Vec<_>>(),
    ));
    let taker_base: ArrayRef = Arc::new(Float64Array::from(
        records
            .iter()
            .map(|r| r.taker_buy_base_asset_volume)
            .collect::<Vec<_>>(),
    ));
    let taker_quote: ArrayRef = Arc::new(Float64Array::from(
        records
            .iter()
            .map(|r| r.taker_buy_quote_asset_volume)
            .collect::<Vec<_>>(),
    ));

    RecordBatch::try_new(
        output_schema(),
        vec![
            symbols,
            open_times,
            opens,
            highs,
            lows,
            closes,
            volumes,
            close_times,
            quote_volumes,
            trade_counts,
            taker_base,
            taker_quote,
        ],
    )
}

/// Write the full record sequence to a Snappy-compressed Parquet file.
///
/// An empty sequence still produces a well-formed file carrying the full
/// schema.
pub fn persist(records: &[KlineRecord], path: &Path) -> Result<(), SinkError> {
    let batch = to_record_batch(records)?;

    let file = File::create(path).map_err(|source| SinkError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    tracing::info!(
        path = %path.display(),
        rows = records.len(),
        "Parquet artifact written"
    );
    Ok(())
}
