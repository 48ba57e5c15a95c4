//! Persistence of output records.

pub mod parquet;

pub use self::parquet::SinkError;
