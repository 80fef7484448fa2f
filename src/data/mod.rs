/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────┐
///   │ Dataset │  column names, rows of Value, unique values per column
///   └─────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  age range + categorical criteria → filtered Dataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  acceptance rate, conversion by age bucket, proportions
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
