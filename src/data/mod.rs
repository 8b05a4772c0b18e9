/// Data layer: tables, loading, registry and filtering.
///
/// Architecture:
/// ```text
///  uploaded .csv / .json bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ TableRegistry │  file name → Table, upload order
///   └──────────────┘
///        │  resolve(selected name)
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterParams → surviving rows → filtered Table
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod registry;
pub mod filter;
