//! Xcode string catalog (`Localizable.xcstrings`)
/// Load and deterministic save
mod io;
/// Catalog data model
mod types;

pub use io::{
    CatalogError,
    load_catalog,
    parse_catalog,
    save_catalog,
    to_pretty_json,
};
pub use types::{
    CatalogEntry,
    EXTRACTION_STATE_MANUAL,
    Localization,
    STATE_TRANSLATED,
    StringCatalog,
    StringUnit,
};
