//! Application constants for label resolution
//!
//! This module contains the column names, default values and API
//! conventions used throughout the library.

// =============================================================================
// Questionnaire Definition Columns
// =============================================================================

/// Field identifier column of a questionnaire definition
pub const NAME_COLUMN: &str = "name";

/// Display text column of a questionnaire definition
pub const LABEL_COLUMN: &str = "label";

/// Nested choice list column of a questionnaire definition
pub const CHOICE_LIST_COLUMN: &str = "choiceList";

/// Key inside `choiceList` holding the ordered `{name, label}` pairs
pub const CHOICES_KEY: &str = "choices";

/// Keys inside each choice entry
pub mod choice_keys {
    pub const CODE: &str = "name";
    pub const LABEL: &str = "label";
}

// =============================================================================
// Output Table Columns
// =============================================================================

/// Column names of the tabular projections produced by the resolvers
pub mod output_columns {
    /// Field name column of the column-label table
    pub const COL_NAME: &str = "colName";
    /// Label column shared by the column-label and choice-list tables
    pub const LABEL: &str = "label";
    /// Field name column of the choice-label table
    pub const NAME: &str = "name";
    /// Nested mapping column of the choice-label table
    pub const CHOICE_LABELS: &str = "choiceLabels";
    /// Code column inside `choiceLabels` entries
    pub const CODE: &str = "code";
    /// Code column of the long-format choice list table
    pub const VALUE: &str = "value";
}

// =============================================================================
// Numeric Coercion
// =============================================================================

/// Fill value for missing or non-numeric entries after numeric coercion
pub const DEFAULT_SENTINEL: i64 = 9999;

/// Indentation width for JSON renderings of label mappings
pub const DEFAULT_JSON_INDENT: usize = 4;

// =============================================================================
// Remote API Conventions
// =============================================================================

/// Default page size for price and exchange-rate endpoints, which stop by page count
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Default page size for household survey endpoints, which stop by item count
pub const HOUSEHOLD_PAGE_SIZE: usize = 600;

/// Pause between page requests, in milliseconds
pub const DEFAULT_PAGE_DELAY_MS: u64 = 1000;

/// Days of price history fetched before a survey date
pub const PRICE_WINDOW_DAYS: i64 = 365;

/// Earliest year fetched when no survey date is given
pub const PRICE_HISTORY_START_YEAR: i32 = 1990;

// =============================================================================
// Country Reference Table
// =============================================================================

/// Keys of the country reference table entries
pub mod country_keys {
    pub const ISO3: &str = "iso3Alpha3";
    pub const ADM0: &str = "adm0Code";
}
