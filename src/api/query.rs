//! Query parameters derived from caller input.

use crate::constants::{PRICE_HISTORY_START_YEAR, PRICE_WINDOW_DAYS};
use crate::error::{LabelError, Result};
use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access level of a household survey request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Complete survey data
    Full,
    /// Draft internal base data
    Draft,
    /// Official use base data
    Official,
    /// Public base data
    #[default]
    Public,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Full => "full",
            AccessType::Draft => "draft",
            AccessType::Official => "official",
            AccessType::Public => "public",
        }
    }

    /// Endpoint path serving this access level
    pub fn endpoint(&self) -> &'static str {
        match self {
            AccessType::Full => "Household/FullData",
            AccessType::Draft => "Household/DraftInternalBaseData",
            AccessType::Official => "Household/OfficialUseBaseData",
            AccessType::Public => "Household/PublicBaseData",
        }
    }

    /// Full and draft data are only served with an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, AccessType::Full | AccessType::Draft)
    }
}

impl FromStr for AccessType {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "full" => Ok(AccessType::Full),
            "draft" => Ok(AccessType::Draft),
            "official" => Ok(AccessType::Official),
            "public" | "" => Ok(AccessType::Public),
            other => Err(LabelError::UnknownAccessType {
                access_type: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First date of the price history fetched for a survey
///
/// One year before `survey_date` (`YYYY-MM-DD`), or 1 January 1990 when no
/// date is given.
pub fn price_window_start(survey_date: &str) -> Result<NaiveDate> {
    let survey_date = survey_date.trim();
    if survey_date.is_empty() {
        return NaiveDate::from_ymd_opt(PRICE_HISTORY_START_YEAR, 1, 1)
            .ok_or_else(|| LabelError::configuration("invalid price history start year"));
    }

    let date = NaiveDate::parse_from_str(survey_date, "%Y-%m-%d")?;
    date.checked_sub_signed(TimeDelta::days(PRICE_WINDOW_DAYS))
        .ok_or_else(|| {
            LabelError::configuration(format!("survey date {survey_date} is out of range"))
        })
}
