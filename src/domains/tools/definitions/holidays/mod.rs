//! Nager.Date holiday tools.
//!
//! One file per upstream endpoint. Every tool is a GET passthrough built on
//! the shared [`HolidayApiClient`]:
//! - `country_info`: metadata for one country
//! - `available_countries`: all supported countries
//! - `long_weekend`: long weekends for a year and country
//! - `public_holidays`: public holidays for a year and country
//! - `is_today_public_holiday`: whether today is a public holiday
//! - `next_public_holidays`: holidays in the next 365 days for a country
//! - `next_public_holidays_worldwide`: holidays worldwide in the next 7 days
//! - `version`: version of the Nager.Date library behind the API

pub mod available_countries;
pub mod client;
pub mod common;
pub mod country_info;
pub mod is_today_public_holiday;
pub mod long_weekend;
pub mod next_public_holidays;
pub mod next_public_holidays_worldwide;
pub mod public_holidays;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;

pub use available_countries::AvailableCountriesTool;
pub use client::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, EndpointRequest, HolidayApiClient, UpstreamBody,
    UpstreamError,
};
pub use common::{ErrorEnvelope, NoParams};
pub use country_info::{CountryInfoParams, CountryInfoTool};
pub use is_today_public_holiday::{IsTodayPublicHolidayParams, IsTodayPublicHolidayTool};
pub use long_weekend::{LongWeekendParams, LongWeekendTool};
pub use next_public_holidays::{NextPublicHolidaysParams, NextPublicHolidaysTool};
pub use next_public_holidays_worldwide::NextPublicHolidaysWorldwideTool;
pub use public_holidays::{PublicHolidaysParams, PublicHolidaysTool};
pub use version::VersionTool;
