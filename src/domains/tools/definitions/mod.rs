//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod holidays;

pub use holidays::{
    AvailableCountriesTool, CountryInfoTool, IsTodayPublicHolidayTool, LongWeekendTool,
    NextPublicHolidaysTool, NextPublicHolidaysWorldwideTool, PublicHolidaysTool, VersionTool,
};
