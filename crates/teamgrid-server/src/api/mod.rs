//! HTTP endpoint handlers, grouped by API version.

pub mod v1;
