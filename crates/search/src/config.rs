//! Search configuration.
//!
//! Every setting can be given programmatically, on the command line, or
//! through an environment variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MSR_LOG_LEVEL` | info | Log level |
//! | `MSR_SORT_REDIRECT_FIELDS` | id,publishedAt,lastUpdatedAt | Fields sorted under `<field>_sort` |
//! | `MSR_SEARCH_FIELDS` | name,version,...,serviceType | Fields matched by the listing wildcard search |
//! | `MSR_DEFAULT_PAGE_SIZE` | 20 | Page size used when a listing request has length 0 |
//! | `MSR_MAX_PAGE_SIZE` | 1000 | Largest page size a listing request may ask for |
//!
//! # Example
//!
//! ```rust
//! use msr_search::SearchConfig;
//!
//! let config = SearchConfig {
//!     sort_redirect_fields: "id,name".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.redirect_fields().contains("name"));
//! assert!(config.validate().is_ok());
//! ```

use std::collections::HashSet;

use clap::Parser;

/// Default sort redirect table.
pub const DEFAULT_SORT_REDIRECT_FIELDS: &str = "id,publishedAt,lastUpdatedAt";

/// Default wildcard search fields of the instance listing.
pub const DEFAULT_SEARCH_FIELDS: &str = "name,version,lastUpdatedAt,instanceId,keywords,status,organizationId,endpointUri,mmsi,imo,serviceType";

/// Search configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "msr-search")]
#[command(about = "Maritime Service Registry search compiler")]
pub struct SearchConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "MSR_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Fields sorted under a `<field>_sort` companion field (comma-separated).
    #[arg(
        long,
        env = "MSR_SORT_REDIRECT_FIELDS",
        default_value = DEFAULT_SORT_REDIRECT_FIELDS
    )]
    pub sort_redirect_fields: String,

    /// Fields matched by the listing wildcard search (comma-separated).
    #[arg(long, env = "MSR_SEARCH_FIELDS", default_value = DEFAULT_SEARCH_FIELDS)]
    pub search_fields: String,

    /// Page size used when a listing request asks for length 0.
    #[arg(long, env = "MSR_DEFAULT_PAGE_SIZE", default_value = "20")]
    pub default_page_size: u32,

    /// Maximum page size for listing requests.
    #[arg(long, env = "MSR_MAX_PAGE_SIZE", default_value = "1000")]
    pub max_page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            sort_redirect_fields: DEFAULT_SORT_REDIRECT_FIELDS.to_string(),
            search_fields: DEFAULT_SEARCH_FIELDS.to_string(),
            default_page_size: 20,
            max_page_size: 1000,
        }
    }
}

impl SearchConfig {
    /// Creates a new SearchConfig from environment variables.
    pub fn from_env() -> Self {
        Self::try_parse_from(["msr-search"]).unwrap_or_default()
    }

    /// Returns the sort redirect table.
    pub fn redirect_fields(&self) -> HashSet<String> {
        split_list(&self.sort_redirect_fields).collect()
    }

    /// Returns the wildcard search fields in configured order.
    pub fn search_fields(&self) -> Vec<String> {
        split_list(&self.search_fields).collect()
    }

    /// Clamps a requested page length to the configured bounds.
    ///
    /// Length 0 becomes the default page size.
    pub fn page_length(&self, requested: u32) -> u32 {
        if requested == 0 {
            self.default_page_size
        } else {
            requested.min(self.max_page_size)
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if self.search_fields().is_empty() {
            errors.push("At least one search field is required".to_string());
        }

        let invalid: Vec<String> = split_list(&self.sort_redirect_fields)
            .chain(split_list(&self.search_fields))
            .filter(|field| field.contains(char::is_whitespace) || field.contains(':'))
            .collect();
        for field in invalid {
            errors.push(format!("Invalid field name: {:?}", field));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn split_list(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
