//! Response pipeline for superthread-mcp.
//!
//! Upstream payloads are shrunk before they reach the agent:
//!
//! - **Heavy field stripping**: recursive removal of timestamps, embedded user
//!   objects, large arrays and media blobs
//! - **Reshaping**: account, space and board payloads are reduced to the ids,
//!   titles and nesting needed to navigate a workspace
//!
//! # Example
//!
//! ```ignore
//! use superthread_pipeline::ResponseFilter;
//!
//! let filtered = ResponseFilter::Board.apply(raw_board)?;
//! ```

pub mod filters;
pub mod heavy;

pub use filters::{
    filter_board, filter_generic, filter_space, filter_spaces, filter_user_account,
    FilteredBoardResponse, FilteredSpace, FilteredSpaces, FilteredUserAccount,
};
pub use heavy::{strip_heavy_fields, HEAVY_FIELDS};

use serde::Serialize;
use serde_json::Value;
use superthread_core::Result;

/// Filter applied to a tool's upstream response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFilter {
    Account,
    Spaces,
    Space,
    Board,
    Generic,
}

impl ResponseFilter {
    pub fn name(&self) -> &'static str {
        match self {
            ResponseFilter::Account => "account",
            ResponseFilter::Spaces => "spaces",
            ResponseFilter::Space => "space",
            ResponseFilter::Board => "board",
            ResponseFilter::Generic => "generic",
        }
    }

    /// Run the filter over a raw upstream payload.
    pub fn apply(&self, response: Value) -> Result<Value> {
        let filtered = match self {
            ResponseFilter::Account => serde_json::to_value(filter_user_account(&response))?,
            ResponseFilter::Spaces => serde_json::to_value(filter_spaces(&response)?)?,
            ResponseFilter::Space => serde_json::to_value(filter_space(&response)?)?,
            ResponseFilter::Board => serde_json::to_value(filter_board(&response)?)?,
            ResponseFilter::Generic => filter_generic(response),
        };
        Ok(filtered)
    }
}

/// Serialized size before and after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeReduction {
    pub original_size: usize,
    pub filtered_size: usize,
    pub reduction_percent: i64,
}

/// Measure how much a filter shrank a payload.
pub fn size_reduction(original: &Value, filtered: &Value) -> SizeReduction {
    let original_size = original.to_string().len();
    let filtered_size = filtered.to_string().len();
    let reduction_percent = if original_size == 0 {
        0
    } else {
        ((original_size as f64 - filtered_size as f64) / original_size as f64 * 100.0).round()
            as i64
    };

    SizeReduction {
        original_size,
        filtered_size,
        reduction_percent,
    }
}
