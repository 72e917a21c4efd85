use superthread_pipeline::ResponseFilter;

use super::{Endpoint, ToolDef};
use crate::schema::{Param, ParamType, Schema};

const CONTENT_TYPES: &[&str] = &["cards", "projects", "notes", "pages", "all"];

pub fn tools() -> Vec<ToolDef> {
    vec![ToolDef::rest(
        "get_search_results",
        "Full-text search across a team's cards, projects, notes and pages.",
        Schema::new(vec![
            Param::path("team_id", "Team/workspace ID (from get_my_account tool)"),
            Param::query("query", ParamType::String, "Search query string").required(),
            Param::query(
                "type",
                ParamType::Enum(CONTENT_TYPES),
                "Filter results by content type",
            )
            .sent_as("types"),
            Param::query(
                "project_id",
                ParamType::String,
                "Filter results to specific project/space",
            ),
            Param::query("limit", ParamType::Number, "Maximum number of results to return"),
            Param::query(
                "cursor",
                ParamType::String,
                "Pagination cursor for large result sets",
            ),
        ]),
        Endpoint::get("/{team_id}/search").filtered(ResponseFilter::Generic),
    )]
}
