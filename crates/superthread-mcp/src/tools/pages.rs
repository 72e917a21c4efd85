use superthread_pipeline::ResponseFilter;

use super::{Endpoint, ToolDef};
use crate::schema::{Param, ParamType, Schema};

pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::rest(
            "create_page",
            "Creates a documentation page, optionally nested under another page.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID (from get_my_account tool)"),
                Param::body("title", ParamType::String, "Page title").required(),
                Param::body("content", ParamType::String, "Page content/body"),
                Param::body("project_id", ParamType::String, "Project ID to associate page with"),
                Param::body(
                    "parent_page_id",
                    ParamType::String,
                    "Parent page ID for nested pages",
                ),
            ]),
            Endpoint::post("/{team_id}/pages"),
        ),
        ToolDef::rest(
            "update_page",
            "Updates a page's title or content.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("page_id", "Page ID to update"),
                Param::body("title", ParamType::String, "Updated page title"),
                Param::body("content", ParamType::String, "Updated page content"),
            ])
            .require_update(),
            Endpoint::patch("/{team_id}/pages/{page_id}"),
        ),
        ToolDef::rest(
            "get_page",
            "Fetches a single page.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("page_id", "Page ID to retrieve"),
            ]),
            Endpoint::get("/{team_id}/pages/{page_id}"),
        ),
        ToolDef::rest(
            "get_pages",
            "Lists pages in a team, optionally filtered by project.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::query("project_id", ParamType::String, "Filter pages by project ID"),
                Param::query(
                    "cursor",
                    ParamType::String,
                    "Pagination cursor for large result sets",
                ),
            ]),
            Endpoint::get("/{team_id}/pages").filtered(ResponseFilter::Generic),
        ),
        ToolDef::rest(
            "archive_page",
            "Archives a page.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("page_id", "Page ID to archive"),
            ]),
            Endpoint::put("/{team_id}/pages/{page_id}/archive"),
        ),
    ]
}
