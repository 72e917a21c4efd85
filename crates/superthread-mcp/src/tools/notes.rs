use superthread_pipeline::ResponseFilter;

use super::{Endpoint, ToolDef};
use crate::schema::{Param, ParamType, Schema};

pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::rest(
            "create_note",
            "Creates a note, optionally attached to a project.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID (from get_my_account tool)"),
                Param::body("title", ParamType::String, "Note title").required(),
                Param::body("content", ParamType::String, "Note content/body text"),
                Param::body("project_id", ParamType::String, "Project ID to associate note with"),
            ]),
            Endpoint::post("/{team_id}/notes"),
        ),
        ToolDef::rest(
            "get_note",
            "Fetches a single note.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("note_id", "Note ID to retrieve"),
            ]),
            Endpoint::get("/{team_id}/notes/{note_id}"),
        ),
        ToolDef::rest(
            "get_notes",
            "Lists notes in a team, optionally filtered by project.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::query("project_id", ParamType::String, "Filter notes by project ID"),
                Param::query(
                    "cursor",
                    ParamType::String,
                    "Pagination cursor for large result sets",
                ),
            ]),
            Endpoint::get("/{team_id}/notes").filtered(ResponseFilter::Generic),
        ),
    ]
}
