use super::{Endpoint, ToolDef};
use crate::schema::{Param, ParamType, Schema};

pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::rest(
            "get_tags",
            "Lists the tags of a team, optionally filtered by project.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::query(
                    "project_id",
                    ParamType::String,
                    "Project ID to filter tags (optional)",
                ),
            ]),
            Endpoint::get("/{team_id}/tags"),
        ),
        ToolDef::rest(
            "create_tag",
            "Creates a new tag, optionally scoped to a project.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::body("name", ParamType::String, "Tag name").required(),
                Param::body(
                    "color",
                    ParamType::String,
                    "Tag color in hex format (e.g., #667085)",
                ),
                Param::body(
                    "project_id",
                    ParamType::String,
                    "Project ID to associate the tag with (optional)",
                ),
            ]),
            Endpoint::post("/{team_id}/tags"),
        ),
        ToolDef::placeholder(
            "add_tags_to_card",
            "Adds several tags to a card at once.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID (from get_my_account tool)"),
                Param::path("card_id", "Card ID to add tags to"),
                Param::body(
                    "tag_ids",
                    ParamType::StringArray,
                    "Array of tag IDs to add to the card",
                )
                .required(),
            ]),
        ),
    ]
}
