use superthread_pipeline::ResponseFilter;

use super::{Endpoint, ToolDef};
use crate::schema::{Param, ParamType, Schema};

const PRIVACY: &[&str] = &["public", "private"];
const SPACE_ROLES: &[&str] = &["admin", "member", "viewer"];

pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::placeholder(
            "create_space",
            "Creates a new space in a team.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID (from get_my_account tool)"),
                Param::body("name", ParamType::String, "Space name").required(),
                Param::body("description", ParamType::String, "Space description"),
                Param::body("privacy", ParamType::Enum(PRIVACY), "Space privacy setting"),
            ]),
        ),
        ToolDef::placeholder(
            "update_space",
            "Updates a space's name, description or privacy.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("space_id", "Space ID to update"),
                Param::body("name", ParamType::String, "Updated space name"),
                Param::body("description", ParamType::String, "Updated space description"),
                Param::body("privacy", ParamType::Enum(PRIVACY), "Updated privacy setting"),
            ]),
        ),
        ToolDef::rest(
            "get_space",
            "Fetches a space with the titles and IDs of its boards.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("space_id", "Space ID to retrieve"),
            ]),
            Endpoint::get("/{team_id}/projects/{space_id}").filtered(ResponseFilter::Space),
        ),
        ToolDef::rest(
            "get_spaces",
            "Lists the spaces of a team with the titles and IDs of their boards.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::query(
                    "cursor",
                    ParamType::String,
                    "Pagination cursor for large result sets",
                ),
            ]),
            Endpoint::get("/{team_id}/projects").filtered(ResponseFilter::Spaces),
        ),
        ToolDef::placeholder(
            "add_member_to_space",
            "Adds a user to a space.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("space_id", "Space ID to add member to"),
                Param::body("user_id", ParamType::String, "User ID to add to the space").required(),
                Param::body("role", ParamType::Enum(SPACE_ROLES), "Member role in the space"),
            ]),
        ),
    ]
}
