use super::{Endpoint, ToolDef};
use crate::schema::{Param, ParamType, Schema};

const BEHAVIORS: &[&str] = &["backlog", "active", "done", "custom"];

pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::rest(
            "create_list",
            "Creates a new list (column) on a board.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID (from get_my_account tool)"),
                Param::path("board_id", "Board ID where the list will be created"),
                Param::body("title", ParamType::String, "List title/name").required(),
                Param::body("behavior", ParamType::Enum(BEHAVIORS), "List behavior type"),
                Param::body("color", ParamType::String, "List color (hex code or color name)"),
                Param::body("position", ParamType::Number, "Position/order of the list in the board"),
            ]),
            Endpoint::post("/{team_id}/boards/{board_id}/lists"),
        ),
        ToolDef::rest(
            "update_list",
            "Updates a list's title, behavior, color or position.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("list_id", "List ID to update"),
                Param::body("title", ParamType::String, "Updated list title"),
                Param::body("behavior", ParamType::Enum(BEHAVIORS), "Updated list behavior"),
                Param::body("color", ParamType::String, "Updated list color"),
                Param::body("position", ParamType::Number, "Updated position/order in the board"),
            ])
            .require_update(),
            Endpoint::patch("/{team_id}/lists/{list_id}"),
        ),
    ]
}
