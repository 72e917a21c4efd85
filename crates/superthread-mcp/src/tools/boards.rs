use serde_json::Value;
use superthread_core::{ApiClient, ApiRequest, Error, Result};
use superthread_pipeline::ResponseFilter;

use super::{lookup, no_content, CustomTool, Endpoint, ToolDef};
use crate::schema::{Arguments, Param, ParamType, Schema};

pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::custom(
            "create_board",
            "Creates a new board in a project. You must be an admin or owner of the team.",
            Schema::new(vec![
                Param::path(
                    "team_id",
                    "The ID of the team to create the board in. Use `get_me` to find available team IDs.",
                ),
                Param::body(
                    "project_id",
                    ParamType::String,
                    "The ID of the project to associate the board with.",
                )
                .required(),
                Param::body("title", ParamType::String, "The title of the board.").required(),
                Param::body(
                    "content",
                    ParamType::String,
                    "The description or content for the board.",
                ),
                Param::body("icon", ParamType::String, "An icon to represent the board."),
                Param::body("color", ParamType::String, "A color to associate with the board."),
                Param::body(
                    "layout",
                    ParamType::String,
                    "The layout of the board, defaults to \"board\".",
                )
                .with_default("board"),
            ]),
            CustomTool::CreateBoard,
        ),
        ToolDef::rest(
            "update_board",
            "Updates a board's title, description, project, icon, color or archived state.",
            Schema::new(vec![
                Param::path("team_id", "The ID of the team containing the board."),
                Param::path("board_id", "The ID of the board to update."),
                Param::body(
                    "project_id",
                    ParamType::String,
                    "The new project ID to associate the board with.",
                ),
                Param::body("title", ParamType::String, "The new title for the board."),
                Param::body(
                    "content",
                    ParamType::String,
                    "The new description or content for the board.",
                ),
                Param::body("icon", ParamType::String, "The new icon for the board."),
                Param::body("color", ParamType::String, "The new color for the board."),
                Param::body("archived", ParamType::Boolean, "Whether to archive the board."),
            ])
            .require_update(),
            Endpoint::patch("/{team_id}/boards/{board_id}"),
        ),
        ToolDef::rest(
            "get_boards",
            "Lists boards in a team filtered by project, bookmark or archived state.",
            Schema::new(vec![
                Param::path("team_id", "The ID of the team to list boards from."),
                Param::query(
                    "project_id",
                    ParamType::String,
                    "Filter boards by a specific project ID.",
                ),
                Param::query("bookmarked", ParamType::Boolean, "Filter for bookmarked boards."),
                Param::query("archived", ParamType::Boolean, "Filter for archived boards."),
            ])
            .at_least_one_of(
                &["project_id", "bookmarked", "archived"],
                "At least one of `project_id`, `bookmarked`, or `archived` must be provided.",
            ),
            Endpoint::get("/{team_id}/boards").filtered(ResponseFilter::Generic),
        ),
        ToolDef::custom(
            "get_board",
            "Finds boards by title or ID across all your teams and returns their lists and cards.",
            Schema::new(vec![Param::body(
                "query",
                ParamType::String,
                "The title or ID of the board to search for.",
            )
            .required()]),
            CustomTool::GetBoard,
        ),
        ToolDef::rest(
            "delete_board",
            "Permanently deletes a board.",
            Schema::new(vec![
                Param::path("team_id", "The ID of the team containing the board."),
                Param::path("board_id", "The ID of the board to delete."),
            ]),
            Endpoint::delete("/{team_id}/boards/{board_id}").success_only(),
        ),
        ToolDef::rest(
            "duplicate_board",
            "Duplicates a board with its lists, optionally under a new title or project.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("board_id", "Board ID to duplicate"),
                Param::body("title", ParamType::String, "Title for duplicated board"),
                Param::body("project_id", ParamType::String, "Project ID for duplicated board"),
            ]),
            Endpoint::post("/{team_id}/boards/{board_id}/duplicate"),
        ),
    ]
}

/// Create a board after checking the caller is an admin or owner of the team.
pub(super) async fn create_board(
    client: &dyn ApiClient,
    args: &Arguments,
    token: &str,
) -> Result<Value> {
    let team_id = args.require_str("team_id")?;

    let teams = lookup::account_teams(client, token).await?;
    let team = teams
        .iter()
        .find(|t| t.get("id").and_then(Value::as_str) == Some(team_id))
        .ok_or_else(|| {
            Error::Permission(format!(
                "Team with ID \"{}\" not found or you don't have access.",
                team_id
            ))
        })?;

    let role = team.get("role").and_then(Value::as_str).unwrap_or_default();
    if role != "admin" && role != "owner" {
        let name = team.get("name").and_then(Value::as_str).unwrap_or(team_id);
        return Err(Error::Permission(format!(
            "You must be an admin or owner to create a board in the \"{}\" team.",
            name
        )));
    }

    let mut payload = args.as_map().clone();
    payload.remove("team_id");

    let endpoint = format!("/{}/boards", urlencoding::encode(team_id));
    tracing::debug!(team_id, role, "creating board");

    let response = client
        .request(ApiRequest::post(endpoint, Value::Object(payload)), token)
        .await?;
    Ok(response.unwrap_or_else(no_content))
}
