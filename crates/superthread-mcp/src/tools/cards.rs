use serde_json::json;
use superthread_pipeline::ResponseFilter;

use super::{CustomTool, Endpoint, ToolDef};
use crate::adapters::card_payload;
use crate::schema::{Param, ParamType, Schema};

const TEAM: &str = "Team/workspace ID. Use get_my_account to find it.";
const RELATIONS: &[&str] = &["blocks", "blocked_by", "relates_to"];
const MEMBER_ROLES: &[&str] = &["member", "admin", "viewer"];

pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::rest(
            "create_card",
            "Creates a new card in a specified team, project, and list. Either board_id or sprint_id must be provided.",
            Schema::new(vec![
                Param::path("team_id", TEAM),
                Param::body("title", ParamType::String, "Card title").required(),
                Param::body("list_id", ParamType::String, "List ID where the card will be placed")
                    .required(),
                Param::body("project_id", ParamType::String, "Project ID the card belongs to")
                    .required(),
                Param::body(
                    "board_id",
                    ParamType::String,
                    "Board ID (required if sprint_id not provided). Use get_board to find it from a board name.",
                ),
                Param::body(
                    "sprint_id",
                    ParamType::String,
                    "Sprint ID (required if board_id not provided)",
                ),
                Param::body("content", ParamType::String, "Card description"),
                Param::body("owner_id", ParamType::String, "Owner user ID"),
                Param::body("priority", ParamType::Number, "Priority level (numeric)"),
                Param::body("estimate", ParamType::Number, "Estimate in story points"),
                Param::body("start_date", ParamType::Number, "Start date as Unix timestamp"),
                Param::body("due_date", ParamType::Number, "Due date as Unix timestamp"),
                Param::body("parent_card_id", ParamType::String, "Parent card ID"),
                Param::body("epic_id", ParamType::String, "Epic ID"),
                Param::body(
                    "tag_ids",
                    ParamType::StringArray,
                    "Array of tag IDs to add to the card",
                ),
                Param::body(
                    "tag_names",
                    ParamType::StringArray,
                    "Array of tag names to add to the card",
                ),
            ])
            .at_least_one_of(
                &["board_id", "sprint_id"],
                "Either board_id or sprint_id must be provided.",
            ),
            Endpoint::post("/{team_id}/cards").adapted(card_payload),
        ),
        ToolDef::rest(
            "get_card",
            "Fetches detailed information about a specific card using its ID.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID where the card is located"),
                Param::path("card_id", "The unique identifier for the card"),
            ]),
            Endpoint::get("/{team_id}/cards/{card_id}"),
        ),
        ToolDef::custom(
            "search_cards",
            "Searches every team you belong to for cards matching a title or ID and returns the details of each match.",
            Schema::new(vec![Param::body(
                "query",
                ParamType::String,
                "The title or ID of the card to search for.",
            )
            .required()]),
            CustomTool::SearchCards,
        ),
        ToolDef::rest(
            "update_card",
            "Updates a card's attributes. At least one field to update must be provided.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "The unique identifier for the card to update"),
                Param::body("title", ParamType::String, "New card title"),
                Param::body("board_id", ParamType::String, "New board ID"),
                Param::body(
                    "list_id",
                    ParamType::String,
                    "New list ID. Changing this moves the card to a different list (work status).",
                ),
                Param::body("project_id", ParamType::String, "New project ID"),
                Param::body("sprint_id", ParamType::String, "New sprint ID"),
                Param::body("owner_id", ParamType::String, "New owner user ID"),
                Param::body("start_date", ParamType::Number, "New start date as Unix timestamp"),
                Param::body("due_date", ParamType::Number, "New due date as Unix timestamp"),
                Param::body(
                    "position",
                    ParamType::Number,
                    "New position in list (0-based index). Use with list_id to move the card.",
                ),
                Param::body("priority", ParamType::Number, "New priority level (numeric)"),
                Param::body("estimate", ParamType::Number, "New estimate in story points"),
                Param::body("archived", ParamType::Boolean, "Archive/unarchive the card"),
                Param::body("content", ParamType::String, "New card description"),
                Param::body(
                    "tag_ids",
                    ParamType::StringArray,
                    "Array of tag IDs. Replaces existing tags if provided.",
                ),
                Param::body(
                    "tag_names",
                    ParamType::StringArray,
                    "Array of tag names. Replaces existing tags if provided.",
                ),
            ])
            .require_update(),
            Endpoint::patch("/{team_id}/cards/{card_id}").adapted(card_payload),
        ),
        ToolDef::rest(
            "delete_card",
            "Permanently deletes a card.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID to delete"),
            ]),
            Endpoint::delete("/{team_id}/cards/{card_id}").success_only(),
        ),
        ToolDef::rest(
            "archive_card",
            "Archives a specific card by its ID.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID to archive"),
            ]),
            Endpoint::patch("/{team_id}/cards/{card_id}").fixed_body(|| json!({"archived": true})),
        ),
        ToolDef::rest(
            "get_cards_assigned_to_user",
            "Fetches cards assigned to a specific user, optionally filtered by project.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::body("user_id", ParamType::String, "User ID to get assigned cards for")
                    .required(),
                Param::body("project_id", ParamType::String, "Filter by project ID"),
            ]),
            Endpoint::post("/{team_id}/cards/assigned").filtered(ResponseFilter::Generic),
        ),
        ToolDef::rest(
            "add_related_card",
            "Creates a relationship between two cards (blocks, blocked by, or relates to).",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID to add relation to"),
                Param::body("related_card_id", ParamType::String, "Related card ID").required(),
                Param::body("relation_type", ParamType::Enum(RELATIONS), "Type of relationship")
                    .required(),
            ]),
            Endpoint::post("/{team_id}/cards/{card_id}/related"),
        ),
        ToolDef::rest(
            "add_card_member",
            "Adds a member (assignee) to a card with an optional role. Use this to assign tasks to users.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID to add member to"),
                Param::body("user_id", ParamType::String, "User ID to add as member").required(),
                Param::body(
                    "role",
                    ParamType::Enum(MEMBER_ROLES),
                    "Member role (default: member)",
                )
                .with_default("member"),
            ]),
            Endpoint::post("/{team_id}/cards/{card_id}/members"),
        ),
        ToolDef::rest(
            "remove_card_member",
            "Removes a member (assignee) from a card.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID to remove member from"),
                Param::path("user_id", "User ID to remove"),
            ]),
            Endpoint::delete("/{team_id}/cards/{card_id}/members/{user_id}"),
        ),
        ToolDef::rest(
            "add_card_tag",
            "Adds an existing tag to a card.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID to add tag to"),
                Param::body("tag_id", ParamType::String, "Tag ID to add")
                    .required()
                    .sent_as("id"),
            ]),
            Endpoint::post("/{team_id}/cards/{card_id}/tags"),
        ),
        ToolDef::rest(
            "remove_card_tag",
            "Removes a tag from a card.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID to remove tag from"),
                Param::path("tag_id", "Tag ID to remove"),
            ]),
            Endpoint::delete("/{team_id}/cards/{card_id}/tags/{tag_id}"),
        ),
    ]
}
