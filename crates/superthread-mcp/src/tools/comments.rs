use super::{Endpoint, ToolDef};
use crate::schema::{Param, ParamType, Schema};

pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::rest(
            "create_comment",
            "Adds a comment to a card or a page.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID (from get_my_account tool)"),
                Param::body("card_id", ParamType::String, "Card ID to comment on"),
                Param::body("page_id", ParamType::String, "Page ID to comment on"),
                Param::body("content", ParamType::String, "Comment content/text").required(),
            ])
            .at_least_one_of(
                &["card_id", "page_id"],
                "Either card_id or page_id must be provided.",
            ),
            Endpoint::post("/{team_id}/comments"),
        ),
        ToolDef::rest(
            "edit_comment",
            "Replaces the content of a comment.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("comment_id", "Comment ID to edit"),
                Param::body("content", ParamType::String, "Updated comment content").required(),
            ]),
            Endpoint::patch("/{team_id}/comments/{comment_id}"),
        ),
        ToolDef::rest(
            "get_comment",
            "Fetches a single comment.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("comment_id", "Comment ID to retrieve"),
            ]),
            Endpoint::get("/{team_id}/comments/{comment_id}"),
        ),
        ToolDef::rest(
            "get_all_replies_to_comment",
            "Lists every reply in a comment thread.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("comment_id", "Comment ID to get replies for"),
            ]),
            Endpoint::get("/{team_id}/comments/{comment_id}/replies"),
        ),
        ToolDef::rest(
            "reply_to_comment",
            "Posts a reply in a comment thread.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("comment_id", "Comment ID to reply to"),
                Param::body("content", ParamType::String, "Reply content/text").required(),
            ]),
            Endpoint::post("/{team_id}/comments/{comment_id}/replies"),
        ),
        ToolDef::rest(
            "edit_reply",
            "Replaces the content of a reply.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("reply_id", "Reply ID to edit"),
                Param::body("content", ParamType::String, "Updated reply content").required(),
            ]),
            Endpoint::patch("/{team_id}/replies/{reply_id}"),
        ),
    ]
}
