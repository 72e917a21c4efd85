use super::{Endpoint, ToolDef};
use crate::schema::{Param, ParamType, Schema};

pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::rest(
            "create_checklist",
            "Adds a checklist to a card.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID to add checklist to"),
                Param::body("title", ParamType::String, "Checklist title").required(),
            ]),
            Endpoint::post("/{team_id}/cards/{card_id}/checklists"),
        ),
        ToolDef::rest(
            "update_checklist",
            "Renames a checklist.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID containing the checklist").also_in_body(),
                Param::path("checklist_id", "Checklist ID to update"),
                Param::body("title", ParamType::String, "New checklist title").required(),
            ]),
            Endpoint::patch("/{team_id}/cards/{card_id}/checklists/{checklist_id}"),
        ),
        ToolDef::rest(
            "delete_checklist",
            "Deletes a checklist and all of its items.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID containing the checklist"),
                Param::path("checklist_id", "Checklist ID to delete"),
            ]),
            Endpoint::delete("/{team_id}/cards/{card_id}/checklists/{checklist_id}")
                .deleted("Checklist", "checklist_id"),
        ),
        ToolDef::rest(
            "add_checklist_item",
            "Adds an item to a checklist.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID containing the checklist"),
                Param::path("checklist_id", "Checklist ID to add item to").also_in_body(),
                Param::body("title", ParamType::String, "Checklist item title").required(),
            ]),
            Endpoint::post("/{team_id}/cards/{card_id}/checklists/{checklist_id}/items"),
        ),
        ToolDef::rest(
            "update_checklist_item",
            "Renames a checklist item or toggles its checked state.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID containing the checklist"),
                Param::path("checklist_id", "Checklist ID containing the item"),
                Param::path("item_id", "Checklist item ID to update"),
                Param::body("title", ParamType::String, "New title for the checklist item"),
                Param::body("checked", ParamType::Boolean, "Check/uncheck the item"),
            ])
            .require_update(),
            Endpoint::patch(
                "/{team_id}/cards/{card_id}/checklists/{checklist_id}/items/{item_id}",
            ),
        ),
        ToolDef::rest(
            "delete_checklist_item",
            "Deletes a checklist item.",
            Schema::new(vec![
                Param::path("team_id", "Team/workspace ID"),
                Param::path("card_id", "Card ID containing the checklist"),
                Param::path("checklist_id", "Checklist ID containing the item"),
                Param::path("item_id", "Checklist item ID to delete"),
            ]),
            Endpoint::delete(
                "/{team_id}/cards/{card_id}/checklists/{checklist_id}/items/{item_id}",
            )
            .deleted("Checklist item", "item_id"),
        ),
    ]
}
