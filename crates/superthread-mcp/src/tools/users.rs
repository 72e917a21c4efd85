use superthread_pipeline::ResponseFilter;

use super::{Endpoint, ToolDef};
use crate::schema::{Param, ParamType, Schema};

pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::rest(
            "get_me",
            "Fetches the profile information for the currently authenticated user, including the teams they belong to.",
            Schema::empty(),
            Endpoint::get("/users/me"),
        ),
        ToolDef::rest(
            "get_my_account",
            "Returns the current user's id with their primary team id, team name and role. Use this first to find the team_id other tools need.",
            Schema::empty(),
            Endpoint::get("/users/me").filtered(ResponseFilter::Account),
        ),
        ToolDef::rest(
            "update_me",
            "Updates the profile information for the currently authenticated user. At least one field must be provided.",
            Schema::new(vec![
                Param::body("first_name", ParamType::String, "The user's first name."),
                Param::body("last_name", ParamType::String, "The user's last name."),
                Param::body("display_name", ParamType::String, "The user's display name."),
                Param::body("profile_image", ParamType::Url, "URL for the user's profile image."),
                Param::body("thumbnail_image", ParamType::Url, "URL for the user's thumbnail image."),
                Param::body(
                    "color",
                    ParamType::String,
                    "A color associated with the user (e.g., 'red', '#FF0000').",
                ),
                Param::body(
                    "timezone_id",
                    ParamType::String,
                    "The user's timezone identifier (e.g., 'America/Los_Angeles').",
                ),
                Param::body(
                    "autodetect_timezone_id",
                    ParamType::Boolean,
                    "Whether to automatically detect the user's timezone.",
                ),
                Param::body("locale", ParamType::String, "The user's preferred locale (e.g., 'en')."),
                Param::body("job_description", ParamType::String, "The user's job description."),
            ])
            .require_update(),
            Endpoint::patch("/users/me"),
        ),
        ToolDef::rest(
            "get_team_members",
            "Fetches the list of members for a specified team.",
            Schema::new(vec![Param::path(
                "team_id",
                "The ID of the team to get members from. Use the get_me tool to find your team IDs.",
            )]),
            Endpoint::get("/teams/{team_id}/members"),
        ),
    ]
}
