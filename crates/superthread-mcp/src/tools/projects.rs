use superthread_pipeline::ResponseFilter;

use super::{Endpoint, ToolDef};
use crate::schema::{Param, Schema};

pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::rest(
            "list_projects",
            "Lists the projects (epics) of a team.",
            Schema::new(vec![Param::path(
                "team_id",
                "The ID of the team to list projects for. Use the get_me tool to get available team IDs.",
            )]),
            Endpoint::get("/{team_id}/epics").filtered(ResponseFilter::Generic),
        ),
        ToolDef::rest(
            "get_project",
            "Fetches a single project (epic) by its ID.",
            Schema::new(vec![Param::path(
                "project_id",
                "The ID of the project to retrieve.",
            )]),
            Endpoint::get("/epics/{project_id}"),
        ),
    ]
}
