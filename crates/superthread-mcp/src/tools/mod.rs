//! Tool catalog.
//!
//! Every tool is a [`ToolDef`]: a name, a [`Schema`] that both validates
//! arguments and renders the advertised input schema, and a [`ToolState`]
//! saying how a call is carried out. Most tools are a single declarative
//! [`Endpoint`]; the few that need several upstream calls are a
//! [`CustomTool`].

mod boards;
mod cards;
mod checklists;
mod comments;
mod lists;
mod lookup;
mod notes;
mod pages;
mod projects;
mod search;
mod spaces;
mod tags;
mod users;

use std::collections::HashSet;

use serde_json::{json, Map, Value};
use superthread_core::{ApiClient, ApiRequest, HttpMethod, Result};
use superthread_pipeline::{size_reduction, ResponseFilter};

use crate::protocol::ToolDefinition;
use crate::schema::{Arguments, Location, Schema};

/// A registered tool.
#[derive(Debug, Clone)]
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub schema: Schema,
    pub state: ToolState,
}

impl ToolDef {
    pub fn rest(
        name: &'static str,
        description: &'static str,
        schema: Schema,
        endpoint: Endpoint,
    ) -> Self {
        Self {
            name,
            description,
            schema,
            state: ToolState::Implemented(Route::Rest(endpoint)),
        }
    }

    pub fn custom(
        name: &'static str,
        description: &'static str,
        schema: Schema,
        tool: CustomTool,
    ) -> Self {
        Self {
            name,
            description,
            schema,
            state: ToolState::Implemented(Route::Custom(tool)),
        }
    }

    /// Advertised but not wired to the API yet.
    pub fn placeholder(name: &'static str, description: &'static str, schema: Schema) -> Self {
        Self {
            name,
            description,
            schema,
            state: ToolState::NotImplemented,
        }
    }

    pub fn is_implemented(&self) -> bool {
        matches!(self.state, ToolState::Implemented(_))
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.schema.to_json_schema(),
        }
    }

    /// Run the tool with already validated arguments.
    pub async fn run(&self, client: &dyn ApiClient, args: &Arguments, token: &str) -> Result<Value> {
        match &self.state {
            ToolState::NotImplemented => Ok(json!({
                "error": "Not implemented",
                "message": format!(
                    "{} function is a placeholder and not yet implemented",
                    self.name
                ),
                "requested_args": args.as_map(),
            })),
            ToolState::Implemented(Route::Rest(endpoint)) => {
                let request = endpoint.request(&self.schema, args)?;
                let response = client.request(request, token).await?;
                endpoint.shape(self.name, args, response)
            }
            ToolState::Implemented(Route::Custom(tool)) => tool.run(client, args, token).await,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ToolState {
    Implemented(Route),
    NotImplemented,
}

#[derive(Debug, Clone)]
pub enum Route {
    Rest(Endpoint),
    Custom(CustomTool),
}

/// Tools that take more than one upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomTool {
    /// Search every team for boards, then fetch and filter each match.
    GetBoard,
    /// Search every team for cards, then fetch each match.
    SearchCards,
    /// Check the caller's team role before creating a board.
    CreateBoard,
}

impl CustomTool {
    async fn run(&self, client: &dyn ApiClient, args: &Arguments, token: &str) -> Result<Value> {
        match self {
            CustomTool::GetBoard => {
                lookup::find_boards(client, args.require_str("query")?, token).await
            }
            CustomTool::SearchCards => {
                lookup::find_cards(client, args.require_str("query")?, token).await
            }
            CustomTool::CreateBoard => boards::create_board(client, args, token).await,
        }
    }
}

/// How the request body is assembled from body-located params.
#[derive(Debug, Clone, Copy)]
pub enum BodyMode {
    Params,
    /// Body params passed through an adapter.
    Adapted(fn(Map<String, Value>) -> Map<String, Value>),
    /// Constant body, params ignored.
    Fixed(fn() -> Value),
}

/// What the tool returns for the upstream response.
#[derive(Debug, Clone, Copy)]
pub enum ResponseMode {
    Raw,
    Filter(ResponseFilter),
    /// `{"success": true}` regardless of the response.
    Success,
    /// `{"success": true, "message": "<label> <id> deleted"}`.
    Deleted {
        label: &'static str,
        id_param: &'static str,
    },
}

/// A single REST call described declaratively.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub method: HttpMethod,
    /// Path template with `{param}` placeholders.
    pub path: &'static str,
    pub body: BodyMode,
    pub response: ResponseMode,
}

impl Endpoint {
    pub fn new(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            path,
            body: BodyMode::Params,
            response: ResponseMode::Raw,
        }
    }

    pub fn get(path: &'static str) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: &'static str) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: &'static str) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: &'static str) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: &'static str) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn adapted(mut self, adapter: fn(Map<String, Value>) -> Map<String, Value>) -> Self {
        self.body = BodyMode::Adapted(adapter);
        self
    }

    pub fn fixed_body(mut self, body: fn() -> Value) -> Self {
        self.body = BodyMode::Fixed(body);
        self
    }

    pub fn filtered(mut self, filter: ResponseFilter) -> Self {
        self.response = ResponseMode::Filter(filter);
        self
    }

    pub fn success_only(mut self) -> Self {
        self.response = ResponseMode::Success;
        self
    }

    pub fn deleted(mut self, label: &'static str, id_param: &'static str) -> Self {
        self.response = ResponseMode::Deleted { label, id_param };
        self
    }

    /// Build the upstream request from validated arguments.
    pub fn request(&self, schema: &Schema, args: &Arguments) -> Result<ApiRequest> {
        let mut path = self.path.to_string();
        let mut query = Vec::new();
        let mut body = Map::new();

        for param in &schema.params {
            let Some(value) = args.get(param.name) else {
                continue;
            };

            if matches!(param.location, Location::Path | Location::PathAndBody) {
                let segment = args.require_str(param.name)?;
                path = path.replace(
                    &format!("{{{}}}", param.name),
                    &urlencoding::encode(segment),
                );
            }
            if param.location == Location::Query {
                query.push(format!(
                    "{}={}",
                    param.wire(),
                    urlencoding::encode(&query_value(value))
                ));
            }
            if param.in_body() {
                body.insert(param.wire().to_string(), value.clone());
            }
        }

        if !query.is_empty() {
            path.push('?');
            path.push_str(&query.join("&"));
        }

        let body = match self.body {
            BodyMode::Params => body,
            BodyMode::Adapted(adapter) => adapter(body),
            BodyMode::Fixed(fixed) => match fixed() {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        };

        let mut request = ApiRequest::new(self.method, path);
        if !body.is_empty() || matches!(self.method, HttpMethod::Post | HttpMethod::Patch) {
            request = request.with_body(Value::Object(body));
        }
        Ok(request)
    }

    /// Turn the upstream response into the tool result.
    pub fn shape(&self, tool: &str, args: &Arguments, response: Option<Value>) -> Result<Value> {
        match self.response {
            ResponseMode::Success => Ok(json!({ "success": true })),
            ResponseMode::Deleted { label, id_param } => Ok(json!({
                "success": true,
                "message": format!("{} {} deleted", label, args.str(id_param).unwrap_or_default()),
            })),
            ResponseMode::Raw => Ok(response.unwrap_or_else(no_content)),
            ResponseMode::Filter(filter) => {
                let Some(raw) = response else {
                    return Ok(no_content());
                };
                let filtered = filter.apply(raw.clone())?;
                let reduction = size_reduction(&raw, &filtered);
                tracing::debug!(
                    tool,
                    filter = filter.name(),
                    original_size = reduction.original_size,
                    filtered_size = reduction.filtered_size,
                    reduction_percent = reduction.reduction_percent,
                    "response_filtered"
                );
                Ok(filtered)
            }
        }
    }
}

/// Result reported for an empty (204) upstream response.
pub fn no_content() -> Value {
    json!({ "success": true })
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Every tool the server exposes, built once at startup.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        let tools = [
            users::tools(),
            cards::tools(),
            boards::tools(),
            lists::tools(),
            projects::tools(),
            spaces::tools(),
            tags::tools(),
            comments::tools(),
            notes::tools(),
            pages::tools(),
            checklists::tools(),
            search::tools(),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self { tools }
    }

    pub fn find(&self, name: &str) -> Option<&ToolDef> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(ToolDef::definition).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDef> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Names registered more than once.
    pub fn duplicates(&self) -> Vec<&'static str> {
        let mut seen = HashSet::new();
        self.tools
            .iter()
            .filter(|t| !seen.insert(t.name))
            .map(|t| t.name)
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Param, ParamType};

    fn args(schema: &Schema, value: Value) -> Arguments {
        schema.validate(Some(&value)).unwrap()
    }

    #[test]
    fn test_registry_catalog() {
        let registry = ToolRegistry::new();

        assert!(registry.duplicates().is_empty());
        assert_eq!(registry.len(), 55);
        for name in [
            "get_me",
            "get_my_account",
            "create_card",
            "search_cards",
            "get_board",
            "create_list",
            "get_project",
            "get_spaces",
            "create_tag",
            "edit_reply",
            "get_notes",
            "archive_page",
            "delete_checklist_item",
            "get_search_results",
        ] {
            assert!(registry.find(name).is_some(), "{} missing", name);
        }
        assert!(registry.find("does_not_exist").is_none());
    }

    #[test]
    fn test_placeholders() {
        let registry = ToolRegistry::new();
        let mut placeholders: Vec<_> = registry
            .iter()
            .filter(|t| !t.is_implemented())
            .map(|t| t.name)
            .collect();
        placeholders.sort_unstable();

        assert_eq!(
            placeholders,
            vec!["add_member_to_space", "add_tags_to_card", "create_space", "update_space"]
        );
    }

    #[test]
    fn test_every_definition_is_an_object_schema() {
        for def in ToolRegistry::new().definitions() {
            assert_eq!(def.input_schema["type"], "object", "{}", def.name);
            assert!(!def.description.is_empty(), "{}", def.name);
        }
    }

    #[test]
    fn test_request_path_query_and_body() {
        let schema = Schema::new(vec![
            Param::path("team_id", "Team"),
            Param::path("board_id", "Board"),
            Param::query("archived", ParamType::Boolean, "Archived"),
            Param::body("title", ParamType::String, "Title"),
        ]);
        let endpoint = Endpoint::patch("/{team_id}/boards/{board_id}");

        let request = endpoint
            .request(
                &schema,
                &args(
                    &schema,
                    json!({"team_id": "t 1", "board_id": "b/1", "archived": true, "title": "Q3"}),
                ),
            )
            .unwrap();

        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.endpoint, "/t%201/boards/b%2F1?archived=true");
        assert_eq!(request.body, Some(json!({"title": "Q3"})));
    }

    #[test]
    fn test_request_omits_empty_body_for_reads() {
        let schema = Schema::new(vec![
            Param::path("team_id", "Team"),
            Param::query("project_id", ParamType::String, "Project"),
        ]);
        let request = Endpoint::get("/{team_id}/tags")
            .request(&schema, &args(&schema, json!({"team_id": "t1"})))
            .unwrap();

        assert_eq!(request.endpoint, "/t1/tags");
        assert_eq!(request.body, None);
    }

    #[test]
    fn test_request_renamed_and_repeated_fields() {
        let schema = Schema::new(vec![
            Param::path("checklist_id", "Checklist").also_in_body(),
            Param::body("tag_id", ParamType::String, "Tag").sent_as("id"),
        ]);
        let request = Endpoint::post("/checklists/{checklist_id}")
            .request(&schema, &args(&schema, json!({"checklist_id": "k1", "tag_id": "g1"})))
            .unwrap();

        assert_eq!(request.endpoint, "/checklists/k1");
        assert_eq!(request.body, Some(json!({"checklist_id": "k1", "id": "g1"})));
    }

    #[test]
    fn test_fixed_body() {
        let schema = Schema::new(vec![Param::path("card_id", "Card")]);
        let request = Endpoint::patch("/cards/{card_id}")
            .fixed_body(|| json!({"archived": true}))
            .request(&schema, &args(&schema, json!({"card_id": "c1"})))
            .unwrap();

        assert_eq!(request.body, Some(json!({"archived": true})));
    }

    #[test]
    fn test_shape_modes() {
        let schema = Schema::new(vec![Param::path("item_id", "Item")]);
        let item = args(&schema, json!({"item_id": "i9"}));

        assert_eq!(
            Endpoint::delete("/x")
                .deleted("Checklist item", "item_id")
                .shape("t", &item, None)
                .unwrap(),
            json!({"success": true, "message": "Checklist item i9 deleted"})
        );
        assert_eq!(
            Endpoint::delete("/x").success_only().shape("t", &item, Some(json!({"id": 1}))).unwrap(),
            json!({"success": true})
        );
        assert_eq!(
            Endpoint::get("/x").shape("t", &item, None).unwrap(),
            json!({"success": true})
        );
        assert_eq!(
            Endpoint::get("/x")
                .filtered(ResponseFilter::Generic)
                .shape("t", &item, Some(json!({"id": "c1", "members": []})))
                .unwrap(),
            json!({"id": "c1"})
        );
    }
}
