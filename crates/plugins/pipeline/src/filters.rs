//! Resource-specific response filters.
//!
//! Each filter keeps the identifiers, titles and nesting an agent needs to
//! navigate the workspace and drops everything else. All filters accept
//! their own output, so applying one twice is the same as applying it once.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use superthread_core::{Error, Result};

use crate::heavy::strip_heavy_fields;

// =============================================================================
// Filtered shapes
// =============================================================================

/// Minimal account summary for `get_my_account`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredUserAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Value>,
    pub team_name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredSpace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    pub boards: Vec<BoardRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredSpaces {
    pub spaces: Vec<FilteredSpace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpicRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_card: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epic: Option<EpicRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    pub behavior: Value,
    pub cards: Vec<FilteredCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredBoard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    pub lists: Vec<FilteredList>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredBoardResponse {
    pub board: FilteredBoard,
}

// =============================================================================
// Filters
// =============================================================================

/// Reduce a `/users/me` payload to the caller's primary team membership.
pub fn filter_user_account(response: &Value) -> FilteredUserAccount {
    let user = truthy(response.get("user")).unwrap_or(response);
    let primary_team = user
        .get("teams")
        .and_then(Value::as_array)
        .and_then(|teams| teams.first())
        .unwrap_or(&Value::Null);

    FilteredUserAccount {
        user_id: first_of(user, &["id", "user_id"]),
        team_id: truthy(primary_team.get("id"))
            .or_else(|| truthy(user.get("team_id")))
            .cloned(),
        team_name: truthy(primary_team.get("name"))
            .or_else(|| truthy(user.get("team_name")))
            .map(text)
            .unwrap_or_else(|| "Unknown Team".to_string()),
        role: truthy(primary_team.get("role"))
            .or_else(|| truthy(user.get("role")))
            .map(text)
            .unwrap_or_else(|| "member".to_string()),
    }
}

/// Reduce a space listing to ids, titles and board references.
///
/// Accepts `{projects: [...]}`, `{data: [...]}`, `{spaces: [...]}` or a bare array.
pub fn filter_spaces(response: &Value) -> Result<FilteredSpaces> {
    let projects = ["projects", "data", "spaces"]
        .iter()
        .find_map(|key| truthy(response.get(*key)))
        .unwrap_or(response)
        .as_array()
        .ok_or_else(|| Error::InvalidResponse("Invalid spaces response format".to_string()))?;

    Ok(FilteredSpaces {
        spaces: projects.iter().map(summarize_space).collect(),
    })
}

/// Reduce a single space (optionally wrapped in `project` or `space`).
pub fn filter_space(response: &Value) -> Result<FilteredSpace> {
    let space = truthy(response.get("project"))
        .or_else(|| truthy(response.get("space")))
        .unwrap_or(response);

    if !space.is_object() {
        return Err(Error::InvalidResponse(
            "Invalid space response format".to_string(),
        ));
    }

    Ok(summarize_space(space))
}

/// Reduce a board to its lists and the essential fields of each card.
pub fn filter_board(response: &Value) -> Result<FilteredBoardResponse> {
    let board = truthy(response.get("board")).unwrap_or(response);

    if !board.is_object() {
        return Err(Error::InvalidResponse(
            "Invalid board response format".to_string(),
        ));
    }

    let lists = board
        .get("lists")
        .and_then(Value::as_array)
        .map(|lists| lists.iter().map(summarize_list).collect())
        .unwrap_or_default();

    Ok(FilteredBoardResponse {
        board: FilteredBoard {
            id: board.get("id").cloned(),
            title: first_of(board, &["title", "name"]),
            lists,
        },
    })
}

/// Strip heavy fields without reshaping.
pub fn filter_generic(response: Value) -> Value {
    strip_heavy_fields(response)
}

fn summarize_space(project: &Value) -> FilteredSpace {
    FilteredSpace {
        id: project.get("id").cloned(),
        title: first_of(project, &["title", "name"]),
        description: project.get("description").filter(|v| !v.is_null()).cloned(),
        boards: project
            .get("boards")
            .and_then(Value::as_array)
            .map(|boards| {
                boards
                    .iter()
                    .map(|board| BoardRef {
                        id: board.get("id").cloned(),
                        title: first_of(board, &["title", "name"]),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn summarize_list(list: &Value) -> FilteredList {
    FilteredList {
        id: list.get("id").cloned(),
        title: first_of(list, &["title", "name"]),
        behavior: truthy(list.get("behavior"))
            .cloned()
            .unwrap_or_else(|| Value::String("active".to_string())),
        cards: list
            .get("cards")
            .and_then(Value::as_array)
            .map(|cards| cards.iter().map(summarize_card).collect())
            .unwrap_or_default(),
    }
}

fn summarize_card(card: &Value) -> FilteredCard {
    let field = |key: &str| card.get(key).cloned();

    FilteredCard {
        id: field("id"),
        title: field("title"),
        content: field("content"),
        status: field("status"),
        priority: field("priority"),
        estimate: field("estimate"),
        owner_id: field("owner_id"),
        list_id: field("list_id"),
        board_id: field("board_id"),
        project_id: field("project_id"),
        sprint_id: field("sprint_id"),
        archived: field("archived").map(strip_heavy_fields),
        parent_card: field("parent_card").map(strip_heavy_fields),
        epic: truthy(card.get("epic")).map(|epic| EpicRef {
            id: epic.get("id").cloned(),
            title: epic.get("title").cloned(),
        }),
    }
}

/// JavaScript-style truthiness: null, false, 0 and "" count as absent.
fn truthy(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

fn first_of(value: &Value, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .find_map(|key| truthy(value.get(*key)))
        .cloned()
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
