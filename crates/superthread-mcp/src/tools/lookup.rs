//! Cross-team lookups for boards and cards by title or id.
//!
//! The account's teams are searched one after another. A match found in
//! several teams is kept once, under the first team that returned it, and
//! the details of all matches are then fetched concurrently.

use std::collections::HashSet;

use futures::future::try_join_all;
use serde_json::Value;
use superthread_core::{ApiClient, ApiRequest, Error, Result};
use superthread_pipeline::{filter_board, filter_generic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Boards,
    Cards,
}

impl Kind {
    fn plural(&self) -> &'static str {
        match self {
            Kind::Boards => "boards",
            Kind::Cards => "cards",
        }
    }

    fn singular(&self) -> &'static str {
        match self {
            Kind::Boards => "board",
            Kind::Cards => "card",
        }
    }
}

/// Teams of the authenticated account; accepts a `user` wrapper.
pub(super) async fn account_teams(client: &dyn ApiClient, token: &str) -> Result<Vec<Value>> {
    let account = client
        .request(ApiRequest::get("/users/me"), token)
        .await?
        .unwrap_or(Value::Null);
    let user = account.get("user").unwrap_or(&account);

    Ok(user
        .get("teams")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default())
}

/// Boards matching `query`, each reduced by the board filter.
pub(super) async fn find_boards(client: &dyn ApiClient, query: &str, token: &str) -> Result<Value> {
    let details = lookup(client, Kind::Boards, query, token).await?;

    let boards = details
        .iter()
        .map(|detail| {
            let filtered = filter_board(detail)?;
            Ok(serde_json::to_value(filtered.board)?)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Value::Array(boards))
}

/// Cards matching `query`, stripped of heavy fields.
pub(super) async fn find_cards(client: &dyn ApiClient, query: &str, token: &str) -> Result<Value> {
    let details = lookup(client, Kind::Cards, query, token).await?;
    Ok(Value::Array(details.into_iter().map(filter_generic).collect()))
}

async fn lookup(client: &dyn ApiClient, kind: Kind, query: &str, token: &str) -> Result<Vec<Value>> {
    let teams = account_teams(client, token).await?;

    let mut seen = HashSet::new();
    let mut matches = Vec::new();

    for team_id in teams.iter().filter_map(|t| t.get("id").and_then(Value::as_str)) {
        let endpoint = format!(
            "/{}/search?query={}&types={}",
            urlencoding::encode(team_id),
            urlencoding::encode(query),
            kind.plural()
        );
        let results = client
            .request(ApiRequest::get(endpoint), token)
            .await?
            .unwrap_or(Value::Null);

        let hits = results
            .get(kind.plural())
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for id in hits.iter().filter_map(|hit| hit.get("id").and_then(Value::as_str)) {
            if seen.insert(id.to_string()) {
                matches.push((team_id.to_string(), id.to_string()));
            }
        }
    }

    tracing::debug!(
        kind = kind.plural(),
        query,
        teams = teams.len(),
        matches = matches.len(),
        "lookup_search_done"
    );

    if matches.is_empty() {
        return Err(Error::NoResults(format!(
            "No {} found matching query: \"{}\"",
            kind.plural(),
            query
        )));
    }

    try_join_all(matches.iter().map(|(team_id, id)| async move {
        let endpoint = format!(
            "/{}/{}/{}",
            urlencoding::encode(team_id),
            kind.plural(),
            urlencoding::encode(id)
        );
        let response = client
            .request(ApiRequest::get(endpoint), token)
            .await?
            .unwrap_or(Value::Null);

        Ok::<_, Error>(match response.get(kind.singular()) {
            Some(inner) if !inner.is_null() => inner.clone(),
            _ => response,
        })
    }))
    .await
}
