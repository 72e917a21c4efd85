//! Static prompt templates served through `prompts/list` and `prompts/get`.

use std::collections::HashMap;

use superthread_core::{Error, Result};

use crate::protocol::{
    PromptArgument, PromptDefinition, PromptGetResult, PromptMessage, ToolResultContent,
};

/// Rendered in place of an optional argument the caller left out.
const MISSING: &str = "(none)";

struct Arg {
    name: &'static str,
    description: &'static str,
    required: bool,
}

struct Template {
    name: &'static str,
    description: &'static str,
    arguments: &'static [Arg],
    text: &'static str,
}

const TEMPLATES: &[Template] = &[
    Template {
        name: "summarize_board",
        description: "Summarize the state of a board: what is in progress, blocked and done.",
        arguments: &[Arg {
            name: "board_query",
            description: "Title or ID of the board",
            required: true,
        }],
        text: "Use the get_board tool with query \"{board_query}\". For each list on the board, \
               summarize how many cards it holds and call out cards that look blocked or overdue. \
               Finish with a short overall status of the board.",
    },
    Template {
        name: "create_task",
        description: "Create a card for a task on the right board and list.",
        arguments: &[
            Arg {
                name: "title",
                description: "Title of the task",
                required: true,
            },
            Arg {
                name: "board_query",
                description: "Title or ID of the board to put the task on",
                required: true,
            },
            Arg {
                name: "details",
                description: "Extra description for the card",
                required: false,
            },
        ],
        text: "Find the board matching \"{board_query}\" with get_board, pick its backlog list \
               (or the first list if there is none) and create a card titled \"{title}\" with \
               create_card. Card description: {details}",
    },
    Template {
        name: "triage_my_cards",
        description: "Review the cards assigned to you in a team and suggest priorities.",
        arguments: &[Arg {
            name: "team_id",
            description: "Team/workspace ID",
            required: true,
        }],
        text: "Call get_my_account to learn your user ID, then get_cards_assigned_to_user for \
               team {team_id}. Group the cards by status and suggest which three to work on next, \
               with one sentence of reasoning each.",
    },
];

/// Prompt catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prompts;

impl Prompts {
    pub fn list(&self) -> Vec<PromptDefinition> {
        TEMPLATES
            .iter()
            .map(|t| PromptDefinition {
                name: t.name.to_string(),
                description: t.description.to_string(),
                arguments: t
                    .arguments
                    .iter()
                    .map(|a| PromptArgument {
                        name: a.name.to_string(),
                        description: a.description.to_string(),
                        required: a.required,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Render a prompt with `{argument}` placeholders filled in.
    pub fn get(&self, name: &str, arguments: &HashMap<String, String>) -> Result<PromptGetResult> {
        let template = TEMPLATES
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::Validation(format!("Unknown prompt: {}", name)))?;

        let mut values = HashMap::new();
        for arg in template.arguments {
            let value = match arguments.get(arg.name) {
                Some(value) => value.as_str(),
                None if arg.required => {
                    return Err(Error::Validation(format!(
                        "Missing required argument '{}' for prompt {}",
                        arg.name, name
                    )))
                }
                None => MISSING,
            };
            values.insert(arg.name, value);
        }
        let text = render(template.text, &values);

        Ok(PromptGetResult {
            description: template.description.to_string(),
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: ToolResultContent::Text { text },
            }],
        })
    }
}

/// Fill `{name}` placeholders in one pass. Substituted values are never
/// rescanned, and braces that do not name an argument are kept as written.
fn render(template: &str, values: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}').and_then(|close| {
            values.get(&after[..close]).map(|value| (close, *value))
        }) {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
