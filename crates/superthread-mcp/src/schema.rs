//! Tool input schemas.
//!
//! A [`Schema`] validates `tools/call` arguments and renders the JSON Schema
//! advertised by `tools/list`, so the two can never disagree.

use serde_json::{json, Map, Value};
use superthread_core::{Error, Result};

/// Accepted JSON type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
    StringArray,
    /// Absolute URL string.
    Url,
    /// String restricted to a fixed set of values.
    Enum(&'static [&'static str]),
}

impl ParamType {
    fn describe(&self) -> String {
        match self {
            ParamType::String => "a string".to_string(),
            ParamType::Number => "a number".to_string(),
            ParamType::Integer => "an integer".to_string(),
            ParamType::Boolean => "a boolean".to_string(),
            ParamType::StringArray => "an array of strings".to_string(),
            ParamType::Url => "a valid URL".to_string(),
            ParamType::Enum(values) => format!("one of {}", values.join(", ")),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            ParamType::Url => value
                .as_str()
                .is_some_and(|s| url::Url::parse(s).is_ok()),
            ParamType::Enum(values) => value.as_str().is_some_and(|s| values.contains(&s)),
        }
    }

    fn json_schema(&self) -> Map<String, Value> {
        let mut schema = Map::new();
        match self {
            ParamType::String => {
                schema.insert("type".into(), json!("string"));
            }
            ParamType::Number => {
                schema.insert("type".into(), json!("number"));
            }
            ParamType::Integer => {
                schema.insert("type".into(), json!("integer"));
            }
            ParamType::Boolean => {
                schema.insert("type".into(), json!("boolean"));
            }
            ParamType::StringArray => {
                schema.insert("type".into(), json!("array"));
                schema.insert("items".into(), json!({"type": "string"}));
            }
            ParamType::Url => {
                schema.insert("type".into(), json!("string"));
                schema.insert("format".into(), json!("uri"));
            }
            ParamType::Enum(values) => {
                schema.insert("type".into(), json!("string"));
                schema.insert("enum".into(), json!(values));
            }
        }
        schema
    }
}

/// Where a parameter goes in the upstream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Interpolated into the endpoint path template.
    Path,
    /// Appended to the query string.
    Query,
    /// Sent as a JSON body field.
    Body,
    /// Interpolated into the path and repeated in the body.
    PathAndBody,
}

/// One declared tool parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: &'static str,
    pub ty: ParamType,
    pub required: bool,
    pub description: &'static str,
    pub default: Option<&'static str>,
    pub location: Location,
    /// Field name on the wire when it differs from `name`.
    pub wire_name: Option<&'static str>,
}

impl Param {
    fn new(name: &'static str, ty: ParamType, location: Location, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: false,
            description,
            default: None,
            location,
            wire_name: None,
        }
    }

    /// Required string identifier interpolated into the path.
    pub fn path(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamType::String, Location::Path, description).required()
    }

    /// Optional body field.
    pub fn body(name: &'static str, ty: ParamType, description: &'static str) -> Self {
        Self::new(name, ty, Location::Body, description)
    }

    /// Optional query-string parameter.
    pub fn query(name: &'static str, ty: ParamType, description: &'static str) -> Self {
        Self::new(name, ty, Location::Query, description)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn also_in_body(mut self) -> Self {
        self.location = Location::PathAndBody;
        self
    }

    pub fn sent_as(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    pub fn wire(&self) -> &'static str {
        self.wire_name.unwrap_or(self.name)
    }

    pub fn in_body(&self) -> bool {
        matches!(self.location, Location::Body | Location::PathAndBody)
    }
}

/// Cross-field rule checked after per-field validation.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// At least one of the named fields must be present.
    AtLeastOneOf {
        fields: &'static [&'static str],
        message: &'static str,
    },
    /// At least one body field must be present.
    AnyBodyField { message: &'static str },
}

/// Declared input of a tool.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub params: Vec<Param>,
    pub constraints: Vec<Constraint>,
}

impl Schema {
    pub fn new(params: Vec<Param>) -> Self {
        Self {
            params,
            constraints: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn at_least_one_of(
        mut self,
        fields: &'static [&'static str],
        message: &'static str,
    ) -> Self {
        self.constraints
            .push(Constraint::AtLeastOneOf { fields, message });
        self
    }

    pub fn require_update(mut self) -> Self {
        self.constraints.push(Constraint::AnyBodyField {
            message: "No fields to update were provided.",
        });
        self
    }

    /// Check raw arguments and keep only declared fields, with defaults applied.
    pub fn validate(&self, arguments: Option<&Value>) -> Result<Arguments> {
        let empty = Map::new();
        let raw = match arguments {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(Error::Validation(
                    "Tool arguments must be a JSON object".to_string(),
                ))
            }
        };

        let mut values = Map::new();
        for param in &self.params {
            match raw.get(param.name).filter(|v| !v.is_null()) {
                Some(value) => {
                    if !param.ty.accepts(value) {
                        return Err(Error::Validation(format!(
                            "Invalid parameter '{}': expected {}",
                            param.name,
                            param.ty.describe()
                        )));
                    }
                    values.insert(param.name.to_string(), value.clone());
                }
                None => {
                    if let Some(default) = param.default {
                        values.insert(param.name.to_string(), Value::String(default.to_string()));
                    } else if param.required {
                        return Err(Error::Validation(format!(
                            "Missing required parameter: {}",
                            param.name
                        )));
                    }
                }
            }
        }

        let args = Arguments { values };

        for constraint in &self.constraints {
            match constraint {
                Constraint::AtLeastOneOf { fields, message } => {
                    if !fields.iter().any(|f| args.is_present(f)) {
                        return Err(Error::Validation(message.to_string()));
                    }
                }
                Constraint::AnyBodyField { message } => {
                    let any = self
                        .params
                        .iter()
                        .filter(|p| p.location == Location::Body)
                        .any(|p| args.is_present(p.name));
                    if !any {
                        return Err(Error::Validation(message.to_string()));
                    }
                }
            }
        }

        Ok(args)
    }

    /// JSON Schema advertised in `tools/list`.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.params {
            let mut property = param.ty.json_schema();
            property.insert("description".into(), json!(param.description));
            if let Some(default) = param.default {
                property.insert("default".into(), json!(default));
            }
            properties.insert(param.name.to_string(), Value::Object(property));

            if param.required && param.default.is_none() {
                required.push(param.name);
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }
}

/// Validated tool arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Map<String, Value>,
}

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// String argument that validation already guaranteed.
    pub fn require_str(&self, name: &str) -> Result<&str> {
        self.str(name)
            .ok_or_else(|| Error::Validation(format!("Missing required parameter: {}", name)))
    }

    /// Present means supplied, non-null and not an empty string.
    pub fn is_present(&self, name: &str) -> bool {
        match self.values.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}
