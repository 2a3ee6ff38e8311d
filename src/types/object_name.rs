use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::Serialize;

use crate::errors::PipelineError;

/// Fully-qualified `schema.name` identifier of a database object.
///
/// Input may use bracket (`[dbo].[Orders]`) or double-quote (`"dbo"."Orders"`)
/// delimiters; both are stripped. Two names are equal when their lowercase
/// unquoted forms match, which is also how they hash and sort.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectName {
    schema: String,
    name: String,
}

impl ObjectName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: unquote(schema.into().trim()),
            name: unquote(name.into().trim()),
        }
    }

    pub fn parse(input: &str) -> Result<Self, PipelineError> {
        let invalid = |reason: &str| PipelineError::InvalidObjectName {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let parts = split_parts(input).map_err(|reason| invalid(reason))?;

        match parts.as_slice() {
            [_] => Err(invalid("a schema qualifier is required (schema.name)")),
            [schema, name] => {
                if schema.is_empty() || name.is_empty() {
                    Err(invalid("schema and name must not be empty"))
                } else {
                    Ok(Self {
                        schema: schema.clone(),
                        name: name.clone(),
                    })
                }
            }
            _ => Err(invalid("expected exactly two parts (schema.name)")),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-folded `schema.name`, used for comparisons and file matching.
    pub fn key(&self) -> String {
        format!("{}.{}", self.schema, self.name).to_lowercase()
    }

    /// Bracket-delimited form accepted by the scripting tool.
    pub fn quoted(&self) -> String {
        format!(
            "[{}].[{}]",
            self.schema.replace(']', "]]"),
            self.name.replace(']', "]]")
        )
    }
}

fn unquote(part: &str) -> String {
    if part.len() >= 2 {
        if part.starts_with('[') && part.ends_with(']') {
            return part[1..part.len() - 1].replace("]]", "]");
        }
        if part.starts_with('"') && part.ends_with('"') {
            return part[1..part.len() - 1].replace("\"\"", "\"");
        }
    }
    part.to_string()
}

/// Splits on dots that are not inside a delimited identifier.
fn split_parts(input: &str) -> Result<Vec<String>, &'static str> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = input.trim().chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '[' | '"' => {
                let close = if ch == '[' { ']' } else { '"' };
                let mut closed = false;
                while let Some(inner) = chars.next() {
                    if inner == close {
                        if chars.peek() == Some(&close) {
                            current.push(close);
                            chars.next();
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    current.push(inner);
                }
                if !closed {
                    return Err("unterminated delimited identifier");
                }
            }
            '.' => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    parts.push(current.trim().to_string());

    Ok(parts)
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

impl FromStr for ObjectName {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for ObjectName {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ObjectName {}

impl Hash for ObjectName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for ObjectName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ObjectName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
