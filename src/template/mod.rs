//! Item templates.
//!
//! A template is plain text with `{{ .Field }}` actions. Fields are `Title`,
//! `Link` and `Published` (`Publicated` is accepted as an alias). An action may
//! pipe its value through one escaping function:
//!
//! ```text
//! {"text": "{{ .Title | json }}", "url": "{{ .Link }}"}
//! ```
//!
//! | function   | effect                               |
//! |------------|--------------------------------------|
//! | `html`     | HTML entity escaping                 |
//! | `json`     | JSON string escaping, without quotes |
//! | `urlquery` | `application/x-www-form-urlencoded`  |
//!
//! A quoted action such as `{{ "{{" }}` emits the unquoted string; it may hold
//! `}}` and backslash escapes. A leading `{{- ` or trailing ` -}}` trims the
//! whitespace of the neighbouring text, as in Go templates.
//!
//! Everything is resolved when the template is compiled, so rendering can only
//! fail on the output writer.

use std::io::Write;

use thiserror::Error;

use crate::app::Result;
use crate::domain::FeedItem;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unclosed action starting at byte {0}")]
    Unclosed(usize),

    #[error("empty action at byte {0}")]
    Empty(usize),

    #[error("unknown field {0:?}, expected Title, Link or Published")]
    UnknownField(String),

    #[error("unknown function {0:?}, expected html, json or urlquery")]
    UnknownFunction(String),

    #[error("malformed action {0:?}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Published,
}

impl Field {
    fn parse(name: &str) -> std::result::Result<Self, TemplateError> {
        match name {
            "Title" => Ok(Self::Title),
            "Link" => Ok(Self::Link),
            "Published" | "Publicated" => Ok(Self::Published),
            other => Err(TemplateError::UnknownField(other.to_string())),
        }
    }

    fn value(self, item: &FeedItem) -> &str {
        match self {
            Self::Title => &item.title,
            Self::Link => &item.link,
            Self::Published => &item.published,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    Html,
    Json,
    UrlQuery,
}

impl Escape {
    fn parse(name: &str) -> std::result::Result<Self, TemplateError> {
        match name {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            "urlquery" => Ok(Self::UrlQuery),
            other => Err(TemplateError::UnknownFunction(other.to_string())),
        }
    }

    fn apply(self, value: &str) -> String {
        match self {
            Self::Html => html_escape::encode_safe(value).into_owned(),
            Self::Json => {
                let quoted = serde_json::Value::from(value).to_string();
                quoted[1..quoted.len() - 1].to_string()
            }
            Self::UrlQuery => url::form_urlencoded::byte_serialize(value.as_bytes()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field { field: Field, escape: Option<Escape> },
}

#[derive(Debug, Clone)]
pub struct ItemTemplate {
    segments: Vec<Segment>,
}

impl ItemTemplate {
    pub fn compile(source: &str) -> std::result::Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;
        let mut trim_next = false;

        while let Some(start) = rest.find(OPEN) {
            let action_start = offset + start;
            let after_open = &rest[start + OPEN.len()..];
            let end = find_close(after_open).ok_or(TemplateError::Unclosed(action_start))?;

            let mut text = &rest[..start];
            if trim_next {
                text = text.trim_start();
            }
            let mut action = &after_open[..end];
            if let Some(inner) = strip_trim_left(action) {
                text = text.trim_end();
                action = inner;
            }
            trim_next = false;
            if let Some(inner) = strip_trim_right(action) {
                trim_next = true;
                action = inner;
            }

            push_text(&mut segments, text);
            segments.push(parse_action(action, action_start)?);

            let consumed = start + OPEN.len() + end + CLOSE.len();
            rest = &rest[consumed..];
            offset += consumed;
        }
        push_text(&mut segments, if trim_next { rest.trim_start() } else { rest });

        Ok(Self { segments })
    }

    pub fn render_to<W: Write>(&self, item: &FeedItem, out: &mut W) -> Result<()> {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.write_all(text.as_bytes())?,
                Segment::Field { field, escape } => {
                    let value = field.value(item);
                    match escape {
                        Some(escape) => out.write_all(escape.apply(value).as_bytes())?,
                        None => out.write_all(value.as_bytes())?,
                    }
                }
            }
        }
        Ok(())
    }

    pub fn render(&self, item: &FeedItem) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.render_to(item, &mut buffer)?;
        Ok(buffer)
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Text(previous)) = segments.last_mut() {
        previous.push_str(text);
    } else {
        segments.push(Segment::Text(text.to_string()));
    }
}

/// Offset of the `}}` closing an action, skipping over quoted strings.
fn find_close(action: &str) -> Option<usize> {
    let mut in_quote = false;
    let mut escaped = false;
    for (i, c) in action.char_indices() {
        if in_quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quote = false,
                _ => {}
            }
        } else if c == '"' {
            in_quote = true;
        } else if action[i..].starts_with(CLOSE) {
            return Some(i);
        }
    }
    None
}

fn strip_trim_left(action: &str) -> Option<&str> {
    action
        .strip_prefix('-')
        .filter(|inner| inner.starts_with(char::is_whitespace))
}

fn strip_trim_right(action: &str) -> Option<&str> {
    action
        .strip_suffix('-')
        .filter(|inner| inner.ends_with(char::is_whitespace))
}

fn parse_action(action: &str, at: usize) -> std::result::Result<Segment, TemplateError> {
    let trimmed = action.trim();
    if trimmed.is_empty() {
        return Err(TemplateError::Empty(at));
    }

    if trimmed.starts_with('"') {
        let literal: String = serde_json::from_str(trimmed)
            .map_err(|_| TemplateError::Malformed(trimmed.to_string()))?;
        return Ok(Segment::Text(literal));
    }

    let mut stages = trimmed.split('|').map(str::trim);
    let target = stages.next().unwrap_or_default();
    let name = target
        .strip_prefix('.')
        .filter(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        .ok_or_else(|| TemplateError::Malformed(trimmed.to_string()))?;
    let field = Field::parse(name)?;

    let escape = match (stages.next(), stages.next()) {
        (None, _) => None,
        (Some(function), None) if !function.is_empty() => Some(Escape::parse(function)?),
        _ => return Err(TemplateError::Malformed(trimmed.to_string())),
    };

    Ok(Segment::Field { field, escape })
}
