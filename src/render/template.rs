//! Minimal HTML template language: `{{ path }}` substitution and
//! `{{#each path}} ... {{/each}}` iteration over a JSON context.
//!
//! Scalars are HTML-escaped. Arrays and objects are emitted as JSON so chart
//! data can be dropped straight into a `<script>` block.

use serde_json::Value;

use super::RenderError;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Var { path: String, line: usize },
    Each { path: String, line: usize, body: Vec<Node> },
}

/// A parsed template, reusable across renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

struct OpenBlock {
    path: Option<String>,
    line: usize,
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, RenderError> {
        let mut stack = vec![OpenBlock {
            path: None,
            line: 1,
            nodes: Vec::new(),
        }];
        let mut rest = source;
        let mut line = 1;

        while let Some(start) = rest.find("{{") {
            let (text, after) = rest.split_at(start);
            push_text(&mut stack, text);
            line += text.matches('\n').count();

            let end = after.find("}}").ok_or_else(|| RenderError::Syntax {
                line,
                message: "unclosed '{{'".to_string(),
            })?;
            let tag = after[2..end].trim();
            let tag_line = line;
            line += after[..end].matches('\n').count();
            rest = &after[end + 2..];

            if let Some(path) = tag.strip_prefix("#each ") {
                let path = checked_path(path, tag_line)?;
                stack.push(OpenBlock {
                    path: Some(path),
                    line: tag_line,
                    nodes: Vec::new(),
                });
            } else if tag == "/each" {
                let block = match stack.pop() {
                    Some(OpenBlock { path: Some(path), line, nodes }) => Node::Each { path, line, body: nodes },
                    _ => {
                        return Err(RenderError::Syntax {
                            line: tag_line,
                            message: "'{{/each}}' without a matching '{{#each}}'".to_string(),
                        })
                    }
                };
                if let Some(parent) = stack.last_mut() {
                    parent.nodes.push(block);
                }
            } else {
                let path = checked_path(tag, tag_line)?;
                if let Some(open) = stack.last_mut() {
                    open.nodes.push(Node::Var { path, line: tag_line });
                }
            }
        }
        push_text(&mut stack, rest);

        match stack.pop() {
            Some(OpenBlock { path: None, nodes, .. }) if stack.is_empty() => Ok(Template { nodes }),
            Some(OpenBlock { path, line, .. }) => Err(RenderError::Syntax {
                line,
                message: format!("'{{{{#each {}}}}}' is never closed", path.unwrap_or_default()),
            }),
            None => Err(RenderError::Syntax {
                line,
                message: "unbalanced blocks".to_string(),
            }),
        }
    }

    /// Render against a JSON object context.
    pub fn render(&self, context: &Value) -> Result<String, RenderError> {
        let mut out = String::new();
        let mut scopes = vec![context];
        render_nodes(&self.nodes, &mut scopes, &mut out)?;
        Ok(out)
    }
}

fn push_text(stack: &mut [OpenBlock], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(open) = stack.last_mut() {
        open.nodes.push(Node::Text(text.to_string()));
    }
}

fn checked_path(raw: &str, line: usize) -> Result<String, RenderError> {
    let path = raw.trim();
    let valid = !path.is_empty()
        && path.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if valid {
        Ok(path.to_string())
    } else {
        Err(RenderError::Syntax {
            line,
            message: format!("invalid field path '{}'", path),
        })
    }
}

fn render_nodes<'v>(
    nodes: &[Node],
    scopes: &mut Vec<&'v Value>,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var { path, line } => {
                let value = resolve(scopes, path, *line)?;
                write_value(value, out);
            }
            Node::Each { path, line, body } => {
                let value = resolve(scopes, path, *line)?;
                let items = value.as_array().ok_or_else(|| RenderError::NotAList {
                    path: path.clone(),
                    line: *line,
                })?;
                for item in items {
                    scopes.push(item);
                    let rendered = render_nodes(body, scopes, out);
                    scopes.pop();
                    rendered?;
                }
            }
        }
    }
    Ok(())
}

/// Look a dotted path up in the innermost scope that defines its first segment.
fn resolve<'a>(scopes: &[&'a Value], path: &str, line: usize) -> Result<&'a Value, RenderError> {
    let missing = || RenderError::MissingField {
        path: path.to_string(),
        line,
    };
    let mut segments = path.split('.');
    let first = segments.next().ok_or_else(missing)?;

    let mut value = if first == "this" {
        *scopes.last().ok_or_else(missing)?
    } else {
        scopes
            .iter()
            .rev()
            .find_map(|&scope| scope.get(first))
            .ok_or_else(missing)?
    };

    for segment in segments {
        value = value.get(segment).ok_or_else(missing)?;
    }
    Ok(value)
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::String(s) => escape_html(s, out),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Array(_) | Value::Object(_) => {
            for c in value.to_string().chars() {
                match c {
                    '<' => out.push_str("\\u003c"),
                    '>' => out.push_str("\\u003e"),
                    '&' => out.push_str("\\u0026"),
                    _ => out.push(c),
                }
            }
        }
    }
}

fn escape_html(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
