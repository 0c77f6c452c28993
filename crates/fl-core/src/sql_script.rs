//! Splitting SQL migration files into executable statements
//!
//! A SQL migration holds both directions, introduced by annotation comments:
//!
//! ```sql
//! -- +migrate Up
//! CREATE TABLE users (id INTEGER);
//!
//! -- +migrate Down
//! DROP TABLE users;
//! ```
//!
//! A statement ends at a line whose trimmed text ends with `;`. Bodies that
//! contain inner semicolons are wrapped in `-- +migrate StatementBegin` and
//! `-- +migrate StatementEnd`.

use crate::error::{CoreError, CoreResult};
use crate::migration::Direction;

const ANNOTATION_PREFIX: &str = "-- +migrate";

/// Annotation lines recognized inside a SQL migration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Annotation {
    Up,
    Down,
    StatementBegin,
    StatementEnd,
}

impl Annotation {
    fn parse(line: &str, line_no: usize) -> CoreResult<Option<Self>> {
        let Some(rest) = line.trim().strip_prefix(ANNOTATION_PREFIX) else {
            return Ok(None);
        };
        match rest.trim() {
            "Up" => Ok(Some(Annotation::Up)),
            "Down" => Ok(Some(Annotation::Down)),
            "StatementBegin" => Ok(Some(Annotation::StatementBegin)),
            "StatementEnd" => Ok(Some(Annotation::StatementEnd)),
            other => Err(CoreError::ScriptParse {
                line: line_no,
                message: format!("unknown annotation '{}'", other),
            }),
        }
    }
}

/// Return the statements of `content` that belong to `direction`, in order.
pub fn split_statements(content: &str, direction: Direction) -> CoreResult<Vec<String>> {
    let mut statements = Vec::new();
    let mut section: Option<Direction> = None;
    let mut in_block = false;
    let mut block_start = 0;
    let mut buffer = String::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;

        if let Some(annotation) = Annotation::parse(line, line_no)? {
            match annotation {
                Annotation::Up | Annotation::Down => {
                    if in_block {
                        return Err(CoreError::ScriptParse {
                            line: line_no,
                            message: "section annotation inside StatementBegin block".to_string(),
                        });
                    }
                    flush(&mut buffer, &mut statements);
                    section = Some(if annotation == Annotation::Up {
                        Direction::Up
                    } else {
                        Direction::Down
                    });
                }
                Annotation::StatementBegin => {
                    if in_block {
                        return Err(CoreError::ScriptParse {
                            line: line_no,
                            message: "nested StatementBegin".to_string(),
                        });
                    }
                    in_block = true;
                    block_start = line_no;
                }
                Annotation::StatementEnd => {
                    if !in_block {
                        return Err(CoreError::ScriptParse {
                            line: line_no,
                            message: "StatementEnd without StatementBegin".to_string(),
                        });
                    }
                    in_block = false;
                    flush(&mut buffer, &mut statements);
                }
            }
            continue;
        }

        if section != Some(direction) {
            continue;
        }

        buffer.push_str(line);
        buffer.push('\n');

        if !in_block && line.trim_end().ends_with(';') {
            flush(&mut buffer, &mut statements);
        }
    }

    if in_block {
        return Err(CoreError::ScriptParse {
            line: block_start,
            message: "StatementBegin is never closed".to_string(),
        });
    }

    flush(&mut buffer, &mut statements);
    Ok(statements)
}

/// Move the buffered statement into `statements` unless it holds only
/// whitespace and comments.
fn flush(buffer: &mut String, statements: &mut Vec<String>) {
    let has_sql = buffer.lines().any(|l| {
        let t = l.trim();
        !t.is_empty() && !t.starts_with("--")
    });
    if has_sql {
        statements.push(buffer.trim().to_string());
    }
    buffer.clear();
}

#[cfg(test)]
#[path = "sql_script_test.rs"]
mod tests;
