//! Line-oriented session scripts.
//!
//! The `demo` command and the integration tests drive a session from plain
//! text, one event per line:
//!
//! ```text
//! goto /prompts              # navigate by path
//! goto @thing id=7           # navigate by route name with params
//! back
//! forward
//! add p11 Writing Weekly Review -- Summarize the week in five bullets.
//! ```
//!
//! `#` starts a comment; blank lines are skipped. For `add`, everything
//! after ` -- ` is the record content, everything between the tag and the
//! separator is the (multi-word) title. Errors carry the 1-based line
//! number.

use std::collections::BTreeMap;
use std::fmt;
use std::str::SplitWhitespace;
use thiserror::Error;

use crate::router::NavTarget;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command {command:?}")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: {command} needs {what}")]
    MissingArgument {
        line: usize,
        command: &'static str,
        what: &'static str,
    },
    #[error("line {line}: malformed parameter {param:?}, expected key=value")]
    MalformedParam { line: usize, param: String },
    #[error("line {line}: unexpected argument {arg:?} after {command}")]
    UnexpectedArgument {
        line: usize,
        command: &'static str,
        arg: String,
    },
}

/// One step of a scripted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Goto(NavTarget),
    Back,
    Forward,
    Add {
        id: String,
        title: String,
        tag: String,
        content: String,
    },
}

impl fmt::Display for SessionEvent {
    /// Script syntax, minus `add` content. Used to label demo output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Goto(NavTarget::Path(path)) => write!(f, "goto {path}"),
            SessionEvent::Goto(NavTarget::Name { name, params }) => {
                write!(f, "goto @{name}")?;
                for (key, value) in params {
                    write!(f, " {key}={value}")?;
                }
                Ok(())
            }
            SessionEvent::Back => f.write_str("back"),
            SessionEvent::Forward => f.write_str("forward"),
            SessionEvent::Add { id, tag, title, .. } => write!(f, "add {id} {tag} {title}"),
        }
    }
}

/// Parse a whole script. Stops at the first bad line.
pub fn parse_script(source: &str) -> Result<Vec<SessionEvent>, ScriptError> {
    let mut events = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        events.push(parse_line(line, text)?);
    }
    Ok(events)
}

fn parse_line(line: usize, text: &str) -> Result<SessionEvent, ScriptError> {
    // Only `add` carries free text; split it off before word-splitting so
    // titles and content keep their spacing.
    let (head, content) = match text.split_once(" -- ") {
        Some((head, content)) => (head.trim_end(), Some(content.trim())),
        None => (text, None),
    };
    let mut words = head.split_whitespace();
    let command = words.next().unwrap_or_default();

    match command {
        "goto" => {
            let target = words.next().ok_or(ScriptError::MissingArgument {
                line,
                command: "goto",
                what: "a path or @name",
            })?;
            if let Some(name) = target.strip_prefix('@') {
                if name.is_empty() {
                    return Err(ScriptError::MissingArgument {
                        line,
                        command: "goto",
                        what: "a route name after @",
                    });
                }
                let mut params = BTreeMap::new();
                for pair in words {
                    let (key, value) =
                        pair.split_once('=').ok_or_else(|| ScriptError::MalformedParam {
                            line,
                            param: pair.to_string(),
                        })?;
                    if key.is_empty() {
                        return Err(ScriptError::MalformedParam {
                            line,
                            param: pair.to_string(),
                        });
                    }
                    params.insert(key.to_string(), value.to_string());
                }
                expect_no_content(line, "goto", content)?;
                Ok(SessionEvent::Goto(NavTarget::Name {
                    name: name.to_string(),
                    params,
                }))
            } else {
                expect_bare(line, "goto", &mut words, content)?;
                Ok(SessionEvent::Goto(NavTarget::path(target)))
            }
        }
        "back" => {
            expect_bare(line, "back", &mut words, content)?;
            Ok(SessionEvent::Back)
        }
        "forward" => {
            expect_bare(line, "forward", &mut words, content)?;
            Ok(SessionEvent::Forward)
        }
        "add" => {
            let id = words.next().ok_or(ScriptError::MissingArgument {
                line,
                command: "add",
                what: "an id",
            })?;
            let tag = words.next().ok_or(ScriptError::MissingArgument {
                line,
                command: "add",
                what: "a tag",
            })?;
            let title_words: Vec<&str> = words.collect();
            if title_words.is_empty() {
                return Err(ScriptError::MissingArgument {
                    line,
                    command: "add",
                    what: "a title",
                });
            }
            Ok(SessionEvent::Add {
                id: id.to_string(),
                tag: tag.to_string(),
                title: title_words.join(" "),
                content: content.unwrap_or_default().to_string(),
            })
        }
        other => Err(ScriptError::UnknownCommand {
            line,
            command: other.to_string(),
        }),
    }
}

fn expect_bare(
    line: usize,
    command: &'static str,
    words: &mut SplitWhitespace<'_>,
    content: Option<&str>,
) -> Result<(), ScriptError> {
    if let Some(arg) = words.next() {
        return Err(ScriptError::UnexpectedArgument {
            line,
            command,
            arg: arg.to_string(),
        });
    }
    expect_no_content(line, command, content)
}

fn expect_no_content(
    line: usize,
    command: &'static str,
    content: Option<&str>,
) -> Result<(), ScriptError> {
    if content.is_some() {
        return Err(ScriptError::UnexpectedArgument {
            line,
            command,
            arg: "--".to_string(),
        });
    }
    Ok(())
}

/// The built-in walkthrough replayed by `demo` when no script file is
/// given. Touches every event kind, including a rejected add and a missed
/// navigation.
pub fn demo_script() -> &'static str {
    r#"# A short browsing session touching every event kind.

goto /prompts
goto /prompts/create
add p11 Writing Weekly Review -- Summarize the week in five bullet points.
goto /prompts
back
back
goto @history
forward

# Ids are unique; this one is already taken.
add p1 Education Duplicate Check

# Nothing is mounted at this path; without a fallback the session stays put.
goto /reports

goto @login
back
"#
}
