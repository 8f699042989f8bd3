//! Moderation script parsing
//!
//! One command per line; blank lines and lines starting with `#` are
//! skipped. Commands taking a number may carry a trailing `# comment`;
//! `file` keeps everything after the station id as report text.
//!
//! ```text
//! file 7 Socket #2 dead
//! approve 1          # ordinal of a report filed earlier in the script
//! reject 2
//! repair 7
//! status 7
//! ```

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    File { station_id: i32, text: String },
    Approve(usize),
    Reject(usize),
    Repair(i32),
    Status(i32),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: {reason}")]
    InvalidArgument { line: usize, reason: String },
}

/// A parsed command with its 1-based source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    source
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let content = raw.trim();
            (!content.is_empty() && !content.starts_with('#')).then(|| (idx + 1, content))
        })
        .map(|(line, content)| {
            parse_line(line, content).map(|command| ScriptLine { line, command })
        })
        .collect()
}

fn parse_line(line: usize, content: &str) -> Result<Command, ScriptError> {
    let (verb, rest) = content
        .split_once(char::is_whitespace)
        .map(|(v, r)| (v, r.trim()))
        .unwrap_or((content, ""));

    match verb {
        "file" => {
            let (station, text) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| invalid(line, "usage: file <station> <text>"))?;
            Ok(Command::File {
                station_id: station_id(line, station)?,
                text: text.trim().to_string(),
            })
        }
        "approve" => Ok(Command::Approve(ordinal(line, strip_comment(rest))?)),
        "reject" => Ok(Command::Reject(ordinal(line, strip_comment(rest))?)),
        "repair" => Ok(Command::Repair(station_id(line, strip_comment(rest))?)),
        "status" => Ok(Command::Status(station_id(line, strip_comment(rest))?)),
        other => Err(ScriptError::UnknownCommand {
            line,
            command: other.to_string(),
        }),
    }
}

/// Drop a trailing `# comment` after a numeric argument
fn strip_comment(value: &str) -> &str {
    value
        .split_once('#')
        .map_or(value, |(arg, _)| arg)
        .trim()
}

fn station_id(line: usize, value: &str) -> Result<i32, ScriptError> {
    value
        .parse()
        .map_err(|_| invalid(line, &format!("invalid station id '{}'", value)))
}

fn ordinal(line: usize, value: &str) -> Result<usize, ScriptError> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(invalid(
            line,
            &format!("invalid report ordinal '{}' (expected 1, 2, ...)", value),
        )),
    }
}

fn invalid(line: usize, reason: &str) -> ScriptError {
    ScriptError::InvalidArgument {
        line,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        let script = "\
            # station 7 goes down\n\
            file 7 Broken cable\n\
            \n\
            approve 1\n\
            reject 2   # trailing comment\n\
            repair 7\n\
            status 7\n";

        let lines = parse_script(script).unwrap();
        let commands: Vec<_> = lines.iter().map(|l| l.command.clone()).collect();
        assert_eq!(
            commands,
            vec![
                Command::File {
                    station_id: 7,
                    text: "Broken cable".into()
                },
                Command::Approve(1),
                Command::Reject(2),
                Command::Repair(7),
                Command::Status(7),
            ]
        );
        assert_eq!(lines[0].line, 2);
        assert_eq!(lines[1].line, 4);
    }

    #[test]
    fn hash_inside_report_text_is_kept() {
        let lines = parse_script("file 7 Socket #2 dead\nfile 7 Socket #3 dead\n").unwrap();
        let texts: Vec<_> = lines
            .iter()
            .map(|l| match &l.command {
                Command::File { text, .. } => text.as_str(),
                other => panic!("unexpected command {:?}", other),
            })
            .collect();
        assert_eq!(texts, vec!["Socket #2 dead", "Socket #3 dead"]);
    }

    #[test]
    fn indented_comment_lines_are_skipped() {
        let lines = parse_script("   # note\nstatus 7#inline\n").unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].command, Command::Status(7));
        assert_eq!(lines[0].line, 2);
    }

    #[test]
    fn unknown_command_reports_line() {
        let err = parse_script("file 1 ok\nexplode 3\n").unwrap_err();
        assert_eq!(
            err,
            ScriptError::UnknownCommand {
                line: 2,
                command: "explode".into()
            }
        );
    }

    #[test]
    fn file_requires_text() {
        assert!(matches!(
            parse_script("file 7"),
            Err(ScriptError::InvalidArgument { line: 1, .. })
        ));
    }

    #[test]
    fn ordinals_start_at_one() {
        assert!(parse_script("approve 0").is_err());
        assert!(parse_script("reject x").is_err());
    }
}
