//! # Control Commands
//!
//! Parser for the line-oriented control messages the UI layer sends to
//! drive channel lifecycles. A message that cannot be parsed is dropped
//! and counted against the avionics error counter, matching the judging
//! checklist's accounting for malformed ground-station input.

use crate::channel::ChannelId;

/// One parsed control command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a channel on a device path
    Connect { channel: ChannelId, path: String },
    /// Close a channel
    Disconnect { channel: ChannelId },
    /// Shut the bridge down
    Quit,
}

/// Parse one control line
///
/// Accepted forms:
/// - `connect <avionics|payload|judging> <device-path>`
/// - `disconnect <avionics|payload|judging>`
/// - `quit`
///
/// # Errors
///
/// Returns a description of what was malformed; the caller counts and
/// drops the message.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();

    match words.next() {
        Some("connect") => {
            let channel = parse_channel(words.next())?;
            let path = words
                .next()
                .ok_or_else(|| "connect requires a device path".to_string())?;
            if words.next().is_some() {
                return Err("connect takes exactly two arguments".to_string());
            }
            Ok(Command::Connect {
                channel,
                path: path.to_string(),
            })
        }
        Some("disconnect") => {
            let channel = parse_channel(words.next())?;
            if words.next().is_some() {
                return Err("disconnect takes exactly one argument".to_string());
            }
            Ok(Command::Disconnect { channel })
        }
        Some("quit") => Ok(Command::Quit),
        Some(other) => Err(format!("unknown command: {}", other)),
        None => Err("empty command".to_string()),
    }
}

fn parse_channel(word: Option<&str>) -> Result<ChannelId, String> {
    match word {
        Some("avionics") => Ok(ChannelId::Avionics),
        Some("payload") => Ok(ChannelId::Payload),
        Some("judging") | Some("hyi") => Ok(ChannelId::Judging),
        Some(other) => Err(format!("unknown channel: {}", other)),
        None => Err("missing channel name".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connect() {
        assert_eq!(
            parse_command("connect avionics /dev/ttyUSB0"),
            Ok(Command::Connect {
                channel: ChannelId::Avionics,
                path: "/dev/ttyUSB0".to_string()
            })
        );
    }

    #[test]
    fn test_parse_disconnect_with_hyi_alias() {
        assert_eq!(
            parse_command("disconnect hyi"),
            Ok(Command::Disconnect {
                channel: ChannelId::Judging
            })
        );
    }

    #[test]
    fn test_parse_quit() {
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_malformed_commands_rejected() {
        assert!(parse_command("").is_err());
        assert!(parse_command("connect").is_err());
        assert!(parse_command("connect avionics").is_err());
        assert!(parse_command("connect rocket /dev/ttyUSB0").is_err());
        assert!(parse_command("disconnect avionics extra").is_err());
        assert!(parse_command("launch").is_err());
    }

    #[test]
    fn test_whitespace_is_tolerated() {
        assert_eq!(
            parse_command("  disconnect   payload  "),
            Ok(Command::Disconnect {
                channel: ChannelId::Payload
            })
        );
    }
}
