//! Command surface
//!
//! Three commands reach this crate: `role <giant|gnome|reset> [player]`,
//! `acceptrole`, and `declinerole`. Parsing lives here; execution is the
//! engine's job. Dispatch reports back to the host with a plain "handled"
//! flag since the host process is long-running.

use std::str::FromStr;

use crate::roles::Role;

/// Permission node required to change another player's role
pub const MANAGE_PERMISSION: &str = "roleswap.manage";

pub const ROLE_USAGE: &str = "Usage: /role <giant|gnome|reset> [player]";

/// What a /role invocation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAction {
    /// Grant a named role
    Assign(Role),
    /// Back to Normal
    Reset,
}

/// A parsed command addressed to this crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    Role {
        action: RoleAction,
        /// Explicit target player name, when managing someone else
        target_name: Option<String>,
    },
    Accept,
    Decline,
}

/// User-facing rejection produced during parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandReject {
    #[error("{ROLE_USAGE}")]
    Usage,
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Parse a dispatched command. `None` means the command belongs to someone
/// else; `Some(Err)` carries the rejection message to show the sender.
pub fn parse(name: &str, args: &[&str]) -> Option<Result<CommandRequest, CommandReject>> {
    match name.to_lowercase().as_str() {
        "role" => Some(parse_role(args)),
        "acceptrole" => Some(Ok(CommandRequest::Accept)),
        "declinerole" => Some(Ok(CommandRequest::Decline)),
        _ => None,
    }
}

fn parse_role(args: &[&str]) -> Result<CommandRequest, CommandReject> {
    if args.is_empty() || args.len() > 2 {
        return Err(CommandReject::Usage);
    }

    let action = match args[0].to_lowercase().as_str() {
        "reset" => RoleAction::Reset,
        raw => match Role::from_str(raw) {
            Ok(role) if role.is_assigned() => RoleAction::Assign(role),
            // "normal" is not grantable by name; reset is the way back
            _ => return Err(CommandReject::UnknownRole(raw.to_string())),
        },
    };

    Ok(CommandRequest::Role {
        action,
        target_name: args.get(1).map(|s| s.to_string()),
    })
}
