//! Command-line front end standing in for the chat command surface.

use clap::{Args, Parser, Subcommand};

use crate::privileges::{Caller, GrantCommand};

#[derive(Debug, Parser)]
#[command(name = "sac-bridge", version, about = "Privileged users of the Squad admin configurator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Identity of the person issuing the command.
#[derive(Debug, Clone, Args)]
pub struct CallerArgs {
    /// Guild the command is issued in
    #[arg(long, env = "SAC_GUILD_ID")]
    pub guild: String,

    /// Caller's chat role ids (repeatable)
    #[arg(long = "role", value_delimiter = ',')]
    pub roles: Vec<String>,

    /// Caller's chat user id, for logs
    #[arg(long, default_value = "cli")]
    pub user: String,
}

impl From<CallerArgs> for Caller {
    fn from(args: CallerArgs) -> Self {
        Self {
            user_id: args.user,
            guild_id: args.guild,
            roles: args.roles,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a privileged user and their server roles
    Get {
        /// 64-bit Steam id
        steam_id: String,

        #[command(flatten)]
        caller: CallerArgs,
    },

    /// Grant a server role through its webhook
    Grant {
        /// 64-bit Steam id
        steam_id: String,

        /// Role name as configured under [webhooks]
        role_name: String,

        /// Player name
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        comment: String,

        /// Grant length in seconds, omit for unlimited
        #[arg(long)]
        duration: Option<u64>,

        #[command(flatten)]
        caller: CallerArgs,
    },
}

impl Command {
    pub fn grant_command(role_name: String, name: String, comment: String, duration: Option<u64>) -> GrantCommand {
        GrantCommand {
            role: role_name,
            name,
            comment,
            duration,
        }
    }
}
