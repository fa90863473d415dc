use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::input::RawInputs;

/// Chatnotify – post CI validation results to a chat webhook
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Activate verbose output (-v, -vv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the card and post it to the webhook
    Send {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Print the webhook body without sending it
    Render {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Print build information
    Version {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Notification inputs. Each falls back to the CI host's `INPUT_*` variable.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Display name used as card title and id
    #[arg(long, env = "INPUT_NAME")]
    pub name: Option<String>,

    /// Webhook destination URL
    #[arg(long, env = "INPUT_URL", hide_env_values = true)]
    pub url: Option<String>,

    /// Identifier shown in the summary section
    #[arg(long, env = "INPUT_VALIDATIONID")]
    pub validation_id: Option<String>,

    /// success, failure, anything else reads as cancelled
    #[arg(long, env = "INPUT_VALIDATIONSTATUS")]
    pub validation_status: Option<String>,

    /// Link behind the "Open Details" button
    #[arg(long, env = "INPUT_VALIDATIONURL")]
    pub validation_url: Option<String>,

    /// Free text shown in the summary section
    #[arg(long, env = "INPUT_VALIDATIONDETAILS")]
    pub validation_details: Option<String>,
}

impl From<InputArgs> for RawInputs {
    fn from(args: InputArgs) -> Self {
        RawInputs {
            name: args.name,
            url: args.url,
            validation_id: args.validation_id,
            validation_status: args.validation_status,
            validation_url: args.validation_url,
            validation_details: args.validation_details,
        }
    }
}
