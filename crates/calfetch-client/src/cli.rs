//! Command-line interface definition.
//!
//! Flags override the matching `config.toml` values. Credential flags also
//! read their environment variable and accept secret references.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use calfetch_core::TracingOutputFormat;
use calfetch_providers::zoom::ZoomMeetingType;

use crate::config::{GraphSettings, ZohoSettings, ZoomSettings};

/// calfetch - Fetch calendar events from Microsoft Graph, Zoho and Zoom
#[derive(Debug, Parser)]
#[command(name = "calfetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALFETCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log format on stderr (pretty, compact, json)
    #[arg(long, default_value = "compact", global = true)]
    pub log_format: TracingOutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List a user's Microsoft Graph calendar events
    Graph(GraphArgs),

    /// Zoho Calendar commands
    Zoho {
        #[command(subcommand)]
        action: ZohoAction,
    },

    /// List the Zoom account's meetings
    Zoom(ZoomArgs),

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Microsoft Graph flags.
#[derive(Debug, Clone, Default, Args)]
pub struct GraphArgs {
    /// Directory (tenant) ID
    #[arg(long, env = "GRAPH_TENANT_ID")]
    pub tenant_id: Option<String>,

    /// Application (client) ID
    #[arg(long, env = "GRAPH_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Client secret
    #[arg(long, env = "GRAPH_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// User ID or principal name whose calendar is read
    #[arg(long, env = "GRAPH_USER_ID")]
    pub user_id: Option<String>,
}

impl GraphArgs {
    /// Overlays the flags on the file settings.
    pub fn apply(self, settings: &mut GraphSettings) {
        overlay(&mut settings.tenant_id, self.tenant_id);
        overlay(&mut settings.client_id, self.client_id);
        overlay(&mut settings.client_secret, self.client_secret);
        overlay(&mut settings.user_id, self.user_id);
    }
}

/// Zoom flags.
#[derive(Debug, Clone, Default, Args)]
pub struct ZoomArgs {
    /// Server-to-server OAuth account ID
    #[arg(long, env = "ZOOM_ACCOUNT_ID")]
    pub account_id: Option<String>,

    /// OAuth client ID
    #[arg(long, env = "ZOOM_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, env = "ZOOM_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Meetings to list (scheduled, live, upcoming, upcoming_meetings, previous_meetings)
    #[arg(long)]
    pub meeting_type: Option<ZoomMeetingType>,

    /// Records per page (1-300)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=300))]
    pub page_size: Option<u32>,
}

impl ZoomArgs {
    /// Overlays the flags on the file settings.
    pub fn apply(self, settings: &mut ZoomSettings) {
        overlay(&mut settings.account_id, self.account_id);
        overlay(&mut settings.client_id, self.client_id);
        overlay(&mut settings.client_secret, self.client_secret);
        if self.meeting_type.is_some() {
            settings.meeting_type = self.meeting_type;
        }
        if self.page_size.is_some() {
            settings.page_size = self.page_size;
        }
    }
}

/// Zoho client credential flags shared by the Zoho commands.
#[derive(Debug, Clone, Default, Args)]
pub struct ZohoCredentialArgs {
    /// OAuth client ID
    #[arg(long, env = "ZOHO_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, env = "ZOHO_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Redirect URI registered for the client
    #[arg(long, env = "ZOHO_REDIRECT_URI")]
    pub redirect_uri: Option<String>,
}

impl ZohoCredentialArgs {
    /// Overlays the flags on the file settings.
    pub fn apply(self, settings: &mut ZohoSettings) {
        overlay(&mut settings.client_id, self.client_id);
        overlay(&mut settings.client_secret, self.client_secret);
        overlay(&mut settings.redirect_uri, self.redirect_uri);
    }
}

/// Zoho actions.
#[derive(Debug, Subcommand)]
pub enum ZohoAction {
    /// Print the consent URL that issues an authorization code
    AuthorizeUrl {
        #[command(flatten)]
        credentials: ZohoCredentialArgs,

        /// Scope to request (can be repeated)
        #[arg(long = "scope", action = clap::ArgAction::Append)]
        scopes: Vec<String>,

        /// CSRF state value (random when omitted)
        #[arg(long)]
        state: Option<String>,
    },

    /// List events of a Zoho calendar
    Events {
        #[command(flatten)]
        credentials: ZohoCredentialArgs,

        /// Authorization code from the consent redirect
        #[arg(long, env = "ZOHO_AUTH_CODE", hide_env_values = true)]
        code: Option<String>,

        /// Refresh token used when no code is given
        #[arg(long, env = "ZOHO_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: Option<String>,

        /// Calendar ID
        #[arg(long)]
        calendar_id: Option<String>,

        /// Window start (RFC 3339)
        #[arg(long, value_parser = parse_datetime)]
        from: Option<DateTime<Utc>>,

        /// Window end (RFC 3339)
        #[arg(long, value_parser = parse_datetime)]
        to: Option<DateTime<Utc>>,

        /// Store an issued refresh token in the config file
        #[arg(long)]
        save: bool,
    },

    /// Exchange a refresh token for a new access token
    Refresh {
        #[command(flatten)]
        credentials: ZohoCredentialArgs,

        /// Refresh token
        #[arg(long, env = "ZOHO_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: Option<String>,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

fn overlay(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp like 2024-01-01T00:00:00Z: {}", e))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("calfetch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn graph_flags_override_file_values() {
        let cli = parse(&["graph", "--user-id", "flag@example.com", "--tenant-id", "t2"]);
        let Command::Graph(args) = cli.command else {
            panic!("expected graph command");
        };

        let mut settings = GraphSettings {
            tenant_id: Some("t1".to_string()),
            client_id: Some("file-id".to_string()),
            user_id: Some("file@example.com".to_string()),
            ..Default::default()
        };
        args.apply(&mut settings);

        assert_eq!(settings.tenant_id.as_deref(), Some("t2"));
        assert_eq!(settings.user_id.as_deref(), Some("flag@example.com"));
        // Unset flags keep the file values.
        assert_eq!(settings.client_id.as_deref(), Some("file-id"));
    }

    #[test]
    fn zoom_meeting_type_and_page_size() {
        let cli = parse(&["zoom", "--meeting-type", "previous_meetings", "--page-size", "50"]);
        let Command::Zoom(args) = cli.command else {
            panic!("expected zoom command");
        };
        assert_eq!(args.meeting_type, Some(ZoomMeetingType::PreviousMeetings));
        assert_eq!(args.page_size, Some(50));
    }

    #[test]
    fn zoom_page_size_out_of_range_rejected() {
        let result = Cli::try_parse_from(["calfetch", "zoom", "--page-size", "301"]);
        assert!(result.is_err());
    }

    #[test]
    fn zoho_events_window_flags() {
        let cli = parse(&[
            "zoho",
            "events",
            "--code",
            "1000.abc",
            "--from",
            "2024-02-01T00:00:00Z",
            "--to",
            "2024-02-29T23:59:59+00:00",
        ]);
        let Command::Zoho {
            action: ZohoAction::Events { code, from, to, .. },
        } = cli.command
        else {
            panic!("expected zoho events");
        };
        assert_eq!(code.as_deref(), Some("1000.abc"));
        assert_eq!(from, Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
        assert_eq!(to, Some(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()));
    }

    #[test]
    fn zoho_events_rejects_bad_timestamp() {
        let result = Cli::try_parse_from(["calfetch", "zoho", "events", "--from", "2024-02-01"]);
        assert!(result.is_err());
    }

    #[test]
    fn zoho_authorize_url_repeated_scopes() {
        let cli = parse(&[
            "zoho",
            "authorize-url",
            "--scope",
            "ZohoCalendar.event.READ",
            "--scope",
            "ZohoCalendar.calendar.READ",
        ]);
        let Command::Zoho {
            action: ZohoAction::AuthorizeUrl { scopes, state, .. },
        } = cli.command
        else {
            panic!("expected zoho authorize-url");
        };
        assert_eq!(scopes.len(), 2);
        assert!(state.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["config", "path", "--debug", "--log-format", "json"]);
        assert!(cli.debug);
        assert_eq!(cli.log_format, TracingOutputFormat::Json);
    }
}
