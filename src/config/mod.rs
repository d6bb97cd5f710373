//! Command line definition and credential resolution.

use crate::utils::error::{PhonebookError, Result};
use crate::utils::input::STDIN_PATH;
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use clap::{Args, Parser, Subcommand};
use std::io::Write;

/// Environment variable holding the CardDAV account password.
pub const CARDDAV_PASSWORD_ENV: &str = "CARDDAV_PASSWORD";
/// Environment variable holding the Exchange account password.
pub const EXCHANGE_PASSWORD_ENV: &str = "EXCHANGE_PASSWORD";

#[derive(Parser, Debug)]
#[command(
    name = "phonebook",
    version,
    about = "Convert contact data between CSV, CardDAV, EWS, vCard and AVM phonebook formats"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert CSV rows into a vCard stream
    #[command(name = "from:csv")]
    FromCsv(FromCsvArgs),

    /// Dump a CardDAV addressbook as a vCard stream
    #[command(name = "from:carddav")]
    FromCardDav(CardDavArgs),

    /// Export an Exchange contacts folder as a vCard stream
    #[command(name = "from:ews")]
    FromEws(EwsArgs),

    /// Render a vCard stream as AVM phonebook XML
    #[command(name = "to:avm")]
    ToAvm(ToAvmArgs),

    /// Drop cards that do not match the given filters
    #[command(name = "vcard:filter")]
    VcardFilter(FilterArgs),
}

#[derive(Args, Debug)]
pub struct FromCsvArgs {
    /// CSV file to read, or "-" for standard input
    #[arg(default_value = STDIN_PATH)]
    pub input: String,

    /// Field delimiter, a single ASCII character
    #[arg(short = 's', long)]
    pub delimiter: Option<char>,
}

impl FromCsvArgs {
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        match self.delimiter {
            None => Ok(None),
            Some(c) if c.is_ascii() => Ok(Some(c as u8)),
            Some(c) => Err(PhonebookError::Config {
                message: format!("delimiter must be a single ASCII character, got {c:?}"),
            }),
        }
    }
}

#[derive(Args, Debug)]
pub struct CardDavArgs {
    /// Addressbook query URL, e.g. https://dav.example.com/addressbooks/user/default/
    #[arg(short = 's', long)]
    pub server_url: String,

    /// Account user name
    #[arg(short = 'u', long)]
    pub user: String,

    /// Prompt for the password instead of reading CARDDAV_PASSWORD
    #[arg(long)]
    pub ask_password: bool,
}

impl Validate for CardDavArgs {
    fn validate(&self) -> Result<()> {
        validate_url("server-url", &self.server_url)?;
        validate_non_empty_string("user", &self.user)
    }
}

#[derive(Args, Debug)]
pub struct EwsArgs {
    /// Exchange host name, e.g. mail.example.com
    #[arg(long)]
    pub host: String,

    /// Account user name
    #[arg(short = 'u', long)]
    pub user: String,

    /// Schema version announced to the server
    #[arg(long, default_value = "Exchange2007")]
    pub exchange_version: String,

    /// Skip TLS certificate validation
    #[arg(long)]
    pub insecure: bool,

    /// Prompt for the password instead of reading EXCHANGE_PASSWORD
    #[arg(long)]
    pub ask_password: bool,
}

impl Validate for EwsArgs {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("host", &self.host)?;
        validate_non_empty_string("user", &self.user)
    }
}

#[derive(Args, Debug)]
pub struct ToAvmArgs {
    /// vCard file to read, or "-" for standard input
    #[arg(default_value = STDIN_PATH)]
    pub input: String,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// vCard file to read, or "-" for standard input
    #[arg(default_value = STDIN_PATH)]
    pub input: String,

    /// Keep cards whose note contains any of the given values (repeatable)
    #[arg(long, value_name = "TEXT")]
    pub note: Vec<String>,

    /// Keep only cards that have at least one phone number
    #[arg(long)]
    pub has_telephone: bool,
}

/// Resolve an account password. With `ask` the password is read as one line
/// from standard input, prompted on stderr so the data channel stays clean;
/// otherwise it comes from the named environment variable.
pub fn resolve_password(env_var: &str, ask: bool) -> Result<String> {
    if ask {
        eprint!("password: ");
        std::io::stderr().flush()?;

        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    std::env::var(env_var).map_err(|_| PhonebookError::Config {
        message: format!("password not set; export {env_var} or pass --ask-password"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_csv_subcommand() {
        let cli = Cli::try_parse_from(["phonebook", "from:csv", "contacts.csv", "-s", ";"])
            .unwrap();
        match cli.command {
            Command::FromCsv(args) => {
                assert_eq!(args.input, "contacts.csv");
                assert_eq!(args.delimiter_byte().unwrap(), Some(b';'));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn csv_input_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["phonebook", "from:csv"]).unwrap();
        match cli.command {
            Command::FromCsv(args) => assert_eq!(args.input, STDIN_PATH),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn non_ascii_separator_is_rejected() {
        let cli = Cli::try_parse_from(["phonebook", "from:csv", "-s", "ö"]).unwrap();
        match cli.command {
            Command::FromCsv(args) => assert!(args.delimiter_byte().is_err()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn carddav_args_are_validated() {
        let cli = Cli::try_parse_from([
            "phonebook",
            "from:carddav",
            "-s",
            "https://dav.example.com/contacts",
            "-u",
            "alice",
        ])
        .unwrap();
        match cli.command {
            Command::FromCardDav(args) => assert!(args.validate().is_ok()),
            other => panic!("unexpected command: {other:?}"),
        }

        let bad = CardDavArgs {
            server_url: "ftp://dav.example.com".into(),
            user: "alice".into(),
            ask_password: false,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn ews_version_has_a_default() {
        let cli = Cli::try_parse_from([
            "phonebook",
            "from:ews",
            "--host",
            "mail.example.com",
            "-u",
            "alice",
        ])
        .unwrap();
        match cli.command {
            Command::FromEws(args) => {
                assert_eq!(args.exchange_version, "Exchange2007");
                assert!(!args.insecure);
                assert!(args.validate().is_ok());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn filter_options_are_repeatable() {
        let cli = Cli::try_parse_from([
            "phonebook",
            "vcard:filter",
            "--note",
            "foo",
            "--note",
            "bar",
            "--has-telephone",
        ])
        .unwrap();
        match cli.command {
            Command::VcardFilter(args) => {
                assert_eq!(args.note, vec!["foo", "bar"]);
                assert!(args.has_telephone);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn missing_password_env_is_a_config_error() {
        let err = resolve_password("PHONEBOOK_TEST_UNSET_PASSWORD", false).unwrap_err();
        assert!(matches!(err, PhonebookError::Config { .. }));
    }
}
