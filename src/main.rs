use clap::Parser;
use phonebook_cli::adapters::carddav::{CardDavConfig, CardDavSource};
use phonebook_cli::adapters::ews::{EwsConfig, EwsSource};
use phonebook_cli::app::commands;
use phonebook_cli::config::{self, Cli, Command};
use phonebook_cli::core::filter::FilterSet;
use phonebook_cli::normalize::phone::DEFAULT_REGION;
use phonebook_cli::utils::error::Result;
use phonebook_cli::utils::logger::init_cli_logger;
use phonebook_cli::utils::validation::Validate;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::FromCsv(args) => {
            let delimiter = args.delimiter_byte()?;
            commands::from_csv::run(&args.input, delimiter, DEFAULT_REGION, &mut stdout)
        }
        Command::FromCardDav(args) => {
            args.validate()?;
            let password =
                config::resolve_password(config::CARDDAV_PASSWORD_ENV, args.ask_password)?;
            let source = CardDavSource::new(CardDavConfig {
                server_url: args.server_url,
                user: args.user,
                password,
            })?;
            commands::from_carddav::run(&source, &mut stdout).await
        }
        Command::FromEws(args) => {
            args.validate()?;
            let password =
                config::resolve_password(config::EXCHANGE_PASSWORD_ENV, args.ask_password)?;
            let source = EwsSource::new(EwsConfig {
                host: args.host,
                user: args.user,
                password,
                version: args.exchange_version,
                insecure: args.insecure,
            })?;
            commands::from_ews::run(&source, DEFAULT_REGION, &mut stdout).await
        }
        Command::ToAvm(args) => commands::to_avm::run(&args.input, &mut stdout),
        Command::VcardFilter(args) => {
            let filters = FilterSet::new()
                .with_notes(args.note)
                .with_has_telephone(args.has_telephone);
            commands::vcard_filter::run(&args.input, &filters, &mut stdout)
        }
    }
}
