use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{error, info};

use voter_console::api::auth::{HttpSessionProvider, SessionProvider};
use voter_console::api::todos::{HttpTodoStore, TodoStore};
use voter_console::api::voters::{HttpVoterRegistry, VoterRegistry};
use voter_console::client::ApiClient;
use voter_console::model::query::{RosterQuery, SortField, SortOrder};
use voter_console::model::session::Credentials;
use voter_console::{Config, Error, Result};

/// Command-line console for the voter-management API.
#[derive(Debug, Parser)]
#[command(name = "voter-console", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Ask the server who the current session belongs to.
    Check,
    /// Log in and report the granted role.
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Fetch one page of the voter roster.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Rows per page.
        #[arg(long)]
        size: Option<u32>,
        /// Sort field (wire name, e.g. serialNo or houseName).
        #[arg(long, value_parser = SortField::from_str)]
        sort: Option<SortField>,
        #[arg(long, value_parser = SortOrder::from_str)]
        order: Option<SortOrder>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Log in and print the account's todo list.
    Todos {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
}

/// Build the roster query from the `list` flags. Either sort flag alone
/// works; the other falls back to its default.
fn list_query(
    config: &Config,
    page: u32,
    size: Option<u32>,
    sort: Option<SortField>,
    order: Option<SortOrder>,
    search: Option<&str>,
) -> RosterQuery {
    let mut query = RosterQuery::new(size.unwrap_or(config.default_page_size()));
    if sort.is_some() || order.is_some() {
        query.set_sort(sort.unwrap_or_default(), order.unwrap_or_default());
    }
    if let Some(term) = search {
        query.set_search(term);
    }
    query.set_page(page);
    query
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let client = Arc::new(ApiClient::new(config.api_base())?);

    match cli.command {
        Action::Check => {
            let provider = HttpSessionProvider::new(client);
            let session = provider.check().await?;
            if session.is_authenticated {
                match (session.role, session.user_id) {
                    (Some(role), Some(user_id)) => {
                        println!("Signed in as {user_id} ({role})")
                    }
                    (Some(role), None) => println!("Signed in ({role})"),
                    _ => println!("Signed in"),
                }
            } else {
                println!("Not signed in");
            }
        }
        Action::Login { username, password } => {
            let provider = HttpSessionProvider::new(client);
            let session = provider
                .login(&Credentials { username, password })
                .await?;
            match session.role {
                Some(role) => println!("Logged in ({role})"),
                None => println!("Logged in"),
            }
        }
        Action::List {
            page,
            size,
            sort,
            order,
            search,
        } => {
            let query = list_query(&config, page, size, sort, order, search.as_deref());
            let registry = HttpVoterRegistry::new(client);
            let page = registry.list(&query).await?;
            for voter in &page.records {
                println!(
                    "{:>6}  {}  [{}]  {} / {}  {}",
                    voter.serial_no,
                    voter.name,
                    voter.id_card_no,
                    voter.house_no,
                    voter.house_name,
                    voter.gender_age,
                );
            }
            let p = &page.pagination;
            println!(
                "page {}/{} ({} voters)",
                p.current_page, p.total_pages, p.total_count
            );
        }
        Action::Todos { username, password } => {
            // Log in first so the session cookie is on the store's client.
            let provider = HttpSessionProvider::new(client.clone());
            provider
                .login(&Credentials { username, password })
                .await?;

            let store = HttpTodoStore::new(client);
            let entries = store.list_mine().await?;
            let voted = entries.iter().filter(|entry| entry.has_voted).count();
            for entry in &entries {
                let mark = if entry.has_voted { "x" } else { " " };
                println!("[{mark}] {:>6}  {}", entry.voter.serial_no, entry.voter.name);
            }
            println!("{voted}/{} voted", entries.len());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Set up logging.
    log4rs::init_file("log4rs.yaml", Default::default()).expect("Failed to initialise logging");
    info!("Initialised logging");

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        match &err {
            Error::Server { status, .. } => error!("Server rejected the request ({status}): {err}"),
            _ => error!("{err}"),
        }
        std::process::exit(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_flag_applies_without_a_sort_field() {
        let config = Config::default();
        let query = list_query(&config, 1, None, None, Some(SortOrder::Descending), None);
        assert_eq!(SortField::SerialNo, query.sort_by);
        assert_eq!(SortOrder::Descending, query.sort_order);
    }

    #[test]
    fn sort_flag_alone_defaults_to_ascending() {
        let config = Config::default();
        let query = list_query(&config, 1, None, Some(SortField::Name), None, None);
        assert_eq!(SortField::Name, query.sort_by);
        assert_eq!(SortOrder::Ascending, query.sort_order);
    }

    #[test]
    fn page_survives_sort_and_search_flags() {
        let config = Config::default();
        let query = list_query(
            &config,
            4,
            Some(25),
            Some(SortField::HouseName),
            Some(SortOrder::Descending),
            Some("Sam"),
        );
        assert_eq!(4, query.page);
        assert_eq!(25, query.page_size);
        assert_eq!("Sam", query.search);
    }

    #[test]
    fn bad_sort_flag_is_rejected() {
        let command_line = ["voter-console", "list", "--sort", "votes"];
        Cli::try_parse_from(command_line).unwrap_err();

        let command_line = ["voter-console", "list", "--order", "desc"];
        Cli::try_parse_from(command_line).unwrap();
    }
}
