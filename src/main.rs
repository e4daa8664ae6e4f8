use bookworm::catalog::{CatalogSource, StaticCatalog};
use bookworm::config::log::{set_default_logging_config, set_global_logging_config};
use bookworm::config::{load_config, load_dotenv};
use bookworm::item::repo::JsonPrefsRepository;
use bookworm::my_list::MyListManager;
use bookworm::{fine_line, index_of, late_warning, AppError};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "bookworm", version, about = "Browse the library catalog and keep track of borrowed books")]
struct Cli {
    /// Directory holding my list (overrides storage.dir of the config file)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the library catalog
    Browse,
    /// Add a catalog book to my list
    Add {
        /// Catalog number shown by `browse`
        number: usize,
    },
    /// Show my list, late returns and the total fine
    List,
    /// Set the return date reminder of a book in my list
    Remind {
        /// List number shown by `list`
        number: usize,
        /// Return date (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Return a book and remove it from my list
    Return {
        /// List number shown by `list`
        number: usize,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date: {}", e))
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<(), AppError> {
    load_dotenv();
    let cli = Cli::parse();

    let mut app_config = load_config()?;
    if let Some(dir) = cli.data_dir {
        app_config.override_storage_dir(dir);
    }

    let _guard = match app_config.logger() {
        Some(logger) => Some(set_global_logging_config(logger)?),
        None => {
            set_default_logging_config()?;
            None
        }
    };

    let storage = app_config.storage();
    debug!("내 목록 저장 위치: {}/{}", storage.dir(), storage.namespace());
    let repository = JsonPrefsRepository::new(storage.dir(), storage.namespace());

    run(cli.command, repository)
}

fn run(command: Command, repository: JsonPrefsRepository) -> Result<(), AppError> {
    let mut manager = MyListManager::open(repository);
    manager.set_fine_listener(|total_fine: u32| println!("{}", fine_line(total_fine)));

    match command {
        Command::Browse => {
            for (i, book) in StaticCatalog.available_books().iter().enumerate() {
                println!("{}. {} - {}", i + 1, book.title(), book.author());
                if !book.website_url().is_empty() {
                    println!("   {}", book.website_url());
                }
            }
        }
        Command::Add { number } => {
            let book = StaticCatalog.available_books()
                .into_iter()
                .nth(index_of(number))
                .ok_or_else(|| AppError::InvalidArgument(format!("No catalog book numbered {}", number)))?;
            println!("{}", manager.add_book(book).message());
        }
        Command::List => {
            let late_books = manager.refresh();
            if manager.books().is_empty() {
                println!("Your list is empty.");
            }
            for (i, book) in manager.books().iter().enumerate() {
                println!("{}. {} - {}", i + 1, book.title(), book.author());
                match book.return_date() {
                    Some(date) => println!("   Return by {}", date.format("%Y-%m-%d")),
                    None => println!("   No reminder set"),
                }
            }
            for book in late_books {
                eprintln!("{}", late_warning(book.title()));
            }
            println!("{}", fine_line(manager.total_fine()));
        }
        Command::Remind { number, date } => {
            if let Some(message) = manager.set_return_date(index_of(number), date).message() {
                println!("{}", message);
            }
        }
        Command::Return { number } => {
            if let Some(message) = manager.return_book(index_of(number)).message() {
                println!("{}", message);
            }
        }
    }

    Ok(())
}
