use buchstore::{ApiClient, BookInput, BookStore, BookViewModel, api};
use clap::{Parser, Subcommand};
use eyre::Result;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "buchstore")]
#[command(about = "Buchstore - book management over a SQLite-backed REST API")]
struct Cli {
    /// Base URL of the API server (client commands)
    #[arg(long, global = true, default_value = "http://127.0.0.1:3001", env = "BUCHSTORE_SERVER")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API server
    Serve {
        /// Path to the SQLite database file
        #[arg(long, default_value = "books.db")]
        db: PathBuf,

        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:3001")]
        addr: SocketAddr,
    },

    /// List books, filtered client-side
    List {
        /// Title substring, case-insensitive
        #[arg(long)]
        search: Option<String>,

        /// Earliest creation date, DD.MM.YY or DD.MM.YYYY
        #[arg(long)]
        from: Option<String>,

        /// Latest creation date, DD.MM.YY or DD.MM.YYYY
        #[arg(long)]
        to: Option<String>,
    },

    /// Create a book
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long)]
        created_by: Option<String>,
    },

    /// Update a book's title, author, and creator
    Edit {
        id: i64,

        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long)]
        created_by: Option<String>,
    },

    /// Delete a book
    Remove { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { db, addr } => {
            let store = BookStore::open(&db)?;
            api::serve(store, addr).await?;
        }
        Commands::List { search, from, to } => {
            let client = ApiClient::new(&cli.server);
            let mut model = BookViewModel::new();
            model.reload(&client).await?;

            if let Some(search) = search {
                model.set_search(search);
            }
            model.set_start_date(from);
            model.set_end_date(to);

            print_books(&model);
        }
        Commands::Add {
            title,
            author,
            created_by,
        } => {
            let client = ApiClient::new(&cli.server);
            let id = client
                .create(&BookInput::new(title, author, created_by))
                .await?;

            // Every mutation is followed by a full reload.
            let mut model = BookViewModel::new();
            model.reload(&client).await?;

            println!("Created book {}", id);
            print_books(&model);
        }
        Commands::Edit {
            id,
            title,
            author,
            created_by,
        } => {
            let client = ApiClient::new(&cli.server);
            client
                .update(id, &BookInput::new(title, author, created_by))
                .await?;

            let mut model = BookViewModel::new();
            model.reload(&client).await?;

            println!("Updated book {}", id);
            print_books(&model);
        }
        Commands::Remove { id } => {
            let client = ApiClient::new(&cli.server);
            client.delete(id).await?;

            let mut model = BookViewModel::new();
            model.reload(&client).await?;

            println!("Deleted book {}", id);
            print_books(&model);
        }
    }

    Ok(())
}

fn print_books(model: &BookViewModel) {
    for entry in model.filtered() {
        println!(
            "{:>4}  {:<30}  {:<20}  {}",
            entry.book.id, entry.book.title, entry.book.author, entry.created_label
        );
    }

    let filter = model.filter();
    println!("{} of {} books", filter.filtered_count, filter.total_count);
}
