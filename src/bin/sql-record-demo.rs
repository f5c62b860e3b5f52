use clap::{Parser, Subcommand};
use sql_record::prelude::*;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about = "Manage a products table through sql-record")]
struct Args {
    /// SQLite database file, or `:memory:`.
    #[arg(long, default_value = "products.db")]
    database: String,
    #[arg(long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every product.
    List {
        /// Only products cheaper than this.
        #[arg(long)]
        below: Option<f64>,
    },
    /// Insert a product.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        sku: Option<String>,
    },
    /// Change the price of a product.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        price: f64,
    },
    /// Remove a product.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

struct Product(Record);

impl Entity for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &["name", "price", "sku"];

    fn from_record(record: Record) -> Self {
        Product(record)
    }
    fn record(&self) -> &Record {
        &self.0
    }
    fn record_mut(&mut self) -> &mut Record {
        &mut self.0
    }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    price REAL NOT NULL,
    sku TEXT
)";

fn ensure_schema(db: &Db) -> Result<()> {
    db.with_connection(|conn| {
        let mut stmt = conn.prepare(SCHEMA)?;
        stmt.execute()?.into_result().map(|_| ())
    })
}

fn print(product: &Product) {
    match serde_json::to_string(product.record()) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize product: {err}"),
    }
}

fn run(args: Args) -> Result<()> {
    Db::configure(DbConfig::builder().database(args.database).build()?);
    let db = Db::acquire()?;
    ensure_schema(&db)?;

    match args.command {
        Command::List { below } => {
            let mut query = Product::query().order_by("id");
            if let Some(limit) = below {
                query = query.and_where_bind("price < ?", limit);
            }
            for product in query.fetch(&db)? {
                print(&product);
            }
        }
        Command::Create { name, price, sku } => {
            let mut product = Product::empty()?;
            let record = product.record_mut();
            record.set("name", name);
            record.set("price", price);
            if let Some(sku) = sku {
                record.set("sku", sku);
            }
            let saved = product.save(&db)?;
            tracing::info!(?saved, "created product");
            print(&product);
        }
        Command::Update { id, price } => match Product::find(&db, id)? {
            Some(mut product) => {
                product.record_mut().set("price", price);
                product.save(&db)?;
                print(&product);
            }
            None => eprintln!("no product with id {id}"),
        },
        Command::Delete { id } => {
            let mut product = Product(Record::new().with("id", id));
            if !product.delete(&db)? {
                eprintln!("no product with id {id}");
            }
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
