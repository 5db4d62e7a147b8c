use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use partdb_core::SchemaRegistry;
use partdb_migrate::{migrate_legacy, ClassificationRules};
use partdb_sqlite::{
    build_catalog, dump_all, load_sources, verify_round_trip, write_dumps, CatalogError,
    TableBuildStatus, VerifyStatus,
};

#[derive(Debug, Parser)]
#[command(name = "partdb")]
#[command(about = "Deterministic SQL dump/build pipeline for the component catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the live database from category SQL files.
    Build(BuildArgs),
    /// Dump the live database to canonical category SQL files.
    Dump(DumpArgs),
    /// Verify the database round-trips through dump and rebuild.
    Verify(VerifyArgs),
    /// Migrate a legacy flat symbols database into category SQL files.
    Migrate(MigrateArgs),
    /// Show per-category table status.
    Status(StatusArgs),
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// Directory containing per-category .sql files.
    #[arg(long)]
    tables: PathBuf,
}

#[derive(Debug, Args)]
struct DumpArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// Output directory for per-category .sql files.
    #[arg(long)]
    tables: PathBuf,
}

#[derive(Debug, Args)]
struct VerifyArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
}

#[derive(Debug, Args)]
struct MigrateArgs {
    /// Legacy database file with the flat symbols table.
    #[arg(long)]
    legacy_db: PathBuf,
    /// Output directory for migrated per-category .sql files.
    #[arg(long)]
    tables: PathBuf,
    /// Optional YAML file overriding the built-in classification rules.
    #[arg(long)]
    rules: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct StatusArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Build(args) => run_build(args),
        Command::Dump(args) => run_dump(args),
        Command::Verify(args) => run_verify(args),
        Command::Migrate(args) => run_migrate(args),
        Command::Status(args) => run_status(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn open_db(path: &PathBuf) -> Result<rusqlite::Connection, String> {
    rusqlite::Connection::open(path)
        .map_err(|e| format!("Failed to open database '{}': {e}", path.display()))
}

fn run_build(args: BuildArgs) -> Result<(), String> {
    let registry = SchemaRegistry::builtin();
    let mut conn = open_db(&args.db)?;
    let sources = load_sources(&args.tables)
        .map_err(|e| format!("Failed to read '{}': {e}", args.tables.display()))?;
    if sources.is_empty() {
        return Err(format!(
            "No .sql files found in '{}'",
            args.tables.display()
        ));
    }

    let report =
        build_catalog(&mut conn, &registry, sources).map_err(|e| format!("Build failed: {e}"))?;

    println!("Build report:");
    let mut failed = 0usize;
    for table in &report.tables {
        match &table.status {
            TableBuildStatus::Built => {
                println!("  {}: {} row(s)", table.category, table.rows_inserted);
            }
            TableBuildStatus::Failed(cause) => {
                failed += 1;
                println!("  {}: FAILED ({cause})", table.category);
            }
        }
    }
    println!(
        "Built {} table(s), {} row(s) total.",
        report.tables.len() - failed,
        report.total_rows()
    );

    if failed > 0 {
        return Err(format!("{failed} table(s) failed to build"));
    }
    Ok(())
}

fn run_dump(args: DumpArgs) -> Result<(), String> {
    let registry = SchemaRegistry::builtin();
    let conn = open_db(&args.db)?;

    let mut dumps = Vec::new();
    let mut failed = 0usize;
    for (category, result) in dump_all(&conn, &registry) {
        match result {
            Ok(sql) => dumps.push((category, sql)),
            // A duplicate key poisons one table; the rest still dump.
            Err(err @ CatalogError::DuplicateKey { .. }) => {
                failed += 1;
                eprintln!("  {category}: SKIPPED ({err})");
            }
            Err(err) => return Err(format!("Dump failed for '{category}': {err}")),
        }
    }

    write_dumps(&args.tables, &dumps)
        .map_err(|e| format!("Failed to write '{}': {e}", args.tables.display()))?;
    println!(
        "Dumped {} table(s) to '{}'.",
        dumps.len(),
        args.tables.display()
    );

    if failed > 0 {
        return Err(format!("{failed} table(s) skipped"));
    }
    Ok(())
}

fn run_verify(args: VerifyArgs) -> Result<(), String> {
    let registry = SchemaRegistry::builtin();
    let conn = open_db(&args.db)?;
    let report =
        verify_round_trip(&conn, &registry).map_err(|e| format!("Verification failed: {e}"))?;

    println!("Round-trip verification:");
    for table in &report.tables {
        match table.status {
            VerifyStatus::Pass => println!("  {}: PASS", table.category),
            VerifyStatus::Fail => match (&table.checksum_after, &table.cause) {
                (Some(after), _) => println!(
                    "  {}: FAIL ({} != {})",
                    table.category,
                    &table.checksum_before[..12],
                    &after[..12]
                ),
                (None, Some(cause)) => println!("  {}: FAIL ({cause})", table.category),
                (None, None) => println!("  {}: FAIL", table.category),
            },
        }
    }

    let failures = report.failures();
    if failures > 0 {
        return Err(format!("{failures} table(s) failed verification"));
    }
    println!("All {} table(s) verified.", report.tables.len());
    Ok(())
}

fn run_migrate(args: MigrateArgs) -> Result<(), String> {
    let registry = SchemaRegistry::builtin();
    let conn = open_db(&args.legacy_db)?;

    let rules = match &args.rules {
        Some(path) => ClassificationRules::from_yaml_file(path)
            .map_err(|e| format!("Failed to load rules '{}': {e}", path.display()))?,
        None => ClassificationRules::default(),
    };

    let migration =
        migrate_legacy(&conn, &registry, rules).map_err(|e| format!("Migration failed: {e}"))?;

    write_dumps(&args.tables, &migration.sources)
        .map_err(|e| format!("Failed to write '{}': {e}", args.tables.display()))?;

    println!("Migration complete:");
    println!("  Components migrated: {}", migration.migrated);
    println!("  Categories written: {}", migration.sources.len());
    println!("  Unclassified: {}", migration.unclassified.len());
    for name in &migration.unclassified {
        eprintln!("  unclassified: {name}");
    }
    Ok(())
}

fn run_status(args: StatusArgs) -> Result<(), String> {
    let registry = SchemaRegistry::builtin();
    let conn = open_db(&args.db)?;

    println!("Catalog status:");
    let mut total = 0i64;
    for category in registry.categories() {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                [category],
                |row| row.get(0),
            )
            .map_err(|e| format!("Status query failed: {e}"))?;
        if !exists {
            println!("  {category}: missing");
            continue;
        }
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {category}"), [], |row| {
                row.get(0)
            })
            .map_err(|e| format!("Status query failed: {e}"))?;
        total += count;
        println!("  {category}: {count} row(s)");
    }
    println!("Total: {total} row(s).");
    Ok(())
}
