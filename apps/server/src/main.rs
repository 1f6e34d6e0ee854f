use anyhow::Context;
use clap::{Parser, Subcommand};
use courier_config::load as load_config;
use courier_database::{ChatRepository, CreateUserRequest, MessageRepository, UserRepository};
use courier_gateway::{build_router, AppState};
use courier_runtime::{telemetry, BackendServices};
use sqlx::Row;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "courier-backend")]
#[command(about = "Courier messaging backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP and WebSocket server (default)
    Serve,
    /// Seed the database with a pair of test accounts and a chat
    SeedData,
    /// Dump users, chats, and messages from the database
    DumpData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::SeedData => seed_data().await,
        Commands::DumpData => dump_data().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting Courier backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = AppState::new(services.db_pool.clone(), &config.auth);
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(courier_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("seeding database with test data");

    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = UserRepository::new(services.db_pool.clone());
    let chats = ChatRepository::new(services.db_pool.clone());
    let messages = MessageRepository::new(services.db_pool.clone());

    // The seed password hash is a throwaway; these accounts cannot log in.
    let alice = users
        .create(&CreateUserRequest {
            name: "Alice Seed".to_string(),
            email: "alice@seed.local".to_string(),
            password_hash: "!seed".to_string(),
        })
        .await
        .context("failed to seed user alice")?;
    let bob = users
        .create(&CreateUserRequest {
            name: "Bob Seed".to_string(),
            email: "bob@seed.local".to_string(),
            password_hash: "!seed".to_string(),
        })
        .await
        .context("failed to seed user bob")?;

    let chat = chats
        .find_or_create(alice.id, bob.id)
        .await
        .context("failed to seed chat")?;
    messages
        .create(chat.id, alice.id, "hello from the seed data")
        .await
        .context("failed to seed message")?;
    chats
        .touch_last_message(chat.id, "hello from the seed data")
        .await
        .context("failed to update chat summary")?;

    println!("Database seeded:");
    println!("- users: {} / {}", alice.email, bob.email);
    println!("- chat: {}", chat.public_id);
    println!("Run 'dump-data' to see the inserted data");

    Ok(())
}

async fn dump_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = sqlx::query("SELECT id, public_id, name, email, created_at FROM users ORDER BY id")
        .fetch_all(&services.db_pool)
        .await
        .context("failed to fetch users")?;

    println!("=== USERS ===");
    if users.is_empty() {
        println!("No users found");
    } else {
        println!(
            "{:<5} {:<26} {:<20} {:<30} {:<25}",
            "ID", "Public ID", "Name", "Email", "Created At"
        );
        for user in users {
            let id: i64 = user.get("id");
            let public_id: String = user.get("public_id");
            let name: String = user.get("name");
            let email: String = user.get("email");
            let created_at: String = user.get("created_at");
            println!("{id:<5} {public_id:<26} {name:<20} {email:<30} {created_at:<25}");
        }
    }

    let chats = sqlx::query(
        "SELECT id, public_id, participant_a, participant_b, last_message, updated_at
         FROM chats ORDER BY id",
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch chats")?;

    println!("\n=== CHATS ===");
    if chats.is_empty() {
        println!("No chats found");
    } else {
        println!(
            "{:<5} {:<26} {:<6} {:<6} {:<40} {:<25}",
            "ID", "Public ID", "A", "B", "Last Message", "Updated At"
        );
        for chat in chats {
            let id: i64 = chat.get("id");
            let public_id: String = chat.get("public_id");
            let participant_a: i64 = chat.get("participant_a");
            let participant_b: i64 = chat.get("participant_b");
            let last_message: Option<String> = chat.get("last_message");
            let updated_at: String = chat.get("updated_at");
            println!(
                "{id:<5} {public_id:<26} {participant_a:<6} {participant_b:<6} {:<40} {updated_at:<25}",
                last_message.as_deref().unwrap_or("NULL")
            );
        }
    }

    let messages = sqlx::query(
        "SELECT id, public_id, chat_id, sender_id, text, created_at
         FROM messages ORDER BY created_at",
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch messages")?;

    println!("\n=== MESSAGES ===");
    if messages.is_empty() {
        println!("No messages found");
    } else {
        println!(
            "{:<5} {:<26} {:<8} {:<8} {:<50} {:<25}",
            "ID", "Public ID", "Chat", "Sender", "Text (truncated)", "Created At"
        );
        for message in messages {
            let id: i64 = message.get("id");
            let public_id: String = message.get("public_id");
            let chat_id: i64 = message.get("chat_id");
            let sender_id: i64 = message.get("sender_id");
            let text: String = message.get("text");
            let created_at: String = message.get("created_at");

            let text_display = if text.chars().count() > 47 {
                let prefix: String = text.chars().take(44).collect();
                format!("{prefix}...")
            } else {
                text
            };
            println!(
                "{id:<5} {public_id:<26} {chat_id:<8} {sender_id:<8} {text_display:<50} {created_at:<25}"
            );
        }
    }

    Ok(())
}
