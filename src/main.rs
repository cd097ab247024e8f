use std::fs;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use knowledge_cache::config::ServerConfig;
use knowledge_cache::media::MediaStore;
use knowledge_cache::server::{AppState, create_router};
use knowledge_cache::store::{SqliteStore, Store};
use knowledge_cache::types::{Subject, Topic};

#[derive(Parser)]
#[command(name = "knowledge-cache")]
#[command(about = "A flashcard study server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database and uploaded media
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },
}

/// The learn section ships with starter content. Only an empty catalog is
/// seeded; operators curate it afterwards through the database.
fn seed_learn_content(store: &dyn Store) -> knowledge_cache::error::Result<()> {
    if !store.list_subjects()?.is_empty() {
        return Ok(());
    }

    let subjects = [
        ("Biology", vec![
            ("Cell Structure", "Cells are the basic unit of life.\\nProkaryotes lack a nucleus; eukaryotes have membrane-bound organelles."),
            ("Photosynthesis", "Plants convert light energy into chemical energy.\\nThe reaction consumes carbon dioxide and water and releases oxygen."),
        ]),
        ("History", vec![
            ("The Printing Press", "Movable type reached Europe in the 1440s.\\nCheap printed material reshaped literacy and the spread of ideas."),
        ]),
        ("Computer Science", vec![
            ("Hash Tables", "A hash table maps keys to array slots through a hash function.\\nAverage-case lookups are constant time."),
        ]),
    ];

    for (subject_title, topics) in subjects {
        let subject = Subject {
            id: Uuid::new_v4().to_string(),
            title: subject_title.to_string(),
        };
        store.create_subject(&subject)?;

        for (title, explanation) in topics {
            store.create_topic(&Topic {
                id: Uuid::new_v4().to_string(),
                subject_id: subject.id.clone(),
                title: title.to_string(),
                explanation: explanation.to_string(),
            })?;
        }
    }

    info!("Seeded starter learn content");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("knowledge_cache=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
            };

            fs::create_dir_all(&config.data_dir)?;

            let store = SqliteStore::new(config.db_path())?;
            store.initialize()?;
            seed_learn_content(&store)?;

            let state = Arc::new(AppState {
                store: Arc::new(store),
                media: MediaStore::new(&config.media_dir()),
            });

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
