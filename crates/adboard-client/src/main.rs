use clap::{Parser, Subcommand};

use adboard_client::{AdboardClient, ApiResponse, DEFAULT_URL};
use adboard_types::api::{CreateAdvertisement, CreateUser, PatchAdvertisement, PatchUser};

/// Manual test client for the adboard API.
#[derive(Parser)]
#[command(name = "adboard-client", version, about)]
struct Cli {
    /// Base URL of the server
    #[arg(long, env = "ADBOARD_URL", default_value = DEFAULT_URL)]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User endpoints
    #[command(subcommand)]
    User(UserCommand),

    /// Advertisement endpoints
    #[command(subcommand)]
    Ad(AdvertisementCommand),
}

#[derive(Subcommand)]
enum UserCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    Get {
        id: i64,
    },
    Patch {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum AdvertisementCommand {
    Create {
        #[arg(long)]
        header: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        owner_id: i64,
    },
    Get {
        id: i64,
    },
    Patch {
        id: i64,
        #[arg(long)]
        header: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = AdboardClient::new(cli.url);

    let response = match cli.command {
        Commands::User(cmd) => run_user(&client, cmd).await?,
        Commands::Ad(cmd) => run_advertisement(&client, cmd).await?,
    };

    print_response(&response)?;
    Ok(())
}

async fn run_user(client: &AdboardClient, cmd: UserCommand) -> anyhow::Result<ApiResponse> {
    match cmd {
        UserCommand::Create { name, password } => {
            client.create_user(&CreateUser { name, password }).await
        }
        UserCommand::Get { id } => client.get_user(id).await,
        UserCommand::Patch { id, name, password } => {
            client.patch_user(id, &PatchUser { name, password }).await
        }
        UserCommand::Delete { id } => client.delete_user(id).await,
    }
}

async fn run_advertisement(
    client: &AdboardClient,
    cmd: AdvertisementCommand,
) -> anyhow::Result<ApiResponse> {
    match cmd {
        AdvertisementCommand::Create {
            header,
            description,
            owner_id,
        } => {
            client
                .create_advertisement(&CreateAdvertisement {
                    header,
                    description,
                    owner_id,
                })
                .await
        }
        AdvertisementCommand::Get { id } => client.get_advertisement(id).await,
        AdvertisementCommand::Patch {
            id,
            header,
            description,
        } => {
            client
                .patch_advertisement(
                    id,
                    &PatchAdvertisement {
                        header,
                        description,
                    },
                )
                .await
        }
        AdvertisementCommand::Delete { id } => client.delete_advertisement(id).await,
    }
}

fn print_response(response: &ApiResponse) -> anyhow::Result<()> {
    println!("{}", response.status.as_u16());
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    Ok(())
}
