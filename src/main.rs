use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vault_client::{
    adapters::{
        controllers::{
            FileDataClient, SessionStore, DELETE_FAILED, DOWNLOAD_FAILED, LOAD_FAILED,
            LOGIN_FAILED, REGISTRATION_FAILED, SEARCH_FAILED, STATS_FAILED,
        },
        dashboard::Dashboard,
        notifiers::TracingNotifier,
        repositories::FileCredentialRepository,
        sinks::DirectoryFileSink,
    },
    application::{context::RequestContext, services::FileStoreApi},
    domain::{
        config::client::ClientConfig,
        models::{
            file::{FileData, FileId},
            upload::UploadStatus,
        },
    },
    services::create_file_store_api,
};

/// Command-line client for the file vault.
#[derive(Parser, Debug)]
#[command(name = "vault")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the vault API (overrides VAULT_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session
    Login {
        username: String,
        #[arg(long, env = "VAULT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account (does not log in)
    Register {
        username: String,
        #[arg(long, env = "VAULT_PASSWORD", hide_env_values = true)]
        password: String,
        /// Repeat of the password
        #[arg(long)]
        confirm: String,
    },

    /// Forget the stored session
    Logout,

    /// List stored files
    List {
        #[arg(default_value = "1")]
        page: u32,
    },

    /// Search stored files
    Search {
        /// Part of the file name
        #[arg(long)]
        name: Option<String>,
        /// Exact mime type, e.g. image/png
        #[arg(long = "type")]
        mime_type: Option<String>,
        /// Size range as "min-max" in bytes; either side may be empty
        #[arg(long)]
        size: Option<String>,
        /// Earliest upload date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest upload date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Upload one or more files
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Mime type sent for every file
        #[arg(long = "type")]
        mime_type: Option<String>,
    },

    /// Download a file into the download directory
    Download { id: FileId, filename: String },

    /// Delete a file
    Delete {
        id: FileId,
        /// Listing page the file is on
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Show storage usage
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(url) = cli.api_url {
        config = config.with_api_base_url(url);
    }
    tracing::debug!("Using API at {}", config.api_base_url);

    let api = create_file_store_api(&config);
    let repository = Arc::new(FileCredentialRepository::new(config.credentials_path.clone()));
    let mut session = SessionStore::new(api.clone(), repository);

    match cli.command {
        Command::Login { username, password } => {
            let session = session
                .login(&username, &password)
                .await
                .map_err(|e| e.user_message(LOGIN_FAILED))?;
            println!("Logged in as {}", session.username);
        }
        Command::Register {
            username,
            password,
            confirm,
        } => {
            session
                .register(&username, &password, &confirm)
                .await
                .map_err(|e| e.user_message(REGISTRATION_FAILED))?;
            println!("Account {} created. Log in to continue.", username.trim());
        }
        Command::Logout => {
            session.logout().await;
            println!("Logged out");
        }
        command => {
            session.restore().await.map_err(|e| e.to_string())?;
            if !session.is_authenticated() {
                return Err("Not logged in. Run `vault login <username>` first.".to_string());
            }
            let ctx = session.request_context();
            run_authenticated(command, &config, api, ctx).await?;
        }
    }
    Ok(())
}

async fn run_authenticated(
    command: Command,
    config: &ClientConfig,
    api: Arc<dyn FileStoreApi>,
    ctx: RequestContext,
) -> Result<(), String> {
    let mut dashboard = Dashboard::new(
        api,
        ctx,
        Arc::new(DirectoryFileSink::new(config.download_dir.clone())),
        Arc::new(TracingNotifier),
        config.page_size,
    );

    match command {
        Command::List { page } => {
            dashboard
                .files()
                .load_page(page)
                .await
                .map_err(|e| e.user_message(LOAD_FAILED))?;
            print_listing(dashboard.files());
        }
        Command::Search {
            name,
            mime_type,
            size,
            from,
            to,
            page,
        } => {
            let form = dashboard.filters_mut();
            form.set_filename(name.unwrap_or_default())
                .set_mime_type(mime_type.unwrap_or_default())
                .set_start_date(from.unwrap_or_default())
                .set_end_date(to.unwrap_or_default());
            form.apply_size_preset(size.as_deref().unwrap_or_default())
                .map_err(|e| e.user_message(SEARCH_FAILED))?;

            let filters = form.build().map_err(|e| e.user_message(SEARCH_FAILED))?;
            let files = dashboard.files();
            let result = if filters.is_empty() {
                files.load_page(page).await
            } else {
                files.search(filters, page).await
            };
            result.map_err(|e| e.user_message(SEARCH_FAILED))?;
            print_listing(files);
        }
        Command::Upload { files, mime_type } => {
            upload(&mut dashboard, files, mime_type).await?;
        }
        Command::Download { id, filename } => {
            let path = dashboard
                .files()
                .download_record(id, &filename)
                .await
                .map_err(|e| e.user_message(DOWNLOAD_FAILED))?;
            println!("Saved {}", path.display());
        }
        Command::Delete { id, page } => {
            let files = dashboard.files();
            files
                .load_page(page)
                .await
                .map_err(|e| e.user_message(LOAD_FAILED))?;
            files
                .delete_record(id)
                .await
                .map_err(|e| e.user_message(DELETE_FAILED))?;
            println!("Deleted file {}", id);
            print_listing(files);
        }
        Command::Stats => {
            dashboard.open().await;
            let view = dashboard.stats_view().ok_or_else(|| {
                dashboard
                    .stats()
                    .error()
                    .unwrap_or_else(|| STATS_FAILED.to_string())
            })?;
            println!("Files:          {}", view.file_count);
            println!("Used:           {}", view.quota_label);
            println!("                {}", view.quota_text());
            println!("Stored on disk: {}", view.physical_size);
            println!("Saved:          {} ({})", view.savings_size, view.savings_text());
        }
        Command::Login { .. } | Command::Register { .. } | Command::Logout => {}
    }
    Ok(())
}

async fn upload(
    dashboard: &mut Dashboard,
    paths: Vec<PathBuf>,
    mime_type: Option<String>,
) -> Result<(), String> {
    let mut batch = Vec::with_capacity(paths.len());
    for path in paths {
        let content = tokio::fs::read(&path)
            .await
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| format!("Not a file: {}", path.display()))?;
        batch.push(FileData::new(content, filename, mime_type.clone()));
    }

    let uploads = dashboard.uploads();
    uploads.enqueue(batch);
    while uploads.active_count() > 0 {
        tokio::time::sleep(Duration::from_millis(250)).await;
        for task in uploads.tasks() {
            if task.status == UploadStatus::Uploading {
                eprintln!("  {} {}%", task.display_key(), task.progress);
            }
        }
    }
    uploads.wait_idle().await;

    let mut failed = 0;
    for task in uploads.tasks() {
        match task.status {
            UploadStatus::Succeeded => println!(
                "ok     {} ({}) {}",
                task.name,
                task.display_size(),
                task.short_hash().unwrap_or_default()
            ),
            _ => {
                failed += 1;
                println!(
                    "failed {}: {}",
                    task.name,
                    task.error.as_deref().unwrap_or_default()
                );
            }
        }
    }
    dashboard.process_events().await;

    if failed > 0 {
        return Err(format!("{} upload(s) failed", failed));
    }
    Ok(())
}

fn print_listing(files: &FileDataClient) {
    let state = files.snapshot();
    if state.records.is_empty() {
        println!("No files");
    }
    for record in &state.records {
        println!(
            "{:>6}  {:<40} {:<6} {:>10}  {}",
            record.id,
            record.filename,
            record.type_badge(),
            record.display_size(),
            record.display_created_at()
        );
    }
    println!(
        "Page {} of {} ({} files)",
        state.pagination.current_page, state.pagination.total_pages, state.pagination.total_files
    );
}
