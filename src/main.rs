// ============================================================================
// LiquidScan - Dashboard terminal du scanner ICT
// ============================================================================
// Récupère périodiquement les setups du service de scan, les affiche
// (hot d'abord) et permet de s'inscrire sur la waitlist.
//
// Architecture :
// 1. Thread principal : boucle synchrone render -> input (crossterm)
// 2. Thread worker : UN runtime tokio current-thread qui héberge le
//    scheduler, les fetchs et les envois waitlist
// 3. État partagé : Arc<Mutex<App>>, jamais verrouillé pendant un .await
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use liquidscan::api::{ScanApi, ScannerClient};
use liquidscan::app::{lock_app, App, SharedApp};
use liquidscan::commands::{handle_event, AppCommand};
use liquidscan::config::Config;
use liquidscan::pipeline::{refresh_setups, submit_waitlist};
use liquidscan::scheduler::RefreshScheduler;
use liquidscan::ui::{render, EventHandler};

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier avec rotation quotidienne.
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/liquidscan/logs/liquidscan.log
///
/// # Contrôler le niveau de log
/// RUST_LOG=liquidscan=trace cargo run
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "liquidscan.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // UI et worker sur deux threads
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "liquidscan=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::from_env().context("Configuration invalide")?;

    init_logging(&config.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(
        api_url = %config.api_url,
        refresh_secs = config.refresh_interval.as_secs(),
        "LiquidScan starting up"
    );

    let app = App::shared();

    // CONCEPT RUST : channel tokio non borné
    // - send() est synchrone : utilisable depuis la boucle UI
    // - recv().await côté worker
    let (command_tx, command_rx) = mpsc::unbounded_channel::<AppCommand>();

    let worker = spawn_background_worker(config, app.clone(), command_rx)?;

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &app, &events, &command_tx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Démontage : fermer le channel arrête le worker s'il tourne encore
    drop(command_tx);
    if worker.join().is_err() {
        error!("Worker thread panicked");
    }
    lock_app(&app).teardown();

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker
// ============================================================================

/// Lance le thread worker et son runtime tokio mono-thread
fn spawn_background_worker(
    config: Config,
    app: SharedApp,
    command_rx: mpsc::UnboundedReceiver<AppCommand>,
) -> Result<thread::JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Échec de la création du runtime tokio")?;

    let client = ScannerClient::new(&config).context("Échec de la création du client HTTP")?;

    info!("Spawning background worker thread");
    thread::Builder::new()
        .name("liquidscan-worker".to_string())
        .spawn(move || runtime.block_on(worker_loop(config, app, client, command_rx)))
        .context("Échec du lancement du thread worker")
}

/// Boucle du worker : scheduler + traitement des commandes
async fn worker_loop(
    config: Config,
    app: SharedApp,
    client: ScannerClient,
    mut command_rx: mpsc::UnboundedReceiver<AppCommand>,
) {
    // Diagnostic seulement : n'attend pas et ne bloque pas le premier scan
    let probe = client.clone();
    tokio::spawn(async move {
        match probe.health().await {
            Ok(message) => info!(%message, "Scan service reachable"),
            Err(e) => warn!(error = %e, "Scan service health check failed"),
        }
    });

    let api: Arc<dyn ScanApi> = Arc::new(client);

    let mut scheduler = {
        let (app, api) = (app.clone(), api.clone());
        RefreshScheduler::start(config.refresh_interval, move || {
            let (app, api) = (app.clone(), api.clone());
            async move { refresh_setups(&app, api.as_ref()).await }
        })
    };

    while let Some(command) = command_rx.recv().await {
        info!(?command, "Worker received command");

        match command {
            AppCommand::RefreshNow => scheduler.refresh_now(),
            AppCommand::SubmitWaitlist { email } => {
                let (app, api) = (app.clone(), api.clone());
                tokio::spawn(async move { submit_waitlist(&app, api.as_ref(), email).await });
            }
            AppCommand::Shutdown => break,
        }
    }

    scheduler.stop();
    lock_app(&app).teardown();
    info!("Worker exiting");
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération : render -> input. Les données arrivent du worker
// directement dans App, la boucle n'a qu'à redessiner.
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &SharedApp,
    events: &EventHandler,
    command_tx: &mpsc::UnboundedSender<AppCommand>,
) -> Result<()> {
    loop {
        if !lock_app(app).is_running() {
            break;
        }

        terminal.draw(|frame| {
            let state = lock_app(app);
            render(frame, &state);
        })?;

        match events.next() {
            Ok(event) => {
                let command = handle_event(&mut lock_app(app), &event);
                if let Some(command) = command {
                    if command_tx.send(command).is_err() {
                        error!("Worker disconnected, command dropped");
                    }
                }
            }
            Err(e) => {
                error!(error = ?e, "Failed to read terminal event");
            }
        }
    }

    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    Ok(())
}
