use crate::api::Registry;
use crate::config::Config;
use crate::error::AppError;
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::logger::StateLogger;
use crate::state::State;
use crate::ui::Theme;
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub type NetworkEventSender = std::sync::mpsc::Sender<NetworkEvent>;
type NetworkEventReceiver = std::sync::mpsc::Receiver<NetworkEvent>;
pub type ConfigSaveSender = std::sync::mpsc::Sender<()>;
type ConfigSaveReceiver = std::sync::mpsc::Receiver<()>;
type LogReceiver = std::sync::mpsc::Receiver<String>;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    state: Arc<Mutex<State>>,
    config: Config,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config) -> Result<()> {
        let (log_tx, log_rx) = std::sync::mpsc::channel::<String>();
        log::set_boxed_logger(Box::new(StateLogger::new(log_tx)))
            .map_err(|e| AppError::Logger(e.to_string()))?;
        log::set_max_level(LevelFilter::Debug);

        info!("Starting application...");
        let (tx, rx) = std::sync::mpsc::channel::<NetworkEvent>();
        let (config_save_tx, config_save_rx) = std::sync::mpsc::channel::<()>();
        let theme = Theme::by_name(&config.theme_name);
        let has_session = config.session_cookie.is_some();
        let mut app = App {
            state: Arc::new(Mutex::new(State::new(
                tx.clone(),
                config_save_tx,
                Duration::from_millis(config.debounce_ms),
                config.min_search_length,
                has_session,
                theme,
            ))),
            config,
        };
        app.start_network(rx)?;
        app.start_config_saver(config_save_rx);
        app.start_ui(tx, log_rx).await?;

        // Persist a session cookie entered during this run.
        let cookie = {
            let state = app.state.lock().await;
            state.get_session_cookie().map(str::to_owned)
        };
        if let Some(cookie) = cookie {
            if let Err(e) = app.config.save_session_cookie(cookie) {
                error!("Failed to save config on exit: {}", e);
            }
        }

        info!("Exiting application...");
        Ok(())
    }

    /// Start a thread to handle config save requests.
    ///
    fn start_config_saver(&self, receiver: ConfigSaveReceiver) {
        let state = Arc::clone(&self.state);
        let mut config = self.config.clone();
        std::thread::spawn(move || {
            while receiver.recv().is_ok() {
                let cookie = match state.try_lock() {
                    Ok(state_guard) => state_guard.get_session_cookie().map(str::to_owned),
                    Err(_) => None,
                };
                if let Some(cookie) = cookie {
                    if let Err(e) = config.save_session_cookie(cookie) {
                        error!("Failed to save config: {}", e);
                    }
                }
            }
        });
    }

    /// Start a separate thread for asynchronous state mutations.
    ///
    fn start_network(&self, net_receiver: NetworkEventReceiver) -> Result<()> {
        debug!("Creating new thread for asynchronous networking...");
        let cloned_state = Arc::clone(&self.state);
        let base_url = self.config.base_url.clone();
        let session_cookie = self.config.session_cookie.clone();
        let submit_path = self.config.submit_path.clone();
        std::thread::spawn(move || {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .unwrap()
                .block_on(async {
                    let mut registry =
                        Registry::new(&base_url, session_cookie.as_deref(), &submit_path);
                    let mut network_event_handler =
                        NetworkEventHandler::new(&cloned_state, &mut registry);
                    while let Ok(network_event) = net_receiver.recv() {
                        match network_event_handler.handle(network_event).await {
                            Ok(_) => (),
                            Err(e) => error!("Failed to handle network event: {}", e),
                        }
                    }
                })
        });
        Ok(())
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    async fn start_ui(&mut self, net_sender: NetworkEventSender, log_rx: LogReceiver) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        // A configured session connects immediately; otherwise the welcome
        // screen collects a cookie first.
        if self.config.session_cookie.is_some() {
            net_sender.send(NetworkEvent::Connect {
                session_cookie: None,
            })?;
        }

        let terminal_event_handler = TerminalEventHandler::new();
        loop {
            let mut state = self.state.lock().await;
            while let Ok(entry) = log_rx.try_recv() {
                state.push_log_entry(entry);
            }
            if let Ok(size) = terminal.backend().size() {
                state.set_terminal_size(size);
            };
            terminal.draw(|frame| crate::ui::render(frame, &mut state))?;
            if !terminal_event_handler.handle_next(&mut state)? {
                debug!("Received application exit request.");
                break;
            }
        }

        disable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;

        Ok(())
    }
}
