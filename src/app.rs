use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use crate::{
  action::Action,
  components::{chat::Chat, Component},
  config::Config,
  generator::SqlGenerator,
  llm::{GeminiClient, LlmClient},
  mode::Mode,
  sql::Executor,
  tui,
};

pub struct App {
  pub config: Config,
  pub tick_rate: f64,
  pub frame_rate: f64,
  pub components: Vec<Box<dyn Component>>,
  pub should_quit: bool,
  pub should_suspend: bool,
  pub mode: Mode,
  pub last_tick_key_events: Vec<KeyEvent>,
  pub has_results: bool,
  generator: SqlGenerator,
  executor: Executor,
}

/// Keymap mode transitions, kept in lockstep with the focus rules inside the
/// chat component: submitting a question hands focus back to the transcript,
/// and the results keymap is only reachable while a result set exists.
pub fn next_mode(mode: Mode, has_results: bool, action: &Action) -> (Mode, bool) {
  match action {
    Action::FocusInput => (Mode::Input, has_results),
    Action::FocusTranscript | Action::SubmitQuestion(_) => (Mode::Home, has_results),
    Action::FocusResults if has_results => (Mode::Results, has_results),
    Action::QueryResult(_) => (mode, true),
    Action::ClearTranscript => (if mode == Mode::Results { Mode::Home } else { mode }, false),
    _ => (mode, has_results),
  }
}

impl App {
  pub async fn new(tick_rate: f64, frame_rate: f64, cli_args: &crate::cli::Cli) -> Result<Self> {
    let config = Config::new()?;
    let mode = Mode::Home;
    let mut chat = Chat::new();

    // Credentials are resolved once at startup; manual entry goes through
    // the --prompt-credentials flow in the CLI. A missing credential leaves
    // the matching component unconfigured instead of aborting.
    let mut generator = SqlGenerator::new(config.generator.preferred_models.clone());
    if let Some(api_key) = cli_args.resolve_api_key() {
      let client = GeminiClient::new(&api_key);
      let masked = client.masked_key();
      let model_override = cli_args.model.clone().or_else(|| config.generator.model.clone());
      match generator.configure(Arc::new(client) as Arc<dyn LlmClient>, model_override).await {
        Ok(model) => {
          eprintln!("Generator ready, model: {model}");
          chat.set_generator_status(Some(model), Some(masked));
        },
        Err(e) => {
          eprintln!("Generator configuration failed: {e}");
        },
      }
    } else {
      eprintln!("No API key found; set GOOGLE_API_KEY or pass --api-key");
    }

    let mut executor = Executor::new();
    if let Some(conn_str) = cli_args.resolve_connection_string() {
      match executor.set_connection_string(&conn_str).await {
        Ok(()) => {
          eprintln!("Database connection tested OK");
          chat.set_executor_status(true);
        },
        Err(e) => {
          // The connection string stays set; the database may come up later.
          eprintln!("Database connection test failed: {e}");
          chat.set_executor_status(true);
        },
      }
    } else {
      eprintln!("No connection string found; set DB_CONNECTION_STRING to enable execution");
    }

    Ok(Self {
      tick_rate,
      frame_rate,
      components: vec![Box::new(chat)],
      should_quit: false,
      should_suspend: false,
      config,
      mode,
      last_tick_key_events: Vec::new(),
      has_results: false,
      generator,
      executor,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();

    let mut tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
    tui.enter()?;

    for component in self.components.iter_mut() {
      component.register_action_handler(action_tx.clone())?;
    }

    for component in self.components.iter_mut() {
      component.register_config_handler(self.config.clone())?;
    }

    for component in self.components.iter_mut() {
      component.init(Rect::default())?;
    }

    loop {
      if let Some(e) = tui.next().await {
        match e {
          tui::Event::Quit => action_tx.send(Action::Quit)?,
          tui::Event::Tick => action_tx.send(Action::Tick)?,
          tui::Event::Render => action_tx.send(Action::Render)?,
          tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
          tui::Event::Key(key) => {
            if let Some(keymap) = self.config.keybindings.get(&self.mode) {
              if let Some(action) = keymap.get(&vec![key]) {
                log::info!("Got action: {action:?}");
                action_tx.send(action.clone())?;
              } else {
                // If the key was not handled as a single key action,
                // then consider it for multi-key combinations.
                self.last_tick_key_events.push(key);

                // Check for multi-key combinations
                if let Some(action) = keymap.get(&self.last_tick_key_events) {
                  log::info!("Got action: {action:?}");
                  action_tx.send(action.clone())?;
                }
              }
            };
          },
          _ => {},
        }
        for component in self.components.iter_mut() {
          if let Some(action) = component.handle_events(Some(e.clone()))? {
            action_tx.send(action)?;
          }
        }
      }

      while let Ok(action) = action_rx.try_recv() {
        if action != Action::Tick && action != Action::Render {
          log::debug!("{action:?}");
        }
        let (mode, has_results) = next_mode(self.mode, self.has_results, &action);
        self.mode = mode;
        self.has_results = has_results;
        match action {
          Action::Tick => {
            self.last_tick_key_events.drain(..);
          },
          Action::Quit => self.should_quit = true,
          Action::Suspend => self.should_suspend = true,
          Action::Resume => self.should_suspend = false,
          Action::Resize(w, h) => {
            tui.resize(Rect::new(0, 0, w, h))?;
            tui.draw(|f| {
              for component in self.components.iter_mut() {
                let r = component.draw(f, f.area());
                if let Err(e) = r {
                  action_tx.send(Action::Error(format!("Failed to draw: {e:?}"))).unwrap();
                }
              }
            })?;
          },
          Action::Render => {
            tui.draw(|f| {
              for component in self.components.iter_mut() {
                let r = component.draw(f, f.area());
                if let Err(e) = r {
                  action_tx.send(Action::Error(format!("Failed to draw: {e:?}"))).unwrap();
                }
              }
            })?;
          },
          Action::SubmitQuestion(ref question) => {
            // One blocking call per question, no retry. A slow provider
            // stalls this session until the call returns or errors.
            match self.generator.generate(question).await {
              Ok(sql) => dispatch(action_tx.clone(), Action::SqlGenerated(sql)).await?,
              Err(e) => dispatch(action_tx.clone(), Action::Error(e.to_string())).await?,
            }
          },
          Action::ExecuteSql(ref sql) => {
            match self.executor.execute(sql).await {
              Ok(result) => dispatch(action_tx.clone(), Action::QueryResult(result)).await?,
              Err(e) => dispatch(action_tx.clone(), Action::Error(e.to_string())).await?,
            }
          },
          Action::TranscriptExported(ref path) => {
            log::info!("Transcript exported to {path}");
          },
          _ => {},
        }
        for component in self.components.iter_mut() {
          if let Some(action) = component.update(action.clone())? {
            action_tx.send(action)?
          };
        }
      }

      if self.should_suspend {
        tui.suspend()?;
        action_tx.send(Action::Resume)?;
        tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
        tui.enter()?;
      } else if self.should_quit {
        tui.stop()?;
        break;
      }
    }
    tui.exit()?;
    Ok(())
  }
}

pub async fn dispatch(tx: tokio::sync::mpsc::UnboundedSender<Action>, action: Action) -> Result<()> {
  if let Err(e) = tx.send(action) {
    log::error!("Error dispatching: {e:?}");
  }

  Ok(())
}
