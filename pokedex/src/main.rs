use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api::{self, ApiConfig, DEFAULT_API_BASE};
use pokedex::components::{
    Component, DetailPanel, DetailPanelProps, DexList, DexListProps, EvolutionPanel,
    EvolutionPanelProps, Footer, FooterProps, BG_BASE,
};
use pokedex::effect::Effect;
use pokedex::logging::{self, DEFAULT_LOG_LEVEL};
use pokedex::reducer::reducer;
use pokedex::state::{AppState, FocusArea, DEFAULT_LIST_LIMIT, DETAIL_COLUMN_PERCENT};

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse PokeAPI creatures, pokedex entries and evolution chains")]
struct Args {
    /// PokeAPI base URL
    #[arg(long, env = "POKEDEX_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Number of creatures to list
    #[arg(
        long,
        env = "POKEDEX_LIST_LIMIT",
        default_value_t = DEFAULT_LIST_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    limit: u32,

    /// Response cache directory (defaults to the user cache dir)
    #[arg(long, env = "POKEDEX_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Always hit the network
    #[arg(long)]
    no_cache: bool,

    /// Write logs to this file. Logging is off without it.
    #[arg(long, env = "POKEDEX_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "POKEDEX_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokedexComponentId {
    DexList,
    Detail,
    Evolution,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokedexContext {
    DexList,
    Detail,
    Evolution,
}

impl EventRoutingState<PokedexComponentId, PokedexContext> for AppState {
    fn focused(&self) -> Option<PokedexComponentId> {
        match self.focus {
            FocusArea::DexList => Some(PokedexComponentId::DexList),
            FocusArea::Detail => Some(PokedexComponentId::Detail),
            FocusArea::Evolution => Some(PokedexComponentId::Evolution),
        }
    }

    fn modal(&self) -> Option<PokedexComponentId> {
        None
    }

    fn binding_context(&self, id: PokedexComponentId) -> PokedexContext {
        match id {
            PokedexComponentId::DexList => PokedexContext::DexList,
            PokedexComponentId::Detail => PokedexContext::Detail,
            PokedexComponentId::Evolution => PokedexContext::Evolution,
        }
    }

    fn default_context(&self) -> PokedexContext {
        PokedexContext::DexList
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_base,
        limit,
        cache_dir,
        no_cache,
        log_file,
        log_level,
        debug: debug_args,
    } = Args::parse();

    if let Some(path) = &log_file {
        logging::init(path, &log_level)?;
    }

    let cache_dir = if no_cache {
        None
    } else {
        Some(cache_dir.unwrap_or_else(api::default_cache_dir))
    };
    tracing::info!(%api_base, ?cache_dir, limit, "starting pokedex");
    api::configure(ApiConfig {
        base_url: api_base,
        cache_dir,
    });

    let debug = DebugSession::new(debug_args);

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(limit))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("pokedex exited");
    Ok(())
}

struct PokedexUi {
    dex_list: DexList,
    detail: DetailPanel,
    evolution: EvolutionPanel,
    footer: Footer,
}

impl PokedexUi {
    fn new() -> Self {
        Self {
            dex_list: DexList::new(),
            detail: DetailPanel,
            evolution: EvolutionPanel::new(),
            footer: Footer::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokedexComponentId>,
    ) {
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(3)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(100 - DETAIL_COLUMN_PERCENT),
                Constraint::Percentage(DETAIL_COLUMN_PERCENT),
            ])
            .split(rows[0]);
        let detail_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[1]);

        event_ctx.set_component_area(PokedexComponentId::DexList, columns[0]);
        self.dex_list.render(
            frame,
            columns[0],
            DexListProps {
                state,
                is_focused: state.focus == FocusArea::DexList,
            },
        );

        event_ctx.set_component_area(PokedexComponentId::Detail, detail_rows[0]);
        self.detail.render(
            frame,
            detail_rows[0],
            DetailPanelProps {
                state,
                is_focused: state.focus == FocusArea::Detail,
            },
        );

        event_ctx.set_component_area(PokedexComponentId::Evolution, detail_rows[1]);
        self.evolution.render(
            frame,
            detail_rows[1],
            EvolutionPanelProps {
                state,
                is_focused: state.focus == FocusArea::Evolution,
            },
        );

        self.footer.render(frame, rows[1], FooterProps { state });
    }

    fn handle_list_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = DexListProps {
            state,
            is_focused: true,
        };
        handler_response(self.dex_list.handle_event(event, props).into_iter().collect())
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = DetailPanelProps {
            state,
            is_focused: true,
        };
        handler_response(self.detail.handle_event(event, props).into_iter().collect())
    }

    fn handle_evolution_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = EvolutionPanelProps {
            state,
            is_focused: true,
        };
        handler_response(self.evolution.handle_event(event, props).into_iter().collect())
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokedexUi::new()));
    let mut bus: EventBus<AppState, Action, PokedexComponentId, PokedexContext> = EventBus::new();
    let keybindings: Keybindings<PokedexContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(PokedexComponentId::DexList, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PokedexComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    let ui_evo = Rc::clone(&ui);
    bus.register(PokedexComponentId::Evolution, move |event, state| {
        ui_evo
            .borrow_mut()
            .handle_evolution_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) => match key.code {
            KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            KeyCode::Tab => HandlerResponse::action(Action::FocusNext),
            KeyCode::BackTab => HandlerResponse::action(Action::FocusPrev),
            KeyCode::Char('1') => HandlerResponse::action(Action::FocusSet(FocusArea::DexList)),
            KeyCode::Char('2') => HandlerResponse::action(Action::FocusSet(FocusArea::Detail)),
            KeyCode::Char('3') => {
                HandlerResponse::action(Action::FocusSet(FocusArea::Evolution))
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// One keyed task per request kind; a newer request replaces the running one.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadPokemonList { offset, limit } => {
            ctx.tasks().spawn(TaskKey::new("pokemon_list"), async move {
                match api::list_pokemon(offset, limit).await {
                    Ok(names) => Action::PokemonListDidLoad(names),
                    Err(error) => Action::PokemonListDidError(error.to_string()),
                }
            });
        }
        Effect::LoadPokemonDetail { name } => {
            ctx.tasks().spawn(TaskKey::new("pokemon"), async move {
                match api::fetch_pokemon_detail(&name).await {
                    Ok(detail) => Action::PokemonDidLoad { name, detail },
                    Err(error) => Action::PokemonDidError {
                        name,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadPokemonSpecies { name, species } => {
            ctx.tasks().spawn(TaskKey::new("species"), async move {
                match api::fetch_pokemon_species(&species).await {
                    Ok(species) => Action::SpeciesDidLoad { name, species },
                    Err(error) => Action::SpeciesDidError {
                        name,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadEvolutionChain { name, url } => {
            ctx.tasks().spawn(TaskKey::new("evolution"), async move {
                match api::fetch_evolution_chain(&url).await {
                    Ok(chain) => Action::EvolutionDidLoad { name, chain },
                    Err(error) => Action::EvolutionDidError {
                        name,
                        error: error.to_string(),
                    },
                }
            });
        }
    }
}
