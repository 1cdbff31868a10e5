//! Weather search TUI

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use weather_search::action::Action;
use weather_search::api::{DEFAULT_BASE_URL, WeatherClient};
use weather_search::components::{
    Component, SearchOverlay, SearchOverlayProps, WeatherDisplay, WeatherDisplayProps,
};
use weather_search::effect::{Effect, WeatherTaskKeys};
use weather_search::locate::{
    Coordinates, DEFAULT_GEOLOCATION_URL, Disabled, FixedPosition, Geolocator, IpGeolocator,
};
use weather_search::reducer::reducer;
use weather_search::state::{AppState, DEFAULT_CITY};
use weather_search::suggest::{self, SUGGEST_FETCH_TASK};

/// Weather lookup with search-as-you-type suggestions
#[derive(Parser, Debug)]
#[command(name = "weather-search")]
#[command(about = "Look up current weather and the forecast for a city")]
struct Args {
    /// City to show on startup (skips geolocation)
    #[arg(long, short)]
    city: Option<String>,

    /// City shown when geolocation fails
    #[arg(long, default_value = DEFAULT_CITY)]
    default_city: String,

    /// Weather API collection endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// IP geolocation endpoint
    #[arg(long, default_value = DEFAULT_GEOLOCATION_URL)]
    geolocation_url: String,

    /// Use this latitude instead of looking up the position
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Use this longitude instead of looking up the position
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Never look up the current position
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    no_geolocate: bool,

    /// Refresh interval in seconds (minimum 1)
    #[arg(long, short, default_value = "300", value_parser = clap::value_parser!(u64).range(1..))]
    refresh_interval: u64,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

impl Args {
    fn geolocator(&self) -> Arc<dyn Geolocator> {
        if self.no_geolocate {
            return Arc::new(Disabled);
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Arc::new(FixedPosition(Coordinates { lat, lon })),
            _ => Arc::new(IpGeolocator::new(self.geolocation_url.clone())),
        }
    }

    fn initial_action(&self) -> Action {
        match &self.city {
            Some(city) => Action::WeatherFetchCity(city.clone()),
            None => Action::GeoLocate,
        }
    }
}

/// Services the effect handler runs against
struct Services {
    client: WeatherClient,
    geolocator: Arc<dyn Geolocator>,
    weather_tasks: WeatherTaskKeys,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum WeatherComponentId {
    Display,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum WeatherContext {
    Main,
    Search,
}

impl EventRoutingState<WeatherComponentId, WeatherContext> for AppState {
    fn focused(&self) -> Option<WeatherComponentId> {
        if self.search_mode {
            Some(WeatherComponentId::Search)
        } else {
            Some(WeatherComponentId::Display)
        }
    }

    fn modal(&self) -> Option<WeatherComponentId> {
        if self.search_mode {
            Some(WeatherComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: WeatherComponentId) -> WeatherContext {
        match id {
            WeatherComponentId::Display => WeatherContext::Main,
            WeatherComponentId::Search => WeatherContext::Search,
        }
    }

    fn default_context(&self) -> WeatherContext {
        WeatherContext::Main
    }
}

fn init_logging(path: Option<&Path>) -> io::Result<()> {
    // The terminal belongs to the UI; without a file there is no subscriber
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let services = Arc::new(Services {
        client: WeatherClient::new(args.base_url.clone()),
        geolocator: args.geolocator(),
        weather_tasks: WeatherTaskKeys::default(),
    });
    let initial_action = args.initial_action();
    let default_city = args.default_city.clone();
    let refresh_interval = args.refresh_interval;

    let debug = DebugSession::new(args.debug);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(default_city))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    tracing::info!(base_url = services.client.base_url(), "starting weather search");

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &debug,
        store,
        refresh_interval,
        replay_actions,
        initial_action,
        services,
    )
    .await;

    // ===== Cleanup =====
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
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct WeatherUi {
    display: WeatherDisplay,
    search: SearchOverlay,
}

impl WeatherUi {
    fn new() -> Self {
        Self {
            display: WeatherDisplay,
            search: SearchOverlay::new(),
        }
    }

    fn search_props(state: &AppState, is_focused: bool) -> SearchOverlayProps<'_> {
        SearchOverlayProps {
            query: &state.search_query,
            suggestions: &state.suggestions,
            selected: state.suggestion_selected,
            suggestions_current: state.suggestions_current(),
            is_focused,
            on_query_change: Action::SearchQueryChange,
            on_query_submit: Action::SearchQuerySubmit,
            on_select: Action::SearchSelect,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<WeatherComponentId>,
    ) {
        event_ctx.set_component_area(WeatherComponentId::Display, area);

        let props = WeatherDisplayProps {
            state,
            is_focused: render_ctx.is_focused() && !state.search_mode,
        };
        self.display.render(frame, area, props);

        self.search.set_open(state.search_mode);
        if state.search_mode {
            let modal_area = centered_rect(60, 12, area);
            event_ctx.set_component_area(WeatherComponentId::Search, modal_area);
            let props = Self::search_props(state, render_ctx.is_focused());
            self.search.render(frame, area, props);
        } else {
            event_ctx
                .component_areas
                .remove(&WeatherComponentId::Search);
        }
    }

    fn handle_display_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .display
            .handle_event(event, props)
            .into_iter()
            .collect();
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

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.search.set_open(state.search_mode);
        let props = Self::search_props(state, true);
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
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
    refresh_interval: u64,
    replay_actions: Vec<ReplayItem<Action>>,
    initial_action: Action,
    services: Arc<Services>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(WeatherUi::new()));
    let mut bus: EventBus<AppState, Action, WeatherComponentId, WeatherContext> = EventBus::new();
    let keybindings: Keybindings<WeatherContext> = Keybindings::new();

    let ui_display = Rc::clone(&ui);
    bus.register(WeatherComponentId::Display, move |event, state| {
        ui_display
            .borrow_mut()
            .handle_display_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(WeatherComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(initial_action),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "refresh",
                    Duration::from_secs(refresh_interval),
                    || Action::WeatherRefresh,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &services),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: &Services) {
    match effect {
        Effect::FetchWeather(query) => {
            let client = services.client.clone();
            tracing::debug!(?query, "fetching weather");
            ctx.tasks().spawn(services.weather_tasks.next_key(), async move {
                match client.fetch(&query).await {
                    Ok(result) => {
                        tracing::info!(?query, found = result.is_some(), "weather loaded");
                        Action::WeatherDidLoad(result)
                    }
                    Err(e) => {
                        tracing::warn!(?query, error = %e, "weather fetch failed");
                        Action::WeatherDidError(e.to_string())
                    }
                }
            });
        }
        Effect::ScheduleSuggestions { query } => {
            suggest::schedule(ctx.tasks(), &query);
        }
        Effect::FetchSuggestions { key } => {
            let client = services.client.clone();
            tracing::debug!(?key, "suggestion cache miss");
            ctx.tasks().spawn(SUGGEST_FETCH_TASK, async move {
                match client.suggestions(&key).await {
                    Ok(results) => Action::SuggestDidLoad { key, results },
                    Err(e) => {
                        tracing::warn!(?key, error = %e, "suggestion fetch failed");
                        Action::SuggestDidError(e.to_string())
                    }
                }
            });
        }
        Effect::Geolocate => {
            let geolocator = Arc::clone(&services.geolocator);
            ctx.tasks().spawn("geolocate", async move {
                match geolocator.current_position().await {
                    Ok(Coordinates { lat, lon }) => {
                        tracing::info!(lat, lon, "position resolved");
                        Action::GeoDidLocate { lat, lon }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "geolocation failed, using default city");
                        Action::GeoDidFail(e.to_string())
                    }
                }
            });
        }
    }
}
