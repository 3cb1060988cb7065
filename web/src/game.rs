use core::time::Duration;

use crate::audio::CueDeck;
use crate::input;
use crate::theme::Theme;
use crate::utils::{js_random_seed, LocalOrDefault};
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use komichi_core as game;
use game::PathCarver;
use wasm_bindgen::JsCast;
use web_time::Instant;
use yew::prelude::*;

/// Frame-callback period driving the scheduler and the countdown display.
const TICK_MS: u32 = 50;

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Step(game::Direction),
    Tick,
    NewGame,
    ToggleTheme,
}

#[derive(Properties, Clone, Debug, PartialEq)]
pub(crate) struct GameProps {
    #[prop_or_default]
    pub seed: Option<String>,
    #[prop_or_default]
    pub route: bool,
}

#[derive(Debug)]
pub(crate) struct GameView {
    session: game::GameSession,
    seed: u64,
    epoch: Instant,
    prev_display: (u32, u32),
    cues: CueDeck,
    theme: Theme,
    show_route: bool,
    _tick_interval: Interval,
    _keydown: EventListener,
}

impl GameView {
    fn new_session(seed: u64, now: Duration) -> game::GameSession {
        let config = game::GameConfig::default();
        let path = game::WindingPathCarver::new(seed)
            .carve(config)
            .expect("default grid dimensions are non-degenerate");
        log::debug!("carved a route of {} cells", path.len());
        game::GameSession::new(path, config, now)
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Countdown and shrink-scale permille; a change means a redraw.
    fn display_state(&self) -> (u32, u32) {
        let countdown = (self.session.countdown_progress(self.now()) * 1000.0) as u32;
        let scale = (self.session.engine().player_scale() * 1000.0) as u32;
        (countdown, scale)
    }

    fn create_ticker(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(TICK_MS, move || link.send_message(Msg::Tick))
    }

    fn create_key_listener(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&gloo::utils::document(), "keydown", move |event| {
            let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                return;
            };
            // One request per physical press; held-key auto-repeat is dropped.
            if event.repeat() {
                return;
            }
            let Some(direction) = input::direction_for_key(&event.key()) else {
                return;
            };
            event.prevent_default();
            log::trace!("key {} -> {:?}", event.key(), direction);
            link.send_message(Msg::Step(direction));
        })
    }

    fn phase_class(&self) -> Classes {
        use game::GamePhase::*;
        classes!(match self.session.engine().phase() {
            Active => "in-progress",
            Resetting => "lose",
            Won => "win",
        })
    }

    fn tile_view(&self, coords: game::Coord2) -> Html {
        let engine = self.session.engine();
        let mut class = classes!("tile");
        if engine.visited_at(coords) {
            class.push("lit");
        }
        if coords == engine.path().goal() {
            class.push("goal");
        }
        if self.show_route && engine.path().contains(coords) {
            class.push("route");
        }

        if coords == engine.player() {
            class.push("player");
            let style = format!("transform: scale({:.3});", engine.player_scale());
            html! { <td {class} {style}/> }
        } else {
            html! { <td {class}/> }
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = props
            .seed
            .as_deref()
            .and_then(|seed| seed.parse().ok())
            .unwrap_or_else(js_random_seed);
        log::debug!("session seed: {}", seed);

        Self {
            session: Self::new_session(seed, Duration::ZERO),
            seed,
            epoch: Instant::now(),
            prev_display: (0, 1000),
            cues: CueDeck::new(),
            theme: LocalOrDefault::local_or_default(),
            show_route: props.route,
            _tick_interval: Self::create_ticker(ctx),
            _keydown: Self::create_key_listener(ctx),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Step(direction) => {
                if !self.session.engine().phase().is_active() {
                    return false;
                }
                let outcome = self.session.handle_move(direction, self.now());
                log::debug!("move {:?}: {:?}", direction, outcome);
                match outcome {
                    game::MoveOutcome::Stepped | game::MoveOutcome::Won => {
                        self.cues.play_correct()
                    }
                    game::MoveOutcome::Strayed => self.cues.play_wrong(),
                    game::MoveOutcome::NoChange => {}
                }
                outcome.has_update()
            }
            Tick => {
                let outcome = self.session.tick(self.now());
                if outcome == game::TickOutcome::TimedOut {
                    log::debug!("countdown ran out");
                    self.cues.play_wrong();
                }
                let display = self.display_state();
                let changed = display != self.prev_display;
                self.prev_display = display;
                outcome.has_update() || changed
            }
            NewGame => {
                self.seed = js_random_seed();
                log::debug!("new session, seed: {}", self.seed);
                self.session = Self::new_session(self.seed, self.now());
                true
            }
            ToggleTheme => {
                self.theme = self.theme.next();
                Theme::apply(self.theme);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let engine = self.session.engine();
        let (rows, cols) = engine.size();
        let best = engine.best_score().to_string();
        let remaining = 1000 - (self.session.countdown_progress(self.now()) * 1000.0) as u32;

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_toggle_theme = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            ToggleTheme
        });

        html! {
            <div class="komichi">
                <nav>
                    <aside>{best}</aside>
                    <span><button class={self.phase_class()} onclick={cb_new_game}/></span>
                    <aside>
                        <progress max="1000" value={remaining.to_string()}/>
                        <small onclick={cb_toggle_theme}>{self.theme.next().scheme()}</small>
                    </aside>
                </nav>
                <table class={engine.phase().is_active().then_some("playable")}>
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                { for (0..cols).map(|col| self.tile_view((row, col))) }
                            </tr>
                        })
                    }
                </table>
            </div>
        }
    }
}
