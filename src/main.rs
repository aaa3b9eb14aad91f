//! Castle Cannon entry point
//!
//! The web build wires the canvas and DOM to a `Session` and steps it once
//! per display refresh. The native build is a headless shot runner that
//! prints the round outcome as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlInputElement, MouseEvent, TouchEvent};

    use castle_cannon::Session;
    use castle_cannon::audio::WebAudio;
    use castle_cannon::platform::AnimationLoop;
    use castle_cannon::settings::{QualityPreset, Settings};
    use castle_cannon::shop::{self, UpgradeKind};
    use castle_cannon::sim::{GameMode, Screen};

    // The page owns drawing; each frame hands it the snapshot as JSON
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            const hook = window.castleCannon && window.castleCannon.present;
            if (typeof hook === 'function') {
                hook(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
    }

    type Shared = Rc<RefCell<Session<WebAudio>>>;

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Castle Cannon starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let viewport = fit_canvas(&canvas);

        let seed = js_sys::Date::now() as u64;
        let session: Shared = Rc::new(RefCell::new(Session::restore(seed, viewport, WebAudio::new())));

        log::info!("Session ready (seed {}, level {})", seed, session.borrow().state.level);

        setup_pointer_handlers(&canvas, session.clone());
        setup_touch_handlers(&canvas, session.clone());
        setup_buttons(&document, session.clone());
        setup_settings(&document, session.clone());
        setup_resize(&canvas, session.clone());

        let frame_loop = {
            let session = session.clone();
            let document = document.clone();
            AnimationLoop::start(move |_now| {
                let mut s = session.borrow_mut();
                s.frame();
                match serde_json::to_string(&s.snapshot()) {
                    Ok(json) => present_frame(&json),
                    Err(e) => log::warn!("Snapshot encode failed: {}", e),
                }
                update_hud(&document, &s);
            })?
        };

        setup_teardown(frame_loop, session);

        log::info!("Castle Cannon running!");
        Ok(())
    }

    /// Size the backing store for the device pixel ratio; returns CSS size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> Vec2 {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let w = canvas.client_width();
        let h = canvas.client_height();
        canvas.set_width((w as f64 * dpr) as u32);
        canvas.set_height((h as f64 * dpr) as u32);
        Vec2::new(w as f32, h as f32)
    }

    fn touch_point(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Vec2> {
        let touch = event.touches().get(0).or_else(|| event.changed_touches().get(0))?;
        let rect = canvas.get_bounding_client_rect();
        Some(Vec2::new(
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn listen<E, F>(target: &web_sys::EventTarget, name: &str, handler: F)
    where
        E: wasm_bindgen::convert::FromWasmAbi + 'static,
        F: FnMut(E) + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        if let Err(e) = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref()) {
            log::warn!("Failed to listen for {}: {:?}", name, e);
        }
        closure.forget();
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, session: Shared) {
        {
            let session = session.clone();
            listen(canvas, "mousedown", move |event: MouseEvent| {
                let mut s = session.borrow_mut();
                s.audio().resume();
                s.drag_start(Vec2::new(event.offset_x() as f32, event.offset_y() as f32));
            });
        }
        {
            let session = session.clone();
            listen(canvas, "mousemove", move |event: MouseEvent| {
                session
                    .borrow_mut()
                    .drag_move(Vec2::new(event.offset_x() as f32, event.offset_y() as f32));
            });
        }
        {
            let session = session.clone();
            listen(canvas, "mouseup", move |_event: MouseEvent| {
                session.borrow_mut().drag_end();
            });
        }
        listen(canvas, "mouseleave", move |_event: MouseEvent| {
            session.borrow_mut().pointer_leave();
        });
    }

    fn setup_touch_handlers(canvas: &HtmlCanvasElement, session: Shared) {
        {
            let session = session.clone();
            let canvas_clone = canvas.clone();
            listen(canvas, "touchstart", move |event: TouchEvent| {
                event.prevent_default();
                if let Some(at) = touch_point(&canvas_clone, &event) {
                    let mut s = session.borrow_mut();
                    s.audio().resume();
                    s.drag_start(at);
                }
            });
        }
        {
            let session = session.clone();
            let canvas_clone = canvas.clone();
            listen(canvas, "touchmove", move |event: TouchEvent| {
                event.prevent_default();
                if let Some(at) = touch_point(&canvas_clone, &event) {
                    session.borrow_mut().drag_move(at);
                }
            });
        }
        {
            let session = session.clone();
            listen(canvas, "touchend", move |event: TouchEvent| {
                event.prevent_default();
                session.borrow_mut().drag_end();
            });
        }
        listen(canvas, "touchcancel", move |_event: TouchEvent| {
            session.borrow_mut().pointer_leave();
        });
    }

    fn on_click<F>(document: &Document, id: &str, mut handler: F)
    where
        F: FnMut() + 'static,
    {
        if let Some(btn) = document.get_element_by_id(id) {
            listen(&btn, "click", move |_event: MouseEvent| handler());
        }
    }

    fn setup_buttons(document: &Document, session: Shared) {
        let screens = [
            ("shop-btn", Screen::Shop),
            ("leaderboard-btn", Screen::Leaderboard),
            ("login-btn", Screen::Login),
        ];
        for (id, screen) in screens {
            let session = session.clone();
            on_click(document, id, move || session.borrow_mut().open(screen));
        }

        for id in ["dismiss-btn", "shop-close-btn", "leaderboard-close-btn", "login-close-btn"] {
            let session = session.clone();
            on_click(document, id, move || session.borrow_mut().dismiss());
        }

        {
            let session = session.clone();
            on_click(document, "next-level-btn", move || session.borrow_mut().next_level());
        }

        for kind in UpgradeKind::ALL {
            let session = session.clone();
            on_click(document, &format!("buy-{}-btn", kind.as_str()), move || {
                if let Err(e) = session.borrow_mut().buy(kind) {
                    log::info!("Purchase refused: {}", e);
                }
            });
        }

        {
            let session = session.clone();
            on_click(document, "sign-in-btn", move || {
                let name = web_sys::window()
                    .and_then(|w| w.prompt_with_message("Display name").ok().flatten())
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty());
                if let Some(name) = name {
                    let uid = format!("local-{}", name.to_lowercase());
                    session.borrow_mut().sign_in(uid, name);
                }
            });
        }
        {
            let session = session.clone();
            on_click(document, "reset-progress-btn", move || {
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message("Erase all progress?").ok())
                    .unwrap_or(false);
                if confirmed && !session.borrow_mut().reset_progress() {
                    log::info!("Reset refused while a shot is in flight");
                }
            });
        }
        on_click(document, "sign-out-btn", move || session.borrow_mut().sign_out());
    }

    /// Apply one change to the player settings and persist them
    fn change_settings(session: &Shared, change: impl FnOnce(&mut Settings)) {
        let mut s = session.borrow_mut();
        let mut settings = s.settings().clone();
        change(&mut settings);
        s.set_settings(settings);
    }

    fn setup_settings(document: &Document, session: Shared) {
        on_click(document, "settings-btn", {
            let document = document.clone();
            move || {
                if let Some(panel) = document.get_element_by_id("settings-panel") {
                    let _ = panel.class_list().toggle("hidden");
                }
            }
        });

        // Preset buttons carry their preset name in data-quality
        if let Ok(nodes) = document.query_selector_all("[data-quality]") {
            for i in 0..nodes.length() {
                let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let Some(preset) = el.get_attribute("data-quality").and_then(|q| QualityPreset::from_str(&q)) else {
                    log::warn!("Unknown quality preset on {}", el.id());
                    continue;
                };
                let session = session.clone();
                listen(&el, "click", move |_event: MouseEvent| {
                    change_settings(&session, |s| s.quality = preset);
                });
            }
        }

        let toggles: [(&str, fn(&mut Settings) -> &mut bool); 4] = [
            ("toggle-particles", |s| &mut s.particles),
            ("toggle-trajectory", |s| &mut s.show_trajectory),
            ("toggle-mute", |s| &mut s.muted),
            ("toggle-reduced-motion", |s| &mut s.reduced_motion),
        ];
        for (id, field) in toggles {
            let session = session.clone();
            on_click(document, id, move || {
                change_settings(&session, |s| {
                    let flag = field(s);
                    *flag = !*flag;
                });
            });
        }

        let sliders: [(&str, fn(&mut Settings) -> &mut f32); 2] = [
            ("master-volume", |s| &mut s.master_volume),
            ("sfx-volume", |s| &mut s.sfx_volume),
        ];
        for (id, field) in sliders {
            let Some(input) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };
            let mut current = session.borrow().settings().clone();
            input.set_value_as_number(*field(&mut current) as f64 * 100.0);

            let session = session.clone();
            let slider = input.clone();
            listen(&input, "input", move |_event: web_sys::Event| {
                let value = (slider.value_as_number() / 100.0) as f32;
                change_settings(&session, |s| *field(s) = value);
            });
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, session: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        listen(&window, "resize", move |_event: web_sys::Event| {
            let viewport = fit_canvas(&canvas);
            session.borrow_mut().resize(viewport);
        });
    }

    /// Stop stepping once the page goes away; cancel a drag when hidden
    fn setup_teardown(frame_loop: AnimationLoop, session: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let frame_loop = Rc::new(RefCell::new(Some(frame_loop)));
        listen(&window, "pagehide", move |_event: web_sys::Event| {
            if let Some(frame_loop) = frame_loop.borrow_mut().take().filter(AnimationLoop::is_running) {
                frame_loop.stop();
                log::info!("Frame loop stopped (page hidden)");
            }
        });

        if let Some(document) = window.document() {
            let document_clone = document.clone();
            listen(&document, "visibilitychange", move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    session.borrow_mut().pointer_leave();
                }
            });
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn set_disabled(document: &Document, id: &str, disabled: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("disabled", disabled);
        }
    }

    /// Update HUD elements in DOM
    fn update_hud(document: &Document, session: &Session<WebAudio>) {
        let upgrades = &session.progression.upgrades;
        let stats = &session.progression.stats;
        let mode = session.state.mode;

        set_text(document, "#hud-level .hud-value", &session.state.level.to_string());
        set_text(document, "#hud-money .hud-value", &upgrades.money.to_string());
        set_text(document, "#hud-distance .hud-value", &format!("{}m", session.state.distance));
        set_text(document, "#hud-best .hud-value", &format!("{}m", stats.best_distance));
        if let Some(castle) = &session.state.target {
            set_text(
                document,
                "#hud-castle .hud-value",
                &format!("{}/{}", castle.current_health, castle.max_health),
            );
        }

        set_visible(document, "aim-prompt", mode == GameMode::Menu);
        set_visible(document, "landed-panel", mode == GameMode::Landed);
        set_visible(document, "cleared-panel", mode == GameMode::LevelCleared);
        set_visible(document, "shop-panel", mode == GameMode::Shop);
        set_visible(document, "leaderboard-panel", mode == GameMode::Leaderboard);
        set_visible(document, "login-panel", mode == GameMode::Login);

        if mode == GameMode::Shop {
            for kind in UpgradeKind::ALL {
                let id = format!("#shop-{}", kind.as_str());
                let label = if kind.value(upgrades) >= kind.cap() {
                    "MAX".to_string()
                } else {
                    format!("{} coins", shop::price(kind, upgrades))
                };
                set_text(document, &format!("{} .shop-price", id), &label);
                set_disabled(document, &format!("buy-{}-btn", kind.as_str()), !shop::can_buy(kind, upgrades));
                set_text(document, &format!("{} .shop-value", id), &format!("{:.2}", kind.value(upgrades)));
            }
        }

        if mode == GameMode::Leaderboard {
            if let Some(list) = document.get_element_by_id("leaderboard-list") {
                let rows: Vec<String> = session
                    .leaderboard
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(i, e)| {
                        format!(
                            "{}. {} - {}m (L{}, {})",
                            i + 1,
                            e.display_name,
                            e.score,
                            e.level,
                            castle_cannon::leaderboard::format_date(e.timestamp)
                        )
                    })
                    .collect();
                let text = if session.leaderboard.is_empty() {
                    "No distances recorded yet".to_string()
                } else {
                    rows.join("\n")
                };
                if list.text_content().as_deref() != Some(text.as_str()) {
                    list.set_text_content(Some(&text));
                }
            }
        }

        let settings = session.settings();
        set_text(document, "#settings-quality .settings-value", settings.quality.as_str());
        for (id, on) in [
            ("#toggle-particles", settings.particles),
            ("#toggle-trajectory", settings.show_trajectory),
            ("#toggle-mute", settings.muted),
            ("#toggle-reduced-motion", settings.reduced_motion),
        ] {
            set_text(document, &format!("{} .settings-value", id), if on { "On" } else { "Off" });
        }

        let player = session.player().map(|p| p.display_name.as_str()).unwrap_or("Guest");
        set_text(document, "#hud-player .hud-value", player);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::{env, fs, path::PathBuf};

    use anyhow::{Context, Result, anyhow};
    use glam::Vec2;
    use serde::Serialize;

    use castle_cannon::Session;
    use castle_cannon::shop::{self, UpgradeKind};
    use castle_cannon::sim::{GameMode, GameState, PhysicsConfig, RoundOutcome, Silent, UpgradeStats};

    const USAGE: &str = "Usage: castle-cannon [--angle <deg>] [--power <0..1>] [--level <n>] [--no-target] \
[--config <physics.json>] [--seed <n>] [--max-power <n>] [--aerodynamics <n>] [--bounciness <n>] \
[--money <n>] [--buy <kind>[,<kind>...]] [--viewport <WxH>] [--max-frames <n>]";

    #[derive(Debug)]
    struct Cli {
        angle_deg: f32,
        power: f32,
        level: u32,
        no_target: bool,
        config: Option<PathBuf>,
        seed: u64,
        upgrades: UpgradeStats,
        /// Purchases made before the shot, in order
        buy: Vec<UpgradeKind>,
        viewport: Vec2,
        max_frames: u32,
    }

    fn value<T: std::str::FromStr>(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<T>
    where
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw = args.next().ok_or_else(|| anyhow!("{flag} requires a value"))?;
        raw.parse::<T>()
            .with_context(|| format!("invalid {flag} value: {raw}"))
    }

    impl Cli {
        fn parse() -> Result<Self> {
            let mut args = env::args().skip(1);
            let mut cli = Cli {
                angle_deg: 45.0,
                power: 1.0,
                level: 1,
                no_target: false,
                config: None,
                seed: 1,
                upgrades: UpgradeStats::default(),
                buy: Vec::new(),
                viewport: Vec2::new(1280.0, 720.0),
                max_frames: 10_000,
            };

            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--angle" => cli.angle_deg = value(&mut args, "--angle")?,
                    "--power" => cli.power = value(&mut args, "--power")?,
                    "--level" => cli.level = value(&mut args, "--level")?,
                    "--no-target" => cli.no_target = true,
                    "--config" => cli.config = Some(value(&mut args, "--config")?),
                    "--seed" => cli.seed = value(&mut args, "--seed")?,
                    "--max-power" => cli.upgrades.max_power = value(&mut args, "--max-power")?,
                    "--aerodynamics" => cli.upgrades.aerodynamics = value(&mut args, "--aerodynamics")?,
                    "--bounciness" => cli.upgrades.bounciness = value(&mut args, "--bounciness")?,
                    "--money" => cli.upgrades.money = value(&mut args, "--money")?,
                    "--buy" => {
                        let raw: String = value(&mut args, "--buy")?;
                        cli.buy.extend(parse_purchases(&raw)?);
                    }
                    "--viewport" => {
                        let raw: String = value(&mut args, "--viewport")?;
                        cli.viewport = parse_viewport(&raw)?;
                    }
                    "--max-frames" => cli.max_frames = value(&mut args, "--max-frames")?,
                    "-h" | "--help" => {
                        println!("{USAGE}");
                        std::process::exit(0);
                    }
                    other => return Err(anyhow!("unknown argument: {other}. Use --help for usage.")),
                }
            }

            if !(0.0..=1.0).contains(&cli.power) {
                return Err(anyhow!("--power must be between 0 and 1, got {}", cli.power));
            }
            Ok(cli)
        }
    }

    fn parse_viewport(raw: &str) -> Result<Vec2> {
        let (w, h) = raw
            .split_once(['x', 'X'])
            .ok_or_else(|| anyhow!("--viewport expects WxH, got {raw}"))?;
        let w: f32 = w.parse().with_context(|| format!("invalid viewport width: {w}"))?;
        let h: f32 = h.parse().with_context(|| format!("invalid viewport height: {h}"))?;
        Ok(Vec2::new(w, h))
    }

    fn parse_purchases(raw: &str) -> Result<Vec<UpgradeKind>> {
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| UpgradeKind::from_str(name).ok_or_else(|| anyhow!("unknown upgrade: {name}")))
            .collect()
    }

    /// One shop row after the run
    #[derive(Serialize)]
    struct ShopLine {
        kind: &'static str,
        value: f32,
        /// What the next purchase charges
        price: u64,
        /// Formula quote for the next step
        quote: u64,
    }

    #[derive(Serialize)]
    struct Report {
        level: u32,
        frames: u32,
        launched: bool,
        outcome: Option<RoundOutcome>,
        final_position: Vec2,
        upgrades: UpgradeStats,
        purchases: Vec<&'static str>,
        shop: Vec<ShopLine>,
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse()?;

        let config = match &cli.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?;
                PhysicsConfig::from_json(&json)
                    .with_context(|| format!("invalid physics config: {}", path.display()))?
            }
            None => PhysicsConfig::default(),
        };

        let mut state = GameState::without_target(cli.seed, cli.viewport, config);
        if !cli.no_target {
            state.reset_for_level(cli.level);
        }
        let mut session = Session::with_state(state, Silent);
        session.progression.upgrades = cli.upgrades.clamped();

        let mut purchases = Vec::new();
        for kind in &cli.buy {
            let paid = session
                .buy(*kind)
                .with_context(|| format!("cannot buy {}", kind.as_str()))?;
            log::info!("Bought {} for {}", kind.as_str(), paid);
            purchases.push(kind.as_str());
        }

        // Pull back from an arbitrary anchor; the pull vector sets the launch
        let anchor = Vec2::new(cli.viewport.x * 0.5, cli.viewport.y * 0.5);
        let angle = cli.angle_deg.to_radians();
        let pull = Vec2::new(angle.cos(), angle.sin()) * session.state.config.max_pull * cli.power;
        session.drag_start(anchor);
        session.frame();
        session.drag_move(anchor - pull);
        session.drag_end();
        session.frame();

        let launched = session.state.mode == GameMode::Firing;
        log::info!("Launched: {} ({}°, {:.0}% power)", launched, cli.angle_deg, cli.power * 100.0);

        let mut frames = 0;
        let mut outcome = None;
        while launched && frames < cli.max_frames && outcome.is_none() {
            outcome = session.frame();
            frames += 1;
        }
        if launched && outcome.is_none() {
            log::warn!("Shot still moving after {} frames", cli.max_frames);
        }

        let upgrades = session.progression.upgrades;
        let shop = UpgradeKind::ALL
            .into_iter()
            .map(|kind| ShopLine {
                kind: kind.as_str(),
                value: kind.value(&upgrades),
                price: shop::price(kind, &upgrades),
                quote: shop::quote(kind, &upgrades),
            })
            .collect();

        let report = Report {
            level: session.state.level,
            frames,
            launched,
            outcome,
            final_position: session.state.projectile.pos,
            upgrades,
            purchases,
            shop,
        };
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{json}");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    headless::run()
}
