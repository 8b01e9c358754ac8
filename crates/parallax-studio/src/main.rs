use std::path::PathBuf;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use parallax_engine::asset::ImageFileProbe;
use parallax_engine::coords::Viewport;
use parallax_engine::core::{App, AppControl, FrameCtx};
use parallax_engine::device::GpuInit;
use parallax_engine::input::Key;
use parallax_engine::layout::SceneConfig;
use parallax_engine::logging::{init_logging, LoggingConfig};
use parallax_engine::paint::Color;
use parallax_engine::window::{Runtime, RuntimeConfig};
use parallax_engine::Session;

/// Layout file read at startup; overridable through `PARALLAX_LAYOUT`.
const DEFAULT_LAYOUT: &str = "layout.toml";

struct Studio {
    config: SceneConfig,
    session: Option<Session>,
}

impl App for Studio {
    fn on_start(&mut self, viewport: Viewport) -> Result<()> {
        let session = Session::new(&self.config, &ImageFileProbe, viewport)?;
        self.session = Some(session);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(session) = self.session.as_mut() else {
            return AppControl::Continue;
        };

        if ctx.input_frame.pressed(Key::Escape) {
            return AppControl::Exit;
        }

        for ev in &ctx.input_frame.events {
            if let Err(e) = session.handle_input(ev) {
                log::warn!("input dropped: {e}");
            }
        }

        let clear = session
            .tick_frame(&ctx.time)
            .background()
            .unwrap_or(Color::BLACK);
        if ctx.time.frame_index % 600 == 0 {
            log::debug!(
                "frame {}: scroll {:.0}px, elapsed {:.0}ms, {} faults",
                session.snapshot().frame_index(),
                session.source().scroll_offset(),
                session.source().elapsed_ms(),
                session.snapshot().faults()
            );
        }

        ctx.present(clear)
    }

    fn on_exit(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.shutdown();
        }
    }
}

fn load_config() -> Result<SceneConfig> {
    let path = std::env::var_os("PARALLAX_LAYOUT")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LAYOUT));

    if !path.exists() {
        log::info!("{} not found, using the built-in layout", path.display());
        return Ok(SceneConfig::default());
    }
    SceneConfig::load(&path).with_context(|| format!("loading {}", path.display()))
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = load_config()?;
    let studio = Studio {
        config,
        session: None,
    };

    Runtime::run(
        RuntimeConfig {
            title: "parallax".to_string(),
            initial_size: LogicalSize::new(1280.0, 800.0),
        },
        GpuInit::default(),
        studio,
    )
}
