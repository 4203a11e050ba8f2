//! Red Light, Green Light entry point
//!
//! The browser build is driven entirely through `red_light::web`. Natively
//! this runs a headless scripted player against a virtual clock, which is
//! handy for tuning settings without a camera.
//!
//! Usage: `red-light [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use red_light::consts::*;
    use red_light::signal::landmarks::POSE_LANDMARK_COUNT;
    use red_light::signal::{FrameInput, Landmark, PixelFrame, PoseFrame, Rgba, SignalSource};
    use red_light::sim::{GameEvent, GamePhase, InputStatus};
    use red_light::{Game, Settings};

    /// Camera frame interval (~30 fps)
    const FRAME_MS: u64 = 33;
    /// How long the player keeps moving after the light turns red
    const REACTION_MS: u64 = 120;
    /// Give up after this much virtual time
    const RUN_LIMIT_MS: u64 = 10 * 60 * 1000;
    /// Small frame size keeps pixel scoring cheap
    const PIXEL_W: u32 = CAPTURE_WIDTH / 8;
    const PIXEL_H: u32 = CAPTURE_HEIGHT / 8;

    /// Synthetic camera: produces frames for a player who is moving or not
    struct ScriptedPlayer {
        source: SignalSource,
        rng: Pcg32,
        flip: bool,
    }

    impl ScriptedPlayer {
        fn new(source: SignalSource, seed: u64) -> Self {
            Self {
                source,
                rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
                flip: false,
            }
        }

        fn frame(&mut self, moving: bool) -> FrameInput {
            if moving {
                self.flip = !self.flip;
            }
            // Occasional dropped frame from the pose pipeline
            if self.rng.random_bool(0.02) {
                return FrameInput::Missing;
            }
            match self.source {
                SignalSource::Landmarks => {
                    let sway = if self.flip { 0.06 } else { 0.0 };
                    let jitter = self.rng.random_range(-0.002..0.002);
                    let x = 0.5 + sway + jitter;
                    FrameInput::Pose(PoseFrame::new(vec![
                        Landmark::new(x, 0.5).with_visibility(0.9);
                        POSE_LANDMARK_COUNT
                    ]))
                }
                SignalSource::Pixels => {
                    let level = if self.flip { 180 } else { 60 };
                    let noise = self.rng.random_range(0..3u8);
                    let value = level + noise;
                    FrameInput::Pixels(PixelFrame::solid(
                        PIXEL_W,
                        PIXEL_H,
                        Rgba {
                            r: value,
                            g: value,
                            b: value,
                            a: 255,
                        },
                    ))
                }
            }
        }
    }

    fn load_settings(path: Option<&str>) -> Result<Settings, String> {
        let Some(path) = path else {
            return Ok(Settings::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
        Settings::from_json(&json).map_err(|e| format!("{path}: {e}"))
    }

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let settings = load_settings(args.first().map(String::as_str))?;
        let seed = match args.get(1) {
            Some(s) => s.parse::<u64>().map_err(|e| format!("seed {s:?}: {e}"))?,
            None => 42,
        };

        log::info!(
            "Headless run: seed {seed}, sensitivity {} ({}), source {}",
            settings.sensitivity.value(),
            settings.sensitivity.label().as_str(),
            settings.signal_source.as_str()
        );

        let mut game = Game::new(&settings, seed);
        let mut player = ScriptedPlayer::new(settings.signal_source, seed);
        game.set_input_status(InputStatus::Ready);
        game.start_game(0).map_err(|e| e.to_string())?;

        let mut red_since: Option<u64> = None;
        let mut now = 0;
        while !game.phase().is_terminal() && now < RUN_LIMIT_MS {
            now += FRAME_MS;
            let moving = match game.phase() {
                GamePhase::GreenLight => true,
                GamePhase::RedLight => red_since.is_some_and(|t| now - t < REACTION_MS),
                _ => false,
            };
            game.submit_frame(player.frame(moving));
            game.advance_to(now);

            for event in game.drain_events() {
                match event {
                    GameEvent::RedLight => red_since = Some(now),
                    GameEvent::GreenLight => red_since = None,
                    _ => {}
                }
                log::debug!("{event:?}");
            }
        }

        let snapshot = game.snapshot();
        match snapshot.phase {
            GamePhase::Won => log::info!("Result: won in {:.1}s", snapshot.final_time),
            GamePhase::Eliminated => log::info!(
                "Result: eliminated at {:.1}% after {:.1}s",
                snapshot.final_progress,
                snapshot.final_time
            ),
            phase => log::warn!(
                "Run stopped at {}s in phase {} with {:.1}% progress",
                now / 1000,
                phase.as_str(),
                snapshot.progress
            ),
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).map_err(|e| e.to_string())?
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Red Light, Green Light (native) starting...");
    if let Err(e) = headless::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is red_light::web, this is just to satisfy the compiler
}
