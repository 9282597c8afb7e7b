//! Dash Runner entry point
//!
//! Headless host: drives the simulation with a fixed-step accumulator and
//! the demo autopilot, keeps a scene in sync through a counting sprite
//! factory, and prints a JSON summary of the run.
//!
//! Usage: `dash-runner [SEED] [--tuning PATH]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;

    use serde::Serialize;

    use dash_runner::consts::{MAX_SUBSTEPS, SIM_DT};
    use dash_runner::scene::{Placement, Scene, SpriteFactory, TextureKey};
    use dash_runner::sim::{GameEvent, Phase, TickInput, World, tick};
    use dash_runner::{SceneError, Tuning};

    /// Give up on runs longer than this (seconds of host time)
    const MAX_RUN_SECONDS: f32 = 180.0;

    /// Sprite factory that only counts handles
    #[derive(Default)]
    struct CountingFactory {
        next: u32,
        live: usize,
        peak: usize,
        placed: u64,
    }

    impl SpriteFactory for CountingFactory {
        type Handle = u32;

        fn has_texture(&self, _key: TextureKey) -> bool {
            true
        }

        fn create(&mut self, _key: TextureKey) -> Result<u32, SceneError> {
            self.next += 1;
            self.live += 1;
            self.peak = self.peak.max(self.live);
            Ok(self.next)
        }

        fn place(&mut self, _handle: &mut u32, _placement: &Placement) {
            self.placed += 1;
        }

        fn destroy(&mut self, _handle: u32) {
            self.live = self.live.saturating_sub(1);
        }
    }

    #[derive(Debug, Serialize)]
    struct RunSummary {
        seed: u64,
        outcome: Phase,
        seconds: f32,
        distance: f32,
        progress: f32,
        lives: u8,
        money: u32,
        pay_amount: u32,
        jumps: usize,
        hits: usize,
        warnings_dodged: u32,
        enemies_unlocked: bool,
        peak_handles: usize,
        placements: u64,
    }

    struct Args {
        seed: u64,
        tuning: Option<String>,
    }

    fn parse_args() -> Result<Args, Box<dyn Error>> {
        let mut args = Args {
            seed: 1,
            tuning: None,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--tuning" => {
                    args.tuning = Some(iter.next().ok_or("--tuning needs a path")?);
                }
                other => args.seed = other.parse()?,
            }
        }
        Ok(args)
    }

    /// Host frame deltas wobble between 60 and 30 Hz
    fn frame_delta(frame: u32) -> f32 {
        if frame % 7 == 0 { 1.0 / 30.0 } else { 1.0 / 60.0 }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let args = parse_args()?;
        let tuning = match &args.tuning {
            Some(path) => {
                log::info!("Loading tuning from {}", path);
                Tuning::from_json(&std::fs::read_to_string(path)?)?
            }
            None => Tuning::default(),
        };

        let mut world = World::with_tuning(tuning, args.seed)?;
        let mut scene = Scene::new(CountingFactory::default(), &world)?;
        log::info!("Dash Runner (headless) starting with seed {}", args.seed);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut accumulator = 0.0;
        let mut elapsed = 0.0;
        let mut frame = 0;
        let mut last_phase = world.phase();
        let (mut jumps, mut hits) = (0, 0);

        while elapsed < MAX_RUN_SECONDS {
            let dt = frame_delta(frame);
            frame += 1;
            elapsed += dt;
            accumulator += dt;

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut world, &input, SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
            }

            for event in world.drain_events() {
                match event {
                    GameEvent::Jumped => jumps += 1,
                    GameEvent::ObstacleHit { .. } => hits += 1,
                    other => log::debug!("{:?}", other),
                }
            }
            scene.sync(&world)?;

            let phase = world.phase();
            if phase != last_phase {
                log::info!("{:?} after {:.1}s, distance {:.0}", phase, elapsed, world.distance());
                last_phase = phase;
            }
            if matches!(phase, Phase::Success | Phase::Cta) {
                break;
            }
        }

        let state = world.state();
        let factory = scene.into_factory();
        let summary = RunSummary {
            seed: args.seed,
            outcome: state.phase,
            seconds: elapsed,
            distance: world.distance(),
            progress: world.progress(),
            lives: state.lives,
            money: state.money,
            pay_amount: state.pay_amount,
            jumps,
            hits,
            warnings_dodged: world.intro_gate().warnings_dodged,
            enemies_unlocked: world.intro_gate().unlocked(),
            peak_handles: factory.peak,
            placements: factory.placed,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = native::run() {
        log::error!("{}", err);
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host embeds the library directly
}
