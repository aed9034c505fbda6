//! Echoes - headless client session against an in-memory store.
//!
//! Seeds a population, sweeps the pointer until it finds a placeable spot,
//! holds there until the form commits, and logs what happened.

use anyhow::Result;
use client::{ClientConfig, ClientContext, LogScene, MemoryStore, ReplicatedStore};
use echoes_core::{FormFields, Params, TeamId, Time, Vec2, Vec3};
use input::{PointerButton, PointerEvent, PointerId};
use rand::{Rng, SeedableRng};
use std::time::Duration;

const DEFAULT_WALLET: &str = "0xviewer";
const FRAME: Duration = Duration::from_millis(16);
const SWEEP_STEP: usize = 24;
const SPREAD: f32 = 300.0;

fn seed_records<R: Rng>(rng: &mut R, count: usize, params: &Params, wallet: &str) -> Vec<(FormFields, String)> {
    let creators = ["0xalice", "0xbob", wallet];
    (0..count)
        .map(|_| {
            let team = TeamId(rng.gen_range(0..params.team_count));
            let center = Vec3::new(
                rng.gen_range(-SPREAD..SPREAD),
                rng.gen_range(-SPREAD..SPREAD),
                rng.gen_range(-SPREAD..SPREAD),
            );
            let radius = rng.gen_range(5.0..60.0);
            let creator = creators[rng.gen_range(0..creators.len())].to_string();
            (FormFields::from_render(team, center, radius, params), creator)
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = ClientConfig::load();
    let wallet = config.wallet.get_or_insert_with(|| DEFAULT_WALLET.to_string()).clone();
    let mut rng = rand::rngs::StdRng::from_entropy();
    let team = config.pick_team(&mut rng);
    log::info!("Playing team {:?} as {}", team, wallet);

    let mut store = MemoryStore::new(config.params.clone(), Some(wallet.clone()));
    let updates = store.subscribe();
    let seeded = store.seed(seed_records(&mut rng, config.seed_forms, &config.params, &wallet))?;
    log::info!("Seeded {} forms", seeded);

    let mut ctx = ClientContext::new(&config, team);
    ctx.camera_mut().set_look_at(Vec3::new(0.0, 0.0, SPREAD * 3.0), Vec3::ZERO);
    let mut scene = LogScene::default();
    let mut time = Time::new();

    let sync = |ctx: &mut ClientContext, store: &MemoryStore| {
        for state in updates.try_iter() {
            ctx.apply_update(&state, store);
        }
    };
    sync(&mut ctx, &store);

    // Sweep until the hint says a form can go here.
    let mut target = None;
    'sweep: for y in (0..config.viewport_height as usize).step_by(SWEEP_STEP) {
        for x in (0..config.viewport_width as usize).step_by(SWEEP_STEP) {
            let position = Vec2::new(x as f32, y as f32);
            time.advance(FRAME);
            ctx.handle_event(&PointerEvent::moved(PointerId::MOUSE, position), time.elapsed(), &mut store);
            ctx.render(&mut scene);
            if ctx.hint().is_committable() {
                target = Some(position);
                break 'sweep;
            }
        }
    }
    let Some(position) = target else {
        log::warn!("No placeable spot found in {} frames", time.frame_count());
        return Ok(());
    };
    log::info!(
        "Holding at {:?}: hint r={:.2} {:?}",
        position,
        ctx.hint().radius,
        ctx.hint().classification
    );

    let before = store.len();
    ctx.handle_event(
        &PointerEvent::down(PointerId::MOUSE, position, PointerButton::Primary),
        time.elapsed(),
        &mut store,
    );
    let hold_frames = config.params.hold().as_millis() / FRAME.as_millis() + 2;
    for _ in 0..hold_frames {
        time.advance(FRAME);
        if let Some(outcome) = ctx.tick(time.elapsed(), time.delta_seconds(), &mut store) {
            log::info!("Hold finished: {:?}", outcome);
            break;
        }
        ctx.render(&mut scene);
    }
    ctx.handle_event(
        &PointerEvent::up(PointerId::MOUSE, position, PointerButton::Primary),
        time.elapsed(),
        &mut store,
    );

    sync(&mut ctx, &store);
    ctx.render(&mut scene);
    log::info!(
        "Store grew {} -> {}; {} traces pending; {} frames drawn",
        before,
        store.len(),
        ctx.traces().len(),
        scene.frames
    );
    Ok(())
}
