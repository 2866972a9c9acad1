use std::process;

use log::{error, info};
use winit::event_loop::EventLoop;

use gallery_walk::{config, engine::Gallery};

fn main() {
    env_logger::init();

    let config = config::load_default().unwrap_or_else(|err| {
        error!("failed to load config: {err:#}");
        process::exit(1);
    });
    info!(
        "room half extent {} pad {}, speed {} turn rate {}",
        config.room.half_extent, config.room.clamp_pad, config.movement.speed, config.movement.turn_rate
    );

    info!("initializing event loop");
    let event_loop = EventLoop::new().unwrap_or_else(|err| {
        error!("failed to start the event loop: {err}");
        process::exit(1);
    });

    info!("running gallery");
    if let Err(err) = event_loop.run_app(&mut Gallery::new(config)) {
        error!("gallery exited with an error: {err}");
        process::exit(1);
    }
}
