mod app;
mod client;
mod config;
mod events;
mod form;
mod gfx;
mod net_worker;
mod state;
mod ui;

use std::error::Error;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::events::AxEvent;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let mut event_loop: EventLoop<AxEvent> = EventLoop::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(&mut event_loop);
    event_loop.run_app(&mut app)?;

    Ok(())
}
