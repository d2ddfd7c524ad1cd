//! Minimal simulation: one sprite bouncing across the window.
//!
//! Run against a real engine, or the mock engine:
//!   cargo run --features cli -- engine /tmp/phrost-demo.sock --frames 300 --format pretty
//!
//! In another terminal:
//!   PHROST_ENDPOINT=/tmp/phrost-demo.sock cargo run --example bouncing-sprite

use phrost::client::{connect_with_config, ClientConfig, TickResponse};
use phrost::{args, CommandEncoder, EntityId, EventKind};

const WIDTH: f64 = 800.0;
const ESCAPE: u64 = 27;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::default();
    eprintln!("Connecting to {}", config.endpoint);
    let mut client = connect_with_config(&config)?;

    let sprite = EntityId::generate();
    let [id1, id2] = sprite.as_args();
    let mut x = 0.0;
    let mut velocity = 120.0;
    let mut encoder = CommandEncoder::new();

    let summary = client.run(|tick| {
        let escape_pressed = tick.unpack().events.iter().any(|event| {
            event.kind == EventKind::InputKeydown
                && event.get("keycode").and_then(|v| v.as_u64()) == Some(ESCAPE)
        });
        if escape_pressed {
            return TickResponse::Quit;
        }

        if tick.elapsed == 0 {
            if let Err(err) = encoder.add(
                EventKind::SpriteAdd,
                args![
                    id1.clone(), id2.clone(),
                    x, 300.0, 0.0, 1.0, 1.0, 1.0, 32.0, 32.0, 0.0, 0.0, 0.0,
                    255u8, 255u8, 255u8, 255u8, 0.0, 0.0
                ],
            ) {
                eprintln!("sprite not added: {err}");
            }
        }

        x += velocity * tick.dt;
        if !(0.0..=WIDTH).contains(&x) {
            velocity = -velocity;
            x = x.clamp(0.0, WIDTH);
        }
        if let Err(err) = encoder.add(
            EventKind::SpriteMove,
            args![id1.clone(), id2.clone(), x, 300.0, 0.0],
        ) {
            eprintln!("move rejected: {err}");
        }
        TickResponse::Commands(encoder.finalize())
    })?;

    eprintln!(
        "Stopped after {} ticks ({:?})",
        summary.ticks, summary.ended_by
    );
    Ok(())
}
