//! Interactive grid viewer.
//!
//! Run with `cargo run --example grid_demo [options.json] [--polar]`.
//! Set `RUST_LOG=debug` to watch the grid program relink.

use decagrid::{show, LocalProjection, Options, Result, Vec2};

fn main() -> Result<()> {
    let mut options = Options::default()
        .with_window_title("decagrid demo")
        .with_view(Vec2::ZERO, Vec2::splat(120.0));

    for arg in std::env::args().skip(1) {
        if arg == "--polar" {
            options = options.with_projection(LocalProjection::Polar);
        } else {
            options = Options::load(&arg)?;
        }
    }

    show(options)
}
