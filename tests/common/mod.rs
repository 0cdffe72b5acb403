//! Shared setup for the engine integration tests.

use std::path::PathBuf;

use shape_engine::backend::{DummyBackend, RecordedCommand};
use shape_engine::{Engine, EngineConfig};

/// Engine reading the shaders bundled with the crate.
pub fn engine() -> Engine {
    Engine::new(&config())
}

pub fn config() -> EngineConfig {
    EngineConfig {
        shader_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders"),
        ..EngineConfig::default()
    }
}

/// Backend flavours the engine must produce identical geometry on, apart
/// from fan lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavour {
    WithFans,
    WithoutFans,
}

impl Flavour {
    pub fn backend(self) -> DummyBackend {
        match self {
            Flavour::WithFans => DummyBackend::new(),
            Flavour::WithoutFans => DummyBackend::without_fans(),
        }
    }
}

/// `(count, first_index)` of every recorded draw, in order.
pub fn draw_ranges(gfx: &DummyBackend) -> Vec<(u32, u32)> {
    gfx.draw_calls()
        .filter_map(|command| match command {
            RecordedCommand::DrawIndexed {
                count, first_index, ..
            } => Some((*count, *first_index)),
            _ => None,
        })
        .collect()
}
