pub mod color;
pub mod constants;
pub mod engine;
pub mod feed;
pub mod field;
pub mod gesture;
pub mod shape;
pub mod state;
pub mod theme;
pub mod worker;

pub use color::*;
pub use constants::*;
pub use engine::*;
pub use feed::*;
pub use field::*;
pub use gesture::*;
pub use shape::*;
pub use state::*;
pub use theme::*;
pub use worker::*;

// Shaders bundled as string constants
pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");
