mod client;
mod export;
mod render;
mod types;
mod worker;

pub use client::*;
pub use export::*;
pub use render::*;
pub use types::*;
pub use worker::*;
