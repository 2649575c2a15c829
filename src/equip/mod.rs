//! Equipping agents with loaded kits at generation time

pub mod allocator;
pub mod loading;

pub use allocator::allocate_for_agent;
pub use loading::load_kit;
