mod hit_counter;
mod server;

pub use hit_counter::*;
pub use server::*;
