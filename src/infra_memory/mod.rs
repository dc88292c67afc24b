//! In-process backend used by the `memory` database setting and by the tests.

mod clock;
mod store;

pub use clock::*;
pub use store::*;
