//! Settings come from a TOML file under `settings/` layered with `CHIRPY__*` environment
//! variables. A `.env` file is honored by `main` before parsing.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
