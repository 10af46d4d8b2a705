pub mod util;

pub use util::{resolve_strategies, split_csv};
