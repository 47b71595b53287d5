// DB Migrator style root
mod root;

pub use root::{StyleChange, StyleRoot};
