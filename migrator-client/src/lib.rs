// DB Migrator client
//
// Turns the server-side state into something a terminal can show.

pub mod console_view;
pub mod style;
pub mod timeline;

pub use console_view::ConsoleView;
pub use style::StyleRoot;
