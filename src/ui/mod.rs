//! Terminal front end.
//!
//! - `commands`: parsing typed commands into intents
//! - `console`: the screens and their event loop
//! - `table`: rendering the user list
//! - `toast`: transient notifications

pub mod commands;
pub mod console;
pub mod table;
pub mod toast;

pub use commands::{Command, CommandError, CommandHelp};
pub use console::{Console, ConsoleNavigator};
pub use toast::{Toast, ToastQueue};
