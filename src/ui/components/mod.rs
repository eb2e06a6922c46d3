mod command_palette;
mod key_result;
mod toc;

pub use command_palette::{CommandEvent, CommandPalette};
pub use key_result::KeyResult;
pub use toc::draw_toc;
