pub mod errors;
pub mod flash;
pub mod html;

pub use errors::VisualizeError;
pub use flash::{clear_flash_cookie, read_flash, redirect_with_flash};
pub use html::render_page;
