//! Text and date helpers shared by the views and the command layer

mod date;
mod html;

pub use date::*;
pub use html::*;
