pub mod interactive;
pub mod terminal;
