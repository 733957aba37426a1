pub mod add;
pub mod lessons;
pub mod reset;
pub mod seed;
pub mod show;
