pub mod health;
pub mod quality;
pub mod screening;
