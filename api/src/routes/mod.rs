pub mod comment;
pub mod health;
pub mod pages;
pub mod user;
