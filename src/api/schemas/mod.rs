pub mod auction;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod env;
pub mod health;
pub mod orders;
pub mod tracking;
