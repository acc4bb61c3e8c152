pub mod auction;
pub mod cart;
pub mod catalog;
pub mod member;
pub mod order;
pub mod tokens;
pub mod tracking;
