pub mod auction;
pub mod tracking;
pub mod wix;
