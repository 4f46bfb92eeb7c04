pub mod claims;
pub mod health;
