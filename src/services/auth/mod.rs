pub mod bearer;
pub mod claims;
pub mod factory;
pub mod gate;
pub mod jwks;

#[cfg(test)]
pub mod test_support;

pub use claims::Claims;
pub use factory::build_auth_gate;
pub use gate::AuthGate;
