pub mod contact_me;
pub mod email;
pub mod rate_limit;
