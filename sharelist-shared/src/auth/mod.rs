//! Authentication: password hashing, JWT issuance/validation, and the
//! explicit identity context handlers receive.

pub mod identity;
pub mod jwt;
pub mod password;
