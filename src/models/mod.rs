pub mod charge;
pub mod customer;
pub mod paykey;
