pub mod call;
pub mod load;
pub mod numeric;
