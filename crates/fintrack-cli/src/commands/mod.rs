pub mod expenses;
pub mod goals;
pub mod loans;
