pub mod amortization;
pub mod form;
pub mod payment;
