pub mod error;
pub mod loan;

pub use error::{LoanError, Result};
pub use loan::{Installment, Loan};
