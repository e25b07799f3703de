use crate::loan::DATE_FORMAT;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoanError {
    #[error("start date \"{input}\" is not in the expected format \"{expected}\"")]
    InvalidDateFormat { input: String, expected: String },

    #[error("term must be at least one year, got {0}")]
    InvalidTerm(u32),

    #[error("principal must be a positive amount, got {0}")]
    InvalidPrincipal(f64),

    #[error("annual rate must be zero or positive, got {0}")]
    InvalidRate(f64),

    #[error("annual rate {rate} over {term_years} years overflows the loan amount")]
    InterestOverflow { rate: f64, term_years: u32 },

    #[error("no due date one month after {}", .from.format(DATE_FORMAT))]
    DateOutOfRange { from: NaiveDate },
}

pub type Result<T> = std::result::Result<T, LoanError>;
