use crate::error::{LoanError, Result};
use chrono::{Months, NaiveDate};
use log::{debug, error, info, trace};
use std::{fmt, io, iter};

pub const DATE_FORMAT: &str = "%d/%m/%Y";

// shown to users when a date fails to parse
pub const DATE_PATTERN: &str = "dd/mm/yyyy";

const MONTHS_PER_YEAR: u32 = 12;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Installment {
    pub index: u32,
    pub due_date: NaiveDate,
    pub amount: f64,
    pub count: u32, // length of the schedule
}

impl Installment {
    pub fn new(index: u32, due_date: NaiveDate, amount: f64, count: u32) -> Self {
        Self {
            index,
            due_date,
            amount,
            count,
        }
    }
}

impl fmt::Display for Installment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Valor: {:.2} {}/{}",
            self.due_date.format(DATE_FORMAT),
            self.amount,
            self.index,
            self.count
        )
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Loan {
    adjusted_principal: f64,
    term_years: u32,
    annual_rate: Option<f64>,
    start_date: NaiveDate,
    installment_count: u32,
}

impl Loan {
    pub fn new(
        principal: f64,
        term_years: u32,
        start_date: &str,
        annual_rate: Option<f64>,
    ) -> Result<Self> {
        let start_date = parse_start_date(start_date)?;
        Self::from_date(principal, term_years, start_date, annual_rate)
    }

    pub fn from_date(
        principal: f64,
        term_years: u32,
        start_date: NaiveDate,
        annual_rate: Option<f64>,
    ) -> Result<Self> {
        if !principal.is_finite() || principal <= 0. {
            return Err(LoanError::InvalidPrincipal(principal));
        }

        let installment_count = match term_years.checked_mul(MONTHS_PER_YEAR) {
            Some(count) if count > 0 => count,
            _ => return Err(LoanError::InvalidTerm(term_years)),
        };

        // a rate of exactly zero is the same loan as no rate at all
        let annual_rate = match annual_rate {
            Some(rate) if !rate.is_finite() || rate < 0. => {
                return Err(LoanError::InvalidRate(rate))
            }
            Some(rate) if rate == 0. => None,
            rate => rate,
        };

        // the last due date must exist before any schedule is handed out
        start_date
            .checked_add_months(Months::new(installment_count))
            .ok_or(LoanError::DateOutOfRange { from: start_date })?;

        let adjusted_principal = compound(principal, annual_rate, term_years);
        if let (Some(rate), false) = (annual_rate, adjusted_principal.is_finite()) {
            return Err(LoanError::InterestOverflow { rate, term_years });
        }

        info!(
            "loan of {:.2} over {} years from {}, {} installments",
            adjusted_principal, term_years, start_date, installment_count
        );

        Ok(Self {
            adjusted_principal,
            term_years,
            annual_rate,
            start_date,
            installment_count,
        })
    }

    // principal after compound interest, the original amount is not kept
    pub fn adjusted_principal(&self) -> f64 {
        self.adjusted_principal
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn annual_rate(&self) -> Option<f64> {
        self.annual_rate
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn installment_count(&self) -> u32 {
        self.installment_count
    }

    pub fn installment_amount(&self) -> f64 {
        self.adjusted_principal / f64::from(self.installment_count)
    }

    // 1-based, same as Installment::index
    pub fn installment(&self, index: u32) -> Option<Installment> {
        if index == 0 || index > self.installment_count {
            return None;
        }
        self.due_dates()
            .nth(index as usize - 1)
            .map(|due_date| self.installment_on(index, due_date))
    }

    pub fn generate_schedule(&self) -> Vec<Installment> {
        let schedule: Vec<Installment> = (1..=self.installment_count)
            .zip(self.due_dates())
            .map(|(index, due_date)| {
                trace!("installment {} due {}", index, due_date);
                self.installment_on(index, due_date)
            })
            .collect();
        debug!("generated {} installments", schedule.len());
        schedule
    }

    pub fn formatted_schedule(&self) -> Vec<String> {
        self.generate_schedule()
            .iter()
            .map(Installment::to_string)
            .collect()
    }

    pub fn write_schedule<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.formatted_schedule() {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    pub fn print_schedule(&self) {
        if let Err(e) = self.write_schedule(&mut io::stdout().lock()) {
            error!("failed to print schedule: {}", e);
        }
    }

    fn installment_on(&self, index: u32, due_date: NaiveDate) -> Installment {
        Installment::new(
            index,
            due_date,
            self.installment_amount(),
            self.installment_count,
        )
    }

    // Each due date is one month after the previous one, so a clamped day
    // carries forward (31/01 -> 28/02 -> 28/03). Construction guarantees the
    // iterator yields at least installment_count dates.
    fn due_dates(&self) -> impl Iterator<Item = NaiveDate> {
        iter::successors(add_one_month(self.start_date).ok(), |&date| {
            add_one_month(date).ok()
        })
    }
}

pub fn parse_start_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| LoanError::InvalidDateFormat {
        input: input.to_string(),
        expected: DATE_PATTERN.to_string(),
    })
}

// clamps to the last day of a shorter month (31/01 -> 28/02)
pub fn add_one_month(date: NaiveDate) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(1))
        .ok_or(LoanError::DateOutOfRange { from: date })
}

fn compound(principal: f64, annual_rate: Option<f64>, term_years: u32) -> f64 {
    match annual_rate {
        Some(rate) => {
            // M = C * (1 + i)^t
            let factor = (1. + rate).powf(f64::from(term_years));
            debug!(
                "compounding {} at {} over {} years, factor {}",
                principal, rate, term_years, factor
            );
            principal * factor
        }
        None => principal,
    }
}
