use clap::Parser;
use log::{error, LevelFilter};
use loan_schedule::loan::Loan;
use simple_logger::SimpleLogger;
use std::process;

/// Prints the monthly installment schedule of a fixed-rate loan
#[derive(Parser, Debug)]
#[command(name = "loan_schedule", version, about)]
struct Cli {
    /// Amount borrowed
    #[arg(long, default_value_t = 100000000.)]
    principal: f64,

    /// Duration of the loan in years
    #[arg(long, default_value_t = 1)]
    years: u32,

    /// Start date of the loan, dd/mm/yyyy
    #[arg(long, default_value = "10/02/2004")]
    start: String,

    /// Annual interest rate as a fraction (0.1 for 10%), no interest when omitted
    #[arg(long)]
    rate: Option<f64>,

    /// Log level written to stderr
    #[arg(long, default_value_t = LevelFilter::Warn, value_parser = parse_level)]
    log_level: LevelFilter,
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level
        .parse()
        .map_err(|_| format!("unknown log level \"{}\"", level))
}

fn main() {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(cli.log_level)
        .init()
        .unwrap();

    let loan = match Loan::new(cli.principal, cli.years, &cli.start, cli.rate) {
        Ok(loan) => loan,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    loan.print_schedule();
}

// verifies that types can implement the gated traits below
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<Loan>();
    is_normal::<loan_schedule::Installment>();
    is_normal::<loan_schedule::LoanError>();
}

#[test]
fn cli_defaults() {
    let cli = Cli::parse_from(["loan_schedule"]);
    assert_eq!(cli.years, 1);
    assert_eq!(cli.start, "10/02/2004");
    assert_eq!(cli.rate, None);
    assert_eq!(cli.log_level, LevelFilter::Warn);

    let cli = Cli::parse_from(["loan_schedule", "--rate", "0", "--years", "5"]);
    assert_eq!(cli.rate, Some(0.));
    assert_eq!(cli.years, 5);

    let cli = Cli::parse_from(["loan_schedule", "--rate", "0.1"]);
    assert_eq!(cli.rate, Some(0.1));

    assert!(Cli::try_parse_from(["loan_schedule", "--log-level", "chatty"]).is_err());
    let cli = Cli::try_parse_from(["loan_schedule", "--log-level", "debug"]).unwrap();
    assert_eq!(cli.log_level, LevelFilter::Debug);
}
