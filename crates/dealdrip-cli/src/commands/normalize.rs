//! Normalize command - turn raw numeral strings into prices.

use clap::Args;

use dealdrip_core::normalize_price;

/// Arguments for the normalize command.
#[derive(Args)]
pub struct NormalizeArgs {
    /// Raw strings, e.g. "₹1,599" or "1.234,56"
    #[arg(required = true)]
    raw: Vec<String>,
}

pub fn run(args: NormalizeArgs) -> anyhow::Result<()> {
    for raw in &args.raw {
        match normalize_price(raw) {
            Some(value) => println!("{}", value),
            None => println!("no value"),
        }
    }

    Ok(())
}
