use anyhow::Result;
use insertion::{
    config::Config,
    init_logging,
    query::ChoiceLists,
    source::{self, Source},
};
use reqwest::Client;
use std::env;

/// Print the values a selection list would offer, one per line.
#[tokio::main]
async fn main() -> Result<()> {
    init_logging("warn");

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [SOURCE]", args[0]);
        std::process::exit(1);
    }
    let raw = args.get(1).cloned().unwrap_or_else(|| Config::default().source);

    let source = Source::parse(&raw)?;
    let (records, _) = source::load_records(&Client::new(), &source).await?;
    let choices = ChoiceLists::from_records(&records);

    println!("# institutions");
    for name in &choices.institutions {
        println!("{}", name);
    }
    println!("# disciplines");
    for name in &choices.disciplines {
        println!("{}", name);
    }
    println!("# sexes");
    for label in &choices.sexes {
        println!("{}", label);
    }
    Ok(())
}
