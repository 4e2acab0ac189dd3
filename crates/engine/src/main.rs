use anyhow::Context;

use khata::Khata;
use khata_ledger::Direction;
use khata_store::FileStore;

/// Print a plain-text summary of the persisted ledger.
fn main() -> anyhow::Result<()> {
    khata_observability::init();

    let store = FileStore::open_default().context("failed to open the khata store")?;
    tracing::info!(path = %store.path().display(), "reading ledger");

    let khata = Khata::open(Box::new(store));

    let totals = khata.totals();
    println!("Maine lene hain (to receive): Rs. {:.0}", totals.receivable);
    println!("Maine dene hain (to give):    Rs. {:.0}", totals.payable);
    println!();

    if khata.customers().is_empty() {
        println!("No customers yet.");
        return Ok(());
    }

    for customer in khata.customers() {
        let side = match customer.direction {
            Direction::Receivable => "lene",
            Direction::Payable => "dene",
        };
        let entries = khata
            .transactions(customer.id)
            .map(<[_]>::len)
            .unwrap_or(0);
        println!(
            "{:<30} Rs. {:>12.0}  ({side}, {entries} entries)",
            customer.name, customer.balance
        );
    }

    Ok(())
}
