use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use lawd_table::DistrictTable;
use pnu_addr::{Resolution, resolve};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let table_path = args
        .next()
        .map(PathBuf::from)
        .context("usage: cargo run -p pnu-addr --example lookup -- <table.tsv> <address...>")?;
    let text = args.collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        anyhow::bail!("no address given");
    }

    let table = DistrictTable::load_from_file(&table_path)
        .with_context(|| format!("loading district table from {}", table_path.display()))?;

    match resolve(&table, &text) {
        Resolution::Resolved(r) => {
            println!("input : {}", r.input);
            println!("token : {}", r.token.as_deref().unwrap_or("-"));
            println!("match : {} ({})", r.name, r.code);
            println!(
                "lot   : mountain={} main={:?} sub={:?}",
                r.lot.mountain, r.lot.main_lot, r.lot.sub_lot
            );
            println!("pnu   : {}", r.pnu);
        }
        Resolution::Ambiguous { candidates } if candidates.is_empty() => {
            println!("no district matched; include the municipality and retry");
        }
        Resolution::Ambiguous { candidates } => {
            println!("{} districts share that name:", candidates.len());
            for c in candidates {
                println!("  {} {}", c.code, c.name);
            }
        }
    }
    Ok(())
}
