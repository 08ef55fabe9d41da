use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use lawd_table::DistrictTable;

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p lawd-table --example stats -- <table.tsv>")?;

    let table = DistrictTable::load_from_file(&path)
        .with_context(|| format!("loading district table from {}", path.display()))?;

    let mut by_suffix: BTreeMap<char, usize> = BTreeMap::new();
    let mut longest = "";
    for row in table.rows() {
        if let Some(last) = row.name.chars().last() {
            *by_suffix.entry(last).or_default() += 1;
        }
        if row.name.chars().count() > longest.chars().count() {
            longest = &row.name;
        }
    }

    println!("Table: {}", path.display());
    println!("Rows : {}", table.len());
    println!("Longest name: {longest}");
    println!("Rows by trailing syllable:");
    for (suffix, count) in by_suffix {
        println!("  {suffix}: {count}");
    }
    Ok(())
}
