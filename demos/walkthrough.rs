//! Builds a small table, prints it, looks up a value, removes it and prints again.
//!
//! Run with: `cargo run --example walkthrough`

use extendible_hash::ExtendibleHashTable;

fn main() -> extendible_hash::Result<()> {
    let mut table = ExtendibleHashTable::new(2, 2)?;

    for v in [10, 22, 5, 3, 8, 15] {
        table.insert(v)?;
    }

    println!("Extendible hash table:");
    print!("{}", table);

    let found = if table.find(10) { "found" } else { "not found" };
    println!("\nLookup 10: {}", found);

    table.remove(10);
    println!("\nAfter removing 10:");
    print!("{}", table);

    println!(
        "\nglobal depth {}, {} slots, {} buckets, {} values",
        table.global_depth(),
        table.directory_len(),
        table.bucket_count(),
        table.len()
    );

    Ok(())
}
