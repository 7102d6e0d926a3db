//! The `iqplace validate` command.

use std::path::PathBuf;

use anyhow::Result;

use iqplace_core::bank::{load_bank, validate_bank};

pub fn execute(bank_path: PathBuf, per_category: usize) -> Result<()> {
    anyhow::ensure!(per_category >= 1, "per-category must be at least 1");

    let bank = load_bank(&bank_path)?;
    println!(
        "Bank: {} ({} categories, {} questions)",
        bank.name,
        bank.categories().len(),
        bank.question_count()
    );
    for category in bank.categories() {
        println!("  {}: {} questions", category.name, category.questions.len());
    }

    let warnings = validate_bank(&bank, per_category);
    for w in &warnings {
        let prefix = w
            .category
            .as_ref()
            .map(|c| format!("  [{c}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
