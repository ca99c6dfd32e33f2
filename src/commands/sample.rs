use anyhow::Result;

use crate::models::constants::SAMPLE_NOTE;

/// Print the built-in high-risk sample note.
pub fn execute() -> Result<()> {
    println!("{SAMPLE_NOTE}");
    Ok(())
}
