use anyhow::Result;

use crate::config::Config;
use crate::corpus::scan_notes;

/// Prints the notes root status and every file the notes search would read.
pub fn list_sources(config: &Config) -> Result<()> {
    let notes = &config.notes;

    if !notes.root.exists() {
        println!("{:<12} {}", "notes", "NOT CONFIGURED (root does not exist)");
        println!("{:<12} {}", "root", notes.root.display());
        return Ok(());
    }

    let files = scan_notes(notes)?;

    println!("{:<12} OK", "notes");
    println!("{:<12} {}", "root", notes.root.display());
    println!("{:<12} {}", "extensions", notes.supported_extensions.join(" "));
    println!("{:<12} {}", "files", files.len());
    for f in &files {
        println!("  {}", f.relative_path);
    }

    Ok(())
}
