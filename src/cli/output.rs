use colored::Colorize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print a warning message to stderr so reports on stdout stay clean.
pub fn warning(msg: &str) {
    eprintln!("  {} {}", "⚠".yellow(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    println!("\n{}", msg.bold());
}

/// Print a labelled count, red when a non-zero count is bad news.
pub fn count(label: &str, n: usize, alarming: bool) {
    let value = n.to_string();
    let value = if alarming && n > 0 {
        value.red().bold()
    } else {
        value.green()
    };
    println!("  {label}: {value}");
}
