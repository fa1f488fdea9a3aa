//! Section headers for console output.

/// Render `title` between two armor lines of the same width.
pub fn header(title: &str, armor: char) -> String {
    let line: String = std::iter::repeat_n(armor, title.chars().count()).collect();
    format!("{line}\n{title}\n{line}")
}

pub fn print_header(title: &str) {
    println!("{}", header(title, '-'));
}

pub fn print_section_header(title: &str) {
    println!("{}", header(title, '='));
}
