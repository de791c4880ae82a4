use boxmind_ai::text_utils::head_chars;
use comfy_table::Table;

const PREVIEW_CHARS: usize = 80;

pub fn print_table(table: Table) {
    println!("{table}");
}

/// Single-line preview of chunk content.
pub fn preview(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    let head = head_chars(&flat, PREVIEW_CHARS);
    if head.len() < flat.len() {
        format!("{head}...")
    } else {
        head.to_string()
    }
}
