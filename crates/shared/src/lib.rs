mod command;
mod date;
mod page;

pub use command::*;
pub use date::*;
pub use page::*;

#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}

/// `LIKE` pattern matching `term` anywhere, with wildcards in `term` taken literally.
/// Use with `ESCAPE '\'`.
pub fn like_contains(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');

    pattern
}
