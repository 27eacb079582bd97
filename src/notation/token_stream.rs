//! In-memory move lists: the comma-separated token stream and numbered
//! movetext (`1. e4 e5 2. Nf3`).

use crate::board_model::piece::Color;

/// Side that plays ply `index`; White opens.
pub const fn index_to_color(index: usize) -> Color {
    if index % 2 == 0 {
        Color::White
    } else {
        Color::Black
    }
}

/// Split `e4, e5,Nf3` into tokens, dropping empty entries.
pub fn split_moves(stream: &str) -> Vec<String> {
    stream
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

pub fn join_moves<S: AsRef<str>>(moves: &[S]) -> String {
    moves.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}

/// Render tokens as numbered pairs: `1. e4 e5 2. Nf3 Nc6 3. Bb5`.
pub fn format_moves<S: AsRef<str>>(moves: &[S]) -> String {
    let mut parts = Vec::with_capacity(moves.len() + moves.len() / 2 + 1);
    for (ply, token) in moves.iter().enumerate() {
        if ply % 2 == 0 {
            parts.push(format!("{}. {}", ply / 2 + 1, token.as_ref()));
        } else {
            parts.push(token.as_ref().to_owned());
        }
    }
    parts.join(" ")
}

/// Tokens of numbered movetext. Move numbers, `{comments}`, `(variations)`
/// and the trailing result are dropped.
pub fn parse_movetext(text: &str) -> Vec<String> {
    let text = strip_comments_and_variations(text);
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        if is_result_token(word) {
            break;
        }
        let word = strip_move_number(word);
        if !word.is_empty() {
            tokens.push(word.to_owned());
        }
    }
    tokens
}

pub fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

/// `12.`, `12...` and glued forms like `12.e4` lose their number.
fn strip_move_number(word: &str) -> &str {
    let digits = word.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || !word[digits..].starts_with('.') {
        return word;
    }
    word[digits..].trim_start_matches('.')
}

fn strip_comments_and_variations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '{' => brace_depth = brace_depth.saturating_add(1),
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '(' => paren_depth = paren_depth.saturating_add(1),
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ if brace_depth == 0 && paren_depth == 0 => out.push(ch),
            _ => out.push(' '),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{format_moves, index_to_color, join_moves, parse_movetext, split_moves};
    use crate::board_model::piece::Color;

    #[test]
    fn comma_stream_round_trip() {
        let moves = split_moves("e4, e5,Nf3,, Nc6 ,Bb5");
        assert_eq!(moves, vec!["e4", "e5", "Nf3", "Nc6", "Bb5"]);
        assert_eq!(join_moves(&moves), "e4,e5,Nf3,Nc6,Bb5");
        assert!(split_moves(" , ").is_empty());
    }

    #[test]
    fn numbered_pairs() {
        assert_eq!(
            format_moves(&["e4", "e5", "Nf3", "Nc6", "Bb5"]),
            "1. e4 e5 2. Nf3 Nc6 3. Bb5"
        );
        assert_eq!(format_moves::<&str>(&[]), "");
    }

    #[test]
    fn movetext_back_to_tokens() {
        let text = "1. e4 e5 {open game} 2.Nf3 (2. f4 exf4) Nc6 3. Bb5 a6 1-0";
        assert_eq!(parse_movetext(text), vec!["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);
        assert_eq!(parse_movetext("12... Qxf7# *"), vec!["Qxf7#"]);
    }

    #[test]
    fn white_moves_on_even_plies() {
        assert_eq!(index_to_color(0), Color::White);
        assert_eq!(index_to_color(7), Color::Black);
    }
}
