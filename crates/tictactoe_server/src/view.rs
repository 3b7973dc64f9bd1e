//! HTML rendering of a game.

use tictactoe_rules::{GameState, Position, Square};

const STYLE: &str = "body { font-family: sans-serif; text-align: center; }\
table { border-collapse: collapse; margin: 20px auto; }\
td { width: 60px; height: 60px; text-align: center; vertical-align: middle; font-size: 2em; border: 1px solid #333; }\
td button { width: 100%; height: 100%; font-size: 1.5em; cursor: pointer; }";

/// Renders the full page for `state`.
///
/// Empty cells are move buttons while the game is running; the "Play Again"
/// button only appears once it is over.
pub fn render_page(state: &GameState) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("<title>Tic-Tac-Toe</title>\n");
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n<h1>Tic-Tac-Toe</h1>\n");
    html.push_str(&format!("<p class=\"message\">{}</p>\n", escape(state.message())));
    render_board(&mut html, state);
    if state.is_over() {
        html.push_str("<form method=\"POST\" action=\"/\">\n");
        html.push_str(
            "<button type=\"submit\" name=\"reset_game\" value=\"1\">Play Again</button>\n",
        );
        html.push_str("</form>\n");
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn render_board(html: &mut String, state: &GameState) {
    let playable = !state.is_over();
    html.push_str("<form method=\"POST\" action=\"/\">\n<table>\n");
    for row in Position::ROWS {
        html.push_str("<tr>");
        for pos in row {
            html.push_str("<td>");
            match state.board().get(pos) {
                Square::Empty if playable => {
                    html.push_str(&format!(
                        "<button type=\"submit\" name=\"move\" value=\"{}\" title=\"{}\">&nbsp;</button>",
                        pos.to_index(),
                        pos.label()
                    ));
                }
                Square::Empty => html.push_str("&nbsp;"),
                Square::Occupied(player) => html.push_str(&player.to_string()),
            }
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n</form>\n");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
