use crate::config::DEFAULT_TOPN;
use crate::explore::Outcome;
use std::fmt::Write;

const TEMPLATE: &str = include_str!("../templates/index.html");

/// Renders the page; `None` is the empty form served on GET.
pub fn render(outcome: Option<&Outcome>) -> String {
    let (word, topn, results) = match outcome {
        None => (String::new(), DEFAULT_TOPN, String::new()),
        Some(Outcome::Message(message)) => (
            String::new(),
            DEFAULT_TOPN,
            format!("<p class=\"message\">{}</p>", escape(message)),
        ),
        Some(Outcome::Found {
            word,
            topn,
            neighbors,
            image,
        }) => {
            let mut html = format!(
                "<h2>Top {} similar words to &#39;{}&#39;</h2>\n  <ol class=\"neighbors\">\n",
                topn,
                escape(word)
            );
            for n in neighbors {
                let _ = writeln!(
                    html,
                    "    <li><span class=\"word\">{}</span><span class=\"score\">{}</span></li>",
                    escape(&n.word),
                    escape(&n.score)
                );
            }
            html.push_str("  </ol>\n");
            let _ = write!(
                html,
                "  <img class=\"plot\" alt=\"2-D projection of {}\" \
                 src=\"data:image/png;base64,{}\">",
                escape(word),
                image
            );
            (word.clone(), *topn, html)
        }
    };

    TEMPLATE
        .replace("{{word}}", &escape(&word))
        .replace("{{topn}}", &topn.to_string())
        .replace("{{results}}", &results)
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // keeps user text from forming template placeholders
            '{' => out.push_str("&#123;"),
            _ => out.push(c),
        }
    }
    out
}
