use std::fmt;

use crate::error::FetchError;
use crate::types::BeliefView;

pub const APP_NAME: &str = "OnRecord";
const STAKE_AMOUNT: &str = "$2";

/// "1 person", otherwise "{n} people"
pub fn staker_label(count: u64) -> String {
    if count == 1 {
        "1 person".to_string()
    } else {
        format!("{} people", count)
    }
}

impl BeliefView {
    pub fn staker_line(&self) -> String {
        format!("{} staked {}", staker_label(self.staker_count), STAKE_AMOUNT)
    }

    pub fn to_html(&self) -> String {
        page(&format!(
            "<p class=\"belief\">{}</p>\n<p class=\"stakers\">{}</p>",
            escape_html(&self.belief),
            escape_html(&self.staker_line()),
        ))
    }
}

impl fmt::Display for BeliefView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.belief)?;
        write!(f, "{}", self.staker_line())
    }
}

/// Page shown in place of the belief when a load fails
pub fn error_html(err: &FetchError) -> String {
    page(&format!("<p class=\"error\">{}</p>", escape_html(err.user_message())))
}

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{name}</title></head>\n\
         <body>\n<main>\n<h1>{name}</h1>\n{body}\n</main>\n</body>\n</html>\n",
        name = APP_NAME,
        body = body,
    )
}

fn escape_html(text: &str) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::H256;

    #[test]
    fn test_staker_label_plural_boundary() {
        assert_eq!(staker_label(0), "0 people");
        assert_eq!(staker_label(1), "1 person");
        assert_eq!(staker_label(2), "2 people");
    }

    #[test]
    fn test_terminal_rendering() {
        let view = BeliefView {
            belief: "The sky is blue".into(),
            staker_count: 1,
        };
        assert_eq!(view.to_string(), "The sky is blue\n1 person staked $2");
    }

    #[test]
    fn test_html_escapes_belief() {
        let view = BeliefView {
            belief: "<script>alert('x')</script> & more".into(),
            staker_count: 3,
        };
        let html = view.to_html();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"));
        assert!(html.contains("3 people staked $2"));
        assert!(html.contains("<title>OnRecord</title>"));
    }

    #[test]
    fn test_error_page_hides_details() {
        let html = error_html(&FetchError::NotFound(H256::zero()));
        assert!(html.contains("does not exist"));
        assert!(!html.contains("0x0000"));
    }
}
