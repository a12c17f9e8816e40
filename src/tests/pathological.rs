use ntest::timeout;

use crate::{markdown_to_html, Options};

// These stress the no-backtracking guarantees; sizes are large enough
// that an accidental exponential path would blow the timeout instantly.

#[test]
#[timeout(60000)]
fn nested_open_brackets() {
    let input = "[".repeat(2000);
    let output = markdown_to_html(&input, &Options::default());
    assert!(output.contains('['));
}

#[test]
#[timeout(60000)]
fn nested_close_brackets() {
    let input = "]".repeat(2000);
    let output = markdown_to_html(&input, &Options::default());
    assert!(output.contains(']'));
}

#[test]
#[timeout(60000)]
fn emphasis_opener_flood() {
    let input = "*a ".repeat(2000);
    markdown_to_html(&input, &Options::default());
}

#[test]
#[timeout(60000)]
fn alternating_emphasis() {
    let input = "a**b".repeat(2000);
    markdown_to_html(&input, &Options::default());
}

#[test]
#[timeout(60000)]
fn backtick_flood() {
    let mut input = String::new();
    for _ in 0..2000 {
        input.push_str("`a`");
    }
    let output = markdown_to_html(&input, &Options::default());
    assert!(output.contains("<code>a</code>"));
}

#[test]
#[timeout(60000)]
fn deeply_nested_lists() {
    let mut input = String::new();
    for depth in 0..50 {
        for _ in 0..depth {
            input.push_str("  ");
        }
        input.push_str("- x\n");
    }
    let output = markdown_to_html(&input, &Options::default());
    assert!(output.contains("<li>"));
}

#[test]
#[timeout(60000)]
fn deeply_nested_quotes() {
    let mut input = String::new();
    for _ in 0..200 {
        input.push_str("> ");
    }
    input.push_str("deep\n");
    let output = markdown_to_html(&input, &Options::default());
    assert!(output.contains("deep"));
}

#[test]
#[timeout(60000)]
fn long_unclosed_fence() {
    let mut input = String::from("```\n");
    for _ in 0..5000 {
        input.push_str("line of code\n");
    }
    let output = markdown_to_html(&input, &Options::default());
    assert!(output.starts_with("<pre><code>"));
}

#[test]
#[timeout(60000)]
fn many_link_reference_definitions() {
    let mut input = String::new();
    for i in 0..2000 {
        input.push_str(&format!("[l{}]: /u{}\n", i, i));
    }
    input.push_str("\n[l0]\n");
    let output = markdown_to_html(&input, &Options::default());
    assert!(output.contains("href=\"/u0\""));
}
