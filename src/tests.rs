use crate::{markdown_to_html, Options};

mod api;
mod autolink;
mod code;
mod core;
mod directives;
mod footnotes;
mod html_blocks;
mod inlines;
mod lexer;
mod links;
mod lists;
mod math;
mod pathological;
mod quotes;
mod roles;
mod sourcepos;
mod strikethrough;
mod table;
mod tasklist;

#[track_caller]
pub fn html(input: &str, expected: &str) {
    html_opts_i(input, expected, &Options::default());
}

#[track_caller]
pub fn html_opts_i(input: &str, expected: &str, options: &Options) {
    let output = markdown_to_html(input, options);
    pretty_assertions::assert_eq!(output, expected, "input: {:?}", input);
}

macro_rules! html_opts {
    ([$($optclass:ident.$optname:ident),* $(,)?], $lhs:expr, $rhs:expr $(,)?) => {{
        #[allow(unused_mut)]
        let mut options = $crate::Options::default();
        $( options.$optclass.$optname = true; )*
        $crate::tests::html_opts_i($lhs, $rhs, &options);
    }};
}

pub(crate) use html_opts;
