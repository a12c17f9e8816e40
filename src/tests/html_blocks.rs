use super::*;

#[test]
fn html_block_type_1_script() {
    html(
        concat!(
            "<script>\n",
            "let x = 1;\n",
            "</script>\n",
            "\n",
            "*ok*\n"
        ),
        concat!(
            "<script>\n",
            "let x = 1;\n",
            "</script>\n",
            "<p><em>ok</em></p>\n"
        ),
    );
}

#[test]
fn html_block_type_2_comment() {
    html(
        concat!("<!-- a\n", "b -->\n", "\n", "para\n"),
        concat!("<!-- a\n", "b -->\n", "<p>para</p>\n"),
    );
}

#[test]
fn html_block_type_3_pi() {
    html(
        "<?php echo 1; ?>\n",
        "<?php echo 1; ?>\n",
    );
}

#[test]
fn html_block_type_5_cdata() {
    html(
        concat!("<![CDATA[\n", "raw <stuff>\n", "]]>\n"),
        concat!("<![CDATA[\n", "raw <stuff>\n", "]]>\n"),
    );
}

#[test]
fn html_block_type_6_div() {
    html(
        concat!("<div>\n", "plain\n", "</div>\n", "\n", "after\n"),
        concat!("<div>\n", "plain\n", "</div>\n", "<p>after</p>\n"),
    );
}

#[test]
fn html_block_type_6_swallows_markdown() {
    html(
        concat!("<div>\n", "*not em*\n", "</div>\n"),
        concat!("<div>\n", "*not em*\n", "</div>\n"),
    );
}

#[test]
fn html_block_type_7_custom_tag() {
    html(
        concat!("<x-widget attr=\"v\">\n", "inside\n", "\n", "after\n"),
        concat!("<x-widget attr=\"v\">\n", "inside\n", "<p>after</p>\n"),
    );
}

#[test]
fn html_block_unterminated_at_eof() {
    html(
        concat!("<div>\n", "never closed\n"),
        concat!("<div>\n", "never closed\n"),
    );
}

#[test]
fn type_7_requires_strict_attributes() {
    // Attributes without separating whitespace invalidate the tag.
    html(
        "<x-a b='c'd>\n",
        "<p>&lt;x-a b='c'd&gt;</p>\n",
    );
}
