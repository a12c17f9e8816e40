use super::*;
use crate::tests::html_opts;

#[test]
fn basic_table() {
    html_opts!(
        [extension.table],
        concat!("| A | B |\n", "|---|---|\n", "| 1 | 2 |\n"),
        concat!(
            "<table>\n",
            "<thead>\n",
            "<tr>\n",
            "<th>A</th>\n",
            "<th>B</th>\n",
            "</tr>\n",
            "</thead>\n",
            "<tbody>\n",
            "<tr>\n",
            "<td>1</td>\n",
            "<td>2</td>\n",
            "</tr>\n",
            "</tbody>\n",
            "</table>\n"
        ),
    );
}

#[test]
fn table_alignment() {
    html_opts!(
        [extension.table],
        concat!("| a | b | c |\n", "|:--|--:|:-:|\n", "| 1 | 2 | 3 |\n"),
        concat!(
            "<table>\n",
            "<thead>\n",
            "<tr>\n",
            "<th style=\"text-align: left\">a</th>\n",
            "<th style=\"text-align: right\">b</th>\n",
            "<th style=\"text-align: center\">c</th>\n",
            "</tr>\n",
            "</thead>\n",
            "<tbody>\n",
            "<tr>\n",
            "<td style=\"text-align: left\">1</td>\n",
            "<td style=\"text-align: right\">2</td>\n",
            "<td style=\"text-align: center\">3</td>\n",
            "</tr>\n",
            "</tbody>\n",
            "</table>\n"
        ),
    );
}

#[test]
fn table_without_body() {
    html_opts!(
        [extension.table],
        concat!("| A |\n", "|---|\n"),
        concat!(
            "<table>\n",
            "<thead>\n",
            "<tr>\n",
            "<th>A</th>\n",
            "</tr>\n",
            "</thead>\n",
            "</table>\n"
        ),
    );
}

#[test]
fn escaped_pipe_stays_in_cell() {
    html_opts!(
        [extension.table],
        concat!("| a\\|b |\n", "|------|\n"),
        concat!(
            "<table>\n",
            "<thead>\n",
            "<tr>\n",
            "<th>a|b</th>\n",
            "</tr>\n",
            "</thead>\n",
            "</table>\n"
        ),
    );
}

#[test]
fn invalid_delimiter_row_is_paragraph() {
    html_opts!(
        [extension.table],
        concat!("| A | B |\n", "| x | y |\n"),
        "<p>| A | B |\n| x | y |</p>\n",
    );
}

#[test]
fn tables_disabled_by_default() {
    html(
        concat!("| A |\n", "|---|\n"),
        "<p>| A |\n|---|</p>\n",
    );
}

#[test]
fn inline_markup_in_cells() {
    html_opts!(
        [extension.table],
        concat!("| **bold** |\n", "|----------|\n"),
        concat!(
            "<table>\n",
            "<thead>\n",
            "<tr>\n",
            "<th><strong>bold</strong></th>\n",
            "</tr>\n",
            "</thead>\n",
            "</table>\n"
        ),
    );
}
