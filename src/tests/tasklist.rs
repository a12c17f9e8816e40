use super::*;
use crate::nodes::Block;
use crate::tests::html_opts;
use crate::{parse, Options};

#[test]
fn task_list() {
    html_opts!(
        [extension.tasklist],
        concat!("- [x] done\n", "- [ ] todo\n"),
        concat!(
            "<ul>\n",
            "<li><input type=\"checkbox\" disabled checked /> done</li>\n",
            "<li><input type=\"checkbox\" disabled /> todo</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn checkbox_case_insensitive() {
    html_opts!(
        [extension.tasklist],
        "- [X] shouted\n",
        concat!(
            "<ul>\n",
            "<li><input type=\"checkbox\" disabled checked /> shouted</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn checked_is_tristate() {
    let mut options = Options::default();
    options.extension.tasklist = true;
    let doc = parse("- [x] a\n- [ ] b\n- plain\n", &options);
    match &doc.children[0] {
        Block::List(list) => {
            assert_eq!(list.items[0].checked, Some(true));
            assert_eq!(list.items[1].checked, Some(false));
            assert_eq!(list.items[2].checked, None);
        }
        other => panic!("expected list, got {:?}", other),
    }
}

#[test]
fn disabled_by_default() {
    html(
        "- [x] literal\n",
        "<ul>\n<li>[x] literal</li>\n</ul>\n",
    );
}

#[test]
fn checkbox_needs_space_after() {
    html_opts!(
        [extension.tasklist],
        "- [x]tight\n",
        "<ul>\n<li>[x]tight</li>\n</ul>\n",
    );
}
