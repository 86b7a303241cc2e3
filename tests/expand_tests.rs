//! Integration tests for the expand command

#![allow(deprecated)]

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::{include_cmd, write};

const SNIPPETS: &str = "\
# tag::snippets[]
# tag::snippet-a[]
puts 'a'
# end::snippet-a[]
# tag::snippet-b[]
puts 'b'
# end::snippet-b[]
# end::snippets[]
puts 'untagged'";

#[test]
fn test_expand_includes_file() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "include-file.adoc", "included content\n");
    write(
        temp.path(),
        "main.adoc",
        "= Title\n\ninclude::include-file.adoc[]\n\ntrailing",
    );

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .assert()
        .success()
        .stdout("= Title\n\nincluded content\n\ntrailing\n")
        .stderr("");
}

#[test]
fn test_secure_mode_renders_link() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "include-file.adoc", "included content");
    write(temp.path(), "main.adoc", "include::include-file.adoc[]");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .args(["--safe-mode", "secure"])
        .assert()
        .success()
        .stdout("link:include-file.adoc[]\n")
        .stderr(predicate::str::contains(
            "include not allowed, replaced with link: include-file.adoc",
        ));
}

#[test]
fn test_nested_relative_includes() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "a/include-1.adoc",
        "begin of include 1\ninclude::b/include-2.adoc[]\nend of include 1",
    );
    write(temp.path(), "a/b/include-2.adoc", "include 2");
    write(temp.path(), "main.adoc", "include::a/include-1.adoc[]");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .assert()
        .success()
        .stdout("begin of include 1\ninclude 2\nend of include 1\n");
}

#[test]
fn test_missing_target_is_unresolved() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "main.adoc", "include::no-such-file.adoc[]\ntrailing");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Unresolved directive in "))
        .stdout(predicate::str::contains("- include::no-such-file.adoc[]"))
        .stdout(predicate::str::contains("trailing"))
        .stderr(predicate::str::contains(
            "include target not found: no-such-file.adoc",
        ));
}

#[test]
fn test_optional_missing_target_is_silent() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "main.adoc",
        "include::no-such-file.adoc[opts=optional]\ntrailing",
    );

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .assert()
        .success()
        .stdout("trailing\n")
        .stderr("");
}

#[test]
fn test_uri_without_allow_uri_read_renders_link() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "main.adoc", "include::https://example.org/a.adoc[]");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .assert()
        .success()
        .stdout("link:https://example.org/a.adoc[]\n");
}

#[test]
fn test_lines_selection() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "five.txt", "one\ntwo\nthree\nfour\nfive");
    write(temp.path(), "main.adoc", "include::five.txt[lines=1;3..4]");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .assert()
        .success()
        .stdout("one\nthree\nfour\n");
}

#[test]
fn test_tags_selection() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "snippets.rb", SNIPPETS);
    write(
        temp.path(),
        "main.adoc",
        "include::snippets.rb[tags=snippets;!snippet-b]",
    );

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .assert()
        .success()
        .stdout("puts 'a'\n")
        .stderr("");
}

#[test]
fn test_mismatched_end_tag_warns() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "bad.rb",
        "# tag::a[]\nkept\n# end::b[]\n# end::a[]",
    );
    write(temp.path(), "main.adoc", "include::bad.rb[tag=a]");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .assert()
        .success()
        .stdout("kept\n")
        .stderr(predicate::str::contains("unexpected end tag in include: b"));
}

#[test]
fn test_depth_limit() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "loop.adoc", "loop\ninclude::loop.adoc[]");
    write(temp.path(), "main.adoc", "include::loop.adoc[]");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .args(["--max-include-depth", "2"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("loop\nloop\nUnresolved directive in "))
        .stderr(predicate::str::contains("maximum include depth of 2 exceeded"));
}

#[test]
fn test_strict_fails_on_missing_target() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "main.adoc", "include::no-such-file.adoc[]\ntrailing");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .arg("--strict")
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("trailing"))
        .stderr(predicate::str::contains("Unresolved include: "))
        .stderr(predicate::str::contains("opts=optional"));
}

#[test]
fn test_strict_fails_on_depth_limit() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "loop.adoc", "include::loop.adoc[]");
    write(temp.path(), "main.adoc", "include::loop.adoc[]");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .args(["--strict", "--max-include-depth", "1"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_strict_fails_on_rejected_uri() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "main.adoc", "include::https://example.org/a.adoc[]");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .arg("--strict")
        .assert()
        .failure()
        .code(6)
        .stdout("link:https://example.org/a.adoc[]\n")
        .stderr(predicate::str::contains("--allow-uri-read"));
}

#[test]
fn test_strict_ignores_warnings() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "bad.rb", "# tag::a[]\nkept\n# end::b[]\n# end::a[]");
    write(temp.path(), "main.adoc", "include::bad.rb[tag=a]");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .arg("--strict")
        .assert()
        .success()
        .stdout("kept\n");
}

#[test]
fn test_relative_base_dir() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "docs/inc.adoc", "included content");
    write(temp.path(), "docs/main.adoc", "include::inc.adoc[]");

    include_cmd()
        .current_dir(temp.path())
        .args(["expand", "docs/main.adoc", "--base-dir", "docs"])
        .assert()
        .success()
        .stdout("included content\n")
        .stderr("");
}

#[test]
fn test_relative_base_dir_from_config_still_jails() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "secret.adoc", "outside");
    write(temp.path(), "docs/secret.adoc", "inside");
    write(temp.path(), "docs/main.adoc", "include::../secret.adoc[]");
    write(
        temp.path(),
        "include.toml",
        "safe_mode = \"safe\"\nbase_dir = \"docs\"\n",
    );

    include_cmd()
        .current_dir(temp.path())
        .args(["expand", "docs/main.adoc", "--config", "include.toml"])
        .assert()
        .success()
        .stdout("inside\n")
        .stderr(predicate::str::contains("outside of jail"));
}

#[test]
fn test_output_file() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "part.adoc", "part");
    write(temp.path(), "main.adoc", "include::part.adoc[]");
    let output = temp.path().join("out.adoc");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_to_string(output).unwrap(), "part\n");
}

#[test]
fn test_config_file_policy() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "part.adoc", "part");
    write(temp.path(), "main.adoc", "include::part.adoc[]");
    write(temp.path(), "include.toml", "safe_mode = \"secure\"\n");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .arg("--config")
        .arg(temp.path().join("include.toml"))
        .assert()
        .success()
        .stdout("link:part.adoc[]\n");
}

#[test]
fn test_missing_document() {
    let temp = TempDir::new().unwrap();

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("nope.adoc"))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Document not found"));
}

#[test]
fn test_invalid_safe_mode() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "main.adoc", "text");

    include_cmd()
        .arg("expand")
        .arg(temp.path().join("main.adoc"))
        .args(["--safe-mode", "paranoid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid safe mode"));
}
