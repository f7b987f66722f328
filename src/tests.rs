use super::*;

mod html_parsing;
mod notification_banner;
mod page_link;

#[test]
fn page_loads_and_reports_startup_line() -> Result<()> {
    let html = r#"
        <nav class='navbar'>
          <ul class='nav-menu'>
            <li><a href='index.html'>Home</a></li>
          </ul>
        </nav>
        "#;

    let page = Page::from_html(html)?;
    assert_eq!(
        page.console_logs(),
        &["PakLand website loaded successfully!".to_string()]
    );
    Ok(())
}

#[test]
fn error_display_is_stable() {
    let err = Error::SelectorNotFound("#missing".into());
    assert_eq!(err.to_string(), "selector not found: #missing");

    let err = Error::AssertionFailed {
        selector: "#result".into(),
        expected: "done".into(),
        actual: "pending".into(),
        dom_snippet: "<p id=\"result\">pending</p>".into(),
    };
    let rendered = err.to_string();
    assert!(rendered.contains("expected"));
    assert!(rendered.contains("pending"));
}

#[test]
fn truncate_chars_respects_char_boundaries() {
    assert_eq!(truncate_chars("abcdef", 4), "abcd…");
    assert_eq!(truncate_chars("abc", 10), "abc");
    assert_eq!(truncate_chars("✓✓✓✓", 2), "✓✓…");
}
