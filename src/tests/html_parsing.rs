use super::*;

#[test]
fn entities_decode_in_text_and_attributes() -> Result<()> {
    let html = r#"
        <p id='msg' title='a &amp; b'>x &lt; y &gt; z &amp; &#65; &#x42;</p>
        "#;

    let page = Page::from_html(html)?;
    assert_eq!(page.text("#msg")?, "x < y > z & A B");
    assert_eq!(page.attr("#msg", "title")?.as_deref(), Some("a & b"));
    Ok(())
}

#[test]
fn unknown_entities_stay_literal() -> Result<()> {
    let page = Page::from_html("<p id='msg'>ships &foo; tonight</p>")?;
    assert_eq!(page.text("#msg")?, "ships &foo; tonight");
    Ok(())
}

#[test]
fn comments_and_doctype_are_skipped() -> Result<()> {
    let html = r#"
        <!DOCTYPE html>
        <!-- navigation block -->
        <div id='app'><!-- inner --><p>kept</p></div>
        "#;

    let page = Page::from_html(html)?;
    assert_eq!(page.text("#app")?, "kept");
    assert_eq!(page.count("p")?, 1);
    Ok(())
}

#[test]
fn void_elements_do_not_swallow_siblings() -> Result<()> {
    let html = r#"
        <div id='app'>
          <img src='logo.png'>
          <input id='field' value='x'>
          <p id='msg'>after</p>
        </div>
        "#;

    let page = Page::from_html(html)?;
    assert_eq!(page.text("#msg")?, "after");
    assert_eq!(page.count("#app > p")?, 1);
    assert_eq!(page.count("#app > img")?, 1);
    Ok(())
}

#[test]
fn script_and_style_content_is_inert() -> Result<()> {
    let html = r#"
        <style>.fake { color: red; }</style>
        <script>const fake = '<div id="fake"></div>';</script>
        <p id='real'>visible</p>
        "#;

    let page = Page::from_html(html)?;
    page.assert_exists("#fake", false)?;
    assert_eq!(page.text("#real")?, "visible");
    assert!(!page.dump_dom().contains("color: red"));
    Ok(())
}

#[test]
fn textarea_content_becomes_its_value() -> Result<()> {
    let html = r#"
        <form id='contactForm'>
          <textarea id='message'>draft &amp; notes</textarea>
        </form>
        "#;

    let page = Page::from_html(html)?;
    assert_eq!(page.value("#message")?, "draft & notes");
    Ok(())
}

#[test]
fn unclosed_and_unmatched_tags_recover() -> Result<()> {
    let html = "</p><div id='a'><p id='b'>text<div id='c'>tail";
    let page = Page::from_html(html)?;
    page.assert_exists("#a", true)?;
    page.assert_exists("#b", true)?;
    page.assert_exists("#c", true)?;
    Ok(())
}

#[test]
fn malformed_tags_report_parse_errors() {
    assert!(matches!(
        Page::from_html("<>"),
        Err(Error::HtmlParse(_))
    ));
    assert!(matches!(
        Page::from_html("<div id='x'"),
        Err(Error::HtmlParse(_))
    ));
}

#[test]
fn tag_and_attribute_names_fold_to_lowercase() -> Result<()> {
    let html = "<DIV ID='app' CLASS='Wrap'>x</DIV>";
    let page = Page::from_html(html)?;
    assert_eq!(page.count("div")?, 1);
    page.assert_exists("#app", true)?;
    // Attribute values keep their case.
    page.assert_class("#app", "Wrap", true)?;
    page.assert_class("#app", "wrap", false)?;
    Ok(())
}

#[test]
fn valueless_attributes_parse_as_true() -> Result<()> {
    let html = "<form id='contactForm'><input id='name' required disabled></form>";
    let page = Page::from_html(html)?;
    assert_eq!(page.attr("#name", "required")?.as_deref(), Some("true"));
    assert_eq!(page.attr("#name", "disabled")?.as_deref(), Some("true"));
    Ok(())
}

#[test]
fn self_closing_syntax_is_accepted() -> Result<()> {
    let html = "<div id='app'><br/><span id='s'>x</span></div>";
    let page = Page::from_html(html)?;
    page.assert_exists("#app > span", true)?;
    assert_eq!(page.text("#s")?, "x");
    Ok(())
}
