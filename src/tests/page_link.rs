use super::*;

const NAV_PAGE: &str = r#"
    <nav class='navbar'>
      <ul class='nav-menu'>
        <li><a href='index.html'>Home</a></li>
        <li><a href='about.html'>About</a></li>
        <li><a href='services.html'>Services</a></li>
        <li><a href='#contact'>Contact</a></li>
      </ul>
    </nav>
    "#;

#[test]
fn load_marks_link_matching_the_page_name() -> Result<()> {
    let page = Page::from_html_with_url("https://pakland.example/about.html", NAV_PAGE)?;
    page.assert_class("a[href='about.html']", "active", true)?;
    page.assert_class("a[href='index.html']", "active", false)?;
    page.assert_class("a[href='services.html']", "active", false)?;
    assert_eq!(page.active_link_href().as_deref(), Some("about.html"));
    Ok(())
}

#[test]
fn root_url_falls_back_to_index() -> Result<()> {
    let page = Page::from_html(NAV_PAGE)?;
    page.assert_class("a[href='index.html']", "active", true)?;
    page.assert_class("a[href='about.html']", "active", false)?;
    Ok(())
}

#[test]
fn host_only_url_falls_back_to_index() -> Result<()> {
    let page = Page::from_html_with_url("https://pakland.example", NAV_PAGE)?;
    page.assert_class("a[href='index.html']", "active", true)?;
    Ok(())
}

#[test]
fn query_and_fragment_are_ignored() -> Result<()> {
    let page =
        Page::from_html_with_url("https://pakland.example/services.html?ref=ad#pricing", NAV_PAGE)?;
    page.assert_class("a[href='services.html']", "active", true)?;
    page.assert_class("a[href='index.html']", "active", false)?;
    Ok(())
}

#[test]
fn premarked_links_are_swept_on_load() -> Result<()> {
    let html = r#"
        <nav class='navbar'>
          <ul class='nav-menu'>
            <li><a href='index.html'>Home</a></li>
            <li><a href='about.html' class='active'>About</a></li>
          </ul>
        </nav>
        "#;

    let page = Page::from_html_with_url("https://pakland.example/index.html", html)?;
    page.assert_class("a[href='index.html']", "active", true)?;
    page.assert_class("a[href='about.html']", "active", false)?;
    Ok(())
}

#[test]
fn deep_paths_use_only_the_last_segment() -> Result<()> {
    let page =
        Page::from_html_with_url("https://pakland.example/en/site/about.html", NAV_PAGE)?;
    page.assert_class("a[href='about.html']", "active", true)?;
    Ok(())
}

#[test]
fn page_without_nav_menu_still_loads() -> Result<()> {
    let page = Page::from_html("<main><h1>Hello</h1></main>")?;
    assert_eq!(
        page.console_logs(),
        &["PakLand website loaded successfully!".to_string()]
    );
    Ok(())
}
