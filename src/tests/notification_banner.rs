use super::*;

const BANNER_PAGE: &str = r#"
    <form id='contactForm'>
      <div class='form-group'><input type='text' id='name' required></div>
      <div class='form-group'><input type='email' id='email' required></div>
      <div class='form-group'><input type='text' id='subject' required></div>
      <div class='form-group'><textarea id='message' required></textarea></div>
      <button type='submit'>Send</button>
    </form>
    <div id='formNotification' class='form-notification'>
      <span id='notificationMessage'></span>
    </div>
    "#;

fn fill_valid(page: &mut Page) -> Result<()> {
    page.type_text("#name", "Ali")?;
    page.type_text("#email", "ali@example.com")?;
    page.type_text("#subject", "Quote")?;
    page.type_text("#message", "Plenty of characters here.")?;
    Ok(())
}

#[test]
fn banner_requires_both_banner_and_message_slot() -> Result<()> {
    let html = r#"
        <form id='contactForm'>
          <div class='form-group'><input type='text' id='name' required></div>
          <div class='form-group'><input type='email' id='email' required></div>
          <div class='form-group'><input type='text' id='subject' required></div>
          <div class='form-group'><textarea id='message' required></textarea></div>
          <button type='submit'>Send</button>
        </form>
        <div id='formNotification' class='form-notification'></div>
        "#;

    let mut page = Page::from_html(html)?;
    page.click("button[type=submit]")?;

    // Without the message slot nothing is shown and no hide is armed.
    page.assert_class("#formNotification", "show", false)?;
    assert_eq!(page.pending_timers().len(), 0);
    // The validation marks still land.
    assert_eq!(page.count(".form-group.error")?, 4);
    Ok(())
}

#[test]
fn stale_hide_timer_cuts_newer_banner_short() -> Result<()> {
    let mut page = Page::from_html(BANNER_PAGE)?;
    page.click("button[type=submit]")?;
    assert_eq!(page.pending_timers().len(), 1);

    page.advance_time(4000)?;
    page.assert_class("#formNotification", "show", true)?;

    // A second invalid submit refreshes the banner but the first hide
    // timer is still armed and fires a second later.
    page.click("button[type=submit]")?;
    assert_eq!(page.pending_timers().len(), 2);

    page.advance_time(1000)?;
    page.assert_class("#formNotification", "show", false)?;
    assert_eq!(page.pending_timers().len(), 1);
    Ok(())
}

#[test]
fn hide_removes_show_but_keeps_kind_class() -> Result<()> {
    let mut page = Page::from_html(BANNER_PAGE)?;
    page.click("button[type=submit]")?;
    assert_eq!(
        page.attr("#formNotification", "class")?.as_deref(),
        Some("form-notification show error")
    );

    page.advance_time(5000)?;
    assert_eq!(
        page.attr("#formNotification", "class")?.as_deref(),
        Some("form-notification error")
    );
    Ok(())
}

#[test]
fn clear_timer_cancels_the_scheduled_hide() -> Result<()> {
    let mut page = Page::from_html(BANNER_PAGE)?;
    page.click("button[type=submit]")?;

    let pending = page.pending_timers();
    assert_eq!(pending.len(), 1);
    assert!(page.clear_timer(pending[0].id));
    assert!(!page.clear_timer(pending[0].id));

    page.advance_time(10_000)?;
    page.assert_class("#formNotification", "show", true)?;
    Ok(())
}

#[test]
fn clear_all_timers_empties_the_queue() -> Result<()> {
    let mut page = Page::from_html(BANNER_PAGE)?;
    fill_valid(&mut page)?;
    page.click("button[type=submit]")?;
    page.advance_time(1500)?;
    assert_eq!(page.pending_timers().len(), 2);

    assert_eq!(page.clear_all_timers(), 2);
    assert_eq!(page.pending_timers().len(), 0);
    page.advance_time(10_000)?;
    page.assert_class("#formNotification", "show", true)?;
    Ok(())
}

#[test]
fn run_next_timer_fires_one_task_at_a_time() -> Result<()> {
    let mut page = Page::from_html(BANNER_PAGE)?;
    fill_valid(&mut page)?;
    page.click("button[type=submit]")?;

    assert!(page.run_next_timer()?);
    assert_eq!(page.now_ms(), 1500);
    page.assert_class("#formNotification", "success", true)?;
    assert_eq!(page.pending_timers().len(), 2);

    assert!(page.run_next_timer()?);
    assert_eq!(page.now_ms(), 6500);
    page.assert_class("#formNotification", "show", false)?;

    assert!(page.run_next_timer()?);
    assert!(!page.run_next_timer()?);
    Ok(())
}
