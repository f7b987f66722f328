use super::*;

pub(crate) const SUBMIT_DELAY_MS: i64 = 1500;
pub(crate) const NOTIFICATION_HIDE_DELAY_MS: i64 = 5000;
pub(crate) const SCROLL_SPY_OFFSET_PX: i64 = 200;

pub(crate) const INVALID_FORM_MESSAGE: &str = "Please fill all required fields correctly";
pub(crate) const SUBMIT_SUCCESS_MESSAGE: &str =
    "✓ Message sent successfully! We'll get back to you soon.";
pub(crate) const SUBMIT_FAILURE_MESSAGE: &str = "Error sending message.Please try again.";
pub(crate) const STARTUP_CONSOLE_LINE: &str = "PakLand website loaded successfully!";

#[derive(Debug)]
pub(crate) struct UiBehaviors {
    pub(crate) state: UiState,
    pub(crate) email: EmailPattern,
    pub(crate) hamburger: Option<NodeId>,
    pub(crate) nav_menu: Option<NodeId>,
}

pub(crate) fn install(
    dom: &Dom,
    listeners: &mut ListenerStore,
    console: &mut Vec<String>,
) -> Result<UiBehaviors> {
    let hamburger = dom.query_selector(".hamburger")?;
    let nav_menu = dom.query_selector(".nav-menu")?;

    if let Some(hamburger) = hamburger {
        listeners.add(hamburger, EventKind::Click, Behavior::MenuToggle);
        for link in dom.query_selector_all(".nav-menu a")? {
            listeners.add(link, EventKind::Click, Behavior::MenuClose);
        }
    }

    for question in dom.query_selector_all(".faq-question")? {
        listeners.add(question, EventKind::Click, Behavior::FaqToggle);
    }

    if let Some(form) = dom.by_id("contactForm") {
        listeners.add(form, EventKind::Submit, Behavior::ContactSubmit);
    }

    for anchor in dom.query_selector_all(r##"a[href^="#"]"##)? {
        listeners.add(anchor, EventKind::Click, Behavior::AnchorScroll);
    }

    listeners.add(dom.root, EventKind::Scroll, Behavior::ScrollSpy);
    listeners.add(dom.root, EventKind::Ready, Behavior::PageMatch);

    for input in dom.query_selector_all(".form-group input, .form-group textarea")? {
        listeners.add(input, EventKind::Blur, Behavior::FieldBlur);
        listeners.add(input, EventKind::Focus, Behavior::FieldFocus);
    }

    console.push(STARTUP_CONSOLE_LINE.to_string());

    Ok(UiBehaviors {
        state: UiState::default(),
        email: EmailPattern::new()?,
        hamburger,
        nav_menu,
    })
}

pub(crate) fn menu_toggle(ui: &mut UiBehaviors, dom: &mut Dom) -> Result<()> {
    let open_now = match ui.nav_menu.or(ui.hamburger) {
        Some(node) => dom.class_contains(node, "active")?,
        None => ui.state.menu.is_open(),
    };
    let current = if open_now {
        MenuState::Open
    } else {
        MenuState::Closed
    };
    ui.state.menu = current.toggled();
    render_menu(dom, ui.state.menu, ui.nav_menu, ui.hamburger)
}

pub(crate) fn menu_close(ui: &mut UiBehaviors, dom: &mut Dom) -> Result<()> {
    ui.state.menu = MenuState::Closed;
    render_menu(dom, ui.state.menu, ui.nav_menu, ui.hamburger)
}

fn render_menu(
    dom: &mut Dom,
    state: MenuState,
    nav_menu: Option<NodeId>,
    hamburger: Option<NodeId>,
) -> Result<()> {
    for node in [nav_menu, hamburger].into_iter().flatten() {
        if state.is_open() {
            dom.class_add(node, "active")?;
        } else {
            dom.class_remove(node, "active")?;
        }
    }
    Ok(())
}

pub(crate) fn faq_toggle(ui: &mut UiBehaviors, dom: &mut Dom, question: NodeId) -> Result<()> {
    let Some(answer) = dom.next_element_sibling(question) else {
        return Ok(());
    };
    let was_active = dom.class_contains(answer, "active")?;

    for item in dom.query_selector_all(".faq-answer.active")? {
        if item == answer {
            continue;
        }
        dom.class_remove(item, "active")?;
        if let Some(other_question) = dom.previous_element_sibling(item) {
            dom.class_remove(other_question, "active")?;
        }
    }

    if was_active {
        dom.class_remove(answer, "active")?;
        dom.class_remove(question, "active")?;
    } else {
        dom.class_add(answer, "active")?;
        dom.class_add(question, "active")?;
    }
    ui.state.faq = ui.state.faq.after_click(was_active, answer);
    Ok(())
}

pub(crate) fn contact_submit(
    ui: &mut UiBehaviors,
    dom: &mut Dom,
    queue: &mut TaskQueue,
    now_ms: i64,
    form: NodeId,
    event: &mut EventState,
) -> Result<()> {
    event.default_prevented = true;

    let values = ContactFormValues {
        name: field_value(dom, ContactField::Name),
        email: field_value(dom, ContactField::Email),
        phone: field_value(dom, ContactField::Phone),
        subject: field_value(dom, ContactField::Subject),
        message: field_value(dom, ContactField::Message),
    };
    let submit_btn = dom.query_selector_from(form, r#"button[type="submit"]"#)?;

    // Clears stale markers document wide, not just inside this form.
    for group in dom.query_selector_all(".form-group.error")? {
        dom.class_remove(group, "error")?;
    }
    ui.state.field_errors.clear();

    let failing = failing_fields(&values, &ui.email)?;
    for field in &failing {
        if let Some(input) = dom.by_id(field.element_id()) {
            if let Some(group) = dom.parent_element(input) {
                dom.class_add(group, "error")?;
                ui.state.field_errors.insert(input);
            }
        }
    }

    if !failing.is_empty() {
        return show_notification(
            ui,
            dom,
            queue,
            now_ms,
            INVALID_FORM_MESSAGE,
            NotificationKind::Error,
        );
    }

    if let Some(button) = submit_btn {
        dom.class_add(button, "loading")?;
        dom.set_disabled(button, true)?;
    }
    ui.state.form = FormPhase::Submitting;
    queue.schedule(
        now_ms,
        SUBMIT_DELAY_MS,
        DeferredAction::FinishSubmission { form },
    );
    Ok(())
}

pub(crate) fn finish_submission(
    ui: &mut UiBehaviors,
    dom: &mut Dom,
    queue: &mut TaskQueue,
    now_ms: i64,
    form: NodeId,
    outcome: SubmissionOutcome,
) -> Result<()> {
    match outcome {
        SubmissionOutcome::Success => {
            show_notification(
                ui,
                dom,
                queue,
                now_ms,
                SUBMIT_SUCCESS_MESSAGE,
                NotificationKind::Success,
            )?;
            dom.reset_form_controls(form)?;
            // The submit handler arms its own hide timer on top of the
            // one show_notification arms.
            if let Some(banner) = dom.by_id("formNotification") {
                queue.schedule(
                    now_ms,
                    NOTIFICATION_HIDE_DELAY_MS,
                    DeferredAction::HideNotification { banner },
                );
            }
        }
        SubmissionOutcome::Failure => {
            show_notification(
                ui,
                dom,
                queue,
                now_ms,
                SUBMIT_FAILURE_MESSAGE,
                NotificationKind::Error,
            )?;
        }
    }

    if let Some(button) = dom.query_selector_from(form, r#"button[type="submit"]"#)? {
        dom.class_remove(button, "loading")?;
        dom.set_disabled(button, false)?;
    }
    ui.state.form = FormPhase::Idle;
    Ok(())
}

pub(crate) fn show_notification(
    ui: &mut UiBehaviors,
    dom: &mut Dom,
    queue: &mut TaskQueue,
    now_ms: i64,
    message: &str,
    kind: NotificationKind,
) -> Result<()> {
    let (Some(banner), Some(slot)) = (dom.by_id("formNotification"), dom.by_id("notificationMessage"))
    else {
        return Ok(());
    };

    dom.set_class_attribute(
        banner,
        &format!("form-notification show {}", kind.class_name()),
    )?;
    dom.set_text_content(slot, message)?;
    ui.state.notification = Some(NotificationState {
        kind,
        message: message.to_string(),
    });
    queue.schedule(
        now_ms,
        NOTIFICATION_HIDE_DELAY_MS,
        DeferredAction::HideNotification { banner },
    );
    Ok(())
}

pub(crate) fn hide_notification(
    ui: &mut UiBehaviors,
    dom: &mut Dom,
    banner: NodeId,
) -> Result<()> {
    // Only the show marker comes off; the kind class stays behind.
    dom.class_remove(banner, "show")?;
    ui.state.notification = None;
    Ok(())
}

pub(crate) fn anchor_scroll_target(dom: &Dom, anchor: NodeId) -> Result<Option<i64>> {
    let Some(href) = dom.attr(anchor, "href") else {
        return Ok(None);
    };
    let Some(fragment) = href.strip_prefix('#') else {
        return Ok(None);
    };
    if fragment.is_empty() {
        return Ok(None);
    }
    let Some(target) = dom.by_id(fragment) else {
        return Ok(None);
    };
    Ok(Some(dom.offset_top(target)?))
}

pub(crate) fn scroll_spy(ui: &mut UiBehaviors, dom: &mut Dom, scroll_y: i64) -> Result<()> {
    let mut current = String::new();
    for section in dom.query_selector_all("section[id]")? {
        if scroll_y >= dom.offset_top(section)? - SCROLL_SPY_OFFSET_PX {
            current = dom.attr(section, "id").unwrap_or_default();
        }
    }
    let rule = ActiveLinkRule::BySection(current);
    render_active_links(dom, &rule)?;
    ui.state.active_link = Some(rule);
    Ok(())
}

pub(crate) fn page_match(ui: &mut UiBehaviors, dom: &mut Dom, url: &str) -> Result<()> {
    let rule = ActiveLinkRule::ByPage(page_name_from_url(url));
    render_active_links(dom, &rule)?;
    ui.state.active_link = Some(rule);
    Ok(())
}

fn render_active_links(dom: &mut Dom, rule: &ActiveLinkRule) -> Result<()> {
    for link in dom.query_selector_all(".nav-menu a")? {
        let marked = dom
            .attr(link, "href")
            .map(|href| rule.matches_href(&href))
            .unwrap_or(false);
        if marked {
            dom.class_add(link, "active")?;
        } else {
            dom.class_remove(link, "active")?;
        }
    }
    Ok(())
}

pub(crate) fn field_blur(ui: &mut UiBehaviors, dom: &mut Dom, input: NodeId) -> Result<()> {
    let Some(group) = dom.parent_element(input) else {
        return Ok(());
    };
    let probe = probe_for(dom, input)?;
    if field_passes_blur(&probe, &ui.email)? {
        dom.class_remove(group, "error")?;
        ui.state.field_errors.remove(&input);
    } else {
        dom.class_add(group, "error")?;
        ui.state.field_errors.insert(input);
    }
    Ok(())
}

pub(crate) fn field_focus(ui: &mut UiBehaviors, dom: &mut Dom, input: NodeId) -> Result<()> {
    if let Some(group) = dom.parent_element(input) {
        dom.class_remove(group, "error")?;
    }
    ui.state.field_errors.remove(&input);
    Ok(())
}

fn probe_for(dom: &Dom, input: NodeId) -> Result<FieldProbe> {
    let is_textarea = dom
        .tag_name(input)
        .map(|tag| tag.eq_ignore_ascii_case("textarea"))
        .unwrap_or(false);
    let input_type = if is_textarea {
        "textarea".to_string()
    } else {
        dom.attr(input, "type")
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_else(|| "text".to_string())
    };
    Ok(FieldProbe {
        required: dom.required(input),
        input_type,
        name_attr: dom.attr(input, "name").unwrap_or_default(),
        value: dom.value(input)?,
    })
}

fn field_value(dom: &Dom, field: ContactField) -> String {
    dom.by_id(field.element_id())
        .and_then(|node| dom.value(node).ok())
        .unwrap_or_default()
}
