use super::*;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionOutcome {
    #[default]
    Success,
    Failure,
}

pub struct Page {
    dom: Dom,
    listeners: ListenerStore,
    ui: UiBehaviors,
    tasks: TaskQueue,
    now_ms: i64,
    timer_step_limit: usize,
    scroll_y: i64,
    document_url: String,
    console: Vec<String>,
    navigations: Vec<String>,
    submission_outcome: SubmissionOutcome,
    active_element: Option<NodeId>,
    trace: bool,
    trace_events: bool,
    trace_timers: bool,
    trace_logs: Vec<String>,
    trace_log_limit: usize,
    trace_to_stderr: bool,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_url("http://localhost/", html)
    }

    pub fn from_html_with_url(url: &str, html: &str) -> Result<Self> {
        stacker::grow(32 * 1024 * 1024, || {
            let dom = parse_html(html)?;
            let mut listeners = ListenerStore::default();
            let mut console = Vec::new();
            let ui = behaviors::install(&dom, &mut listeners, &mut console)?;
            let mut page = Page {
                dom,
                listeners,
                ui,
                tasks: TaskQueue::new(),
                now_ms: 0,
                timer_step_limit: 10_000,
                scroll_y: 0,
                document_url: url.to_string(),
                console,
                navigations: Vec::new(),
                submission_outcome: SubmissionOutcome::Success,
                active_element: None,
                trace: false,
                trace_events: true,
                trace_timers: true,
                trace_logs: Vec::new(),
                trace_log_limit: 10_000,
                trace_to_stderr: true,
            };
            let root = page.dom.root;
            page.dispatch_event(root, EventKind::Ready)?;
            Ok(page)
        })
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || {
            let target = self.select_one(selector)?;
            if self.dom.disabled(target) {
                return Ok(());
            }
            let event = self.dispatch_event(target, EventKind::Click)?;
            if event.default_prevented {
                return Ok(());
            }
            self.run_click_default(target)
        })
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || {
            let target = self.select_one(selector)?;
            if self.dom.disabled(target) || self.dom.readonly(target) {
                return Ok(());
            }
            let tag = self.dom.tag_name(target).unwrap_or("").to_string();
            if !tag.eq_ignore_ascii_case("input") && !tag.eq_ignore_ascii_case("textarea") {
                return Err(Error::TypeMismatch {
                    selector: selector.to_string(),
                    expected: "input or textarea".to_string(),
                    actual: tag,
                });
            }
            self.dom.set_value(target, text)?;
            self.dispatch_event(target, EventKind::Input)?;
            Ok(())
        })
    }

    pub fn submit(&mut self, selector: &str) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || {
            let target = self.select_one(selector)?;
            let is_form = self
                .dom
                .tag_name(target)
                .map(|tag| tag.eq_ignore_ascii_case("form"))
                .unwrap_or(false);
            let form = if is_form {
                target
            } else {
                self.dom
                    .find_ancestor_by_tag(target, "form")
                    .ok_or_else(|| {
                        Error::Runtime(format!("no enclosing form for selector: {selector}"))
                    })?
            };
            self.dispatch_event(form, EventKind::Submit)?;
            Ok(())
        })
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || {
            let target = self.select_one(selector)?;
            if self.dom.disabled(target) {
                return Ok(());
            }
            if self.active_element == Some(target) {
                return Ok(());
            }
            if let Some(previous) = self.active_element.take() {
                self.dispatch_event(previous, EventKind::Blur)?;
                self.dispatch_event(previous, EventKind::FocusOut)?;
            }
            self.active_element = Some(target);
            self.dispatch_event(target, EventKind::Focus)?;
            self.dispatch_event(target, EventKind::FocusIn)?;
            Ok(())
        })
    }

    pub fn blur(&mut self, selector: &str) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || {
            let target = self.select_one(selector)?;
            if self.active_element == Some(target) {
                self.active_element = None;
            }
            self.dispatch_event(target, EventKind::Blur)?;
            self.dispatch_event(target, EventKind::FocusOut)?;
            Ok(())
        })
    }

    pub fn dispatch(&mut self, selector: &str, event_name: &str) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || {
            let kind = EventKind::parse(event_name)?;
            let target = self.select_one(selector)?;
            self.dispatch_event(target, kind)?;
            Ok(())
        })
    }

    pub fn scroll_to(&mut self, y: i64) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || {
            if y < 0 {
                return Err(Error::Runtime(format!("scroll position out of range: {y}")));
            }
            self.scroll_to_internal(y)
        })
    }

    pub fn set_offset_top(&mut self, selector: &str, offset_top: i64) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_offset_top(target, offset_top)
    }

    pub fn set_submission_outcome(&mut self, outcome: SubmissionOutcome) {
        self.submission_outcome = outcome;
    }

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || {
            if delta_ms < 0 {
                return Err(Error::Runtime(format!(
                    "cannot advance time by {delta_ms}ms"
                )));
            }
            let target = self.now_ms + delta_ms;
            self.run_timer_queue(Some(target))?;
            self.now_ms = target;
            Ok(())
        })
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || {
            if target_ms < self.now_ms {
                return Err(Error::Runtime(format!(
                    "cannot move time backwards to {target_ms}ms"
                )));
            }
            self.run_timer_queue(Some(target_ms))?;
            self.now_ms = target_ms;
            Ok(())
        })
    }

    pub fn flush(&mut self) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || self.run_timer_queue(None))
    }

    pub fn run_next_timer(&mut self) -> Result<bool> {
        stacker::grow(32 * 1024 * 1024, || {
            let Some(idx) = self.tasks.next_task_index(None) else {
                return Ok(false);
            };
            let task = self.tasks.remove(idx);
            if task.due_at > self.now_ms {
                self.now_ms = task.due_at;
            }
            self.execute_task(task)?;
            Ok(true)
        })
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.tasks.snapshot()
    }

    pub fn clear_timer(&mut self, id: i64) -> bool {
        let cleared = self.tasks.cancel(id);
        if cleared && self.trace && self.trace_timers {
            self.trace_line(format!("[timer] clear id={id}"));
        }
        cleared
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.tasks.clear();
        if cleared > 0 && self.trace && self.trace_timers {
            self.trace_line(format!("[timer] cleared {cleared} pending"));
        }
        cleared
    }

    pub fn set_timer_step_limit(&mut self, limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(Error::Runtime("timer step limit must be positive".into()));
        }
        self.timer_step_limit = limit;
        Ok(())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        let actual_norm: String = actual.nfc().collect();
        let expected_norm: String = expected.nfc().collect();
        if actual_norm != expected_norm {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str, expected: bool) -> Result<()> {
        let found = self.dom.query_selector(selector)?;
        if found.is_some() != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: describe_presence(expected).to_string(),
                actual: describe_presence(found.is_some()).to_string(),
                dom_snippet: found.map(|node| self.node_snippet(node)).unwrap_or_default(),
            });
        }
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class \"{class_name}\" {}", describe_presence(expected)),
                actual: format!("class \"{class_name}\" {}", describe_presence(actual)),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn checked(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.dom.checked(target)
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.dom.class_contains(target, class_name)
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_selector_all(selector)?.len())
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name))
    }

    pub fn dump_dom(&self) -> String {
        self.dom.dump_node(self.dom.root)
    }

    pub fn scroll_position(&self) -> i64 {
        self.scroll_y
    }

    pub fn notification(&self) -> Option<(NotificationKind, String)> {
        self.ui
            .state
            .notification
            .as_ref()
            .map(|state| (state.kind, state.message.clone()))
    }

    pub fn submitting(&self) -> bool {
        matches!(self.ui.state.form, FormPhase::Submitting)
    }

    pub fn field_error_count(&self) -> usize {
        self.ui.state.field_errors.len()
    }

    // The href a nav link must carry to count as active under the current rule.
    pub fn active_link_href(&self) -> Option<String> {
        self.ui.state.active_link.as_ref().map(|rule| match rule {
            ActiveLinkRule::BySection(section_id) => format!("#{section_id}"),
            ActiveLinkRule::ByPage(page_name) => page_name.clone(),
        })
    }

    pub fn document_url(&self) -> &str {
        &self.document_url
    }

    pub fn console_logs(&self) -> &[String] {
        &self.console
    }

    pub fn take_console_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.console)
    }

    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_to_stderr = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.trace_timers = enabled;
    }

    pub fn set_trace_log_limit(&mut self, limit: usize) {
        self.trace_log_limit = limit;
        self.trace_logs.truncate(limit);
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    fn scroll_to_internal(&mut self, y: i64) -> Result<()> {
        self.scroll_y = y;
        let root = self.dom.root;
        self.dispatch_event(root, EventKind::Scroll)?;
        Ok(())
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>) -> Result<()> {
        let mut steps = 0usize;
        while let Some(idx) = self.tasks.next_task_index(due_limit) {
            steps += 1;
            if steps > self.timer_step_limit {
                return Err(Error::Runtime(format!(
                    "timer queue did not settle after {} steps",
                    self.timer_step_limit
                )));
            }
            let task = self.tasks.remove(idx);
            if task.due_at > self.now_ms {
                self.now_ms = task.due_at;
            }
            self.execute_task(task)?;
        }
        Ok(())
    }

    fn execute_task(&mut self, task: ScheduledTask) -> Result<()> {
        if self.trace && self.trace_timers {
            self.trace_line(format!("[timer] fire id={} due={}", task.id, task.due_at));
        }
        match task.action {
            DeferredAction::FinishSubmission { form } => behaviors::finish_submission(
                &mut self.ui,
                &mut self.dom,
                &mut self.tasks,
                self.now_ms,
                form,
                self.submission_outcome,
            ),
            DeferredAction::HideNotification { banner } => {
                behaviors::hide_notification(&mut self.ui, &mut self.dom, banner)
            }
        }
    }

    fn dispatch_event(&mut self, target: NodeId, kind: EventKind) -> Result<EventState> {
        let mut event = EventState::new(kind, target);
        if self.trace && self.trace_events {
            let label = self.node_label(event.target);
            self.trace_line(format!("[event] {} on {label}", event.kind.name()));
        }

        let mut path = vec![target];
        let mut cursor = self.dom.parent(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        for node in path {
            event.current_target = node;
            for binding in self.listeners.get(node, event.kind) {
                self.run_behavior(binding.behavior, &mut event)?;
            }
        }
        Ok(event)
    }

    fn run_behavior(&mut self, behavior: Behavior, event: &mut EventState) -> Result<()> {
        match behavior {
            Behavior::MenuToggle => behaviors::menu_toggle(&mut self.ui, &mut self.dom),
            Behavior::MenuClose => behaviors::menu_close(&mut self.ui, &mut self.dom),
            Behavior::FaqToggle => {
                behaviors::faq_toggle(&mut self.ui, &mut self.dom, event.current_target)
            }
            Behavior::ContactSubmit => behaviors::contact_submit(
                &mut self.ui,
                &mut self.dom,
                &mut self.tasks,
                self.now_ms,
                event.current_target,
                event,
            ),
            Behavior::AnchorScroll => {
                event.default_prevented = true;
                if let Some(y) = behaviors::anchor_scroll_target(&self.dom, event.current_target)? {
                    self.scroll_to_internal(y)?;
                }
                Ok(())
            }
            Behavior::ScrollSpy => {
                behaviors::scroll_spy(&mut self.ui, &mut self.dom, self.scroll_y)
            }
            Behavior::PageMatch => {
                let url = self.document_url.clone();
                behaviors::page_match(&mut self.ui, &mut self.dom, &url)
            }
            Behavior::FieldBlur => {
                behaviors::field_blur(&mut self.ui, &mut self.dom, event.current_target)
            }
            Behavior::FieldFocus => {
                behaviors::field_focus(&mut self.ui, &mut self.dom, event.current_target)
            }
        }
    }

    fn run_click_default(&mut self, target: NodeId) -> Result<()> {
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if is_checkbox_input(&self.dom, node) {
                let next = !self.dom.checked(node)?;
                self.dom.set_checked(node, next)?;
                self.dispatch_event(node, EventKind::Input)?;
                self.dispatch_event(node, EventKind::Change)?;
                return Ok(());
            }
            if is_radio_input(&self.dom, node) {
                if !self.dom.checked(node)? {
                    self.select_radio(node)?;
                    self.dispatch_event(node, EventKind::Input)?;
                    self.dispatch_event(node, EventKind::Change)?;
                }
                return Ok(());
            }
            if is_submit_control(&self.dom, node) {
                if let Some(form) = self.dom.find_ancestor_by_tag(node, "form") {
                    self.dispatch_event(form, EventKind::Submit)?;
                }
                return Ok(());
            }
            let is_anchor = self
                .dom
                .tag_name(node)
                .map(|tag| tag.eq_ignore_ascii_case("a"))
                .unwrap_or(false);
            if is_anchor {
                if let Some(href) = self.dom.attr(node, "href") {
                    self.navigations.push(href);
                }
                return Ok(());
            }
            cursor = self.dom.parent_element(node);
        }
        Ok(())
    }

    fn select_radio(&mut self, target: NodeId) -> Result<()> {
        if let Some(name) = self.dom.attr(target, "name") {
            let scope = self
                .dom
                .find_ancestor_by_tag(target, "form")
                .unwrap_or(self.dom.root);
            let mut group = Vec::new();
            self.dom.collect_elements_dfs(scope, &mut group);
            for node in group {
                if node != target
                    && is_radio_input(&self.dom, node)
                    && self.dom.attr(node, "name").as_deref() == Some(name.as_str())
                {
                    self.dom.set_checked(node, false)?;
                }
            }
        }
        self.dom.set_checked(target, true)
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    fn node_label(&self, node_id: NodeId) -> String {
        if node_id == self.dom.root {
            return "#document".to_string();
        }
        let Some(element) = self.dom.element(node_id) else {
            return "#text".to_string();
        };
        let mut label = element.tag_name.clone();
        if let Some(id) = element.attrs.get("id") {
            label.push('#');
            label.push_str(id);
        } else if let Some(first) = element
            .attrs
            .get("class")
            .and_then(|classes| classes.split_whitespace().next())
        {
            label.push('.');
            label.push_str(first);
        }
        label
    }

    fn trace_line(&mut self, line: String) {
        if self.trace_to_stderr {
            eprintln!("{line}");
        }
        if self.trace_logs.len() < self.trace_log_limit {
            self.trace_logs.push(line);
        }
    }
}

fn describe_presence(present: bool) -> &'static str {
    if present { "present" } else { "absent" }
}
