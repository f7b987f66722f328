use super::*;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub(crate) fn toggled(self) -> Self {
        match self {
            MenuState::Closed => MenuState::Open,
            MenuState::Open => MenuState::Closed,
        }
    }

    pub(crate) fn is_open(self) -> bool {
        matches!(self, MenuState::Open)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FaqState {
    pub(crate) open: Option<NodeId>,
}

impl FaqState {
    pub(crate) fn after_click(self, was_active: bool, clicked: NodeId) -> Self {
        if was_active {
            FaqState { open: None }
        } else {
            FaqState {
                open: Some(clicked),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum FormPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
}

impl NotificationKind {
    pub(crate) fn class_name(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NotificationState {
    pub(crate) kind: NotificationKind,
    pub(crate) message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ActiveLinkRule {
    BySection(String),
    ByPage(String),
}

impl ActiveLinkRule {
    pub(crate) fn matches_href(&self, href: &str) -> bool {
        match self {
            // A bare section name without the hash marker also counts.
            ActiveLinkRule::BySection(section_id) => {
                href.strip_prefix('#') == Some(section_id.as_str()) || href == section_id.as_str()
            }
            ActiveLinkRule::ByPage(page_name) => {
                href == page_name.as_str() || (page_name.is_empty() && href == "index.html")
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct UiState {
    pub(crate) menu: MenuState,
    pub(crate) faq: FaqState,
    pub(crate) form: FormPhase,
    pub(crate) field_errors: HashSet<NodeId>,
    pub(crate) notification: Option<NotificationState>,
    pub(crate) active_link: Option<ActiveLinkRule>,
}

pub(crate) fn page_name_from_url(url: &str) -> String {
    let path = url_path(url);
    let segment = path.rsplit('/').next().unwrap_or("");
    if segment.is_empty() {
        "index.html".to_string()
    } else {
        segment.to_string()
    }
}

fn url_path(url: &str) -> &str {
    let without_scheme = match url.find("://") {
        Some(pos) => {
            let rest = &url[pos + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => "",
            }
        }
        None => url,
    };
    let without_query = without_scheme
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(without_scheme);
    without_query
        .split_once('#')
        .map(|(path, _)| path)
        .unwrap_or(without_query)
}
