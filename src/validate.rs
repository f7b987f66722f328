use super::*;
use fancy_regex::Regex;

pub(crate) const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

pub(crate) const MIN_MESSAGE_CHARS: usize = 10;

#[derive(Debug)]
pub(crate) struct EmailPattern {
    backend: Regex,
}

impl EmailPattern {
    pub(crate) fn new() -> Result<Self> {
        let backend = Regex::new(EMAIL_PATTERN)
            .map_err(|e| Error::Runtime(format!("email pattern failed to compile: {e}")))?;
        Ok(Self { backend })
    }

    pub(crate) fn is_match(&self, candidate: &str) -> Result<bool> {
        self.backend
            .is_match(candidate)
            .map_err(|e| Error::Runtime(format!("email match failed: {e}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContactField {
    Name,
    Email,
    Phone,
    Subject,
    Message,
}

impl ContactField {
    pub(crate) fn element_id(self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Subject => "subject",
            ContactField::Message => "message",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ContactFormValues {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) subject: String,
    pub(crate) message: String,
}

pub(crate) fn failing_fields(
    values: &ContactFormValues,
    email: &EmailPattern,
) -> Result<Vec<ContactField>> {
    let checks = [
        (ContactField::Name, !values.name.trim().is_empty()),
        (ContactField::Email, email.is_match(&values.email)?),
        (ContactField::Phone, phone_passes(&values.phone)),
        (ContactField::Subject, !values.subject.trim().is_empty()),
        (
            ContactField::Message,
            values.message.trim().chars().count() >= MIN_MESSAGE_CHARS,
        ),
    ];
    Ok(checks
        .into_iter()
        .filter(|(_, passes)| !passes)
        .map(|(field, _)| field)
        .collect())
}

// Phone is optional and has no format rule.
fn phone_passes(_phone: &str) -> bool {
    true
}

#[derive(Debug, Clone)]
pub(crate) struct FieldProbe {
    pub(crate) required: bool,
    pub(crate) input_type: String,
    pub(crate) name_attr: String,
    pub(crate) value: String,
}

pub(crate) fn field_passes_blur(probe: &FieldProbe, email: &EmailPattern) -> Result<bool> {
    if probe.required && probe.value.trim().is_empty() {
        return Ok(false);
    }
    if probe.input_type == "email" {
        return email.is_match(&probe.value);
    }
    if probe.name_attr == "message" {
        return Ok(probe.value.trim().chars().count() >= MIN_MESSAGE_CHARS);
    }
    Ok(true)
}
