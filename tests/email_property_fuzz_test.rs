use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseError, TestCaseResult};
use site_behaviors::Page;

const EMAIL_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/email_property_fuzz_test.txt";
const DEFAULT_EMAIL_PROPTEST_CASES: u32 = 128;

const EMAIL_FORM_HTML: &str = r#"
<form id="contactForm">
  <div class="form-group" id="nameGroup"><input id="name" name="name" value="Ali Raza" required></div>
  <div class="form-group" id="emailGroup"><input id="email" name="email" type="email" required></div>
  <div class="form-group" id="phoneGroup"><input id="phone" name="phone" type="tel"></div>
  <div class="form-group" id="subjectGroup"><input id="subject" name="subject" value="Bulk order" required></div>
  <div class="form-group" id="messageGroup"><textarea id="message" name="message" required>Need a quote for bulk shipping.</textarea></div>
  <button type="submit">Send Message</button>
</form>
<div id="formNotification" class="form-notification"><p id="notificationMessage"></p></div>
"#;

fn env_proptest_cases(var_name: &str, default_cases: u32) -> u32 {
    std::env::var(var_name)
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default_cases)
}

fn email_proptest_cases() -> u32 {
    std::env::var("SITE_BEHAVIORS_EMAIL_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or_else(|| {
            env_proptest_cases(
                "SITE_BEHAVIORS_PROPTEST_CASES",
                DEFAULT_EMAIL_PROPTEST_CASES,
            )
        })
}

fn local_part_strategy() -> BoxedStrategy<String> {
    vec(
        prop_oneof![
            Just('a'),
            Just('b'),
            Just('z'),
            Just('0'),
            Just('9'),
            Just('.'),
            Just('-'),
            Just('_'),
            Just('+'),
        ],
        1..=8,
    )
    .prop_map(|chars| chars.into_iter().collect())
    .boxed()
}

fn host_part_strategy() -> BoxedStrategy<String> {
    vec(
        prop_oneof![
            Just('a'),
            Just('k'),
            Just('z'),
            Just('0'),
            Just('7'),
            Just('-'),
        ],
        1..=8,
    )
    .prop_map(|chars| chars.into_iter().collect())
    .boxed()
}

fn tld_strategy() -> BoxedStrategy<String> {
    vec(prop_oneof![Just('c'), Just('o'), Just('m'), Just('p'), Just('k')], 2..=4)
        .prop_map(|chars| chars.into_iter().collect())
        .boxed()
}

fn valid_email_strategy() -> BoxedStrategy<String> {
    (local_part_strategy(), host_part_strategy(), tld_strategy())
        .prop_map(|(local, host, tld)| format!("{local}@{host}.{tld}"))
        .boxed()
}

fn invalid_email_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        2 => local_part_strategy(),
        1 => Just(String::new()),
        1 => Just("   ".to_string()),
        2 => (local_part_strategy(), host_part_strategy())
            .prop_map(|(local, host)| format!("{local}@{host}")),
        1 => (local_part_strategy(), host_part_strategy())
            .prop_map(|(local, host)| format!("{local}@{host}.")),
        1 => (local_part_strategy(), host_part_strategy(), tld_strategy())
            .prop_map(|(local, host, tld)| format!("{local}@@{host}.{tld}")),
        2 => valid_email_strategy().prop_map(|email| format!(" {email}")),
        2 => valid_email_strategy().prop_map(|email| format!("{email} ")),
        1 => valid_email_strategy().prop_map(|email| email.replacen('@', " @", 1)),
    ]
    .boxed()
}

fn email_candidate_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        1 => valid_email_strategy(),
        1 => invalid_email_strategy(),
    ]
    .boxed()
}

fn ok_or_fail<T>(result: site_behaviors::Result<T>) -> Result<T, TestCaseError> {
    result.map_err(|err| TestCaseError::fail(format!("{err:?}")))
}

fn assert_blur_verdict(candidate: &str, want_valid: bool) -> TestCaseResult {
    let mut page = ok_or_fail(Page::from_html(EMAIL_FORM_HTML))?;
    ok_or_fail(page.type_text("#email", candidate))?;
    ok_or_fail(page.blur("#email"))?;

    let marked = ok_or_fail(page.has_class("#emailGroup", "error"))?;
    prop_assert!(
        marked != want_valid,
        "email {candidate:?}: error marked={marked}, want_valid={want_valid}"
    );
    Ok(())
}

fn assert_blur_and_submit_agree(candidate: &str) -> TestCaseResult {
    let mut page = ok_or_fail(Page::from_html(EMAIL_FORM_HTML))?;
    ok_or_fail(page.type_text("#email", candidate))?;
    ok_or_fail(page.blur("#email"))?;
    let blur_passes = !ok_or_fail(page.has_class("#emailGroup", "error"))?;

    ok_or_fail(page.click(r#"button[type="submit"]"#))?;
    let submit_passes = ok_or_fail(page.has_class(r#"button[type="submit"]"#, "loading"))?;

    prop_assert!(
        blur_passes == submit_passes,
        "email {candidate:?}: blur verdict {blur_passes} but submit verdict {submit_passes}"
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: email_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(EMAIL_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn well_formed_emails_pass_the_blur_check(email in valid_email_strategy()) {
        assert_blur_verdict(&email, true)?;
    }

    #[test]
    fn malformed_emails_fail_the_blur_check(email in invalid_email_strategy()) {
        assert_blur_verdict(&email, false)?;
    }

    #[test]
    fn blur_and_submit_agree_on_the_email_rule(email in email_candidate_strategy()) {
        assert_blur_and_submit_agree(&email)?;
    }
}
