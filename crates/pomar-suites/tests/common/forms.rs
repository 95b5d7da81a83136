//! DemoQA practice-form replica: radios behind labels, a datepicker, subject
//! autocomplete, dependent react-select dropdowns, border-colour
//! validation and the confirmation modal.

use chrono::NaiveDate;
use pomar::fake::Dom;
use pomar::{FakeElement, FakePage, FakeSite};
use pomar_suites::practice_form::{
    day_class, CONFIRMATION_TITLE, ERROR_BORDER, STATES, SUBJECTS, SUCCESS_BORDER,
};
use serde_json::{json, Value};

const NEUTRAL_BORDER: &str = "rgb(206, 212, 218)";
const OPTION: &str = r#"div[id*="react-select"][id*="option"]"#;
const SUBJECT_OPTION: &str = ".subjects-auto-complete__option";
const SUBJECT_CHIP: &str = ".subjects-auto-complete__multi-value__label";
const MODAL_ROW: &str = ".modal-content tbody tr";
const GENDERS: [&str; 3] = ["Male", "Female", "Other"];
const HOBBIES: [&str; 3] = ["Sports", "Reading", "Music"];
const DATE_INPUT: &str = "%d %b %Y";

fn text_input(css: &str) -> FakeElement {
    FakeElement::new(css).style("border-color", NEUTRAL_BORDER)
}

fn gender_elements() -> Vec<FakeElement> {
    let mut elements = Vec::new();
    for (i, label) in GENDERS.iter().enumerate() {
        let n = i + 1;
        elements.push(
            FakeElement::new(format!("#gender-radio-{n}"))
                .attr("type", "radio")
                .hidden(),
        );
        elements.push(
            FakeElement::new(format!(r#"label[for="gender-radio-{n}"]"#))
                .text(*label)
                .on_click(move |dom| {
                    for other in 1..=GENDERS.len() {
                        dom.set_checked(&format!("#gender-radio-{other}"), other == n);
                    }
                }),
        );
    }
    elements
}

fn hobby_elements() -> Vec<FakeElement> {
    let mut elements = Vec::new();
    for (i, label) in HOBBIES.iter().enumerate() {
        let n = i + 1;
        let hobby = (*label).to_string();
        elements.push(
            FakeElement::new(format!("#hobbies-checkbox-{n}"))
                .attr("type", "checkbox")
                .hidden(),
        );
        elements.push(
            FakeElement::new(format!(r#"label[for="hobbies-checkbox-{n}"]"#))
                .text(*label)
                .on_click(move |dom| {
                    let css = format!("#hobbies-checkbox-{n}");
                    let ticked = !dom.is_checked(&css);
                    dom.set_checked(&css, ticked);
                    let mut picked = list(dom, "hobbies");
                    picked.retain(|h| *h != hobby);
                    if ticked {
                        picked.push(hobby.clone());
                    }
                    let _ = dom.state_mut().insert("hobbies".into(), json!(picked));
                }),
        );
    }
    elements
}

fn list(dom: &Dom<'_>, key: &str) -> Vec<String> {
    dom.state()
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn datepicker_elements() -> Vec<FakeElement> {
    let mut elements = vec![
        text_input("#dateOfBirthInput")
            .value("19 Oct 2026")
            .on_click(|dom| {
                dom.show(".react-datepicker__month-select");
                dom.show(".react-datepicker__year-select");
                for day in 1..=31 {
                    dom.show(&format!(".react-datepicker__day--{day:03}"));
                }
            }),
        FakeElement::new(".react-datepicker__month-select")
            .options((0..12).map(|m| m.to_string()))
            .value("9")
            .hidden(),
        FakeElement::new(".react-datepicker__year-select")
            .options((1900..=2100).map(|y| y.to_string()))
            .value("2026")
            .hidden(),
    ];
    for day in 1..=31_u32 {
        let Some(sample) = NaiveDate::from_ymd_opt(2000, 1, day) else {
            continue;
        };
        elements.push(
            FakeElement::new(format!(".react-datepicker__day--{day:03}"))
                .alias(day_class(sample))
                .text(day.to_string())
                .hidden()
                .on_click(move |dom| {
                    let month: u32 = dom.value(".react-datepicker__month-select").parse().unwrap_or(0);
                    let year: i32 = dom.value(".react-datepicker__year-select").parse().unwrap_or(2000);
                    if let Some(date) = NaiveDate::from_ymd_opt(year, month + 1, day) {
                        dom.set_value("#dateOfBirthInput", date.format(DATE_INPUT).to_string());
                    }
                    dom.hide(".react-datepicker__month-select");
                    dom.hide(".react-datepicker__year-select");
                    for d in 1..=31 {
                        dom.hide(&format!(".react-datepicker__day--{d:03}"));
                    }
                }),
        );
    }
    elements
}

fn subject_input() -> FakeElement {
    FakeElement::new("#subjectsInput").on("input", |dom| {
        dom.remove(SUBJECT_OPTION);
        let typed = dom.value("#subjectsInput").to_lowercase();
        if typed.is_empty() {
            return;
        }
        for subject in SUBJECTS.iter().filter(|s| s.to_lowercase().contains(&typed)) {
            let name = (*subject).to_string();
            dom.push(FakeElement::new(SUBJECT_OPTION).text(*subject).on_click(move |dom| {
                dom.push(FakeElement::new(SUBJECT_CHIP).text(name.clone()));
                let mut chosen = list(dom, "subjects");
                chosen.push(name.clone());
                let _ = dom.state_mut().insert("subjects".into(), json!(chosen));
                dom.remove(SUBJECT_OPTION);
                dom.set_value("#subjectsInput", "");
            }));
        }
    })
}

fn city_option(city: &str) -> FakeElement {
    let name = city.to_string();
    FakeElement::new(OPTION).text(city).on_click(move |dom| {
        dom.set_text("#city", name.clone());
        dom.remove(OPTION);
    })
}

fn state_option(state: &str) -> FakeElement {
    let name = state.to_string();
    FakeElement::new(OPTION).text(state).on_click(move |dom| {
        dom.set_text("#state", name.clone());
        dom.set_text("#city", "Select City");
        dom.set_enabled("#city", true);
        dom.remove(OPTION);
    })
}

fn dropdowns() -> Vec<FakeElement> {
    vec![
        FakeElement::new("#state").text("Select State").on_click(|dom| {
            dom.remove(OPTION);
            for (state, _) in STATES {
                dom.push(state_option(state));
            }
        }),
        FakeElement::new("#city")
            .text("Select City")
            .disabled()
            .on_click(|dom| {
                dom.remove(OPTION);
                let state = dom.text("#state");
                if let Some((_, cities)) = STATES.iter().find(|(s, _)| *s == state) {
                    for city in *cities {
                        dom.push(city_option(city));
                    }
                }
            }),
    ]
}

fn is_valid_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
}

/// Flag each field and return whether the whole form is acceptable
fn validate(dom: &mut Dom<'_>) -> bool {
    let mobile = dom.value("#userNumber");
    let email = dom.value("#userEmail");
    let checks = [
        ("#firstName", !dom.value("#firstName").is_empty()),
        ("#lastName", !dom.value("#lastName").is_empty()),
        ("#userNumber", mobile.len() == 10 && mobile.chars().all(|c| c.is_ascii_digit())),
        ("#userEmail", email.is_empty() || is_valid_email(&email)),
    ];
    for (css, ok) in checks {
        dom.set_style(css, "border-color", if ok { SUCCESS_BORDER } else { ERROR_BORDER });
    }
    let gender_chosen = (1..=GENDERS.len()).any(|n| dom.is_checked(&format!("#gender-radio-{n}")));
    checks.iter().all(|(_, ok)| *ok) && gender_chosen
}

fn submission_rows(dom: &Dom<'_>) -> Vec<(String, String)> {
    let gender = (1..=GENDERS.len())
        .find(|n| dom.is_checked(&format!("#gender-radio-{n}")))
        .map(|n| GENDERS[n - 1].to_string())
        .unwrap_or_default();
    let birth = NaiveDate::parse_from_str(&dom.value("#dateOfBirthInput"), DATE_INPUT)
        .map(|d| d.format("%d %B,%Y").to_string())
        .unwrap_or_default();
    let state = dom.text("#state");
    let city = dom.text("#city");
    let place = if state == "Select State" {
        String::new()
    } else if city == "Select City" {
        state
    } else {
        format!("{state} {city}")
    };
    vec![
        (
            "Student Name".into(),
            format!("{} {}", dom.value("#firstName"), dom.value("#lastName")),
        ),
        ("Student Email".into(), dom.value("#userEmail")),
        ("Gender".into(), gender),
        ("Mobile".into(), dom.value("#userNumber")),
        ("Date of Birth".into(), birth),
        ("Subjects".into(), list(dom, "subjects").join(", ")),
        ("Hobbies".into(), list(dom, "hobbies").join(", ")),
        ("Picture".into(), String::new()),
        ("Address".into(), dom.value("#currentAddress")),
        ("State and City".into(), place),
    ]
}

fn modal_elements() -> Vec<FakeElement> {
    vec![
        FakeElement::new(".modal-content").hidden(),
        FakeElement::new("#example-modal-sizes-title-lg")
            .text(CONFIRMATION_TITLE)
            .hidden(),
        FakeElement::new("#closeLargeModal")
            .text("Close")
            .hidden()
            .on_click(|dom| {
                dom.hide(".modal-content");
                dom.hide("#example-modal-sizes-title-lg");
                dom.hide("#closeLargeModal");
                dom.remove(MODAL_ROW);
            }),
    ]
}

fn submit_button() -> FakeElement {
    FakeElement::new("#submit").text("Submit").on_click(|dom| {
        if !validate(dom) {
            return;
        }
        let rows = submission_rows(dom);
        dom.remove(MODAL_ROW);
        for (label, value) in rows {
            dom.push(FakeElement::new(MODAL_ROW).text(format!("{label} {value}")));
        }
        dom.show(".modal-content");
        dom.show("#example-modal-sizes-title-lg");
        dom.show("#closeLargeModal");
    })
}

/// The practice form served at `base_url`
pub fn practice_form_site(base_url: &str) -> FakeSite {
    FakeSite::new(base_url).route("/automation-practice-form", |_| {
        FakePage::new("DEMOQA")
            .elements([
                text_input("#firstName"),
                text_input("#lastName"),
                text_input("#userEmail"),
                text_input("#userNumber"),
                text_input("#currentAddress"),
                subject_input(),
            ])
            .elements(gender_elements())
            .elements(hobby_elements())
            .elements(datepicker_elements())
            .elements(dropdowns())
            .elements(modal_elements())
            .element(submit_button())
    })
}
