use pomar::prelude::*;

use super::data::{FormData, Gender, Hobby, INVALID_FORM, SHORT_MOBILES};
use super::page::PracticeFormPage;

/// Practice-form scenario catalogue
#[must_use]
pub fn suite(config: SuiteConfig) -> Suite {
    Suite::new(config).with_scenarios([
        Scenario::ui("male student submits complete form", |ctx| {
            Box::pin(submit_complete(ctx, FormData::valid()))
        })
        .with_tag("smoke"),
        Scenario::ui("female student submits complete form", |ctx| {
            Box::pin(submit_complete(ctx, FormData::female()))
        }),
        Scenario::ui("generated student is echoed back", |ctx| {
            Box::pin(generated_student_is_echoed(ctx))
        }),
        Scenario::ui("required fields alone are enough", |ctx| {
            Box::pin(required_fields_are_enough(ctx))
        }),
        Scenario::ui("empty submission flags required fields", |ctx| {
            Box::pin(empty_submission_flags_required(ctx))
        })
        .with_tag("validation"),
        Scenario::ui("malformed email is flagged", |ctx| Box::pin(malformed_email_is_flagged(ctx)))
            .with_tag("validation"),
        Scenario::ui("short mobile is flagged", |ctx| Box::pin(short_mobile_is_flagged(ctx)))
            .with_tag("validation"),
        Scenario::ui("date picker fills the input", |ctx| Box::pin(date_picker_fills_input(ctx))),
        Scenario::ui("subject autocomplete adds chips", |ctx| {
            Box::pin(subject_autocomplete_adds_chips(ctx))
        }),
        Scenario::ui("gender radios are exclusive", |ctx| Box::pin(gender_radios_are_exclusive(ctx))),
        Scenario::ui("hobbies can be combined", |ctx| Box::pin(hobbies_can_be_combined(ctx))),
        Scenario::ui("state unlocks city", |ctx| Box::pin(state_unlocks_city(ctx))),
    ])
}

async fn open_form(ctx: &ScenarioContext) -> PomarResult<PracticeFormPage<'_>> {
    let form = PracticeFormPage::new(ctx.driver());
    form.open().await?;
    Ok(form)
}

async fn submit_complete(ctx: &ScenarioContext, data: FormData) -> PomarResult<()> {
    let form = open_form(ctx).await?;
    form.fill_complete_form(&data).await?;
    form.submit().await?;
    form.expect_submitted().await?;
    form.close_confirmation().await
}

async fn generated_student_is_echoed(ctx: &ScenarioContext) -> PomarResult<()> {
    let data = FormData::full(ctx.data());
    let form = open_form(ctx).await?;
    form.fill_complete_form(&data).await?;

    Assertion::equals(&data.first_name, &form.field_value("first_name").await?).check()?;
    Assertion::equals(&data.email, &form.field_value("email").await?).check()?;
    Assertion::equals(&data.mobile, &form.field_value("mobile").await?).check()?;
    Assertion::equals(&data.date_of_birth_input(), &form.field_value("date_of_birth").await?).check()?;
    Assertion::equals(&data.subjects, &form.selected_subjects().await?).check()?;

    form.submit().await?;
    form.expect_submitted().await?;
    for (label, expected) in data.expected_submission() {
        Assertion::equals(&expected, &form.submitted_value(label).await?).check()?;
    }
    Ok(())
}

async fn required_fields_are_enough(ctx: &ScenarioContext) -> PomarResult<()> {
    let data = FormData::valid().required_only();
    let form = open_form(ctx).await?;
    form.fill_personal_info(&data).await?;
    form.submit().await?;
    form.expect_submitted().await?;
    Assertion::equals(&data.student_name(), &form.submitted_value("Student Name").await?).check()
}

async fn empty_submission_flags_required(ctx: &ScenarioContext) -> PomarResult<()> {
    let form = open_form(ctx).await?;
    form.fill_field("first_name", INVALID_FORM.first_name).await?;
    form.fill_field("last_name", INVALID_FORM.last_name).await?;
    form.submit().await?;
    for key in ["first_name", "last_name", "mobile"] {
        form.expect_field_validation(key, true).await?;
    }
    Assertion::is_true(!form.is_submitted().await, "form was not submitted").check()
}

async fn malformed_email_is_flagged(ctx: &ScenarioContext) -> PomarResult<()> {
    let form = open_form(ctx).await?;
    form.fill_field("email", INVALID_FORM.email).await?;
    form.submit().await?;
    form.expect_field_validation("email", true).await
}

async fn short_mobile_is_flagged(ctx: &ScenarioContext) -> PomarResult<()> {
    let form = open_form(ctx).await?;
    for mobile in SHORT_MOBILES {
        form.fill_field("mobile", mobile).await?;
        form.submit().await?;
        form.expect_field_validation("mobile", true).await?;
    }
    Ok(())
}

async fn date_picker_fills_input(ctx: &ScenarioContext) -> PomarResult<()> {
    let data = FormData::valid();
    let form = open_form(ctx).await?;
    form.fill_date_of_birth(data.date_of_birth).await?;
    Assertion::equals(&data.date_of_birth_input(), &form.field_value("date_of_birth").await?).check()
}

async fn subject_autocomplete_adds_chips(ctx: &ScenarioContext) -> PomarResult<()> {
    let form = open_form(ctx).await?;
    form.fill_subjects(&["Maths".to_string()]).await?;
    let chips = form.selected_subjects().await?;
    Assertion::is_true(chips.iter().any(|c| c == "Maths"), "Maths chip is shown").check()
}

async fn gender_radios_are_exclusive(ctx: &ScenarioContext) -> PomarResult<()> {
    let form = open_form(ctx).await?;
    form.select_gender(Gender::Male).await?;
    Assertion::is_true(form.is_gender_selected(Gender::Male).await?, "Male is checked").check()?;
    form.select_gender(Gender::Female).await?;
    Assertion::is_true(form.is_gender_selected(Gender::Female).await?, "Female is checked").check()?;
    Assertion::is_true(!form.is_gender_selected(Gender::Male).await?, "Male is cleared").check()
}

async fn hobbies_can_be_combined(ctx: &ScenarioContext) -> PomarResult<()> {
    let form = open_form(ctx).await?;
    form.select_hobbies(&[Hobby::Sports, Hobby::Reading]).await?;
    for hobby in [Hobby::Sports, Hobby::Reading] {
        let ticked = form.is_hobby_selected(hobby).await?;
        Assertion::is_true(ticked, &format!("{hobby} is ticked")).check()?;
    }
    Assertion::is_true(!form.is_hobby_selected(Hobby::Music).await?, "Music is not ticked").check()
}

async fn state_unlocks_city(ctx: &ScenarioContext) -> PomarResult<()> {
    let form = open_form(ctx).await?;
    form.select_state_and_city("NCR", "Delhi").await?;
    Assertion::is_true(form.is_city_enabled().await?, "city dropdown is enabled").check()?;
    Assertion::contains(&form.dropdown_text("state").await?, "NCR").check()?;
    Assertion::contains(&form.dropdown_text("city").await?, "Delhi").check()
}
