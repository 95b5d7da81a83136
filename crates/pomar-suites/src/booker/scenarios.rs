use pomar::prelude::*;

use super::data::{alice_booking, booking_without_optional_fields, invalid_booking, valid_booking};
use super::model::{AuthRequest, Booking, PartialBooking};
use super::services::{AuthService, BookingService};

/// Restful-booker scenario catalogue; API only
#[must_use]
pub fn suite(config: SuiteConfig) -> Suite {
    Suite::new(config).with_scenarios([
        Scenario::api("ping reports created", |ctx| Box::pin(ping_reports_created(ctx)))
            .with_tag("smoke"),
        Scenario::api("auth issues a token", |ctx| Box::pin(auth_issues_token(ctx)))
            .with_tag("auth"),
        Scenario::api("auth refuses bad credentials", |ctx| {
            Box::pin(auth_refuses_bad_credentials(ctx))
        })
        .with_tag("auth"),
        Scenario::api("created booking can be fetched", |ctx| {
            Box::pin(created_booking_can_be_fetched(ctx))
        })
        .with_tag("smoke"),
        Scenario::api("booking without optional fields", |ctx| {
            Box::pin(booking_without_optional_fields_is_stored(ctx))
        }),
        Scenario::api("generated booking round trips", |ctx| {
            Box::pin(generated_booking_round_trips(ctx))
        }),
        Scenario::api("new booking is listed", |ctx| Box::pin(new_booking_is_listed(ctx))),
        Scenario::api("update replaces the booking", |ctx| {
            Box::pin(update_replaces_booking(ctx))
        }),
        Scenario::api("partial update keeps other fields", |ctx| {
            Box::pin(partial_update_keeps_other_fields(ctx))
        }),
        Scenario::api("deleted booking is gone", |ctx| Box::pin(deleted_booking_is_gone(ctx))),
        Scenario::api("update without token is forbidden", |ctx| {
            Box::pin(update_without_token_is_forbidden(ctx))
        })
        .with_tag("auth"),
        Scenario::api("invalid booking is rejected", |ctx| {
            Box::pin(invalid_booking_is_rejected(ctx))
        }),
    ])
}

fn bookings(ctx: &ScenarioContext) -> BookingService {
    BookingService::new(ctx.api().clone())
}

async fn authorized_bookings(ctx: &ScenarioContext) -> PomarResult<BookingService> {
    let token = AuthService::new(ctx.api().clone())
        .default_token(&ctx.config().credentials)
        .await?;
    Ok(bookings(ctx).with_token(&token))
}

async fn ping_reports_created(ctx: &ScenarioContext) -> PomarResult<()> {
    let response = bookings(ctx).ping().await?;
    Assertion::status(201, response.status).check()?;
    Assertion::contains(response.text(), "Created").check()
}

async fn auth_issues_token(ctx: &ScenarioContext) -> PomarResult<()> {
    let token = AuthService::new(ctx.api().clone())
        .default_token(&ctx.config().credentials)
        .await?;
    Assertion::is_true(!token.is_empty(), "token is not empty").check()
}

async fn auth_refuses_bad_credentials(ctx: &ScenarioContext) -> PomarResult<()> {
    let auth = AuthService::new(ctx.api().clone());
    let reply = auth
        .create_token(&AuthRequest::new("invalid", "invalid"))
        .await?;
    Assertion::is_true(reply.token.is_none(), "no token for bad credentials").check()?;
    Assertion::equals("Bad credentials", reply.reason.as_deref().unwrap_or_default()).check()
}

async fn created_booking_can_be_fetched(ctx: &ScenarioContext) -> PomarResult<()> {
    let service = bookings(ctx);
    let booking = alice_booking();
    let created = service.create(&booking).await?;
    Assertion::is_true(created.bookingid > 0, "booking id is assigned").check()?;
    Assertion::equals(&booking, &created.booking).check()?;

    let fetched = service.get(created.bookingid).await?;
    Assertion::equals("Alice", fetched.firstname.as_str()).check()?;
    Assertion::equals(&booking.bookingdates, &fetched.bookingdates).check()
}

async fn booking_without_optional_fields_is_stored(ctx: &ScenarioContext) -> PomarResult<()> {
    let service = bookings(ctx);
    let booking = booking_without_optional_fields();
    let created = service.create(&booking).await?;
    let fetched = service.get(created.bookingid).await?;
    Assertion::equals(&booking.firstname, &fetched.firstname).check()?;
    Assertion::is_true(!fetched.depositpaid, "deposit stays unpaid").check()
}

async fn generated_booking_round_trips(ctx: &ScenarioContext) -> PomarResult<()> {
    let service = bookings(ctx);
    let booking = Booking::full(ctx.data());
    let created = service.create(&booking).await?;
    let fetched = service.get(created.bookingid).await?;
    Assertion::equals(&booking, &fetched).check()
}

async fn new_booking_is_listed(ctx: &ScenarioContext) -> PomarResult<()> {
    let service = bookings(ctx);
    let created = service.create(&valid_booking()).await?;
    let ids = service.ids().await?;
    let listed = ids.iter().any(|entry| entry.bookingid == created.bookingid);
    Assertion::is_true(listed, "new booking id is listed").check()
}

async fn update_replaces_booking(ctx: &ScenarioContext) -> PomarResult<()> {
    let service = authorized_bookings(ctx).await?;
    let created = service.create(&valid_booking()).await?;

    let replacement = Booking::full(ctx.data());
    let updated = service.update(created.bookingid, &replacement).await?;
    Assertion::equals(&replacement, &updated).check()?;
    let fetched = service.get(created.bookingid).await?;
    Assertion::equals(&replacement.lastname, &fetched.lastname).check()
}

async fn partial_update_keeps_other_fields(ctx: &ScenarioContext) -> PomarResult<()> {
    let service = authorized_bookings(ctx).await?;
    let original = valid_booking();
    let created = service.create(&original).await?;

    let fields = PartialBooking::full(ctx.data());
    let patched = service.partial_update(created.bookingid, &fields).await?;
    Assertion::equals(&fields.apply_to(&original), &patched).check()
}

async fn deleted_booking_is_gone(ctx: &ScenarioContext) -> PomarResult<()> {
    let service = authorized_bookings(ctx).await?;
    let created = service.create(&valid_booking()).await?;
    service.delete(created.bookingid).await?;
    let response = service.get_raw(created.bookingid).await?;
    Assertion::status(404, response.status).check()
}

async fn update_without_token_is_forbidden(ctx: &ScenarioContext) -> PomarResult<()> {
    let service = bookings(ctx);
    let created = service.create(&valid_booking()).await?;
    let response = service
        .update_raw(created.bookingid, &Booking::full(ctx.data()))
        .await?;
    Assertion::status(403, response.status).check()
}

async fn invalid_booking_is_rejected(ctx: &ScenarioContext) -> PomarResult<()> {
    let response = bookings(ctx).create_raw(&invalid_booking()).await?;
    Assertion::is_true(
        !response.is_success(),
        &format!("invalid booking answered {}", response.status),
    )
    .check()
}
