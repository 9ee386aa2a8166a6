//! Booking flow over HTTP with the portal backend.

mod common;

use chrono::{NaiveDate, NaiveTime};
use common::{Backend, CONFLICT_MESSAGE, PASSWORD, TestServer};
use vetclinic_client::BookingController;
use vetclinic_core::models::appointment::{Appointment, AppointmentStatus, AppointmentType};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn booking_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
}

fn booked_at_nine() -> Appointment {
    Appointment {
        id: 55,
        pet_id: 8,
        vet_id: 3,
        date: booking_day(),
        time: t(9, 0),
        duration_minutes: 30,
        reason: "Control anual".into(),
        kind: AppointmentType::Control,
        notes: None,
        status: AppointmentStatus::Programada,
        pet_name: Some("Luna".into()),
        vet_name: Some("Dra. López".into()),
    }
}

async fn signed_in(server: &TestServer) -> vetclinic_client::AppContext {
    let ctx = server.context();
    assert!(ctx.portal.login("carla@example.com", PASSWORD).await.is_success());
    ctx
}

#[tokio::test]
async fn editing_keeps_own_slot_selectable() {
    let server = TestServer::start().await;
    let ctx = signed_in(&server).await;
    let mut booking = BookingController::new(ctx.portal_api.clone());

    booking.load_options().await.expect("options");
    assert_eq!(booking.veterinarians().len(), 1);
    assert_eq!(booking.pets().len(), 1);

    assert!(booking.open_edit(&booked_at_nine()));
    assert!(booking.refresh_availability().await.expect("availability"));
    assert_eq!(Backend::count(&server.backend.availability_calls), 1);

    let own: Vec<_> = booking
        .slots()
        .iter()
        .filter(|s| s.start == t(9, 0) && s.end == t(9, 30))
        .collect();
    assert_eq!(own.len(), 1);
    assert!(own[0].available);

    assert!(booking.select_slot(t(9, 30)));
    let saved = booking.submit().await.expect("submit").expect("saved");
    assert_eq!(saved.id, 55);
    assert_eq!(saved.time, t(9, 30));
    assert!(!booking.state().is_open());
}

#[tokio::test]
async fn new_booking_does_not_unlock_taken_slot() {
    let server = TestServer::start().await;
    let ctx = signed_in(&server).await;
    let mut booking = BookingController::new(ctx.portal_api.clone());

    booking.open_new();
    let state = booking.state_mut();
    state.set_pet(Some(8));
    assert!(!state.set_vet(Some(3)));
    assert!(state.set_date(Some(booking_day())));
    assert!(booking.refresh_availability().await.expect("availability"));

    assert!(!booking.select_slot(t(9, 0)));
    assert!(booking.state().form().time.is_none());
}

#[tokio::test]
async fn incomplete_form_never_reaches_backend() {
    let server = TestServer::start().await;
    let ctx = signed_in(&server).await;
    let mut booking = BookingController::new(ctx.portal_api.clone());

    booking.open_new();
    booking.state_mut().set_pet(Some(8));
    booking.state_mut().set_reason("   ");

    assert!(booking.submit().await.expect("submit").is_none());
    assert_eq!(Backend::count(&server.backend.appointment_writes), 0);
    let notice = booking.notice().expect("notice");
    assert!(notice.is_error());
    assert!(notice.message().contains("vetId"), "{}", notice.message());
}

#[tokio::test]
async fn conflict_keeps_form_open() {
    let server = TestServer::start().await;
    server
        .backend
        .conflict
        .store(true, std::sync::atomic::Ordering::SeqCst);
    let ctx = signed_in(&server).await;
    let mut booking = BookingController::new(ctx.portal_api.clone());

    booking.open_new();
    let state = booking.state_mut();
    state.set_pet(Some(8));
    state.set_vet(Some(3));
    state.set_date(Some(booking_day()));
    state.set_time(Some(t(10, 0)));
    state.set_reason("Vacuna antirrábica");

    assert!(booking.submit().await.expect("submit").is_none());
    assert_eq!(Backend::count(&server.backend.appointment_writes), 1);
    assert!(booking.state().is_open());
    assert_eq!(booking.notice().expect("notice").message(), CONFLICT_MESSAGE);
}

#[tokio::test]
async fn conflict_on_reschedule_keeps_form_open() {
    let server = TestServer::start().await;
    server
        .backend
        .conflict
        .store(true, std::sync::atomic::Ordering::SeqCst);
    let ctx = signed_in(&server).await;
    let mut booking = BookingController::new(ctx.portal_api.clone());

    assert!(booking.open_edit(&booked_at_nine()));
    assert!(booking.refresh_availability().await.expect("availability"));
    assert!(booking.select_slot(t(9, 30)));

    assert!(booking.submit().await.expect("submit").is_none());
    assert_eq!(Backend::count(&server.backend.appointment_writes), 1);
    assert!(booking.state().is_open());
    assert_eq!(booking.state().editing().map(|a| a.id), Some(55));
    let notice = booking.notice().expect("notice");
    assert!(notice.is_error());
    assert_eq!(notice.message(), CONFLICT_MESSAGE);
}

#[tokio::test]
async fn declined_confirmation_skips_cancel() {
    let server = TestServer::start().await;
    let ctx = signed_in(&server).await;
    let mut booking = BookingController::new(ctx.portal_api.clone());
    let appointment = booked_at_nine();

    let cancelled = booking
        .cancel_appointment(&appointment, |_| false)
        .await
        .expect("cancel");
    assert!(!cancelled);
    assert_eq!(Backend::count(&server.backend.cancel_calls), 0);

    let cancelled = booking
        .cancel_appointment(&appointment, |a| a.id == 55)
        .await
        .expect("cancel");
    assert!(cancelled);
    assert_eq!(Backend::count(&server.backend.cancel_calls), 1);
}

#[tokio::test]
async fn cancel_then_profile_is_refreshed() {
    let server = TestServer::start().await;
    let ctx = signed_in(&server).await;
    assert_eq!(Backend::count(&server.backend.profile_calls), 1);

    let mut booking = BookingController::new(ctx.portal_api.clone());
    assert!(
        booking
            .cancel_appointment(&booked_at_nine(), |_| true)
            .await
            .expect("cancel")
    );
    let profile = ctx.portal_changed().await.expect("profile");
    assert_eq!(profile.pets.len(), 1);
    assert_eq!(Backend::count(&server.backend.profile_calls), 2);
}
