// libs/booking-cell/tests/flow_test.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use std::sync::Arc;
use uuid::Uuid;

use booking_cell::{
    AppointmentProvider, BookingError, BookingFlow, BookingPayload, BookingSubmitter,
    ConfirmOutcome, FlowState, RejectionCode, ScheduleProvider,
};
use shared_config::AppConfig;
use shared_models::{Appointment, AppointmentStatus, Schedule, ScheduleKind, TimeSlot};

mock! {
    pub Api {}

    #[async_trait]
    impl ScheduleProvider for Api {
        async fn get_available_slots(&self, doctor_id: Uuid) -> Result<Vec<Schedule>, BookingError>;
    }

    #[async_trait]
    impl AppointmentProvider for Api {
        async fn get_my_appointments(&self) -> Result<Vec<Appointment>, BookingError>;
        async fn cancel(&self, appointment_id: Uuid) -> Result<(), BookingError>;
    }

    #[async_trait]
    impl BookingSubmitter for Api {
        async fn book(
            &self,
            doctor_id: Uuid,
            payload: &BookingPayload,
        ) -> Result<Appointment, BookingError>;
    }
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn slot_schedules(doctor_id: Uuid, on: &str) -> Vec<Schedule> {
    vec![Schedule {
        id: Uuid::new_v4(),
        doctor_id,
        date: date(on),
        is_active: true,
        kind: ScheduleKind::FixedSlots {
            time_slots: vec![
                TimeSlot {
                    id: Uuid::new_v4(),
                    start_time: "09:00".to_string(),
                    end_time: "09:30".to_string(),
                },
                TimeSlot {
                    id: Uuid::new_v4(),
                    start_time: "09:30".to_string(),
                    end_time: "10:00".to_string(),
                },
            ],
        },
    }]
}

fn scheduled_appointment(doctor_id: Uuid, on: &str, start: &str, end: &str) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        doctor_id,
        date: date(on),
        start_time: start.to_string(),
        end_time: end.to_string(),
        status: AppointmentStatus::Scheduled,
        doctor_name: None,
        created_at: None,
    }
}

fn booked_appointment(doctor_id: Uuid, on: &str) -> Appointment {
    scheduled_appointment(doctor_id, on, "09:30", "10:00")
}

fn flow_with(api: MockApi) -> BookingFlow {
    let api = Arc::new(api);
    BookingFlow::new(&AppConfig::default(), api.clone(), api.clone(), api)
}

/// Drive a fresh flow to the point where the second slot (09:30-10:00) is
/// chosen for the given doctor and date.
async fn select_second_slot(flow: &mut BookingFlow, doctor: Uuid, on: &str) {
    flow.load_appointments().await.unwrap();
    flow.open_doctor(doctor).await.unwrap();
    flow.select_date(date(on)).unwrap();
    let options = flow.time_options(date("2024-05-20"), 600);
    assert_eq!(options.len(), 2);
    flow.select_option(options[1].clone()).unwrap();
}

#[tokio::test]
async fn clean_booking_succeeds_and_refreshes_both_caches() {
    let doctor = Uuid::new_v4();
    let mut api = MockApi::new();

    api.expect_get_my_appointments()
        .times(2) // initial load + post-success refresh
        .returning(|| Ok(vec![]));
    api.expect_get_available_slots()
        .times(2) // card open + post-success refresh
        .returning(move |id| Ok(slot_schedules(id, "2024-06-01")));
    api.expect_book()
        .times(1)
        .returning(move |id, _| Ok(booked_appointment(id, "2024-06-01")));

    let mut flow = flow_with(api);
    select_second_slot(&mut flow, doctor, "2024-06-01").await;

    let outcome = flow.confirm().await.unwrap();
    assert!(matches!(outcome, ConfirmOutcome::Booked(_)));
    assert_eq!(flow.state(), FlowState::Succeeded);
    assert!(!flow.selection().is_complete());
    assert!(flow.selection().doctor_id().is_none());
}

#[tokio::test]
async fn same_date_appointment_requires_acknowledgement_before_submitting() {
    let doctor = Uuid::new_v4();
    let existing = scheduled_appointment(doctor, "2024-06-01", "11:00", "11:30");
    let existing_id = existing.id;
    let mut api = MockApi::new();

    api.expect_get_my_appointments()
        .returning(move || Ok(vec![existing.clone()]));
    api.expect_get_available_slots()
        .returning(move |id| Ok(slot_schedules(id, "2024-06-01")));
    api.expect_book()
        .times(1)
        .returning(move |id, _| Ok(booked_appointment(id, "2024-06-01")));

    let mut flow = flow_with(api);
    select_second_slot(&mut flow, doctor, "2024-06-01").await;

    let outcome = flow.confirm().await.unwrap();
    match outcome {
        ConfirmOutcome::DuplicateWarning(warned) => assert_eq!(warned.id, existing_id),
        other => panic!("expected a duplicate warning, got {:?}", other),
    }
    assert_eq!(flow.state(), FlowState::DuplicateConfirmPending);

    let appointment = flow.acknowledge_duplicate().await.unwrap();
    assert_eq!(appointment.doctor_id, doctor);
    assert_eq!(flow.state(), FlowState::Succeeded);
}

#[tokio::test]
async fn dismissing_the_duplicate_warning_sends_nothing() {
    let doctor = Uuid::new_v4();
    let existing = scheduled_appointment(doctor, "2024-06-01", "11:00", "11:30");
    let mut api = MockApi::new();

    api.expect_get_my_appointments()
        .returning(move || Ok(vec![existing.clone()]));
    api.expect_get_available_slots()
        .returning(move |id| Ok(slot_schedules(id, "2024-06-01")));
    api.expect_book().times(0);

    let mut flow = flow_with(api);
    select_second_slot(&mut flow, doctor, "2024-06-01").await;

    flow.confirm().await.unwrap();
    flow.dismiss_duplicate();
    assert_eq!(flow.state(), FlowState::AwaitingSelection);
    assert!(flow.selection().is_complete());
}

#[tokio::test]
async fn overlap_discovered_after_selection_blocks_the_submission() {
    let doctor = Uuid::new_v4();
    let mut api = MockApi::new();

    // First load sees no appointments; a reload surfaces an overlap with
    // the already-chosen 09:30-10:00 slot.
    let mut loads = 0;
    api.expect_get_my_appointments().returning(move || {
        loads += 1;
        if loads == 1 {
            Ok(vec![])
        } else {
            Ok(vec![scheduled_appointment(doctor, "2024-06-01", "09:15", "09:45")])
        }
    });
    api.expect_get_available_slots()
        .returning(move |id| Ok(slot_schedules(id, "2024-06-01")));
    api.expect_book().times(0);

    let mut flow = flow_with(api);
    select_second_slot(&mut flow, doctor, "2024-06-01").await;
    flow.load_appointments().await.unwrap();

    // The stale selection now collides: the duplicate warning fires first,
    // and acknowledging it still hits the hard overlap block.
    let outcome = flow.confirm().await.unwrap();
    assert!(matches!(outcome, ConfirmOutcome::DuplicateWarning(_)));

    let err = flow.acknowledge_duplicate().await.unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));
    assert_eq!(flow.state(), FlowState::AwaitingSelection);
}

#[tokio::test]
async fn server_rejection_preserves_the_selection_for_retry() {
    let doctor = Uuid::new_v4();
    let mut api = MockApi::new();

    api.expect_get_my_appointments()
        .times(1) // no refresh on failure
        .returning(|| Ok(vec![]));
    api.expect_get_available_slots()
        .times(1)
        .returning(move |id| Ok(slot_schedules(id, "2024-06-01")));
    api.expect_book().times(1).returning(|_, _| {
        Err(BookingError::Rejected {
            code: RejectionCode::MaxAppointmentsReached,
            message: "limit reached".to_string(),
        })
    });

    let mut flow = flow_with(api);
    select_second_slot(&mut flow, doctor, "2024-06-01").await;

    let err = flow.confirm().await.unwrap_err();
    assert!(matches!(
        err,
        BookingError::Rejected { code: RejectionCode::MaxAppointmentsReached, .. }
    ));
    assert_eq!(flow.state(), FlowState::AwaitingSelection);
    assert!(flow.selection().is_complete());
    assert!(flow.last_failure().unwrap().contains("appointment limit"));
}

#[tokio::test]
async fn selecting_an_already_booked_option_is_refused() {
    let doctor = Uuid::new_v4();
    let existing = scheduled_appointment(doctor, "2024-06-01", "09:00", "09:30");
    let mut api = MockApi::new();

    api.expect_get_my_appointments()
        .returning(move || Ok(vec![existing.clone()]));
    api.expect_get_available_slots()
        .returning(move |id| Ok(slot_schedules(id, "2024-06-01")));

    let mut flow = flow_with(api);
    flow.load_appointments().await.unwrap();
    flow.open_doctor(doctor).await.unwrap();
    flow.select_date(date("2024-06-01")).unwrap();

    let options = flow.time_options(date("2024-05-20"), 600);
    assert!(flow.is_option_booked(&options[0]));
    assert!(!flow.is_option_booked(&options[1]));

    let err = flow.select_option(options[0].clone()).unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));
    assert!(flow.selection().chosen_option().is_none());
}

#[tokio::test]
async fn cancel_triggers_a_wholesale_appointment_refetch() {
    let appointment_id = Uuid::new_v4();
    let mut api = MockApi::new();

    api.expect_cancel()
        .times(1)
        .withf(move |id| *id == appointment_id)
        .returning(|_| Ok(()));
    api.expect_get_my_appointments().times(1).returning(|| Ok(vec![]));

    let mut flow = flow_with(api);
    flow.cancel_appointment(appointment_id).await.unwrap();
    assert!(flow.my_appointments().is_empty());
}

#[tokio::test]
async fn confirm_without_a_complete_selection_is_an_error() {
    let doctor = Uuid::new_v4();
    let mut api = MockApi::new();

    api.expect_get_available_slots()
        .returning(move |id| Ok(slot_schedules(id, "2024-06-01")));
    api.expect_book().times(0);

    let mut flow = flow_with(api);
    assert!(matches!(
        flow.select_date(date("2024-06-01")),
        Err(BookingError::InvalidSelection(_))
    ));

    flow.open_doctor(doctor).await.unwrap();
    flow.select_date(date("2024-06-01")).unwrap();
    let err = flow.confirm().await.unwrap_err();
    assert!(matches!(err, BookingError::InvalidSelection(_)));
    assert_eq!(flow.state(), FlowState::AwaitingSelection);
}
