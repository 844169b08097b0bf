//! The sample session shipped with the CLI replays cleanly.

use std::path::PathBuf;

use pv_app::{Session, SessionConfig};
use pv_core::Property;
use pv_model::LineKind;
use pv_service::{RecordedService, ServiceError};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../apps/pv-cli/data")
}

fn sample_session() -> (Session, RecordedService) {
    let config = SessionConfig::load(&data_dir().join("session.yaml")).unwrap();
    let service = RecordedService::load(&data_dir().join("water_recordings.json")).unwrap();
    (Session::new(config).unwrap(), service)
}

#[test]
fn sample_replays_default_lines_and_points() {
    let (mut session, service) = sample_session();
    assert_eq!(session.substance_label(), "Water (mp.H2O)");

    let report = session.pump(&service);
    assert_eq!(report.applied, 7);
    assert!(report.failed.is_empty());

    session
        .request_entry([(Property::T, "373.15"), (Property::X, "1")])
        .unwrap();
    session
        .request_entry([(Property::T, "300"), (Property::P, "1")])
        .unwrap();
    let report = session.pump(&service);
    assert_eq!(report.applied, 2);

    let table = session.table().state();
    assert_eq!(table.rows.len(), 2);
    // quality is undefined for the compressed liquid point
    assert_eq!(table.visible_cells(1).last(), Some(&"-"));
    drop(table);

    let plot = session.plot().state();
    assert_eq!(plot.points.x, vec![Some(7.354), Some(0.39309)]);
    let dome = plot.trace(LineKind::SaturationDome).unwrap();
    assert_eq!(dome.x.len(), 11);
}

#[test]
fn sample_error_envelope_surfaces_message() {
    let (mut session, service) = sample_session();
    session.pump(&service);

    session
        .request_entry([(Property::T, "5000"), (Property::P, "1")])
        .unwrap();
    let report = session.pump(&service);

    assert_eq!(report.failed.len(), 1);
    let (_, err) = &report.failed[0];
    assert!(matches!(
        err,
        pv_app::AppError::Service(ServiceError::Upstream { message }) if message == "Temperature out of range"
    ));
    assert!(session.data().points().is_empty());
}
