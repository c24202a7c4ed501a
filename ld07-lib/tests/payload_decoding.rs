//! Tests for calibration and distance payload decoding

mod common;

use common::*;

#[test]
fn test_calibration_payload() {
    let payload = hex_to_bytes(CALIBRATION_PAYLOAD);
    let coefficients = CalibrationCoefficients::from_payload(&payload).expect("Failed to decode coefficients");

    assert!((coefficients.k0 - 0.0123).abs() < 1e-9);
    assert!((coefficients.k1 - 0.0121).abs() < 1e-9);
    assert!((coefficients.b0 - 0.4993).abs() < 1e-9);
    assert!((coefficients.b1 - 0.5508).abs() < 1e-9);
    assert_eq!(coefficients.points, 80);

    assert_eq!(
        coefficients.to_string(),
        "k0: 0.0123, k1: 0.0121, b0: 0.4993, b1: 0.5508, points: 80"
    );
}

#[test]
fn test_calibration_payload_wrong_size() {
    for len in [0usize, 17, 19] {
        let payload = vec![0u8; len];
        match CalibrationCoefficients::from_payload(&payload) {
            Err(LdError::UnexpectedPayloadLength { expected: 18, actual, .. }) => assert_eq!(actual, len),
            other => panic!("len {}: expected UnexpectedPayloadLength, got {:?}", len, other),
        }
    }
}

#[test]
fn test_distance_frame_decode() {
    let payload = distance_payload(0xDEADBEEF, &[(511, 127), (0, 0), (250, 33)]);
    let transform = |index: usize, points: u16| index as f64 * 360.0 / f64::from(points);

    let frame = DistanceFrame::decode(&payload, 3, &transform).expect("Failed to decode frame");
    assert_eq!(frame.timestamp, 0xDEADBEEF);
    assert_eq!(frame.len(), 3);

    let decoded: Vec<(usize, u16, u8)> = frame.samples.iter().map(|s| (s.index, s.distance, s.confidence)).collect();
    assert_eq!(decoded, vec![(0, 511, 127), (1, 0, 0), (2, 250, 33)]);

    assert_eq!(frame.samples[0].angle, 0.0);
    assert_eq!(frame.samples[1].angle, 120.0);
    assert_eq!(frame.samples[2].angle, 240.0);

    let confident: Vec<usize> = frame.confident(30).map(|s| s.index).collect();
    assert_eq!(confident, vec![0, 2]);
}

#[test]
fn test_distance_frame_timestamp_only() {
    let frame = DistanceFrame::decode(&[1, 0, 0, 0], 0, &LinearSweep::new(0.0, 1.0)).unwrap();
    assert_eq!(frame.timestamp, 1);
    assert!(frame.is_empty());
    assert_eq!(frame.to_string(), "t=1 points=0");
}

#[test]
fn test_distance_frame_malformed_lengths() {
    let sweep = LinearSweep::new(0.0, 1.0);

    // shorter than the timestamp
    assert!(matches!(
        DistanceFrame::decode(&[1, 2, 3], 0, &sweep),
        Err(LdError::UnexpectedPayloadLength { command: CommandCode::GetDistance, actual: 3, .. })
    ));

    // half a sample dangling
    match DistanceFrame::decode(&[0, 0, 0, 0, 1, 2, 3], 1, &sweep) {
        Err(LdError::UnexpectedPayloadLength { expected, actual, .. }) => {
            assert_eq!(expected, 6);
            assert_eq!(actual, 7);
        }
        other => panic!("Expected UnexpectedPayloadLength, got {:?}", other),
    }

    // more samples than announced is not truncated
    let payload = distance_payload(0, &[(1, 1), (2, 2)]);
    assert!(matches!(
        DistanceFrame::decode(&payload, 1, &sweep),
        Err(LdError::PointCountMismatch { expected: 1, actual: 2 })
    ));
}

#[test]
fn test_linear_sweep() {
    let sweep = LinearSweep::new(-30.0, 30.0);
    assert_eq!(sweep.angle(0, 5), -30.0);
    assert_eq!(sweep.angle(2, 5), 0.0);
    assert_eq!(sweep.angle(4, 5), 30.0);
    assert_eq!(sweep.angle(0, 1), -30.0, "a single point sits at the start");
    assert_eq!(sweep.angle(0, 0), -30.0);
}

#[test]
fn test_distance_frame_display() {
    let payload = distance_payload(42, &[(300, 10), (120, 90), (200, 50)]);
    let frame = DistanceFrame::decode(&payload, 3, &LinearSweep::new(0.0, 2.0)).unwrap();
    assert_eq!(frame.to_string(), "t=42 points=3 nearest=120 @ 1.00 (conf 90)");
}
